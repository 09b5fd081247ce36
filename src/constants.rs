/// Limits shared between the compiler and the VM.
///
/// One past the largest value a one-byte operand can hold. Constant pool
/// indices, local slots and the locals array are all capped by this.
pub const UINT8_COUNT: usize = u8::MAX as usize + 1;

/// Fixed capacity of the VM's value stack. Pushing past it is reported as
/// a "Stack overflow." runtime error.
pub const STACK_MAX: usize = 256;
