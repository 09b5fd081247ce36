use std::rc::Rc;

use crate::{
    value::Value,
    vm::{VM, errors::InterpretError},
};

/// Reads a global back out of the VM, the observable end state of a run.
fn global(vm: &mut VM, name: &str) -> Option<Value> {
    let key = vm.heap.copy_string(name);
    vm.globals.get(&key)
}

fn runtime_message(result: Result<(), InterpretError>) -> String {
    match result {
        Err(InterpretError::Runtime(message)) => message,
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn arithmetic_expression() {
    let mut vm = VM::new();
    vm.interpret("var result = 1 + 2;").unwrap();
    assert_eq!(global(&mut vm, "result"), Some(Value::Number(3.0)));
}

#[test]
fn grouping_and_precedence() {
    let mut vm = VM::new();
    vm.interpret("var result = (1 + 2) * 3 - -4;").unwrap();
    assert_eq!(global(&mut vm, "result"), Some(Value::Number(13.0)));
}

#[test]
fn division_produces_fractions() {
    let mut vm = VM::new();
    vm.interpret("var result = 10 / 4;").unwrap();
    assert_eq!(global(&mut vm, "result"), Some(Value::Number(2.5)));
}

#[test]
fn string_concatenation_interns_the_result() {
    let mut vm = VM::new();
    vm.interpret("var s = \"st\" + \"ri\" + \"ng\"; var t = \"string\";")
        .unwrap();

    let s = global(&mut vm, "s").and_then(|v| v.as_obj()).unwrap();
    let t = global(&mut vm, "t").and_then(|v| v.as_obj()).unwrap();
    assert_eq!(s.as_str(), "string");
    // One object per content: the concatenation result is the same
    // allocation as the literal.
    assert!(Rc::ptr_eq(&s, &t));
}

#[test]
fn concatenated_strings_compare_equal_to_literals() {
    let mut vm = VM::new();
    vm.interpret("var r = \"a\" + \"b\" == \"ab\";").unwrap();
    assert_eq!(global(&mut vm, "r"), Some(Value::Bool(true)));
}

#[test]
fn truthiness_and_comparison_chain() {
    let mut vm = VM::new();
    vm.interpret("var r = !(5 - 4 > 3 * 2 == !nil);").unwrap();
    assert_eq!(global(&mut vm, "r"), Some(Value::Bool(true)));
}

#[test]
fn bang_applies_to_any_value() {
    let mut vm = VM::new();
    vm.interpret("var a = !\"abc\"; var b = !nil; var c = !0;")
        .unwrap();
    // Strings and all numbers are truthy; only nil and false are not.
    assert_eq!(global(&mut vm, "a"), Some(Value::Bool(false)));
    assert_eq!(global(&mut vm, "b"), Some(Value::Bool(true)));
    assert_eq!(global(&mut vm, "c"), Some(Value::Bool(false)));
}

#[test]
fn equality_is_by_value_within_a_variant() {
    let mut vm = VM::new();
    vm.interpret(
        "var a = nil == nil;
         var b = \"x\" == \"x\";
         var c = 1 == \"1\";
         var d = 0 == false;",
    )
    .unwrap();
    assert_eq!(global(&mut vm, "a"), Some(Value::Bool(true)));
    assert_eq!(global(&mut vm, "b"), Some(Value::Bool(true)));
    assert_eq!(global(&mut vm, "c"), Some(Value::Bool(false)));
    assert_eq!(global(&mut vm, "d"), Some(Value::Bool(false)));
}

#[test]
fn global_redefinition_overwrites() {
    let mut vm = VM::new();
    vm.interpret("var a = 1; var a = 2;").unwrap();
    assert_eq!(global(&mut vm, "a"), Some(Value::Number(2.0)));
}

#[test]
fn block_scoped_shadowing_leaves_the_global_alone() {
    let mut vm = VM::new();
    vm.interpret("var a = 10; var b = 0; { var a = a + 1; b = a; }")
        .unwrap();
    assert_eq!(global(&mut vm, "a"), Some(Value::Number(10.0)));
    assert_eq!(global(&mut vm, "b"), Some(Value::Number(11.0)));
}

#[test]
fn nested_locals_resolve_to_their_slots() {
    let mut vm = VM::new();
    vm.interpret("var r; { var x = 1; { var y = x + 2; r = y; } }")
        .unwrap();
    assert_eq!(global(&mut vm, "r"), Some(Value::Number(3.0)));
}

#[test]
fn assignment_is_an_expression() {
    let mut vm = VM::new();
    vm.interpret("var a; var b; a = b = 2;").unwrap();
    assert_eq!(global(&mut vm, "a"), Some(Value::Number(2.0)));
    assert_eq!(global(&mut vm, "b"), Some(Value::Number(2.0)));
}

#[test]
fn print_runs_to_completion() {
    let mut vm = VM::new();
    vm.interpret("print 1 + 2; print \"st\" + \"ri\" + \"ng\";")
        .unwrap();
}

#[test]
fn reading_an_undefined_global_fails() {
    let mut vm = VM::new();
    let message = runtime_message(vm.interpret("print undefined;"));
    assert!(message.contains("Undefined variable 'undefined'."));
    assert!(message.contains("[line 1] in script"));
}

#[test]
fn assigning_an_undefined_global_leaves_no_trace() {
    let mut vm = VM::new();
    let message = runtime_message(vm.interpret("b = 1;"));
    assert!(message.contains("Undefined variable 'b'."));
    // The failed assignment must not have defined the variable.
    assert_eq!(global(&mut vm, "b"), None);
}

#[test]
fn adding_mixed_types_fails() {
    let mut vm = VM::new();
    let message = runtime_message(vm.interpret("1 + \"a\";"));
    assert!(message.contains("Operands must be two numbers or two strings."));
}

#[test]
fn arithmetic_on_strings_fails() {
    let mut vm = VM::new();
    let message = runtime_message(vm.interpret("\"a\" - \"b\";"));
    assert!(message.contains("Operands must be numbers."));
}

#[test]
fn comparison_needs_numbers() {
    let mut vm = VM::new();
    let message = runtime_message(vm.interpret("\"a\" < \"b\";"));
    assert!(message.contains("Operands must be numbers."));
}

#[test]
fn negating_a_non_number_fails() {
    let mut vm = VM::new();
    let message = runtime_message(vm.interpret("-\"a\";"));
    assert!(message.contains("Operand must be a number."));
}

#[test]
fn runtime_errors_report_the_failing_line() {
    let mut vm = VM::new();
    let message = runtime_message(vm.interpret("var a = 1;\nvar b = 2;\na + undefined;"));
    assert!(message.contains("[line 3] in script"));
}

#[test]
fn the_stack_is_clean_after_a_runtime_error() {
    let mut vm = VM::new();
    assert!(vm.interpret("print undefined;").is_err());

    // The next interpretation starts fresh, as a REPL line would.
    vm.interpret("var ok = 1 + 1;").unwrap();
    assert_eq!(global(&mut vm, "ok"), Some(Value::Number(2.0)));
    assert!(vm.stack.is_empty());
}

#[test]
fn globals_persist_across_interpretations() {
    let mut vm = VM::new();
    vm.interpret("var counter = 1;").unwrap();
    vm.interpret("counter = counter + 1;").unwrap();
    assert_eq!(global(&mut vm, "counter"), Some(Value::Number(2.0)));
}

#[test]
fn compile_errors_surface_every_diagnostic() {
    let mut vm = VM::new();
    let Err(InterpretError::Compile(diagnostics)) = vm.interpret("1 +; 2 +;") else {
        panic!("expected a compile error");
    };
    assert_eq!(diagnostics.len(), 2);
    // Nothing ran.
    assert!(vm.stack.is_empty());
}

#[test]
fn filling_every_stack_slot_overflows() {
    // 256 locals fill the stack; the first expression push on top of them
    // has nowhere to go.
    let mut source = String::from("{");
    for i in 0..256 {
        source.push_str(&format!("var l{i} = 1;"));
    }
    source.push_str("print l0 + l1;}");

    let mut vm = VM::new();
    let message = runtime_message(vm.interpret(&source));
    assert!(message.contains("Stack overflow."));
}
