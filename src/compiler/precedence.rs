use crate::{compiler::Compiler, scanner::token::TokenType};

/// `#[repr(u8)]` so precedence levels compare and increment as bytes.
/// The variant order is the precedence ladder, lowest to highest.
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
pub enum Precedence {
    None,
    Assignment, // =
    Or,         // or
    And,        // and
    Equality,   // == !=
    Comparison, // < > <= >=
    Term,       // + -
    Factor,     // * /
    Unary,      // ! -
    Call,       // . ()
    Primary,
}

impl From<u8> for Precedence {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Assignment,
            2 => Self::Or,
            3 => Self::And,
            4 => Self::Equality,
            5 => Self::Comparison,
            6 => Self::Term,
            7 => Self::Factor,
            8 => Self::Unary,
            9 => Self::Call,
            10 => Self::Primary,
            _ => unreachable!(),
        }
    }
}

/// Handler invoked by `parse_precedence`. The bool is `can_assign`:
/// whether an `=` after the parsed expression would be a valid
/// assignment. Higher-ranked over the compiler's lifetime so the rule
/// table can live in a `static`.
pub type ParseFn = Option<for<'a> fn(&mut Compiler<'a>, bool)>;

/// The (prefix, infix, precedence) triple driving the Pratt parser, one
/// per token type.
#[derive(Clone, Copy)]
pub struct ParseRule {
    pub prefix: ParseFn,
    pub infix: ParseFn,
    pub precedence: Precedence,
}

// The handlers are methods on `Compiler`. A method named through a
// generic impl carries the compiler's lifetime as an early-bound
// parameter, which cannot coerce to the higher-ranked pointers the
// static table stores; these wrappers are late-bound over it.

fn grouping(compiler: &mut Compiler<'_>, can_assign: bool) {
    compiler.grouping(can_assign);
}

fn unary(compiler: &mut Compiler<'_>, can_assign: bool) {
    compiler.unary(can_assign);
}

fn binary(compiler: &mut Compiler<'_>, can_assign: bool) {
    compiler.binary(can_assign);
}

fn number(compiler: &mut Compiler<'_>, can_assign: bool) {
    compiler.number(can_assign);
}

fn string(compiler: &mut Compiler<'_>, can_assign: bool) {
    compiler.string(can_assign);
}

fn literal(compiler: &mut Compiler<'_>, can_assign: bool) {
    compiler.literal(can_assign);
}

fn variable(compiler: &mut Compiler<'_>, can_assign: bool) {
    compiler.variable(can_assign);
}

/// The full rule table, built once. Row order mirrors the `TokenType`
/// variant order exactly; `get_parse_rule` indexes it by discriminant.
static RULES: [ParseRule; 40] = [
    // TokenType::LeftParen
    ParseRule {
        prefix: Some(grouping),
        infix: None,
        // The paren itself binds nothing; the inner expression carries
        // its own precedence.
        precedence: Precedence::None,
    },
    // TokenType::RightParen
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::LeftBrace
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::RightBrace
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Comma
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Dot
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Minus
    ParseRule {
        // Prefix as negation, infix as subtraction.
        prefix: Some(unary),
        infix: Some(binary),
        precedence: Precedence::Term,
    },
    // TokenType::Plus
    ParseRule {
        prefix: None,
        infix: Some(binary),
        precedence: Precedence::Term,
    },
    // TokenType::Semicolon
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Slash
    ParseRule {
        prefix: None,
        infix: Some(binary),
        precedence: Precedence::Factor,
    },
    // TokenType::Star
    ParseRule {
        prefix: None,
        infix: Some(binary),
        precedence: Precedence::Factor,
    },
    // TokenType::Bang
    ParseRule {
        prefix: Some(unary),
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::BangEqual
    ParseRule {
        prefix: None,
        infix: Some(binary),
        precedence: Precedence::Equality,
    },
    // TokenType::Equal
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::EqualEqual
    ParseRule {
        prefix: None,
        infix: Some(binary),
        precedence: Precedence::Equality,
    },
    // TokenType::Greater
    ParseRule {
        prefix: None,
        infix: Some(binary),
        precedence: Precedence::Comparison,
    },
    // TokenType::GreaterEqual
    ParseRule {
        prefix: None,
        infix: Some(binary),
        precedence: Precedence::Comparison,
    },
    // TokenType::Less
    ParseRule {
        prefix: None,
        infix: Some(binary),
        precedence: Precedence::Comparison,
    },
    // TokenType::LessEqual
    ParseRule {
        prefix: None,
        infix: Some(binary),
        precedence: Precedence::Comparison,
    },
    // TokenType::Identifier
    ParseRule {
        prefix: Some(variable),
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::String
    ParseRule {
        prefix: Some(string),
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Number
    ParseRule {
        prefix: Some(number),
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::And
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Class
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Else
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::False
    ParseRule {
        prefix: Some(literal),
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::For
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Fun
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::If
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Nil
    ParseRule {
        prefix: Some(literal),
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Or
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Print
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Return
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Super
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::This
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::True
    ParseRule {
        prefix: Some(literal),
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Var
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::While
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Error
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
    // TokenType::Eof
    ParseRule {
        prefix: None,
        infix: None,
        precedence: Precedence::None,
    },
];

impl ParseRule {
    /// Rule for a token type. Sound because the table rows are laid out in
    /// `TokenType` variant order.
    pub fn get_parse_rule(ty: TokenType) -> &'static ParseRule {
        &RULES[ty as usize]
    }
}
