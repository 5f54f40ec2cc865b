use super::{Column, LineNumber};
use std::collections::HashMap;
use std::rc::Rc;

thread_local!(
    static STRING_TO_KIND: HashMap<&'static str, Kind> = Word::ALL
        .iter()
        .map(|w| Kind::Word(*w))
        .chain(Builtin::ALL.iter().map(|b| Kind::Builtin(*b)))
        .chain(Constant::ALL.iter().map(|c| Kind::Constant(*c)))
        .chain(Operator::ALL.iter().map(|o| Kind::Operator(*o)))
        .chain(IncDec::ALL.iter().map(|i| Kind::IncDec(*i)))
        .chain(Kind::DELIMITERS.iter().copied())
        .map(|k| (k.text(), k))
        .collect();
);

/// A lexeme and its classification. Position fields are for diagnostics.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: Kind,
    pub lexeme: Rc<str>,
    pub line: LineNumber,
    pub column: Column,
}

impl Token {
    pub fn new(kind: Kind, lexeme: &str, line: LineNumber, column: Column) -> Token {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    /// Value of a `Number` token.
    pub fn number(&self) -> Option<f64> {
        match self.kind {
            Kind::Number => self.lexeme.parse().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.kind {
            Kind::End => write!(f, "END OF PROGRAM"),
            _ => write!(f, "{}", self.lexeme),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Kind {
    Number,
    Operator(Operator),
    IncDec(IncDec),
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Ident,
    Assign,
    Word(Word),
    Builtin(Builtin),
    Constant(Constant),
    End,
}

impl Kind {
    const DELIMITERS: [Kind; 9] = [
        Kind::Assign,
        Kind::Semicolon,
        Kind::LParen,
        Kind::RParen,
        Kind::LBracket,
        Kind::RBracket,
        Kind::LBrace,
        Kind::RBrace,
        Kind::Comma,
    ];

    pub fn from_string(s: &str) -> Option<Kind> {
        STRING_TO_KIND.with(|stk| stk.get(s).copied())
    }

    pub fn is_delimiter(&self) -> bool {
        Kind::DELIMITERS.contains(self)
    }

    pub fn text(&self) -> &'static str {
        use Kind::*;
        match self {
            Number => "NUMBER",
            Operator(o) => o.text(),
            IncDec(i) => i.text(),
            LParen => "(",
            RParen => ")",
            LBracket => "[",
            RBracket => "]",
            LBrace => "{",
            RBrace => "}",
            Semicolon => ";",
            Comma => ",",
            Ident => "IDENTIFIER",
            Assign => "=",
            Word(w) => w.text(),
            Builtin(b) => b.text(),
            Constant(c) => c.text(),
            End => "END OF PROGRAM",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Word {
    If,
    For,
    While,
    Def,
    Return,
    Dim,
    Continue,
    Break,
}

impl Word {
    const ALL: [Word; 8] = [
        Word::If,
        Word::For,
        Word::While,
        Word::Def,
        Word::Return,
        Word::Dim,
        Word::Continue,
        Word::Break,
    ];

    pub fn text(&self) -> &'static str {
        use Word::*;
        match self {
            If => "if",
            For => "for",
            While => "while",
            Def => "def",
            Return => "return",
            Dim => "dim",
            Continue => "continue",
            Break => "break",
        }
    }
}

/// Names of the native functions. Their behavior lives in `mach::Function`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Builtin {
    Print,
    Sin,
    Cos,
    Int,
    Atan,
    Tan,
    Exp,
    Log,
    Log10,
    Round,
    Pow,
    Sqrt,
    Rand,
}

impl Builtin {
    pub const ALL: [Builtin; 13] = [
        Builtin::Print,
        Builtin::Sin,
        Builtin::Cos,
        Builtin::Int,
        Builtin::Atan,
        Builtin::Tan,
        Builtin::Exp,
        Builtin::Log,
        Builtin::Log10,
        Builtin::Round,
        Builtin::Pow,
        Builtin::Sqrt,
        Builtin::Rand,
    ];

    pub fn text(&self) -> &'static str {
        use Builtin::*;
        match self {
            Print => "print",
            Sin => "sin",
            Cos => "cos",
            Int => "int",
            Atan => "atan",
            Tan => "tan",
            Exp => "exp",
            Log => "log",
            Log10 => "log10",
            Round => "round",
            Pow => "pow",
            Sqrt => "sqrt",
            Rand => "rand",
        }
    }

    pub fn arity(&self) -> std::ops::RangeInclusive<usize> {
        use Builtin::*;
        match self {
            Print => 0..=1,
            Rand => 0..=0,
            Pow => 2..=2,
            Sin | Cos | Int | Atan | Tan | Exp | Log | Log10 | Round | Sqrt => 1..=1,
        }
    }

    /// `print` is the only builtin that produces no value.
    pub fn has_value(&self) -> bool {
        !matches!(self, Builtin::Print)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub const ALL: [Constant; 2] = [Constant::Pi, Constant::E];

    pub fn text(&self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulus,
    And,
    Or,
    Not,
    GreaterEqual,
    Greater,
    Less,
    LessEqual,
    NotEqual,
    Equal,
    BitAnd,
    BitXor,
    BitOr,
    BitNot,
    ShiftRight,
    ShiftLeft,
}

impl Operator {
    const ALL: [Operator; 20] = [
        Operator::Plus,
        Operator::Minus,
        Operator::Multiply,
        Operator::Divide,
        Operator::Modulus,
        Operator::And,
        Operator::Or,
        Operator::Not,
        Operator::GreaterEqual,
        Operator::Greater,
        Operator::Less,
        Operator::LessEqual,
        Operator::NotEqual,
        Operator::Equal,
        Operator::BitAnd,
        Operator::BitXor,
        Operator::BitOr,
        Operator::BitNot,
        Operator::ShiftRight,
        Operator::ShiftLeft,
    ];

    pub fn text(&self) -> &'static str {
        use Operator::*;
        match self {
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            Modulus => "%",
            And => "&&",
            Or => "||",
            Not => "!",
            GreaterEqual => ">=",
            Greater => ">",
            Less => "<",
            LessEqual => "<=",
            NotEqual => "!=",
            Equal => "==",
            BitAnd => "&",
            BitXor => "^",
            BitOr => "|",
            BitNot => "~",
            ShiftRight => ">>",
            ShiftLeft => "<<",
        }
    }

    /// Binding strength as a binary operator. `None` for prefix-only operators.
    pub fn rank(&self) -> Option<u8> {
        use Operator::*;
        match self {
            Or => Some(3),
            And => Some(4),
            BitOr => Some(5),
            BitXor => Some(6),
            BitAnd => Some(7),
            NotEqual | Equal => Some(8),
            Greater | Less | GreaterEqual | LessEqual => Some(9),
            ShiftLeft | ShiftRight => Some(10),
            Plus | Minus => Some(11),
            Multiply | Divide | Modulus => Some(12),
            Not | BitNot => None,
        }
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::Minus | Operator::Not | Operator::BitNot)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum IncDec {
    Increment,
    Decrement,
}

impl IncDec {
    const ALL: [IncDec; 2] = [IncDec::Increment, IncDec::Decrement];

    pub fn text(&self) -> &'static str {
        match self {
            IncDec::Increment => "++",
            IncDec::Decrement => "--",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        assert_eq!(Kind::from_string("while"), Some(Kind::Word(Word::While)));
        assert_eq!(Kind::from_string("log10"), Some(Kind::Builtin(Builtin::Log10)));
        assert_eq!(Kind::from_string("pi"), Some(Kind::Constant(Constant::Pi)));
        assert_eq!(Kind::from_string("<<"), Some(Kind::Operator(Operator::ShiftLeft)));
        assert_eq!(Kind::from_string("--"), Some(Kind::IncDec(IncDec::Decrement)));
        assert_eq!(Kind::from_string("="), Some(Kind::Assign));
        assert_eq!(Kind::from_string("PICKLES"), None);
    }

    #[test]
    fn test_ranks() {
        assert!(Operator::Multiply.rank() > Operator::Plus.rank());
        assert!(Operator::Plus.rank() > Operator::Less.rank());
        assert!(Operator::And.rank() > Operator::Or.rank());
        assert_eq!(Operator::Not.rank(), None);
    }
}
