use super::{Column, LineNumber};
use crate::mach::Address;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    line_number: Option<LineNumber>,
    column: Column,
    address: Option<Address>,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $token:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).at_token($token)
    };
    ($err:ident, $token:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .at_token($token)
            .message($msg)
    };
    ($err:ident, $line:expr, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .in_column($col)
    };
    ($err:ident, $line:expr, ..$col:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .in_column($col)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line_number: None,
            column: 0..0,
            address: None,
            message: String::new(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn line_number(&self) -> Option<LineNumber> {
        self.line_number
    }

    pub fn column(&self) -> Column {
        self.column.clone()
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn in_line_number(mut self, line: LineNumber) -> Error {
        debug_assert!(self.line_number.is_none());
        self.line_number = Some(line);
        self
    }

    pub fn in_column(mut self, column: &Column) -> Error {
        debug_assert_eq!(self.column, 0..0);
        self.column = column.clone();
        self
    }

    pub fn at_token(self, token: &super::Token) -> Error {
        self.in_line_number(token.line).in_column(&token.column)
    }

    /// Runtime errors are located by the address of the failing opcode.
    /// Errors that already carry an address keep it.
    pub fn in_address(mut self, address: Address) -> Error {
        if self.address.is_none() && self.line_number.is_none() {
            self.address = Some(address);
        }
        self
    }

    pub fn message<S: Into<String>>(mut self, message: S) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        self.message = message.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    IllegalCharacter = 1,
    SyntaxError = 2,
    ReturnWithoutFunction = 3,
    BreakWithoutLoop = 4,
    IllegalFunctionCall = 5,
    ContinueWithoutLoop = 6,
    OutOfMemory = 7,
    UndefinedLabel = 8,
    SubscriptOutOfRange = 9,
    RedimensionedArray = 10,
    DuplicateLabel = 11,
    TypeMismatch = 13,
    Break = 17,
    UndeclaredName = 18,
    MissingReturnValue = 19,
    InternalError = 51,
}

impl ErrorCode {
    fn text(self) -> &'static str {
        use ErrorCode::*;
        match self {
            IllegalCharacter => "ILLEGAL CHARACTER",
            SyntaxError => "SYNTAX ERROR",
            ReturnWithoutFunction => "RETURN WITHOUT FUNCTION",
            BreakWithoutLoop => "BREAK WITHOUT LOOP",
            IllegalFunctionCall => "ILLEGAL FUNCTION CALL",
            ContinueWithoutLoop => "CONTINUE WITHOUT LOOP",
            OutOfMemory => "OUT OF MEMORY",
            UndefinedLabel => "UNDEFINED LABEL",
            SubscriptOutOfRange => "SUBSCRIPT OUT OF RANGE",
            RedimensionedArray => "REDIMENSIONED ARRAY",
            DuplicateLabel => "DUPLICATE LABEL",
            TypeMismatch => "TYPE MISMATCH",
            Break => "BREAK",
            UndeclaredName => "UNDECLARED NAME",
            MissingReturnValue => "MISSING RETURN VALUE",
            InternalError => "INTERNAL ERROR",
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.code.text())?;
        if let Some(line_number) = self.line_number {
            write!(f, " IN {}", line_number)?;
            if (0..0) != self.column {
                write!(f, " ({}..{})", self.column.start, self.column.end)?;
            }
        }
        if let Some(address) = self.address {
            write!(f, " AT {}", address)?;
        }
        if !self.message.is_empty() {
            write!(f, "; {}", self.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(error!(SyntaxError).to_string(), "SYNTAX ERROR");
        assert_eq!(
            error!(SyntaxError, 3, ..&(4..5); "EXPECTED ;").to_string(),
            "SYNTAX ERROR IN 3 (4..5); EXPECTED ;"
        );
        assert_eq!(
            error!(TypeMismatch).in_address(42).to_string(),
            "TYPE MISMATCH AT 42"
        );
    }

    #[test]
    fn test_address_only_once() {
        let e = error!(UndeclaredName; "X").in_address(7).in_address(9);
        assert_eq!(e.address(), Some(7));
        assert_eq!(e.code(), ErrorCode::UndeclaredName);
    }
}
