/// ## Virtual machine instruction set
///
/// The toy virtual machine has no registers.
/// Every operation is performed on the operand stack.
///
/// Opcodes live in the same flat stream as their operands. An opcode
/// is followed by `arity()` operand cells. For example `a = 3 * b;`
/// compiles to:
///
/// ```text
/// PUSHVAR a true
/// PUSHNUM 3
/// PUSHVAR b false
/// EXTRACT
/// MUL
/// ASSIGN
/// DISCARD
/// ```
///
/// `FUNCDEF` is the one opcode with a variable length header:
/// name, parameter count, each parameter name, body length.
///
/// See <https://en.wikipedia.org/wiki/Reverse_Polish_notation>

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Nop,

    // *** Stack manipulation
    /// Push an inline number.
    PushNum,
    /// Push a reference to a scalar. The flag allows creation on a miss.
    PushVar,
    PushArr,
    PushFunc,
    /// Replace a reference with the number it holds.
    Extract,
    /// Pop array and index, push the element.
    ExtractElem,
    /// Pop value and reference, store, push the value.
    Assign,
    /// Pop value, array and index, store, push the value.
    AssignElem,
    Discard,

    // *** Increment and decrement
    PreInc,
    PreDec,
    PostInc,
    PostDec,
    PreIncElem,
    PreDecElem,
    PostIncElem,
    PostDecElem,

    // *** Expression operations
    Neg,
    Not,
    BitNot,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,

    // *** Branch control
    /// Pop condition and branch to Address when false.
    If,
    For,
    While,
    /// Unconditional branch to Address.
    Jump,

    // *** Functions and scopes
    CallBuiltin,
    FuncDef,
    Call,
    Return,
    Dim,
    EnterBlock,
    LeaveBlock,
    EnterFunction,
    LeaveFunction,
}

impl Opcode {
    /// Number of inline operand cells that follow this opcode.
    /// `FuncDef` reports its fixed prefix of name and parameter count.
    pub fn arity(&self) -> usize {
        use Opcode::*;
        match self {
            PushNum | PushArr | PushFunc | Dim => 1,
            If | For | While | Jump => 1,
            Return => 1,
            PushVar | CallBuiltin | Call | FuncDef => 2,
            _ => 0,
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        let s = match self {
            Nop => "NOP",

            PushNum => "PUSHNUM",
            PushVar => "PUSHVAR",
            PushArr => "PUSHARR",
            PushFunc => "PUSHFUNC",
            Extract => "EXTRACT",
            ExtractElem => "EXTRACTELEM",
            Assign => "ASSIGN",
            AssignElem => "ASSIGNELEM",
            Discard => "DISCARD",

            PreInc => "PREINC",
            PreDec => "PREDEC",
            PostInc => "POSTINC",
            PostDec => "POSTDEC",
            PreIncElem => "PREINCELEM",
            PreDecElem => "PREDECELEM",
            PostIncElem => "POSTINCELEM",
            PostDecElem => "POSTDECELEM",

            Neg => "NEG",
            Not => "NOT",
            BitNot => "BITNOT",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            Div => "DIV",
            Mod => "MOD",
            Shl => "SHL",
            Shr => "SHR",
            Lt => "LT",
            Le => "LE",
            Gt => "GT",
            Ge => "GE",
            Eq => "EQ",
            Ne => "NE",
            BitAnd => "BITAND",
            BitOr => "BITOR",
            BitXor => "BITXOR",
            And => "AND",
            Or => "OR",

            If => "IF",
            For => "FOR",
            While => "WHILE",
            Jump => "JUMP",

            CallBuiltin => "CALLBUILTIN",
            FuncDef => "FUNCDEF",
            Call => "CALL",
            Return => "RETURN",
            Dim => "DIM",
            EnterBlock => "ENTERBLOCK",
            LeaveBlock => "LEAVEBLOCK",
            EnterFunction => "ENTERFUNCTION",
            LeaveFunction => "LEAVEFUNCTION",
        };
        write!(f, "{}", s)
    }
}
