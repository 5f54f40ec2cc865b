use super::{Address, SymbolId, UserFunction};
use std::rc::Rc;

/// ## Operand stack values
///
/// Only `Number` is a value in the language. The references are produced
/// by `PUSHVAR`, `PUSHARR` and `PUSHFUNC`. The last three variants are the
/// cells of a `CallFrame`.

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Number(f64),
    Var(SymbolId),
    Slot(usize),
    Array(SymbolId),
    Function(Rc<UserFunction>),
    Return(Address),
    Arity(usize),
    Frame(usize),
}

impl Val {
    pub fn is_true(n: f64) -> bool {
        n != 0.0 && !n.is_nan()
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Val::*;
        match self {
            Number(n) => {
                let n = *n;
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    write!(f, "{}", if n > 0.0 { "Infinity" } else { "-Infinity" })
                } else if n == 0.0 {
                    write!(f, "0")
                } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
                    let s = format!("{:e}", n);
                    match s.split_once('e') {
                        Some((mantissa, exp)) if !exp.starts_with('-') => {
                            write!(f, "{}e+{}", mantissa, exp)
                        }
                        _ => write!(f, "{}", s),
                    }
                } else {
                    write!(f, "{}", n)
                }
            }
            Var(id) => write!(f, "VAR({})", id),
            Slot(i) => write!(f, "SLOT({})", i),
            Array(id) => write!(f, "ARRAY({})", id),
            Function(func) => write!(f, "FUNCTION({})", func.name),
            Return(a) => write!(f, "RETURN({})", a),
            Arity(n) => write!(f, "ARITY({})", n),
            Frame(fp) => write!(f, "FRAME({})", fp),
        }
    }
}
