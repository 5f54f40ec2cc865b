use super::{Opcode, Val};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Arithmetic, comparison and logic on numbers
///
/// Comparisons and logic produce 1 or 0. Bitwise operations work on the
/// 32-bit integer conversion of their operands.

pub struct Operation {}

impl Operation {
    pub fn unary(op: Opcode, val: f64) -> Result<f64> {
        match op {
            Opcode::Neg => Ok(-val),
            Opcode::Not => Ok(Operation::bool(!Val::is_true(val))),
            Opcode::BitNot => Ok(!Operation::int32(val) as f64),
            _ => Err(error!(InternalError; format!("{} IS NOT UNARY", op))),
        }
    }

    pub fn binary(op: Opcode, lhs: f64, rhs: f64) -> Result<f64> {
        use Opcode::*;
        Ok(match op {
            Add => lhs + rhs,
            Sub => lhs - rhs,
            Mul => lhs * rhs,
            Div => lhs / rhs,
            Mod => lhs % rhs,
            Shl => Operation::shift_left(lhs, rhs),
            Shr => Operation::shift_right(lhs, rhs),
            Lt => Operation::bool(lhs < rhs),
            Le => Operation::bool(lhs <= rhs),
            Gt => Operation::bool(lhs > rhs),
            Ge => Operation::bool(lhs >= rhs),
            Eq => Operation::bool(lhs == rhs),
            Ne => Operation::bool(lhs != rhs),
            BitAnd => (Operation::int32(lhs) & Operation::int32(rhs)) as f64,
            BitOr => (Operation::int32(lhs) | Operation::int32(rhs)) as f64,
            BitXor => (Operation::int32(lhs) ^ Operation::int32(rhs)) as f64,
            And => Operation::bool(Val::is_true(lhs) && Val::is_true(rhs)),
            Or => Operation::bool(Val::is_true(lhs) || Val::is_true(rhs)),
            _ => return Err(error!(InternalError; format!("{} IS NOT BINARY", op))),
        })
    }

    fn bool(b: bool) -> f64 {
        if b {
            1.0
        } else {
            0.0
        }
    }

    fn int32(n: f64) -> i32 {
        n as i64 as i32
    }

    fn shift_amount(n: f64) -> u32 {
        (Operation::int32(n) & 31) as u32
    }

    fn shift_left(lhs: f64, rhs: f64) -> f64 {
        Operation::int32(lhs).wrapping_shl(Operation::shift_amount(rhs)) as f64
    }

    fn shift_right(lhs: f64, rhs: f64) -> f64 {
        (Operation::int32(lhs) >> Operation::shift_amount(rhs)) as f64
    }
}
