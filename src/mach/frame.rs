use super::{Address, Stack, Val};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// The three cells `ENTERFUNCTION` pushes above the arguments.
/// The frame pointer is the stack length just after them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFrame {
    pub return_address: Address,
    pub param_count: usize,
    pub saved_fp: usize,
}

impl CallFrame {
    pub const LEN: usize = 3;

    pub fn push_onto(&self, stack: &mut Stack<Val>) -> Result<()> {
        stack.push(Val::Return(self.return_address))?;
        stack.push(Val::Arity(self.param_count))?;
        stack.push(Val::Frame(self.saved_fp))
    }

    pub fn pop_from(stack: &mut Stack<Val>) -> Result<CallFrame> {
        match (stack.pop()?, stack.pop()?, stack.pop()?) {
            (Val::Frame(saved_fp), Val::Arity(param_count), Val::Return(return_address)) => {
                Ok(CallFrame {
                    return_address,
                    param_count,
                    saved_fp,
                })
            }
            _ => Err(error!(InternalError; "MISSING CALL FRAME")),
        }
    }

    /// Stack index of parameter `index` for the frame whose pointer is `fp`.
    pub fn slot(fp: usize, param_count: usize, index: usize) -> Option<usize> {
        (fp + index).checked_sub(Self::LEN + param_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut stack = Stack::new("TEST");
        stack.push(Val::Number(7.0)).unwrap();
        stack.push(Val::Number(8.0)).unwrap();
        let frame = CallFrame {
            return_address: 12,
            param_count: 2,
            saved_fp: 0,
        };
        frame.push_onto(&mut stack).unwrap();
        let fp = stack.len();
        assert_eq!(CallFrame::slot(fp, 2, 0), Some(0));
        assert_eq!(CallFrame::slot(fp, 2, 1), Some(1));
        assert_eq!(CallFrame::pop_from(&mut stack).unwrap(), frame);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_missing_frame() {
        let mut stack = Stack::new("TEST");
        for _ in 0..3 {
            stack.push(Val::Number(0.0)).unwrap();
        }
        assert!(CallFrame::pop_from(&mut stack).is_err());
    }
}
