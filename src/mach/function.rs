use crate::error;
use crate::lang::token::Builtin;
use crate::lang::Error;
use rand::Rng;

type Result<T> = std::result::Result<T, Error>;

/// ## Builtin functions
///
/// `print` is handled by the runtime since it produces an event
/// rather than a value.

pub struct Function {}

impl Function {
    pub fn check_arity(builtin: Builtin, len: usize) -> Result<()> {
        if builtin.arity().contains(&len) {
            Ok(())
        } else {
            Err(error!(IllegalFunctionCall; format!(
                "{} EXPECTS {}..={} ARGUMENTS",
                builtin.text(),
                builtin.arity().start(),
                builtin.arity().end()
            )))
        }
    }

    pub fn evaluate<R: Rng>(builtin: Builtin, args: &[f64], rng: &mut R) -> Result<f64> {
        use Builtin::*;
        Function::check_arity(builtin, args.len())?;
        let x = args.first().copied().unwrap_or_default();
        Ok(match builtin {
            Sin => x.sin(),
            Cos => x.cos(),
            Tan => x.tan(),
            Atan => x.atan(),
            Exp => x.exp(),
            Log => x.ln(),
            Log10 => x.log10(),
            Sqrt => x.sqrt(),
            Int => x.floor(),
            Round => (x + 0.5).floor(),
            Pow => x.powf(args.get(1).copied().unwrap_or_default()),
            Rand => rng.gen::<f64>(),
            Print => return Err(error!(TypeMismatch; "PRINT HAS NO VALUE")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;
    use rand::{rngs::StdRng, SeedableRng};

    fn eval(b: Builtin, args: &[f64]) -> f64 {
        let mut rng = StdRng::seed_from_u64(1);
        Function::evaluate(b, args, &mut rng).unwrap()
    }

    #[test]
    fn test_rounding() {
        assert_eq!(eval(Builtin::Int, &[-2.5]), -3.0);
        assert_eq!(eval(Builtin::Round, &[2.5]), 3.0);
        assert_eq!(eval(Builtin::Round, &[-2.5]), -2.0);
    }

    #[test]
    fn test_math() {
        assert_eq!(eval(Builtin::Pow, &[2.0, 10.0]), 1024.0);
        assert_eq!(eval(Builtin::Sqrt, &[81.0]), 9.0);
        assert_eq!(eval(Builtin::Log, &[1.0]), 0.0);
        assert!((eval(Builtin::Log10, &[1000.0]) - 3.0).abs() < 1e-12);
        let r = eval(Builtin::Rand, &[]);
        assert!((0.0..1.0).contains(&r));
    }

    #[test]
    fn test_arity() {
        let mut rng = StdRng::seed_from_u64(1);
        let e = Function::evaluate(Builtin::Pow, &[1.0], &mut rng).unwrap_err();
        assert_eq!(e.code(), ErrorCode::IllegalFunctionCall);
    }
}
