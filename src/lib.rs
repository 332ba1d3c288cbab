pub mod ast;
pub mod calculator;
pub mod error;

use ast::Evaluator;
use rayon::prelude::*;

pub use calculator::{Calculator, CalculatorConfig, Key, KEYPAD};
pub use error::{ErrorKind, EvalError, TokenizeError};

/// Evaluates an arithmetic expression such as `"3 + 4 * (2 - 1)"`.
///
/// Supports `+ - * /` with the usual precedence, parentheses and unary minus.
/// The result is always finite: division by zero and overflow are errors.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    Evaluator::new().evaluate_expression(expression)
}

/// Evaluates independent expressions in parallel, keeping input order.
pub fn evaluate_batch<S>(expressions: &[S]) -> Vec<Result<f64, EvalError>>
where
    S: AsRef<str> + Sync,
{
    expressions
        .par_iter()
        .map(|expression| evaluate(expression.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_documented_examples() {
        assert_eq!(evaluate("2 + 3"), Ok(5.0));
        assert_eq!(evaluate("2 + 3 * 4"), Ok(14.0));
        assert_eq!(evaluate("(2 + 3) * 4"), Ok(20.0));
        assert_eq!(evaluate("10 / 0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("-5 + 3"), Ok(-2.0));
        assert_eq!(
            evaluate("2 + )").map_err(|e| e.kind()),
            Err(ErrorKind::MalformedExpression)
        );
        assert_eq!(
            evaluate("2 $ 3").map_err(|e| e.kind()),
            Err(ErrorKind::UnexpectedCharacter)
        );
        assert_eq!(evaluate("3 + 4 * (2 - 1)"), Ok(7.0));
    }

    #[test]
    fn test_idempotence() {
        for input in ["1.5 * (2 - 7) / 3", "1 / 0", "(", "4 # 4"] {
            assert_eq!(evaluate(input), evaluate(input));
        }
    }

    #[test]
    fn test_concurrent_callers() {
        let inputs = ["2 + 3 * 4", "(2 + 3) * 4", "-5 + 3", "10 / 0", "2 + )"];
        let expected: Vec<_> = inputs.iter().map(|input| evaluate(input)).collect();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        let results: Vec<_> = inputs.iter().map(|input| evaluate(input)).collect();
                        assert_eq!(results, expected);
                    }
                });
            }
        });
    }

    #[test]
    fn test_batch_keeps_order() {
        let inputs: Vec<String> = (0..1000).map(|i| format!("{i} * 2 - 1")).collect();
        let results = evaluate_batch(&inputs);
        assert_eq!(results.len(), 1000);
        for (i, result) in results.into_iter().enumerate() {
            assert_eq!(result, Ok(i as f64 * 2.0 - 1.0));
        }

        let mixed = evaluate_batch(&["1 + 1", "1 / 0", ""]);
        assert_eq!(mixed[0], Ok(2.0));
        assert_eq!(mixed[1], Err(EvalError::DivisionByZero));
        assert_eq!(mixed[2].as_ref().map_err(|e| e.kind()), Err(ErrorKind::MalformedExpression));
    }

    /// Random well-formed expression over integers in `0..100`.
    pub(crate) fn random_expression(rng: &mut StdRng, depth: u32) -> String {
        if depth == 0 || rng.random_bool(0.3) {
            return rng.random_range(0..100u32).to_string();
        }

        let operator = ["+", "-", "*", "/"][rng.random_range(0..4)];
        let left = random_expression(rng, depth - 1);
        let right = random_expression(rng, depth - 1);
        if rng.random_bool(0.5) {
            format!("({left} {operator} {right})")
        } else {
            format!("{left} {operator} {right}")
        }
    }

    #[test]
    fn test_matches_reference_evaluator() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut checked = 0;

        for _ in 0..2000 {
            let input = random_expression(&mut rng, 5);
            match evaluate(&input) {
                Ok(value) => {
                    let expected = meval::eval_str(&input).unwrap();
                    let scale = value.abs().max(expected.abs()).max(1.0);
                    assert!(
                        (value - expected).abs() <= 1e-9 * scale,
                        "{input}: {value} != {expected}"
                    );
                    checked += 1;
                }
                Err(EvalError::DivisionByZero) => {}
                Err(error) => panic!("{input}: unexpected {error}"),
            }
        }

        assert!(checked > 1000);
    }
}
