use crate::ast::{finite, ASTNode, Parser};
use crate::error::EvalError;

/// Tree-walking evaluator. Holds no state, so one value can be shared freely
/// between threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Parses and evaluates an expression string.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` with a finite result.
    /// * `Err(EvalError)` if tokenizing, parsing or evaluation fails.
    pub fn evaluate_expression(&self, expression: &str) -> Result<f64, EvalError> {
        let ast = Parser::parse_expression(expression)?;
        self.evaluate(&ast)
    }

    /// Evaluates an `ASTNode`.
    pub fn evaluate(&self, ast: &ASTNode) -> Result<f64, EvalError> {
        match ast {
            // literals too large to represent parse to infinity
            ASTNode::Literal(value) => finite(*value),
            ASTNode::UnaryNegate(operand) => Ok(-self.evaluate(operand)?),
            ASTNode::BinaryOperation { .. } => {
                let (first, steps) = ast.left_spine();
                let mut value = self.evaluate(first)?;
                for (operator, right) in steps {
                    value = operator.apply(value, self.evaluate(right)?)?;
                }
                Ok(value)
            }
        }
    }
}
