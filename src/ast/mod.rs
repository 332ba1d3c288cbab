use crate::error::EvalError;
use std::fmt;

mod compiler;
mod evaluator;
mod parser;
mod tokenizer;

pub use compiler::*;
pub use evaluator::Evaluator;
pub use parser::{Parser, MAX_DEPTH};
pub use tokenizer::{tokenize, PositionedToken, Token, Tokenizer};

pub enum ASTNode {
    Literal(f64),
    BinaryOperation {
        left: Box<ASTNode>,
        operator: Operator,
        right: Box<ASTNode>,
    },
    UnaryNegate(Box<ASTNode>),
}

impl ASTNode {
    /// Splits a left-associative chain into its leftmost operand and the
    /// `(operator, right operand)` pairs applied to it, in evaluation order.
    ///
    /// Chains such as `1 + 2 + 3 + ...` grow only along the left edge, so
    /// walking that edge in a loop keeps recursion bounded by parenthesis and
    /// unary-minus nesting rather than by expression length.
    pub fn left_spine(&self) -> (&ASTNode, Vec<(Operator, &ASTNode)>) {
        let mut steps = Vec::new();
        let mut node = self;
        while let ASTNode::BinaryOperation {
            left,
            operator,
            right,
        } = node
        {
            steps.push((*operator, right.as_ref()));
            node = left.as_ref();
        }
        steps.reverse();
        (node, steps)
    }
}

impl Drop for ASTNode {
    fn drop(&mut self) {
        // Unlink the left edge iteratively; right children are shallow.
        let mut next = match self {
            ASTNode::BinaryOperation { left, .. } => {
                Some(std::mem::replace(left.as_mut(), ASTNode::Literal(0.0)))
            }
            _ => None,
        };
        while let Some(mut node) = next {
            next = match &mut node {
                ASTNode::BinaryOperation { left, .. } => {
                    Some(std::mem::replace(left.as_mut(), ASTNode::Literal(0.0)))
                }
                _ => None,
            };
        }
    }
}

impl Clone for ASTNode {
    fn clone(&self) -> Self {
        match self {
            ASTNode::Literal(value) => ASTNode::Literal(*value),
            ASTNode::UnaryNegate(operand) => ASTNode::UnaryNegate(operand.clone()),
            ASTNode::BinaryOperation { .. } => {
                let (first, steps) = self.left_spine();
                steps
                    .into_iter()
                    .fold(first.clone(), |left, (operator, right)| {
                        ASTNode::BinaryOperation {
                            left: Box::new(left),
                            operator,
                            right: Box::new(right.clone()),
                        }
                    })
            }
        }
    }
}

impl PartialEq for ASTNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ASTNode::Literal(a), ASTNode::Literal(b)) => a == b,
            (ASTNode::UnaryNegate(a), ASTNode::UnaryNegate(b)) => a == b,
            (ASTNode::BinaryOperation { .. }, ASTNode::BinaryOperation { .. }) => {
                let (first, steps) = self.left_spine();
                let (other_first, other_steps) = other.left_spine();
                first == other_first && steps == other_steps
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ASTNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ASTNode::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            ASTNode::UnaryNegate(operand) => f.debug_tuple("UnaryNegate").field(operand).finish(),
            ASTNode::BinaryOperation { .. } => {
                // same text as the derived form, without recursing down the left edge
                let (first, steps) = self.left_spine();
                for _ in &steps {
                    f.write_str("BinaryOperation { left: ")?;
                }
                fmt::Debug::fmt(first, f)?;
                for (operator, right) in steps {
                    write!(f, ", operator: {:?}, right: ", operator)?;
                    fmt::Debug::fmt(right, f)?;
                    f.write_str(" }")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ASTNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ASTNode::Literal(value) => write!(f, "{}", value),
            ASTNode::UnaryNegate(operand) => write!(f, "(-{})", operand),
            ASTNode::BinaryOperation { .. } => {
                let (first, steps) = self.left_spine();
                for _ in &steps {
                    f.write_str("(")?;
                }
                write!(f, "{}", first)?;
                for (operator, right) in steps {
                    write!(f, " {} {})", operator, right)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Applies the operator, rejecting a zero divisor and any non-finite result.
    pub fn apply(&self, left: f64, right: f64) -> Result<f64, EvalError> {
        let result = match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => {
                // also catches -0.0
                if right == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                left / right
            }
        };
        finite(result)
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for Operator {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '+' => Ok(Operator::Add),
            '-' => Ok(Operator::Subtract),
            '*' => Ok(Operator::Multiply),
            '/' => Ok(Operator::Divide),
            other => Err(other),
        }
    }
}

pub(crate) fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NumericOverflow)
    }
}
