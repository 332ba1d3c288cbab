use crate::ast::{finite, ASTNode, Operator, Parser};
use crate::error::EvalError;
use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;

pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Instructions of the postfix stack machine.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Instruction {
    Push(f64),
    Add,
    Subtract,
    Multiply,
    Divide,
    Negate,
}

impl From<Operator> for Instruction {
    fn from(value: Operator) -> Self {
        match value {
            Operator::Add => Instruction::Add,
            Operator::Subtract => Instruction::Subtract,
            Operator::Multiply => Instruction::Multiply,
            Operator::Divide => Instruction::Divide,
        }
    }
}

/// A compiled expression. Only [`Compiler`] builds these, so every instruction
/// finds its operands on the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

pub struct Compiler;

impl Compiler {
    pub fn compile(ast: &ASTNode) -> Program {
        let mut instructions = Vec::new();
        Self::compile_node(ast, &mut instructions);
        Program { instructions }
    }

    pub fn compile_expression(expression: &str) -> Result<Program, EvalError> {
        let ast = Parser::parse_expression(expression)?;
        Ok(Self::compile(&ast))
    }

    fn compile_node(node: &ASTNode, instructions: &mut Vec<Instruction>) {
        match node {
            ASTNode::Literal(value) => instructions.push(Instruction::Push(*value)),
            ASTNode::UnaryNegate(operand) => {
                Self::compile_node(operand, instructions);
                instructions.push(Instruction::Negate);
            }
            ASTNode::BinaryOperation { .. } => {
                let (first, steps) = node.left_spine();
                Self::compile_node(first, instructions);
                for (operator, right) in steps {
                    Self::compile_node(right, instructions);
                    instructions.push(Instruction::from(operator));
                }
            }
        }
    }
}

/// Runs compiled programs, keeping the most recently used ones keyed by their
/// source text.
pub struct Executor {
    cache: LruCache<String, Program>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl Executor {
    /// A capacity of zero is treated as one.
    pub fn new(cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Evaluates an expression, compiling it only if it is not cached.
    /// Expressions that fail to compile are not cached.
    pub fn execute_expression(&mut self, expression: &str) -> Result<f64, EvalError> {
        if let Some(program) = self.cache.get(expression) {
            debug!("Program cache hit: {}", expression);
            return run(program);
        }

        debug!("Program cache miss: {}", expression);
        let program = Compiler::compile_expression(expression)?;
        let result = run(&program);
        self.cache.put(expression.to_string(), program);
        result
    }

    pub fn execute(&self, program: &Program) -> Result<f64, EvalError> {
        run(program)
    }

    pub fn cached_programs(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

fn run(program: &Program) -> Result<f64, EvalError> {
    let mut stack: Vec<f64> = Vec::new();

    for instruction in program.instructions() {
        match instruction {
            Instruction::Push(value) => stack.push(finite(*value)?),
            Instruction::Negate => {
                let value = pop(&mut stack)?;
                stack.push(-value);
            }
            Instruction::Add => apply_binary(&mut stack, Operator::Add)?,
            Instruction::Subtract => apply_binary(&mut stack, Operator::Subtract)?,
            Instruction::Multiply => apply_binary(&mut stack, Operator::Multiply)?,
            Instruction::Divide => apply_binary(&mut stack, Operator::Divide)?,
        }
    }

    let result = pop(&mut stack)?;
    if !stack.is_empty() {
        return Err(EvalError::malformed(
            0,
            "execution left extra values on the stack",
        ));
    }
    Ok(result)
}

fn apply_binary(stack: &mut Vec<f64>, operator: Operator) -> Result<(), EvalError> {
    let right = pop(stack)?;
    let left = pop(stack)?;
    stack.push(operator.apply(left, right)?);
    Ok(())
}

fn pop(stack: &mut Vec<f64>) -> Result<f64, EvalError> {
    stack
        .pop()
        .ok_or_else(|| EvalError::malformed(0, "expected a value on the stack"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Evaluator;
    use crate::evaluate;
    use crate::tests::random_expression;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_compile_postfix_order() {
        let program = Compiler::compile_expression("1 - 2 * -3").unwrap();
        assert_eq!(
            program.instructions(),
            &[
                Instruction::Push(1.0),
                Instruction::Push(2.0),
                Instruction::Push(3.0),
                Instruction::Negate,
                Instruction::Multiply,
                Instruction::Subtract,
            ]
        );
    }

    #[test]
    fn test_execute_simple_arithmetic_expression() {
        let mut executor = Executor::default();
        assert_eq!(executor.execute_expression("2 + 3 * 4"), Ok(14.0));
        assert_eq!(executor.execute_expression("(2 + 3) * 4"), Ok(20.0));
        assert_eq!(executor.execute_expression("-5 + 3"), Ok(-2.0));
    }

    #[test]
    fn test_execute_precompiled() {
        let program = Compiler::compile_expression("(10 + 20) * 3 / (4 - 1) + 5").unwrap();
        let executor = Executor::new(1);
        assert_eq!(executor.execute(&program), Ok(35.0));
        assert_eq!(executor.execute(&program), Ok(35.0));
    }

    #[test]
    fn test_execute_errors_match_evaluator() {
        let mut executor = Executor::default();
        let evaluator = Evaluator::new();
        for input in ["10 / 0", "1 / (2 - 2)", "2 + )", "2 $ 3", ""] {
            assert_eq!(
                executor.execute_expression(input),
                evaluator.evaluate_expression(input),
                "{input:?}"
            );
        }
        let huge = format!("1{}", "0".repeat(400));
        assert_eq!(
            executor.execute_expression(&huge),
            Err(EvalError::NumericOverflow)
        );
    }

    #[test]
    fn test_execute_matches_evaluate_on_random_expressions() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut executor = Executor::new(16);

        for _ in 0..1000 {
            let input = random_expression(&mut rng, 5);
            let expected = evaluate(&input);
            assert_eq!(executor.execute_expression(&input), expected, "{input}");
            // second run comes from the cache
            assert_eq!(executor.execute_expression(&input), expected, "{input}");
        }
    }

    #[test]
    fn test_cache_behaviour() {
        let mut executor = Executor::new(2);
        assert_eq!(executor.execute_expression("1 + 1"), Ok(2.0));
        assert_eq!(executor.execute_expression("1 + 1"), Ok(2.0));
        assert_eq!(executor.cached_programs(), 1);

        // division by zero compiles fine, so it is cached
        assert!(executor.execute_expression("1 / 0").is_err());
        assert!(executor.execute_expression("1 / 0").is_err());
        assert_eq!(executor.cached_programs(), 2);

        assert!(executor.execute_expression("1 +").is_err());
        assert_eq!(executor.cached_programs(), 2);

        assert_eq!(executor.execute_expression("2 * 2"), Ok(4.0));
        assert_eq!(executor.cached_programs(), 2);

        executor.clear_cache();
        assert_eq!(executor.cached_programs(), 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut executor = Executor::new(0);
        assert_eq!(executor.execute_expression("3 * 3"), Ok(9.0));
        assert_eq!(executor.cached_programs(), 1);
    }

    #[test]
    fn test_long_chain_compiles() {
        let input = vec!["2"; 20_000].join(" * 1 + ");
        let program = Compiler::compile_expression(&input).unwrap();
        assert_eq!(Executor::default().execute(&program), Ok(40_000.0));
    }
}
