use calculator_rs::ast::{Compiler, Evaluator, Executor, Parser};

fn main() {
    pretty_env_logger::init();

    let expression = "(10 + 20) * 3 / (4 - 1) + 5";
    let ast = Parser::parse_expression(expression).expect("Failed to parse");
    println!("AST: {}", ast);

    match Evaluator::new().evaluate(&ast) {
        Ok(result) => println!("Tree result: {}", result),
        Err(err) => println!("Error: {}", err),
    }

    let program = Compiler::compile(&ast);
    println!("Program: {:?}", program.instructions());

    match Executor::default().execute(&program) {
        Ok(result) => println!("Program result: {}", result),
        Err(err) => println!("Error: {}", err),
    }
}
