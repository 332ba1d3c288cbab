use calculator_rs::evaluate;

fn main() {
    pretty_env_logger::init();

    let expressions = [
        "2 + 3",
        "2 + 3 * 4",
        "(2 + 3) * 4",
        "-5 + 3",
        "10 / 0",
        "2 + )",
        "2 $ 3",
    ];

    for expression in expressions {
        match evaluate(expression) {
            Ok(result) => println!("{:<12} = {}", expression, result),
            Err(err) => println!("{:<12} ! {:?}: {}", expression, err.kind(), err),
        }
    }
}
