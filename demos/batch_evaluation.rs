use calculator_rs::evaluate_batch;

fn main() {
    pretty_env_logger::init();

    let expressions: Vec<String> = (1..=10)
        .map(|i| format!("{} * ({} - 1) / 2", i, i))
        .collect();

    let results = evaluate_batch(&expressions);
    for (i, (expression, result)) in expressions.iter().zip(results).enumerate() {
        println!("Result {}: {} -> {:?}", i, expression, result);
    }
}
