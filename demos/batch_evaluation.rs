use calc_rs::{Evaluator, Identifiers};

fn main() {
    pretty_env_logger::init();

    let contexts = vec![
        Identifiers::new()
            .with_value("price", 120.0)
            .with_value("volume", 3000.0),
        Identifiers::new()
            .with_value("price", 80.0)
            .with_value("volume", 6000.0),
        Identifiers::new().with_value("price", 95.0),
    ];

    let expression = "price * volume / 1000";

    let evaluator = match Evaluator::with_defaults() {
        Ok(evaluator) => evaluator,
        Err(err) => {
            eprintln!("{}", err);
            return;
        }
    };
    match evaluator.evaluate_batch(expression, &contexts) {
        Ok(results) => {
            for (i, result) in results.iter().enumerate() {
                match result {
                    Ok(value) => println!("Result {}: {}", i, value),
                    Err(err) => println!("Result {}: error: {}", i, err),
                }
            }
        }
        Err(err) => println!("Error: {}", err),
    }
}
