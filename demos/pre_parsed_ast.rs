use calc_rs::{Evaluator, Identifiers};

fn main() {
    pretty_env_logger::init();

    let evaluator = Evaluator::with_defaults().expect("default operators are valid");

    let expression = "max(price - 50, 0) * volume";
    let ast = evaluator
        .parse_expression(expression)
        .expect("Failed to parse");
    println!("AST: {}", ast);

    let identifiers = Identifiers::with_defaults()
        .with_value("price", 120.0)
        .with_value("volume", 3000.0);

    match evaluator.evaluate_ast(&ast, &identifiers) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }
}
