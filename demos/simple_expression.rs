use calc_rs::{evaluate, Identifiers};
use std::f64::consts::PI;

fn main() {
    pretty_env_logger::init();

    let identifiers = Identifiers::with_defaults()
        .with_value("pi", PI)
        .with_value("x", 1.25);

    for expression in ["2 + 3 * 4", "2^3^2", "x^3", "sin(pi / 2)", "round(2.5) + y"] {
        match evaluate(expression, &identifiers) {
            Ok(result) => println!("{} = {}", expression, result),
            Err(err) => println!("{}: error: {}", expression, err),
        }
    }
}
