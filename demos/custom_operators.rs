use calc_rs::ast::{BinaryOperators, UnaryOperators};
use calc_rs::{Evaluator, FunctionError, Identifiers};

fn factorial(n: f64) -> Result<f64, FunctionError> {
    if n < 0.0 || n.fract() != 0.0 {
        return Err(format!("factorial of {} is undefined", n).into());
    }
    Ok((1..=n as u64).map(|k| k as f64).product())
}

fn main() {
    pretty_env_logger::init();

    let evaluator = Evaluator::new(
        UnaryOperators::new()
            .prefix("-", |x| Ok(-x))
            .prefix("not", |x| Ok(if x == 0.0 { 1.0 } else { 0.0 }))
            .postfix("!", factorial),
        BinaryOperators::new()
            .left("+", 4, |a, b| Ok(a + b))
            .left("-", 4, |a, b| Ok(a - b))
            .left("*", 3, |a, b| Ok(a * b))
            .left("mod", 3, |a, b| Ok(a.rem_euclid(b)))
            .right("**", 2, |a, b| Ok(a.powf(b)))
            .left("<", 5, |a, b| Ok(if a < b { 1.0 } else { 0.0 })),
    );
    let evaluator = match evaluator {
        Ok(evaluator) => evaluator,
        Err(err) => {
            eprintln!("invalid operator table: {}", err);
            return;
        }
    };

    let identifiers = Identifiers::new().with_value("n", 5.0);
    for expression in ["-3!", "n! mod 7", "2 ** 3 ** 2", "not (n < 3)", "(0 - 1)!"] {
        match evaluator.parse_expression(expression) {
            Ok(ast) => match evaluator.evaluate_ast(&ast, &identifiers) {
                Ok(result) => println!("{:<12} {:<28} = {}", expression, ast.to_string(), result),
                Err(err) => println!("{:<12} {:<28} error: {}", expression, ast.to_string(), err),
            },
            Err(err) => println!("{:<12} parse error: {}", expression, err),
        }
    }
}
