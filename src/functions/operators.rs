use crate::ast::{BinaryOperators, UnaryOperators};
use crate::error::FunctionError;

/// Prefix `-` and `+`.
pub fn default_unary_operators() -> UnaryOperators {
    UnaryOperators::new()
        .prefix("-", |x| Ok(-x))
        .prefix("+", |x| Ok(x))
}

/// `+ -` at precedence 3, `* / %` at 2 and right-to-left `^` at 1.
pub fn default_binary_operators() -> BinaryOperators {
    BinaryOperators::new()
        .left("+", 3, |a, b| Ok(a + b))
        .left("-", 3, |a, b| Ok(a - b))
        .left("*", 2, |a, b| Ok(a * b))
        .left("/", 2, divide)
        .left("%", 2, remainder)
        .right("^", 1, |a, b| Ok(a.powf(b)))
}

fn divide(left: f64, right: f64) -> Result<f64, FunctionError> {
    if right == 0.0 {
        Err("division by zero".into())
    } else {
        Ok(left / right)
    }
}

/// IEEE 754 remainder: `left - n * right` where `n` is `left / right`
/// rounded to the nearest integer, ties to even. The result lies in
/// `[-|right| / 2, |right| / 2]`.
fn remainder(left: f64, right: f64) -> Result<f64, FunctionError> {
    if left.is_nan() || right.is_nan() {
        return Ok(f64::NAN);
    }
    if right == 0.0 {
        return Err("modulo by zero".into());
    }
    if left.is_infinite() {
        return Err("math domain error: remainder of an infinite value".into());
    }
    if right.is_infinite() {
        return Ok(left);
    }

    let (x, y) = (left.abs(), right.abs());
    let m = x % y;
    let c = y - m;
    let r = if m < c {
        m
    } else if m > c {
        -c
    } else {
        // Exactly halfway: pick the even quotient.
        m - 2.0 * ((0.5 * (x - m)) % y)
    };
    Ok(1f64.copysign(left) * r)
}
