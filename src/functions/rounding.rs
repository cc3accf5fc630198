use crate::ast::Identifiers;
use crate::error::FunctionError;
use calc_macros::calc_fn;

pub fn register(identifiers: &mut Identifiers) {
    identifiers.register_function("floor", floor);
    identifiers.register_function("ceil", ceil);
    identifiers.register_function("round", round);
}

#[calc_fn]
pub fn floor(x: f64) -> Result<f64, FunctionError> {
    Ok(x.floor())
}

#[calc_fn]
pub fn ceil(x: f64) -> Result<f64, FunctionError> {
    Ok(x.ceil())
}

/// `round(x)` rounds half to even; `round(x, digits)` keeps `digits`
/// decimal places (negative `digits` round to tens, hundreds, ...).
pub fn round(args: &[f64]) -> Result<f64, FunctionError> {
    match *args {
        [x] => Ok(x.round_ties_even()),
        [x, digits] => {
            if digits.fract() != 0.0 {
                return Err("round() digits must be an integer".into());
            }
            Ok(round_to_digits(x, digits))
        }
        _ => Err(format!("round() takes 1 or 2 arguments but {} were given", args.len()).into()),
    }
}

// When the scale factor overflows, `x` has no digits past the requested
// position (keep `x`) or none at or above it (signed zero).
fn round_to_digits(x: f64, digits: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let digits = digits.clamp(-(i32::MAX as f64), i32::MAX as f64) as i32;

    if digits >= 0 {
        let factor = 10f64.powi(digits);
        let scaled = x * factor;
        if !factor.is_finite() || !scaled.is_finite() {
            return x;
        }
        scaled.round_ties_even() / factor
    } else {
        let factor = 10f64.powi(-digits);
        if !factor.is_finite() {
            return 0.0f64.copysign(x);
        }
        (x / factor).round_ties_even() * factor
    }
}
