use crate::ast::Identifiers;
use crate::error::FunctionError;
use calc_macros::calc_fn;

pub fn register(identifiers: &mut Identifiers) {
    identifiers.register_function("min", min);
    identifiers.register_function("max", max);
    identifiers.register_function("clamp", clamp);
}

pub fn min(args: &[f64]) -> Result<f64, FunctionError> {
    args.iter()
        .copied()
        .reduce(f64::min)
        .ok_or_else(|| "min() expects at least one argument".into())
}

pub fn max(args: &[f64]) -> Result<f64, FunctionError> {
    args.iter()
        .copied()
        .reduce(f64::max)
        .ok_or_else(|| "max() expects at least one argument".into())
}

/// Limits `val` to `[low, high]`.
#[calc_fn]
pub fn clamp(val: f64, low: f64, high: f64) -> Result<f64, FunctionError> {
    Ok(val.max(low).min(high))
}
