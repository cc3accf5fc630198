use crate::ast::Identifiers;
use crate::error::FunctionError;
use calc_macros::calc_fn;

pub fn register(identifiers: &mut Identifiers) {
    identifiers.register_function("sin", sin);
    identifiers.register_function("cos", cos);
    identifiers.register_function("tan", tan);
    identifiers.register_function("asin", asin);
    identifiers.register_function("acos", acos);
    identifiers.register_function("atan", atan);
    identifiers.register_function("atan2", atan2);
}

fn check_unit_domain(x: f64) -> Result<(), FunctionError> {
    if (-1.0..=1.0).contains(&x) {
        Ok(())
    } else {
        Err(format!("math domain error: {} is outside [-1, 1]", x).into())
    }
}

#[calc_fn]
pub fn sin(x: f64) -> Result<f64, FunctionError> {
    Ok(x.sin())
}

#[calc_fn]
pub fn cos(x: f64) -> Result<f64, FunctionError> {
    Ok(x.cos())
}

#[calc_fn]
pub fn tan(x: f64) -> Result<f64, FunctionError> {
    Ok(x.tan())
}

#[calc_fn]
pub fn asin(x: f64) -> Result<f64, FunctionError> {
    check_unit_domain(x)?;
    Ok(x.asin())
}

#[calc_fn]
pub fn acos(x: f64) -> Result<f64, FunctionError> {
    check_unit_domain(x)?;
    Ok(x.acos())
}

#[calc_fn]
pub fn atan(x: f64) -> Result<f64, FunctionError> {
    Ok(x.atan())
}

/// Angle of the point `(x, y)`, argument order as in `y.atan2(x)`.
#[calc_fn]
pub fn atan2(y: f64, x: f64) -> Result<f64, FunctionError> {
    Ok(y.atan2(x))
}
