pub mod operators;
pub mod other;
pub mod rounding;
pub mod trig;

use crate::ast::Identifiers;

pub use operators::{default_binary_operators, default_unary_operators};

/// Registers every default function into `identifiers`.
pub fn register_functions(identifiers: &mut Identifiers) {
    other::register(identifiers);
    rounding::register(identifiers);
    trig::register(identifiers);
}

pub fn default_identifiers() -> Identifiers {
    Identifiers::with_defaults()
}
