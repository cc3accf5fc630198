//! Safe evaluation of mathematical expressions.
//!
//! Only the operators and identifiers supplied by the caller are available
//! to an expression, so untrusted input can be evaluated as long as the
//! registered functions themselves are safe.
//!
//! ```
//! use calc_rs::{evaluate, Identifiers};
//!
//! let identifiers = Identifiers::with_defaults().with_value("x", 1.25);
//! assert_eq!(evaluate("x^3", &identifiers).unwrap(), 1.953125);
//! assert_eq!(evaluate("max(2, 3) * 4", &identifiers).unwrap(), 12.0);
//! ```
//!
//! Custom operator sets are bound once to an [`Evaluator`]:
//!
//! ```
//! use calc_rs::{default_binary_operators, default_unary_operators, Evaluator, Identifiers};
//!
//! let evaluator = Evaluator::new(
//!     default_unary_operators().postfix("!", |x| Ok((1..=x as u64).product::<u64>() as f64)),
//!     default_binary_operators(),
//! )
//! .unwrap();
//! assert_eq!(evaluator.evaluate("-3!", &Identifiers::new()).unwrap(), -6.0);
//! ```

pub mod ast;
pub mod error;
pub mod functions;

pub use ast::{ASTNode, Evaluator, Identifier, Identifiers, OperatorTable};
pub use error::{Error, FunctionError, Result, TableError};
pub use functions::{default_binary_operators, default_identifiers, default_unary_operators};

/// One-shot evaluation with the default operators.
///
/// Builds a throwaway [`Evaluator`]; reuse one directly when evaluating many
/// expressions.
pub fn evaluate(expression: &str, identifiers: &Identifiers) -> Result<f64> {
    let evaluator = Evaluator::with_defaults()?;
    evaluator.evaluate(expression, identifiers)
}
