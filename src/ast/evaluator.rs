use crate::ast::{
    ASTNode, BinaryOperator, BinaryOperators, Function, Identifier, Identifiers, OperatorKey,
    OperatorRole, OperatorTable, Parser, UnaryFunction, UnaryOperators,
};
use crate::error::{Error, Result, TableError};
use crate::functions::{default_binary_operators, default_unary_operators};
use log::trace;
use rayon::prelude::*;

/// Binds one validated operator table to reusable parse and evaluate entry
/// points. Holds no per-call state, so a single instance can be shared by
/// concurrent evaluations.
#[derive(Debug, Clone)]
pub struct Evaluator {
    operators: OperatorTable,
}

impl Evaluator {
    /// Validates the operator definitions and builds an `Evaluator`.
    pub fn new(
        unary: UnaryOperators,
        binary: BinaryOperators,
    ) -> std::result::Result<Self, TableError> {
        Ok(Self::from_table(OperatorTable::new(unary, binary)?))
    }

    /// An `Evaluator` over the default arithmetic operators.
    pub fn with_defaults() -> std::result::Result<Self, TableError> {
        Self::new(default_unary_operators(), default_binary_operators())
    }

    pub fn from_table(operators: OperatorTable) -> Self {
        Self { operators }
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    /// Parse an expression string into an AST.
    pub fn parse_expression(&self, expression: &str) -> Result<ASTNode> {
        Parser::parse_expression(expression, &self.operators)
    }

    /// Parses and evaluates `expression` against `identifiers`.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` if parsing and evaluation succeed.
    /// * `Err(Error)` for the first failure; there is no partial result.
    pub fn evaluate(&self, expression: &str, identifiers: &Identifiers) -> Result<f64> {
        let ast = self.parse_expression(expression)?;
        self.evaluate_ast(&ast, identifiers)
    }

    /// Evaluate a pre-parsed AST against one set of identifiers.
    pub fn evaluate_ast(&self, ast: &ASTNode, identifiers: &Identifiers) -> Result<f64> {
        let value = self.walk(ast, identifiers)?;
        trace!("{} = {}", ast, value);
        Ok(value)
    }

    /// Parses `expression` once and evaluates it against every identifier
    /// set in parallel. Results are in the same order as `contexts`.
    pub fn evaluate_batch(
        &self,
        expression: &str,
        contexts: &[Identifiers],
    ) -> Result<Vec<Result<f64>>> {
        let ast = self.parse_expression(expression)?;
        Ok(contexts
            .par_iter()
            .map(|identifiers| self.evaluate_ast(&ast, identifiers))
            .collect())
    }

    // Post-order walk over an explicit stack: left-associative chains parse
    // into trees of unbounded height. Names and operators are resolved when a
    // node is first visited, before any of its children are evaluated.
    fn walk(&self, ast: &ASTNode, identifiers: &Identifiers) -> Result<f64> {
        let mut steps = vec![Step::Visit(ast)];
        let mut values: Vec<f64> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(node) => self.visit(node, identifiers, &mut steps, &mut values)?,

                Step::Call(name, function, arity) => {
                    let args = values.split_off(values.len() - arity);
                    trace!("calling {}{:?}", name, args);
                    let value = function(&args).map_err(|source| Error::CallFailed {
                        name: name.to_string(),
                        source,
                    })?;
                    values.push(value);
                }

                Step::Unary(operator, function) => {
                    let operand = pop(&mut values);
                    let value = function(operand).map_err(|source| Error::OperatorFailed {
                        operator: operator.clone(),
                        source,
                    })?;
                    values.push(value);
                }

                Step::Binary(operator, binary) => {
                    let right = pop(&mut values);
                    let left = pop(&mut values);
                    let value = binary.apply(left, right).map_err(|source| {
                        Error::OperatorFailed {
                            operator: operator.clone(),
                            source,
                        }
                    })?;
                    values.push(value);
                }
            }
        }

        Ok(pop(&mut values))
    }

    fn visit<'n>(
        &'n self,
        node: &'n ASTNode,
        identifiers: &'n Identifiers,
        steps: &mut Vec<Step<'n>>,
        values: &mut Vec<f64>,
    ) -> Result<()> {
        match node {
            ASTNode::Number(n) => values.push(*n),

            ASTNode::Identifier(name) => match identifiers.get(name) {
                Some(Identifier::Value(value)) => values.push(*value),
                Some(Identifier::Function(_)) => return Err(Error::NotAValue(name.clone())),
                None => return Err(Error::UnknownIdentifier(name.clone())),
            },

            ASTNode::FunctionCall { name, args } => {
                let function = match identifiers.get(name) {
                    Some(Identifier::Function(function)) => function,
                    Some(Identifier::Value(_)) => return Err(Error::NotCallable(name.clone())),
                    None => return Err(Error::UnknownIdentifier(name.clone())),
                };
                steps.push(Step::Call(name, function, args.len()));
                steps.extend(args.iter().rev().map(Step::Visit));
            }

            ASTNode::UnaryOperation { operator, operand } => {
                let function = self
                    .operators
                    .unary(operator)
                    .ok_or_else(|| Error::UnregisteredOperator(operator.clone()))?;
                steps.push(Step::Unary(operator, function));
                steps.push(Step::Visit(operand));
            }

            ASTNode::BinaryOperation {
                left,
                operator,
                right,
            } => {
                let binary = match operator.role {
                    OperatorRole::Binary => self.operators.binary(&operator.symbol),
                    _ => None,
                }
                .ok_or_else(|| Error::UnregisteredOperator(operator.clone()))?;
                steps.push(Step::Binary(operator, binary));
                steps.push(Step::Visit(right));
                steps.push(Step::Visit(left));
            }
        }
        Ok(())
    }
}

enum Step<'n> {
    Visit(&'n ASTNode),
    Call(&'n str, &'n Function, usize),
    Unary(&'n OperatorKey, &'n UnaryFunction),
    Binary(&'n OperatorKey, &'n BinaryOperator),
}

// Every step that consumes a value runs after the steps that produce it.
fn pop(values: &mut Vec<f64>) -> f64 {
    match values.pop() {
        Some(value) => value,
        None => unreachable!("operand stack underflow"),
    }
}
