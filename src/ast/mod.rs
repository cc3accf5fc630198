use std::fmt;
use std::mem;

mod evaluator;
mod identifiers;
mod lexer;
mod operators;
mod parser;

pub use evaluator::*;
pub use identifiers::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use operators::*;
pub use parser::{ExpressionParser as Parser, MAX_NESTING_DEPTH};

/// A parsed expression. Operator nodes carry the key they were parsed
/// under; the implementation is looked up in the evaluator's table.
#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Number(f64),
    Identifier(String),
    FunctionCall {
        name: String,
        args: Vec<ASTNode>,
    },
    UnaryOperation {
        operator: OperatorKey,
        operand: Box<ASTNode>,
    },
    BinaryOperation {
        left: Box<ASTNode>,
        operator: OperatorKey,
        right: Box<ASTNode>,
    },
}

impl ASTNode {
    pub fn prefix(symbol: &str, operand: ASTNode) -> Self {
        ASTNode::UnaryOperation {
            operator: OperatorKey::new(symbol, OperatorRole::Prefix),
            operand: Box::new(operand),
        }
    }

    pub fn postfix(symbol: &str, operand: ASTNode) -> Self {
        ASTNode::UnaryOperation {
            operator: OperatorKey::new(symbol, OperatorRole::Postfix),
            operand: Box::new(operand),
        }
    }

    pub fn binary(left: ASTNode, symbol: &str, right: ASTNode) -> Self {
        ASTNode::BinaryOperation {
            left: Box::new(left),
            operator: OperatorKey::new(symbol, OperatorRole::Binary),
            right: Box::new(right),
        }
    }
}

/// S-expression rendering, e.g. `(+ 2 (* 3 4))`. Postfix operators are
/// written after their operand: `(3 !)`.
impl fmt::Display for ASTNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Piece<'n> {
            Node(&'n ASTNode),
            Text(&'n str),
        }

        // Left-associative chains have unbounded height.
        let mut pieces = vec![Piece::Node(self)];
        while let Some(piece) = pieces.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(node) => node,
            };

            match node {
                ASTNode::Number(n) => write!(f, "{n}")?,
                ASTNode::Identifier(name) => f.write_str(name)?,
                ASTNode::FunctionCall { name, args } => {
                    write!(f, "({name}")?;
                    pieces.push(Piece::Text(")"));
                    for arg in args.iter().rev() {
                        pieces.push(Piece::Node(arg));
                        pieces.push(Piece::Text(" "));
                    }
                }
                ASTNode::UnaryOperation { operator, operand } => match operator.role {
                    OperatorRole::Postfix => {
                        f.write_str("(")?;
                        pieces.push(Piece::Text(")"));
                        pieces.push(Piece::Text(&operator.symbol));
                        pieces.push(Piece::Text(" "));
                        pieces.push(Piece::Node(operand));
                    }
                    _ => {
                        write!(f, "({} ", operator.symbol)?;
                        pieces.push(Piece::Text(")"));
                        pieces.push(Piece::Node(operand));
                    }
                },
                ASTNode::BinaryOperation {
                    left,
                    operator,
                    right,
                } => {
                    write!(f, "({} ", operator.symbol)?;
                    pieces.push(Piece::Text(")"));
                    pieces.push(Piece::Node(right));
                    pieces.push(Piece::Text(" "));
                    pieces.push(Piece::Node(left));
                }
            }
        }
        Ok(())
    }
}

/// Tears the tree down iteratively.
impl Drop for ASTNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

fn detach_children(node: &mut ASTNode, pending: &mut Vec<ASTNode>) {
    let leaf = || ASTNode::Number(0.0);
    match node {
        ASTNode::Number(_) | ASTNode::Identifier(_) => {}
        ASTNode::FunctionCall { args, .. } => pending.append(args),
        ASTNode::UnaryOperation { operand, .. } => {
            pending.push(mem::replace(operand.as_mut(), leaf()));
        }
        ASTNode::BinaryOperation { left, right, .. } => {
            pending.push(mem::replace(left.as_mut(), leaf()));
            pending.push(mem::replace(right.as_mut(), leaf()));
        }
    }
}
