use crate::ast::lexer::{Lexer, Token, TokenKind};
use crate::ast::{ASTNode, Associativity, OperatorKey, OperatorRole, OperatorTable};
use crate::error::{Error, Expected, Result};
use log::debug;

/// Deepest nesting of parentheses, prefix operators and right-hand operands
/// the parser accepts. Flat left-associative chains do not nest and are not
/// limited.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Which binary operators may extend the current operand.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Unbounded,
    Inclusive(i32),
    Exclusive(i32),
}

impl Bound {
    fn admits(self, precedence: i32) -> bool {
        match self {
            Bound::Unbounded => true,
            Bound::Inclusive(limit) => precedence <= limit,
            Bound::Exclusive(limit) => precedence < limit,
        }
    }
}

/// Precedence-climbing parser driven by an `OperatorTable`.
pub struct ExpressionParser<'a> {
    lexer: Lexer<'a>,
    operators: &'a OperatorTable,
    current: Token<'a>,
    depth: usize,
}

impl<'a> ExpressionParser<'a> {
    pub fn new(source: &'a str, operators: &'a OperatorTable) -> Result<Self> {
        let mut lexer = Lexer::new(source, operators);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            operators,
            current,
            depth: 0,
        })
    }

    pub fn parse_expression(input: &str, operators: &OperatorTable) -> Result<ASTNode> {
        debug!("Parsing expression: {}", input);
        let ast = ExpressionParser::new(input, operators)?.parse()?;
        debug!("Parse result: {}", ast);
        Ok(ast)
    }

    /// Parses one complete expression, failing if any input remains.
    pub fn parse(&mut self) -> Result<ASTNode> {
        let ast = self.parse_binary(Bound::Unbounded)?;

        match self.current.kind {
            TokenKind::End => Ok(ast),
            TokenKind::Operator => Err(unexpected(self.current, Expected::Operator)),
            _ => Err(Error::TrailingInput {
                text: self.current.text.to_string(),
                position: self.current.position,
            }),
        }
    }

    fn advance(&mut self) -> Result<Token<'a>> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn parse_binary(&mut self, bound: Bound) -> Result<ASTNode> {
        let operators = self.operators;
        let mut left = self.parse_unary()?;

        loop {
            let token = self.current;
            if token.kind != TokenKind::Operator {
                break;
            }
            let Some(operator) = operators.binary(token.text) else {
                break;
            };
            if !bound.admits(operator.precedence) {
                break;
            }

            self.advance()?;
            let right_bound = match operator.associativity {
                Associativity::LeftToRight => Bound::Exclusive(operator.precedence),
                Associativity::RightToLeft => Bound::Inclusive(operator.precedence),
            };
            let right = self.nested(|parser| parser.parse_binary(right_bound))?;

            left = ASTNode::BinaryOperation {
                left: Box::new(left),
                operator: OperatorKey::new(token.text, OperatorRole::Binary),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ASTNode> {
        self.nested(Self::parse_prefixed)
    }

    // Every recursive descent passes through here: operands, groups, prefix
    // operators and the right-hand side of each binary operator.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.depth += 1;
        let result = if self.depth > MAX_NESTING_DEPTH {
            Err(Error::NestingTooDeep {
                position: self.current.position,
            })
        } else {
            parse(self)
        };
        self.depth -= 1;
        result
    }

    // Postfix operators wrap the primary before any prefix operator does,
    // so `-3!` parses as `-(3!)`.
    fn parse_prefixed(&mut self) -> Result<ASTNode> {
        let operators = self.operators;
        let token = self.current;

        if token.kind == TokenKind::Operator && operators.prefix(token.text).is_some() {
            self.advance()?;
            let operand = self.parse_unary()?;
            return Ok(ASTNode::UnaryOperation {
                operator: OperatorKey::new(token.text, OperatorRole::Prefix),
                operand: Box::new(operand),
            });
        }

        let mut node = self.parse_primary()?;
        while self.current.kind == TokenKind::Operator
            && operators.postfix(self.current.text).is_some()
        {
            let token = self.advance()?;
            node = ASTNode::UnaryOperation {
                operator: OperatorKey::new(token.text, OperatorRole::Postfix),
                operand: Box::new(node),
            };
        }
        Ok(node)
    }

    // The current token is checked before moving past it, so a lexing error
    // further right cannot mask a syntax error here.
    fn parse_primary(&mut self) -> Result<ASTNode> {
        let token = self.current;

        match token.kind {
            TokenKind::Number(value) => {
                self.advance()?;
                Ok(ASTNode::Number(value))
            }
            TokenKind::Identifier => {
                self.advance()?;
                if self.current.kind != TokenKind::LParen {
                    return Ok(ASTNode::Identifier(token.text.to_string()));
                }
                let open = self.advance()?;
                let args = self.parse_arguments(open)?;
                Ok(ASTNode::FunctionCall {
                    name: token.text.to_string(),
                    args,
                })
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_binary(Bound::Unbounded)?;
                self.expect_closing(token, Expected::ClosingParen)?;
                Ok(inner)
            }
            _ => Err(unexpected(token, Expected::Operand)),
        }
    }

    fn parse_arguments(&mut self, open: Token<'a>) -> Result<Vec<ASTNode>> {
        let mut args = Vec::new();
        if self.current.kind == TokenKind::RParen {
            self.advance()?;
            return Ok(args);
        }

        loop {
            args.push(self.parse_binary(Bound::Unbounded)?);
            if self.current.kind == TokenKind::Comma {
                self.advance()?;
                continue;
            }
            self.expect_closing(open, Expected::CommaOrClosingParen)?;
            return Ok(args);
        }
    }

    fn expect_closing(&mut self, open: Token<'a>, expected: Expected) -> Result<()> {
        match self.current.kind {
            TokenKind::RParen => {
                self.advance()?;
                Ok(())
            }
            TokenKind::End => Err(Error::UnmatchedParen {
                position: open.position,
            }),
            _ => Err(unexpected(self.current, expected)),
        }
    }
}

fn unexpected(token: Token<'_>, expected: Expected) -> Error {
    Error::UnexpectedToken {
        found: token.describe(),
        expected,
        position: token.position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperators, UnaryOperators};
    use crate::functions::{default_binary_operators, default_unary_operators};

    fn default_table() -> OperatorTable {
        OperatorTable::new(default_unary_operators(), default_binary_operators()).unwrap()
    }

    fn factorial_table() -> OperatorTable {
        OperatorTable::new(
            default_unary_operators().postfix("!", |x| Ok(x * 2.0)),
            default_binary_operators(),
        )
        .unwrap()
    }

    fn parse(input: &str) -> Result<ASTNode> {
        ExpressionParser::parse_expression(input, &default_table())
    }

    fn sexpr(input: &str) -> String {
        parse(input).unwrap().to_string()
    }

    #[test]
    fn test_simple_binary_expression() {
        let ast = parse("price + 100").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: Box::new(ASTNode::Identifier("price".to_string())),
            operator: OperatorKey::new("+", OperatorRole::Binary),
            right: Box::new(ASTNode::Number(100.0)),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(sexpr("2 + 3 * 4"), "(+ 2 (* 3 4))");
        assert_eq!(sexpr("2 * 3 + 4"), "(+ (* 2 3) 4)");
        assert_eq!(sexpr("1 + 2 * 3 + 4"), "(+ (+ 1 (* 2 3)) 4)");
        assert_eq!(sexpr("2^3+2"), "(+ (^ 2 3) 2)");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(sexpr("8 - 3 - 2"), "(- (- 8 3) 2)");
        assert_eq!(sexpr("8 / 4 * 2"), "(* (/ 8 4) 2)");
    }

    #[test]
    fn test_right_associativity() {
        assert_eq!(sexpr("2^3^2"), "(^ 2 (^ 3 2))");
        assert_eq!(sexpr("2^3^2*5"), "(* (^ 2 (^ 3 2)) 5)");
    }

    #[test]
    fn test_grouped_expression() {
        assert_eq!(sexpr("(2 + 3) * 4"), "(* (+ 2 3) 4)");
        assert_eq!(sexpr("((9))"), "9");
        assert_eq!(sexpr("(2^3)^2"), "(^ (^ 2 3) 2)");
    }

    #[test]
    fn test_prefix_operators() {
        assert_eq!(sexpr("-9"), "(- 9)");
        assert_eq!(sexpr("--9"), "(- (- 9))");
        assert_eq!(sexpr("+-x"), "(+ (- x))");
        assert_eq!(sexpr("2 - -3"), "(- 2 (- 3))");
    }

    #[test]
    fn test_prefix_binds_tighter_than_binary() {
        assert_eq!(sexpr("-2^2"), "(^ (- 2) 2)");
    }

    #[test]
    fn test_postfix_applies_before_prefix() {
        let ast = ExpressionParser::parse_expression("-3!", &factorial_table()).unwrap();
        assert_eq!(
            ast,
            ASTNode::prefix("-", ASTNode::postfix("!", ASTNode::Number(3.0)))
        );
    }

    #[test]
    fn test_postfix_chain_and_binary() {
        let table = factorial_table();
        let ast = ExpressionParser::parse_expression("2!! * x!", &table).unwrap();
        assert_eq!(ast.to_string(), "(* ((2 !) !) (x !))");
    }

    #[test]
    fn test_function_calls() {
        assert_eq!(sexpr("sin(0)"), "(sin 0)");
        assert_eq!(sexpr("random()"), "(random)");
        assert_eq!(
            sexpr("first(-1+19, 2^2, 3 + 4)"),
            "(first (+ (- 1) 19) (^ 2 2) (+ 3 4))"
        );
        assert_eq!(sexpr("max(min(a, b), 1) * 2"), "(* (max (min a b) 1) 2)");
    }

    #[test]
    fn test_identifier_followed_by_group_is_a_call() {
        assert_eq!(sexpr("f (x)"), "(f x)");
    }

    #[test]
    fn test_word_operators() {
        let table = OperatorTable::new(
            UnaryOperators::new().prefix("neg", |x| Ok(-x)),
            BinaryOperators::new()
                .left("plus", 3, |a, b| Ok(a + b))
                .left("times", 2, |a, b| Ok(a * b)),
        )
        .unwrap();
        let ast = ExpressionParser::parse_expression("neg a plus b times c", &table).unwrap();
        assert_eq!(ast.to_string(), "(plus (neg a) (times b c))");
    }

    #[test]
    fn test_mixed_precedence_and_associativity() {
        let table = OperatorTable::new(
            UnaryOperators::new(),
            BinaryOperators::new()
                .left("+", 10, |a, b| Ok(a + b))
                .right("=>", 20, |_, b| Ok(b))
                .right("**", -5, |a, b| Ok(a.powf(b))),
        )
        .unwrap();
        let ast = ExpressionParser::parse_expression("a => b => c + d ** e ** f", &table).unwrap();
        assert_eq!(ast.to_string(), "(=> a (=> b (+ c (** d (** e f)))))");
    }

    #[test]
    fn test_unmatched_paren() {
        assert!(matches!(
            parse("(1 + 2"),
            Err(Error::UnmatchedParen { position: 0 })
        ));
        assert!(matches!(
            parse("2 * (3 + (4 * 2)"),
            Err(Error::UnmatchedParen { position: 4 })
        ));
        assert!(matches!(
            parse("max(1, 2"),
            Err(Error::UnmatchedParen { position: 3 })
        ));
    }

    #[test]
    fn test_unexpected_tokens() {
        assert!(matches!(
            parse("3 + * 5"),
            Err(Error::UnexpectedToken {
                expected: Expected::Operand,
                position: 4,
                ..
            })
        ));
        assert!(matches!(
            parse(""),
            Err(Error::UnexpectedToken {
                expected: Expected::Operand,
                position: 0,
                ..
            })
        ));
        assert!(matches!(
            parse("2 +"),
            Err(Error::UnexpectedToken {
                expected: Expected::Operand,
                ..
            })
        ));
        assert!(matches!(
            parse("(1 2)"),
            Err(Error::UnexpectedToken {
                expected: Expected::ClosingParen,
                position: 3,
                ..
            })
        ));
        assert!(matches!(
            parse("max(1 2)"),
            Err(Error::UnexpectedToken {
                expected: Expected::CommaOrClosingParen,
                ..
            })
        ));
        assert!(matches!(
            parse("max(1,)"),
            Err(Error::UnexpectedToken {
                expected: Expected::Operand,
                position: 6,
                ..
            })
        ));
        assert!(matches!(
            parse("()"),
            Err(Error::UnexpectedToken {
                expected: Expected::Operand,
                ..
            })
        ));
    }

    #[test]
    fn test_unexpected_token_names_the_token() {
        match parse("1 + )") {
            Err(Error::UnexpectedToken { found, .. }) => assert_eq!(found, "')'"),
            other => panic!("unexpected result: {:?}", other),
        }
        match parse("1 +") {
            Err(Error::UnexpectedToken { found, .. }) => assert_eq!(found, "end of input"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_trailing_input() {
        assert!(matches!(
            parse("1 2"),
            Err(Error::TrailingInput { ref text, position: 2 }) if text == "2"
        ));
        assert!(matches!(
            parse("(1))"),
            Err(Error::TrailingInput { position: 3, .. })
        ));
        assert!(matches!(
            parse("price > 100"),
            Err(Error::UnknownToken { .. })
        ));
    }

    #[test]
    fn test_operator_in_wrong_role() {
        let table = OperatorTable::new(
            UnaryOperators::new().prefix("~", |x| Ok(-x)),
            default_binary_operators(),
        )
        .unwrap();
        assert!(matches!(
            ExpressionParser::parse_expression("1 ~ 2", &table),
            Err(Error::UnexpectedToken {
                expected: Expected::Operator,
                position: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_token_surfaces_from_parser() {
        assert!(matches!(
            parse("1 @ 2"),
            Err(Error::UnknownToken { position: 2, .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let depth = MAX_NESTING_DEPTH - 1;
        let input = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse(&input).unwrap(), ASTNode::Number(1.0));

        let depth = MAX_NESTING_DEPTH + 1;
        let input = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(matches!(parse(&input), Err(Error::NestingTooDeep { .. })));

        let input = format!("{}1", "-".repeat(MAX_NESTING_DEPTH + 1));
        assert!(matches!(parse(&input), Err(Error::NestingTooDeep { .. })));
    }

    #[test]
    fn test_long_right_associative_chain_is_limited() {
        let input = format!("1{}", "^1".repeat(99));
        assert!(parse(&input).is_ok());

        let input = format!("1{}", "^1".repeat(199));
        assert!(matches!(parse(&input), Err(Error::NestingTooDeep { .. })));

        let input = format!("1{}", "^1".repeat(10_000));
        assert!(matches!(parse(&input), Err(Error::NestingTooDeep { .. })));
    }

    #[test]
    fn test_long_left_associative_chain_is_not_limited() {
        let input = format!("1{}", " + x * 2".repeat(10_000));
        let ast = parse(&input).unwrap();

        let mut spine = 0;
        let mut node = &ast;
        while let ASTNode::BinaryOperation { left, operator, .. } = node {
            assert_eq!(operator.symbol, "+");
            spine += 1;
            node = left.as_ref();
        }
        assert_eq!(spine, 10_000);
        assert_eq!(*node, ASTNode::Number(1.0));

        let rendered = ast.to_string();
        assert!(rendered.starts_with("(+ (+ (+ "));
        assert!(rendered.ends_with(" (* x 2))"));
    }

    #[test]
    fn test_long_postfix_chain_is_not_limited() {
        let input = format!("3{}", "!".repeat(5_000));
        let ast = ExpressionParser::parse_expression(&input, &factorial_table()).unwrap();
        let mut count = 0;
        let mut node = &ast;
        while let ASTNode::UnaryOperation { operand, .. } = node {
            count += 1;
            node = operand.as_ref();
        }
        assert_eq!(count, 5_000);
    }

    #[test]
    fn test_syntax_error_reported_before_later_lexing_error() {
        assert!(matches!(
            parse("1 + ) @"),
            Err(Error::UnexpectedToken { ref found, position: 4, .. }) if found == "')'"
        ));
        assert!(matches!(
            parse("max(, $)"),
            Err(Error::UnexpectedToken { position: 4, .. })
        ));
    }

    #[test]
    fn test_very_large_expression() {
        let input = (0..100)
            .map(|i| format!("x{} * {}", i, i))
            .collect::<Vec<_>>()
            .join(" + ");
        let ast = parse(&input).unwrap();

        let term = |i: usize| {
            ASTNode::binary(
                ASTNode::Identifier(format!("x{}", i)),
                "*",
                ASTNode::Number(i as f64),
            )
        };
        let mut expected_ast = term(0);
        for i in 1..100 {
            expected_ast = ASTNode::binary(expected_ast, "+", term(i));
        }
        assert_eq!(ast, expected_ast);
    }
}
