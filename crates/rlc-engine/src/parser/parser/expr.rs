//! Expression parsing
//!
//! Binary levels are parsed iteratively (one loop per level), so long
//! operator chains like `a + b + c + ...` never grow the parser's call
//! stack. Only unary prefixes and parentheses recurse, and both count
//! towards the nesting limit. Every node also carries the height of the
//! subtree under it, which is capped by [`MAX_EXPRESSION_HEIGHT`].
//!
//! [`MAX_EXPRESSION_HEIGHT`]: super::guards::MAX_EXPRESSION_HEIGHT

use super::guards::{check_height, with_depth};
use super::precedence::{binary_operator, Precedence};
use super::{ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::token::Token;

/// Expression together with the height of its tree
type Measured = (Expression, usize);

/// Parse an expression (loosest level: logical or).
pub fn parse_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    parse_bounded(parser).map(|(expr, _)| expr)
}

fn parse_bounded(parser: &mut Parser) -> Result<Measured, ParseError> {
    parse_binary(parser, Precedence::LogicalOr)
}

fn parse_binary(parser: &mut Parser, level: Precedence) -> Result<Measured, ParseError> {
    if level == Precedence::Unary {
        return parse_unary(parser);
    }

    let (mut left, mut height) = parse_binary(parser, level.next())?;

    while let Some((operator, prec)) = binary_operator(parser.current()) {
        if prec != level {
            break;
        }
        let operator_span = parser.current_span();
        parser.advance();

        let (right, right_height) = parse_binary(parser, level.next())?;
        height = height.max(right_height) + 1;
        check_height(height, operator_span)?;

        let span = parser.combine_spans(left.span(), right.span());
        left = Expression::Binary(BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            span,
        });
    }

    Ok((left, height))
}

fn parse_unary(parser: &mut Parser) -> Result<Measured, ParseError> {
    let operator = match parser.current() {
        Token::Bang => UnaryOperator::Not,
        Token::Minus => UnaryOperator::Minus,
        _ => return parse_primary(parser),
    };

    let start_span = parser.current_span();
    parser.advance();
    let (operand, operand_height) = with_depth(parser, "unary expression", parse_unary)?;
    let height = operand_height + 1;
    check_height(height, start_span)?;
    let span = parser.combine_spans(&start_span, operand.span());

    let expr = Expression::Unary(UnaryExpression {
        operator,
        operand: Box::new(operand),
        span,
    });
    Ok((expr, height))
}

fn parse_primary(parser: &mut Parser) -> Result<Measured, ParseError> {
    let span = parser.current_span();

    match parser.current().clone() {
        Token::Number(value) => {
            parser.advance();
            Ok((Expression::NumberLiteral(NumberLiteral { value, span }), 1))
        }
        Token::String(value) => {
            parser.advance();
            Ok((Expression::StringLiteral(StringLiteral { value, span }), 1))
        }
        Token::Identifier(name) => {
            parser.advance();
            Ok((Expression::Identifier(Identifier { name, span }), 1))
        }
        Token::LeftParen => {
            parser.advance();
            let inner = with_depth(parser, "parenthesized expression", parse_bounded)?;
            parser.expect(Token::RightParen)?;
            Ok(inner)
        }
        _ => Err(parser.unexpected_token(&[])),
    }
}
