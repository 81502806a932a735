//! Statement parsing

use super::expr::parse_expression;
use super::guards::with_depth;
use super::{ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::token::{Span, Token};

/// Parse a single statement.
pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    with_depth(parser, "statement", parse_statement_inner)
}

fn parse_statement_inner(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.skip_newlines();

    match parser.current() {
        Token::Print => parse_print_statement(parser).map(Statement::Print),
        Token::Scan => parse_scan_statement(parser).map(Statement::Scan),
        Token::While => parse_while_statement(parser).map(Statement::While),
        Token::If => parse_if_statement(parser).map(Statement::If),
        Token::Identifier(_) => parse_assignment_statement(parser).map(Statement::Assignment),
        _ => Err(parser.unexpected_token(&[])),
    }
}

/// print(expr);
fn parse_print_statement(parser: &mut Parser) -> Result<PrintStatement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Print)?;
    parser.expect(Token::LeftParen)?;
    let expression = parse_expression(parser)?;
    parser.expect(Token::RightParen)?;
    let end_span = parser.current_span();
    parser.expect(Token::Semicolon)?;

    Ok(PrintStatement {
        expression,
        span: parser.combine_spans(&start_span, &end_span),
    })
}

/// scan(identifier);
fn parse_scan_statement(parser: &mut Parser) -> Result<ScanStatement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Scan)?;
    parser.expect(Token::LeftParen)?;
    let (target, _) = parser.expect_identifier()?;
    parser.expect(Token::RightParen)?;
    let end_span = parser.current_span();
    parser.expect(Token::Semicolon)?;

    Ok(ScanStatement {
        target,
        span: parser.combine_spans(&start_span, &end_span),
    })
}

/// identifier (= | += | -=) expr;
fn parse_assignment_statement(parser: &mut Parser) -> Result<AssignmentStatement, ParseError> {
    let (target, start_span) = parser.expect_identifier()?;

    let operator = match parser.current() {
        Token::Equal => AssignOperator::Assign,
        Token::PlusEqual => AssignOperator::AddAssign,
        Token::MinusEqual => AssignOperator::SubtractAssign,
        _ => {
            return Err(parser.unexpected_token(&[
                Token::Equal,
                Token::PlusEqual,
                Token::MinusEqual,
            ]))
        }
    };
    parser.advance();

    let value = parse_expression(parser)?;
    let end_span = parser.current_span();
    parser.expect(Token::Semicolon)?;

    Ok(AssignmentStatement {
        target,
        operator,
        value,
        span: parser.combine_spans(&start_span, &end_span),
    })
}

/// while (expr) { stmts }
fn parse_while_statement(parser: &mut Parser) -> Result<WhileStatement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::While)?;
    let condition = parse_condition(parser)?;
    let (body, end_span) = parse_block(parser)?;

    Ok(WhileStatement {
        condition,
        body,
        span: parser.combine_spans(&start_span, &end_span),
    })
}

/// if (expr) { stmts } [else { stmts }]
fn parse_if_statement(parser: &mut Parser) -> Result<IfStatement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::If)?;
    let condition = parse_condition(parser)?;
    let (then_body, mut end_span) = parse_block(parser)?;

    // Allow `}` and `else` on different lines
    let else_body = if matches!(lookahead_past_newlines(parser), Some(Token::Else)) {
        parser.skip_newlines();
        parser.expect(Token::Else)?;
        let (body, span) = parse_block(parser)?;
        end_span = span;
        Some(body)
    } else {
        None
    };

    Ok(IfStatement {
        condition,
        then_body,
        else_body,
        span: parser.combine_spans(&start_span, &end_span),
    })
}

/// ( expr )
fn parse_condition(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect(Token::LeftParen)?;
    let condition = parse_expression(parser)?;
    parser.expect(Token::RightParen)?;
    Ok(condition)
}

/// { stmts }, returning the statements and the span of the closing brace.
fn parse_block(parser: &mut Parser) -> Result<(Vec<Statement>, Span), ParseError> {
    parser.skip_newlines();
    parser.expect(Token::LeftBrace)?;
    parser.skip_newlines();

    let mut body = Vec::new();
    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        body.push(parse_statement(parser)?);
        parser.skip_newlines();
    }

    let end_span = parser.current_span();
    parser.expect(Token::RightBrace)?;
    Ok((body, end_span))
}

/// First non-newline token at or after the current position.
fn lookahead_past_newlines(parser: &Parser) -> Option<&Token> {
    let mut offset = 0;
    while let Some(Token::Newline) = parser.nth(offset) {
        offset += 1;
    }
    parser.nth(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parser::ParseErrorKind;

    fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(source).expect("should lex").parse()
    }

    #[test]
    fn test_print_statement() {
        let program = parse("print(42);").expect("should parse");
        match &program.statements[0] {
            Statement::Print(stmt) => {
                assert!(matches!(stmt.expression, Expression::NumberLiteral(ref n) if n.value == 42.0));
            }
            other => panic!("Expected print statement, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_statement() {
        let program = parse("scan(x);").expect("should parse");
        match &program.statements[0] {
            Statement::Scan(stmt) => assert_eq!(stmt.target, "x"),
            other => panic!("Expected scan statement, got {:?}", other),
        }
    }

    #[test]
    fn test_compound_assignments() {
        let program = parse("x = 1; x += 2; x -= 3;").expect("should parse");
        let ops: Vec<AssignOperator> = program
            .statements
            .iter()
            .map(|s| match s {
                Statement::Assignment(a) => a.operator,
                other => panic!("Expected assignment, got {:?}", other),
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                AssignOperator::Assign,
                AssignOperator::AddAssign,
                AssignOperator::SubtractAssign
            ]
        );
    }

    #[test]
    fn test_while_statement() {
        let program = parse("while (i < 3) {\n  print(i);\n  i += 1;\n}").expect("should parse");
        match &program.statements[0] {
            Statement::While(stmt) => {
                assert_eq!(stmt.body.len(), 2);
                assert!(matches!(stmt.condition, Expression::Binary(_)));
            }
            other => panic!("Expected while statement, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else_across_lines() {
        let source = "if (x > 0) {\n  print(x);\n}\nelse\n{\n  print(0);\n}\n";
        let program = parse(source).expect("should parse");
        match &program.statements[0] {
            Statement::If(stmt) => {
                assert_eq!(stmt.then_body.len(), 1);
                assert_eq!(stmt.else_body.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_if_without_else_followed_by_statement() {
        let program = parse("if (x) { print(1); }\nprint(2);").expect("should parse");
        assert_eq!(program.len(), 2);
        match &program.statements[0] {
            Statement::If(stmt) => assert!(stmt.else_body.is_none()),
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_block() {
        let program = parse("while (x) { }").expect("should parse");
        match &program.statements[0] {
            Statement::While(stmt) => assert!(stmt.body.is_empty()),
            other => panic!("Expected while statement, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("x = 1\ny = 2;").unwrap_err();
        assert_eq!(err.line(), 1);
        match err.kind {
            ParseErrorKind::UnexpectedToken { found, .. } => assert_eq!(found, Token::Newline),
            other => panic!("Expected UnexpectedToken, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_assignment_operator() {
        let err = parse("x 1;").unwrap_err();
        assert!(err.message.contains("'='"));
    }

    #[test]
    fn test_scan_requires_identifier() {
        assert!(parse("scan(1);").is_err());
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse("while (x) { print(x);").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let mut source = String::new();
        for _ in 0..100 {
            source.push_str("while (x) { ");
        }
        for _ in 0..100 {
            source.push_str("} ");
        }
        let err = parse(&source).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::ParserLimitExceeded { .. }));
    }
}
