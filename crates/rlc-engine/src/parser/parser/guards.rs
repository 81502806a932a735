//! Parser guards to prevent stack overflow on deeply nested input

use super::{ParseError, Parser};
use crate::parser::token::Span;

/// Maximum nesting depth before rejecting parse
///
/// Counts nested blocks, unary operator chains and parenthesized
/// sub-expressions. Binary operator chains are parsed iteratively and do
/// not count towards the limit.
pub const MAX_PARSE_DEPTH: usize = 64;

/// Maximum height of one expression tree
///
/// Operator chains are parsed in a loop, but each operator still nests the
/// tree built so far one level deeper, and every later stage walks the tree
/// recursively. 256 leaves a wide margin on a 2 MiB test thread in debug
/// builds.
pub const MAX_EXPRESSION_HEIGHT: usize = 256;

/// Reject an expression node whose subtree is taller than the limit.
pub fn check_height(height: usize, span: Span) -> Result<(), ParseError> {
    if height > MAX_EXPRESSION_HEIGHT {
        return Err(ParseError::parser_limit_exceeded(
            format!(
                "Expression too deeply nested (more than {} levels of operators)",
                MAX_EXPRESSION_HEIGHT
            ),
            span,
        ));
    }
    Ok(())
}

/// Run `f` one nesting level deeper.
///
/// The depth counter is restored whether `f` succeeds or fails.
pub fn with_depth<T>(
    parser: &mut Parser,
    what: &'static str,
    f: impl FnOnce(&mut Parser) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    parser.depth += 1;
    if parser.depth > MAX_PARSE_DEPTH {
        parser.depth -= 1;
        return Err(ParseError::parser_limit_exceeded(
            format!("Maximum nesting depth ({}) exceeded in {}", MAX_PARSE_DEPTH, what),
            parser.current_span(),
        ));
    }

    let result = f(parser);
    parser.depth -= 1;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parser::ParseErrorKind;

    #[test]
    fn test_depth_restored_after_success() {
        let mut parser = Parser::from_tokens(vec![]);
        let value = with_depth(&mut parser, "test", |p| {
            assert_eq!(p.depth, 1);
            Ok(7)
        })
        .expect("within limit");
        assert_eq!(value, 7);
        assert_eq!(parser.depth, 0);
    }

    #[test]
    fn test_depth_restored_after_error() {
        let mut parser = Parser::from_tokens(vec![]);
        let result: Result<(), ParseError> = with_depth(&mut parser, "test", |p| {
            Err(p.unexpected_token(&[]))
        });
        assert!(result.is_err());
        assert_eq!(parser.depth, 0);
    }

    #[test]
    fn test_height_limit() {
        let span = Span::new(0, 1, 4, 2);
        assert!(check_height(MAX_EXPRESSION_HEIGHT, span).is_ok());
        let err = check_height(MAX_EXPRESSION_HEIGHT + 1, span).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::ParserLimitExceeded { .. }));
        assert_eq!(err.span.line, 4);
    }

    #[test]
    fn test_limit_exceeded() {
        let mut parser = Parser::from_tokens(vec![]);
        parser.depth = MAX_PARSE_DEPTH;
        let err = with_depth(&mut parser, "expression", |_| Ok(())).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::ParserLimitExceeded { .. }));
        assert_eq!(parser.depth, MAX_PARSE_DEPTH);
    }
}
