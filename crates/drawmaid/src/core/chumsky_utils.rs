//! Shared chumsky parser utilities for statement grammars

use chumsky::prelude::*;

/// Parse optional inline whitespace (spaces and tabs).
///
/// Uses explicit character matching to avoid the "repeated combinator making no progress"
/// issue that can occur with `chumsky::text::whitespace().repeated()`.
pub fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    just(' ').or(just('\t')).repeated().ignored()
}

/// Parse at least one space or tab.
pub fn inline_whitespace_required<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    one_of(" \t").repeated().at_least(1).ignored()
}

/// Parse a word identifier: letters, digits and underscores.
pub fn word<'src>() -> impl Parser<'src, &'src str, String> + Clone {
    any()
        .filter(|c: &char| c.is_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .collect::<String>()
        .labelled("identifier")
}

/// Parse a double-quoted string, keeping the quotes.
///
/// Brackets and pipes are allowed inside the quotes, which is the point of
/// quoting a label in the first place.
pub fn quoted<'src>() -> impl Parser<'src, &'src str, String> + Clone {
    just('"')
        .ignore_then(none_of("\"\n").repeated().collect::<String>())
        .then_ignore(just('"'))
        .map(|inner| format!("\"{}\"", inner))
        .labelled("quoted text")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_whitespace() {
        let parser = inline_whitespace().then(just("test")).then_ignore(end());
        assert!(parser.parse("test").into_result().is_ok());
        assert!(parser.parse(" \ttest").into_result().is_ok());
        assert!(parser.parse("\ntest").into_result().is_err());
    }

    #[test]
    fn test_inline_whitespace_required() {
        let parser = just("a")
            .then(inline_whitespace_required())
            .then(just("b"))
            .then_ignore(end());
        assert!(parser.parse("a b").into_result().is_ok());
        assert!(parser.parse("a \t b").into_result().is_ok());
        assert!(parser.parse("ab").into_result().is_err());
    }

    #[test]
    fn test_word() {
        let parser = word().then_ignore(end());
        assert_eq!(parser.parse("node_1").into_result(), Ok("node_1".to_string()));
        assert_eq!(parser.parse("42").into_result(), Ok("42".to_string()));
        assert!(parser.parse("bad-id").into_result().is_err());
        assert!(parser.parse("").into_result().is_err());
    }

    #[test]
    fn test_quoted() {
        let parser = quoted().then_ignore(end());
        assert_eq!(
            parser.parse("\"a [b] |c|\"").into_result(),
            Ok("\"a [b] |c|\"".to_string())
        );
        assert!(parser.parse("\"unterminated").into_result().is_err());
    }
}
