use thiserror::Error;

use crate::ast::Regex;
use crate::config::Config;

/// Bytes with a syntactic meaning. Each one must be escaped with `\` to be
/// matched literally, and only these may be escaped.
pub const METACHARACTERS: &[u8] = b"\\-.~%*+?|&!()";

pub fn is_metacharacter(byte: u8) -> bool {
    METACHARACTERS.contains(&byte)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unterminated group opened at offset {offset}")]
    UnterminatedGroup { offset: usize },
    #[error("unterminated escape at offset {offset}")]
    UnterminatedEscape { offset: usize },
    #[error("invalid escape of byte {byte:#04x} at offset {offset}")]
    InvalidEscape { offset: usize, byte: u8 },
    #[error("expected a literal byte at offset {offset}")]
    ExpectedSymbol { offset: usize },
    #[error("unterminated range at offset {offset}")]
    UnterminatedRange { offset: usize },
    #[error("unexpected trailing input at offset {offset}")]
    TrailingInput { offset: usize },
    #[error("pattern nests deeper than {limit} at offset {offset}")]
    TooDeep { offset: usize, limit: usize },
}

impl ParseError {
    /// Byte offset into the pattern where the error was detected.
    pub fn offset(&self) -> usize {
        match *self {
            ParseError::UnterminatedGroup { offset }
            | ParseError::UnterminatedEscape { offset }
            | ParseError::InvalidEscape { offset, .. }
            | ParseError::ExpectedSymbol { offset }
            | ParseError::UnterminatedRange { offset }
            | ParseError::TrailingInput { offset }
            | ParseError::TooDeep { offset, .. } => offset,
        }
    }
}

/// Recursive-descent parser for extended regular expressions.
///
/// Grammar, from loosest to tightest binding:
///
/// ```text
/// regex  := '!'? term (('|' | '&') regex)?
/// term   := factor*
/// factor := atom ('*' | '+' | '?')?
/// atom   := '%' | '(' regex ')' | '~'? '.' | '~'? symbol ('-' symbol)?
/// symbol := <non-metacharacter> | '\' <metacharacter>
/// ```
///
/// Every node is simplified as it is built.
pub struct Parser<'a> {
    pattern: &'a [u8],
    pos: usize,
    depth: usize,
    max_depth: usize,
    max_tree_depth: Option<usize>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given pattern.
    pub fn new(pattern: &'a [u8]) -> Self {
        Self::with_config(pattern, &Config::default())
    }

    pub fn with_config(pattern: &'a [u8], config: &Config) -> Self {
        Self {
            pattern,
            pos: 0,
            depth: 0,
            max_depth: config.max_depth(),
            max_tree_depth: config.max_tree_depth(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.pattern.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Consume `expected` if it is the next byte.
    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Parse the whole pattern. Anything left over after a complete pattern is
    /// an error, as is a tree deeper than the configured `max_tree_depth`.
    ///
    /// Example:
    /// - Pattern: `a|b&c` → Union(a, Intersection(b, c))
    pub fn parse(&mut self) -> Result<Regex, ParseError> {
        let regex = self.parse_regex()?;
        if self.pos < self.pattern.len() {
            return Err(ParseError::TrailingInput { offset: self.pos });
        }
        if let Some(limit) = self.max_tree_depth {
            if regex.depth() > limit {
                return Err(ParseError::TooDeep {
                    offset: self.pos,
                    limit,
                });
            }
        }
        Ok(regex)
    }

    /// Parse terms joined by `|` and `&`, grouping to the right. A leading `!`
    /// complements the term that follows it, not the rest of the chain.
    ///
    /// Example:
    /// - Pattern: `!a|b` → Union(Complement(a), b)
    fn parse_regex(&mut self) -> Result<Regex, ParseError> {
        let mut operands = Vec::new();
        loop {
            let complement = self.eat(b'!');
            let mut term = self.parse_term()?;
            if complement {
                term = Regex::complement(term);
            }
            match self.peek() {
                Some(op @ (b'|' | b'&')) => {
                    self.advance();
                    operands.push((term, op));
                }
                _ => {
                    return Ok(operands.into_iter().rev().fold(term, |rhs, (lhs, op)| {
                        if op == b'&' {
                            Regex::intersection(lhs, rhs)
                        } else {
                            Regex::union(lhs, rhs)
                        }
                    }));
                }
            }
        }
    }

    /// Parse a concatenation of factors. A term stops in front of `)`, `|`,
    /// `&` or the end of the pattern; an empty term is epsilon.
    ///
    /// Example:
    /// - Pattern: `abc` → Concat(a, Concat(b, c))
    fn parse_term(&mut self) -> Result<Regex, ParseError> {
        let mut factors = Vec::new();
        while !matches!(self.peek(), None | Some(b')' | b'|' | b'&')) {
            factors.push(self.parse_factor()?);
        }
        Ok(factors
            .into_iter()
            .rev()
            .fold(Regex::epsilon(), |rest, factor| Regex::concat(factor, rest)))
    }

    /// Parse an atom and at most one quantifier after it.
    ///
    /// Example:
    /// - Pattern: `a*` → Repeat { lower: 0, upper: None, inner: a }
    /// - Pattern: `a+` → Repeat { lower: 1, upper: None, inner: a }
    /// - Pattern: `a?` → Repeat { lower: 0, upper: Some(1), inner: a }
    fn parse_factor(&mut self) -> Result<Regex, ParseError> {
        let atom = self.parse_atom()?;
        let (lower, upper) = match self.peek() {
            Some(b'*') => (0, None),
            Some(b'+') => (1, None),
            Some(b'?') => (0, Some(1)),
            _ => return Ok(atom),
        };
        self.advance();
        Ok(Regex::repeat(atom, lower, upper))
    }

    /// Parse a group, `%`, `.` or a byte range, the last two optionally
    /// negated with `~`.
    ///
    /// Examples:
    /// - Pattern: `%`   → Repeat { lower: 0, upper: None, inner: . }
    /// - Pattern: `~.`  → the empty language
    /// - Pattern: `a-z` → Range(a, z)
    /// - Pattern: `~a`  → NegatedRange(a, a)
    /// - Pattern: `9-0` → NegatedRange(1, 8)
    fn parse_atom(&mut self) -> Result<Regex, ParseError> {
        let start = self.pos;
        if self.eat(b'%') {
            return Ok(Regex::any_string());
        }
        if self.eat(b'(') {
            self.depth += 1;
            if self.depth > self.max_depth {
                return Err(ParseError::TooDeep {
                    offset: start,
                    limit: self.max_depth,
                });
            }
            let inner = self.parse_regex()?;
            self.depth -= 1;
            if !self.eat(b')') {
                return Err(ParseError::UnterminatedGroup { offset: start });
            }
            return Ok(inner);
        }

        let negated = self.eat(b'~');
        if self.eat(b'.') {
            return Ok(if negated {
                Regex::void()
            } else {
                Regex::any_byte()
            });
        }
        let from = self.parse_symbol()?;
        let to = if self.eat(b'-') {
            self.parse_symbol().map_err(|err| match err {
                ParseError::ExpectedSymbol { offset } => ParseError::UnterminatedRange { offset },
                err => err,
            })?
        } else {
            from
        };
        Ok(Regex::range(from, to, negated))
    }

    /// Parse one literal byte, unescaping `\` followed by a metacharacter.
    fn parse_symbol(&mut self) -> Result<u8, ParseError> {
        let offset = self.pos;
        match self.peek() {
            Some(b'\\') => {
                self.advance();
                match self.advance() {
                    Some(byte) if is_metacharacter(byte) => Ok(byte),
                    Some(byte) => Err(ParseError::InvalidEscape { offset, byte }),
                    None => Err(ParseError::UnterminatedEscape { offset }),
                }
            }
            Some(byte) if !is_metacharacter(byte) => {
                self.advance();
                Ok(byte)
            }
            _ => Err(ParseError::ExpectedSymbol { offset }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pattern: &str) -> Result<Regex, ParseError> {
        Parser::new(pattern.as_bytes()).parse()
    }

    fn lit(byte: u8) -> Regex {
        Regex::literal(byte)
    }

    #[test]
    fn empty_pattern_is_epsilon() {
        assert_eq!(parse(""), Ok(Regex::epsilon()));
        assert_eq!(parse("()"), Ok(Regex::epsilon()));
        assert_eq!(parse("()()"), Ok(Regex::epsilon()));
    }

    #[test]
    fn concatenation_nests_to_the_right() {
        assert_eq!(
            parse("abc"),
            Ok(Regex::Concat(
                Box::new(lit(b'a')),
                Box::new(Regex::Concat(Box::new(lit(b'b')), Box::new(lit(b'c')))),
            ))
        );
    }

    #[test]
    fn operators_group_to_the_right() {
        assert_eq!(
            parse("a|b&c"),
            Ok(Regex::Union(
                Box::new(lit(b'a')),
                Box::new(Regex::Intersection(Box::new(lit(b'b')), Box::new(lit(b'c')))),
            ))
        );
        assert_eq!(
            parse("a&b|c"),
            Ok(Regex::Intersection(
                Box::new(lit(b'a')),
                Box::new(Regex::Union(Box::new(lit(b'b')), Box::new(lit(b'c')))),
            ))
        );
    }

    #[test]
    fn complement_binds_to_one_term() {
        assert_eq!(
            parse("!ab|c"),
            Ok(Regex::Union(
                Box::new(Regex::complement(Regex::concat(lit(b'a'), lit(b'b')))),
                Box::new(lit(b'c')),
            ))
        );
        assert_eq!(parse("!"), Ok(Regex::complement(Regex::epsilon())));
    }

    #[test]
    fn quantifiers() {
        assert_eq!(parse("a*"), Ok(Regex::repeat(lit(b'a'), 0, None)));
        assert_eq!(parse("a+"), Ok(Regex::repeat(lit(b'a'), 1, None)));
        assert_eq!(parse("a?"), Ok(Regex::repeat(lit(b'a'), 0, Some(1))));
        assert_eq!(parse("%"), Ok(Regex::any_string()));
        assert_eq!(parse(".*"), Ok(Regex::any_string()));
    }

    #[test]
    fn ranges() {
        assert_eq!(parse("."), Ok(Regex::any_byte()));
        assert!(parse("~.").unwrap().is_void());
        assert_eq!(parse("a-z"), Ok(Regex::Range(b'a' as i8, b'z' as i8)));
        assert_eq!(parse("~a-z"), Ok(Regex::NegatedRange(b'a' as i8, b'z' as i8)));
        assert_eq!(parse("9-0"), Ok(Regex::NegatedRange(b'1' as i8, b'8' as i8)));
        assert_eq!(parse("~9-0"), Ok(Regex::Range(b'1' as i8, b'8' as i8)));
        assert_eq!(parse("\\.-4"), Ok(Regex::Range(b'.' as i8, b'4' as i8)));
        assert_eq!(parse("\\(-\\+"), Ok(Regex::Range(b'(' as i8, b'+' as i8)));
    }

    #[test]
    fn escapes() {
        for &meta in METACHARACTERS {
            let pattern = [b'\\', meta];
            assert_eq!(Parser::new(&pattern).parse(), Ok(lit(meta)));
        }
        assert_eq!(parse("\\"), Err(ParseError::UnterminatedEscape { offset: 0 }));
        assert_eq!(
            parse("\\x0"),
            Err(ParseError::InvalidEscape {
                offset: 0,
                byte: b'x'
            })
        );
        assert_eq!(
            parse("ab\\n"),
            Err(ParseError::InvalidEscape {
                offset: 2,
                byte: b'n'
            })
        );
    }

    #[test]
    fn non_ascii_and_nul_are_literals() {
        assert_eq!(Parser::new(b"\0").parse(), Ok(lit(0)));
        assert_eq!(Parser::new(b"\xff").parse(), Ok(lit(0xff)));
    }

    #[test]
    fn errors() {
        let cases = [
            ("abc)", ParseError::TrailingInput { offset: 3 }),
            ("(abc", ParseError::UnterminatedGroup { offset: 0 }),
            ("a(b(c)", ParseError::UnterminatedGroup { offset: 1 }),
            ("+a", ParseError::ExpectedSymbol { offset: 0 }),
            ("a|*", ParseError::ExpectedSymbol { offset: 2 }),
            ("~~a", ParseError::ExpectedSymbol { offset: 1 }),
            ("a**", ParseError::ExpectedSymbol { offset: 2 }),
            ("a+*", ParseError::ExpectedSymbol { offset: 2 }),
            ("-", ParseError::ExpectedSymbol { offset: 0 }),
            ("a-", ParseError::UnterminatedRange { offset: 2 }),
            ("a-.", ParseError::UnterminatedRange { offset: 2 }),
            (".-a", ParseError::ExpectedSymbol { offset: 1 }),
            ("a-\\", ParseError::UnterminatedEscape { offset: 2 }),
            ("!!a", ParseError::ExpectedSymbol { offset: 1 }),
            ("a!!b", ParseError::ExpectedSymbol { offset: 1 }),
        ];
        for (pattern, expected) in cases {
            let err = parse(pattern).unwrap_err();
            assert_eq!(err, expected, "pattern {:?}", pattern);
            assert_eq!(err.offset(), expected.offset());
        }
    }

    #[test]
    fn nesting_limit() {
        let config = Config::builder().max_depth(4).build();
        assert!(Parser::with_config(b"((a))", &config).parse().is_ok());
        assert_eq!(
            Parser::with_config(b"(((((a)))))", &config).parse(),
            Err(ParseError::TooDeep { offset: 4, limit: 4 })
        );
        assert!(Parser::with_config(b"abcdef", &config).parse().is_ok());

        // Flat but long: only a tree depth limit rejects it.
        let config = Config::builder().max_tree_depth(4).build();
        assert_eq!(
            Parser::with_config(b"abcdef", &config).parse(),
            Err(ParseError::TooDeep { offset: 6, limit: 4 })
        );
        assert!(Parser::new(&[b'a'; 3000]).parse().is_ok());
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            parse("(ab").unwrap_err().to_string(),
            "unterminated group opened at offset 0"
        );
        assert_eq!(
            parse("\\q").unwrap_err().to_string(),
            "invalid escape of byte 0x71 at offset 0"
        );
    }
}
