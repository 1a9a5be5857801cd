//! Extended regular expressions matched by symbolic derivatives.
//!
//! Patterns support union `|`, intersection `&`, complement `!`, byte ranges
//! (`a-z`, negated `~a-z`, wraparound `9-0`), `.`, `%` and the quantifiers
//! `*`, `+`, `?`. A match always covers the whole input.
//!
//! ```
//! let regex = nure::parse("(0-9|a-z)+&!0-9+").unwrap();
//! assert!(regex.is_match("abc123"));
//! assert!(!regex.is_match("123"));
//! ```

pub mod ast;
pub mod config;
pub mod derivative;
pub mod matcher;
pub mod parser;
pub mod simplify;

pub use ast::Regex;
pub use config::Config;
pub use matcher::MatchError;
pub use parser::ParseError;

/// Parse `pattern` with the default [`Config`].
pub fn parse(pattern: impl AsRef<[u8]>) -> Result<Regex, ParseError> {
    parse_with(pattern, &Config::default())
}

/// Parse `pattern` with the nesting limits in `config`.
pub fn parse_with(pattern: impl AsRef<[u8]>, config: &Config) -> Result<Regex, ParseError> {
    parser::Parser::with_config(pattern.as_ref(), config).parse()
}

/// Does `pattern` accept the whole of `input`?
pub fn is_match(input: impl AsRef<[u8]>, pattern: impl AsRef<[u8]>) -> Result<bool, ParseError> {
    let mut regex = parse(pattern)?;
    Ok(matcher::matches(&mut regex, input.as_ref()))
}
