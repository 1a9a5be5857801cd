use thiserror::Error;

use crate::ast::Regex;
use crate::derivative::{differentiate, nullable};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("derivative nests deeper than {limit} after {consumed} input bytes")]
    TooDeep { limit: usize, consumed: usize },
}

/// Does `regex` accept the whole of `input`?
///
/// This is destructive: on return `regex` holds its derivative with respect to
/// `input` and no longer describes the original pattern. Clone it first, or use
/// [`Regex::is_match`], to match the same pattern again.
pub fn matches(regex: &mut Regex, input: &[u8]) -> bool {
    for &byte in input {
        differentiate(regex, byte);
    }
    nullable(regex)
}

/// Like [`matches`], but gives up once a derivative grows deeper than
/// `max_depth`, before recursing into it again.
pub fn try_matches(regex: &mut Regex, input: &[u8], max_depth: usize) -> Result<bool, MatchError> {
    for (consumed, &byte) in input.iter().enumerate() {
        differentiate(regex, byte);
        if regex.depth() > max_depth {
            return Err(MatchError::TooDeep {
                limit: max_depth,
                consumed: consumed + 1,
            });
        }
    }
    Ok(nullable(regex))
}

impl Regex {
    /// Does this pattern accept the whole of `input`? Matches a copy of the
    /// tree, so `self` stays usable.
    pub fn is_match(&self, input: impl AsRef<[u8]>) -> bool {
        matches(&mut self.clone(), input.as_ref())
    }
}
