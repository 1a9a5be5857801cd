use std::mem;

use crate::ast::Regex;
use crate::simplify::simplify;

/// Does `regex` accept the empty string?
pub fn nullable(regex: &Regex) -> bool {
    match regex {
        Regex::Union(lhs, rhs) => nullable(lhs) || nullable(rhs),
        Regex::Intersection(lhs, rhs) | Regex::Concat(lhs, rhs) => nullable(lhs) && nullable(rhs),
        Regex::Complement(inner) => !nullable(inner),
        Regex::Repeat { lower, inner, .. } => {
            *lower == 0 || inner.as_deref().map_or(false, nullable)
        }
        Regex::Range(..) | Regex::NegatedRange(..) => false,
    }
}

/// Replaces `regex` with its derivative with respect to `byte`: the pattern
/// accepting exactly the strings `w` such that `byte` followed by `w` was
/// accepted before.
///
/// Each call simplifies the root it produces; the subtrees it recursed into
/// were simplified by their own calls.
pub fn differentiate(regex: &mut Regex, byte: u8) {
    match regex {
        Regex::Union(lhs, rhs) | Regex::Intersection(lhs, rhs) => {
            differentiate(lhs, byte);
            differentiate(rhs, byte);
        }
        Regex::Complement(inner) => differentiate(inner, byte),
        Regex::Concat(lhs, rhs) => {
            let was_nullable = nullable(lhs);
            differentiate(lhs, byte);
            if was_nullable {
                // `lhs` may also match nothing, letting `byte` fall through
                // into an independent copy of `rhs`.
                let mut fall_through = rhs.clone();
                differentiate(&mut fall_through, byte);
                let mut consumed = mem::replace(regex, Regex::void());
                simplify(&mut consumed);
                *regex = Regex::Union(Box::new(consumed), fall_through);
            }
        }
        Regex::Repeat {
            upper: Some(0), ..
        }
        | Regex::Repeat { inner: None, .. } => *regex = Regex::void(),
        Regex::Repeat {
            lower,
            upper,
            inner: Some(inner),
        } => {
            *lower = lower.saturating_sub(1);
            if let Some(upper) = upper.as_mut() {
                *upper -= 1;
            }
            if *upper == Some(0) {
                // Exactly one occurrence was left; it consumes `byte`.
                let mut last = mem::replace(&mut **inner, Regex::void());
                differentiate(&mut last, byte);
                *regex = last;
            } else {
                let mut head = inner.clone();
                differentiate(&mut head, byte);
                let rest = mem::replace(regex, Regex::void());
                *regex = Regex::Concat(head, Box::new(rest));
            }
        }
        Regex::Range(lo, hi) => {
            *regex = step((*lo..=*hi).contains(&(byte as i8)));
            return;
        }
        Regex::NegatedRange(lo, hi) => {
            *regex = step(!(*lo..=*hi).contains(&(byte as i8)));
            return;
        }
    }
    simplify(regex);
}

fn step(accepted: bool) -> Regex {
    if accepted {
        Regex::epsilon()
    } else {
        Regex::void()
    }
}
