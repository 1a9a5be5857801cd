use std::mem;

use crate::ast::Regex;

/// Applies one local rewrite to the root of `regex`, hoisting a surviving child
/// over its parent when the other child is an identity or absorbing element.
///
/// Children are not visited: they are expected to be simplified already.
///
/// - `[]|r`, `r|[]` → `r`
/// - `[]&r`, `r&[]` → `[]`
/// - `[]r`, `r[]` → `[]`
/// - `()r`, `r()` → `r`
/// - `r{1,1}` → `r`
pub fn simplify(regex: &mut Regex) {
    let hoisted = match regex {
        Regex::Union(lhs, rhs) if lhs.is_void() => take(rhs),
        Regex::Union(lhs, rhs) if rhs.is_void() => take(lhs),
        Regex::Intersection(lhs, rhs) | Regex::Concat(lhs, rhs)
            if lhs.is_void() || rhs.is_void() =>
        {
            Regex::void()
        }
        Regex::Concat(lhs, rhs) if lhs.is_epsilon() => take(rhs),
        Regex::Concat(lhs, rhs) if rhs.is_epsilon() => take(lhs),
        Regex::Repeat {
            lower: 1,
            upper: Some(1),
            inner: Some(inner),
        } => take(inner),
        _ => return,
    };
    *regex = hoisted;
}

fn take(child: &mut Box<Regex>) -> Regex {
    mem::replace(&mut **child, Regex::void())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> Regex {
        Regex::literal(b'a')
    }

    fn raw_concat(lhs: Regex, rhs: Regex) -> Regex {
        Regex::Concat(Box::new(lhs), Box::new(rhs))
    }

    #[test]
    fn union_drops_void() {
        let mut regex = Regex::Union(Box::new(Regex::void()), Box::new(a()));
        simplify(&mut regex);
        assert_eq!(regex, a());

        let mut regex = Regex::Union(Box::new(a()), Box::new(Regex::void()));
        simplify(&mut regex);
        assert_eq!(regex, a());
    }

    #[test]
    fn void_absorbs() {
        let mut regex = Regex::Intersection(Box::new(a()), Box::new(Regex::void()));
        simplify(&mut regex);
        assert!(regex.is_void());

        let mut regex = raw_concat(Regex::void(), Regex::any_string());
        simplify(&mut regex);
        assert!(regex.is_void());
    }

    #[test]
    fn concat_drops_epsilon() {
        let mut regex = raw_concat(Regex::epsilon(), a());
        simplify(&mut regex);
        assert_eq!(regex, a());

        let mut regex = raw_concat(a(), Regex::epsilon());
        simplify(&mut regex);
        assert_eq!(regex, a());

        let mut regex = raw_concat(Regex::epsilon(), Regex::epsilon());
        simplify(&mut regex);
        assert!(regex.is_epsilon());
    }

    #[test]
    fn single_repetition_is_its_child() {
        let mut regex = Regex::Repeat {
            lower: 1,
            upper: Some(1),
            inner: Some(Box::new(a())),
        };
        simplify(&mut regex);
        assert_eq!(regex, a());
    }

    #[test]
    fn does_not_recurse() {
        let nested = raw_concat(Regex::epsilon(), a());
        let mut regex = Regex::Complement(Box::new(nested.clone()));
        simplify(&mut regex);
        assert_eq!(regex, Regex::Complement(Box::new(nested)));
    }

    #[test]
    fn idempotent() {
        let trees = [
            Regex::union(a(), Regex::any_string()),
            Regex::concat(Regex::any_byte(), Regex::repeat(a(), 1, None)),
            Regex::intersection(Regex::universal(), a()),
            Regex::repeat(Regex::void(), 0, Some(1)),
            Regex::epsilon(),
            Regex::void(),
        ];
        for tree in trees {
            let mut again = tree.clone();
            simplify(&mut again);
            assert_eq!(again, tree);
        }
    }
}
