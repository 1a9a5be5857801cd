use std::fmt;

use crate::parser::is_metacharacter;
use crate::simplify::simplify;

/// A parsed pattern, or a derivative of one.
///
/// Every child is exclusively owned. Duplicating a subtree always goes through
/// `clone()`, which makes a deep, independent copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Regex {
    /// `r|s`
    Union(Box<Regex>, Box<Regex>),
    /// `r&s`
    Intersection(Box<Regex>, Box<Regex>),
    /// `!r`
    Complement(Box<Regex>),
    /// `rs`
    Concat(Box<Regex>, Box<Regex>),
    /// Between `lower` and `upper` consecutive repetitions of `inner`, both
    /// inclusive. `upper == None` is unbounded.
    ///
    /// `inner` is `None` only for the epsilon sentinel (`lower == upper == 0`).
    Repeat {
        lower: u32,
        upper: Option<u32>,
        inner: Option<Box<Regex>>,
    },
    /// One byte in `[lo, hi]`, compared as signed bytes.
    Range(i8, i8),
    /// One byte outside `[lo, hi]`, compared as signed bytes.
    NegatedRange(i8, i8),
}

impl Regex {
    /// Accepts only the empty string.
    pub const fn epsilon() -> Self {
        Regex::Repeat {
            lower: 0,
            upper: Some(0),
            inner: None,
        }
    }

    /// Accepts nothing.
    pub const fn void() -> Self {
        Regex::NegatedRange(i8::MIN, i8::MAX)
    }

    /// Accepts every string.
    pub fn universal() -> Self {
        Regex::Complement(Box::new(Regex::void()))
    }

    /// `.`
    pub const fn any_byte() -> Self {
        Regex::Range(i8::MIN, i8::MAX)
    }

    /// `%`, any byte zero or more times.
    pub fn any_string() -> Self {
        Regex::Repeat {
            lower: 0,
            upper: None,
            inner: Some(Box::new(Regex::any_byte())),
        }
    }

    pub const fn literal(byte: u8) -> Self {
        Regex::Range(byte as i8, byte as i8)
    }

    /// Builds a range from two endpoints in any order.
    ///
    /// Endpoints given high-to-low denote the wraparound range, i.e. every byte
    /// outside the gap strictly between them.
    pub fn range(from: u8, to: u8, negated: bool) -> Self {
        let (from, to) = (from as i8, to as i8);
        let wraparound = from > to;
        let (lo, hi) = if wraparound {
            (to + 1, from - 1)
        } else {
            (from, to)
        };
        if wraparound != negated {
            Regex::NegatedRange(lo, hi)
        } else {
            Regex::Range(lo, hi)
        }
    }

    pub fn union(lhs: Regex, rhs: Regex) -> Self {
        let mut regex = Regex::Union(Box::new(lhs), Box::new(rhs));
        simplify(&mut regex);
        regex
    }

    pub fn intersection(lhs: Regex, rhs: Regex) -> Self {
        let mut regex = Regex::Intersection(Box::new(lhs), Box::new(rhs));
        simplify(&mut regex);
        regex
    }

    pub fn complement(inner: Regex) -> Self {
        Regex::Complement(Box::new(inner))
    }

    pub fn concat(lhs: Regex, rhs: Regex) -> Self {
        let mut regex = Regex::Concat(Box::new(lhs), Box::new(rhs));
        simplify(&mut regex);
        regex
    }

    pub fn repeat(inner: Regex, lower: u32, upper: Option<u32>) -> Self {
        if upper == Some(0) {
            return Regex::epsilon();
        }
        let mut regex = Regex::Repeat {
            lower,
            upper,
            inner: Some(Box::new(inner)),
        };
        simplify(&mut regex);
        regex
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(
            self,
            Regex::Repeat {
                lower: 0,
                upper: Some(0),
                ..
            }
        )
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Regex::NegatedRange(i8::MIN, i8::MAX))
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, Regex::Complement(inner) if inner.is_void())
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Regex::Union(lhs, rhs) | Regex::Intersection(lhs, rhs) | Regex::Concat(lhs, rhs) => {
                1 + lhs.depth().max(rhs.depth())
            }
            Regex::Complement(inner) => 1 + inner.depth(),
            Regex::Repeat { inner, .. } => 1 + inner.as_ref().map_or(0, |inner| inner.depth()),
            Regex::Range(..) | Regex::NegatedRange(..) => 1,
        }
    }

    /// Total number of nodes.
    pub fn size(&self) -> usize {
        match self {
            Regex::Union(lhs, rhs) | Regex::Intersection(lhs, rhs) | Regex::Concat(lhs, rhs) => {
                1 + lhs.size() + rhs.size()
            }
            Regex::Complement(inner) => 1 + inner.size(),
            Regex::Repeat { inner, .. } => 1 + inner.as_ref().map_or(0, |inner| inner.size()),
            Regex::Range(..) | Regex::NegatedRange(..) => 1,
        }
    }

    // Renders without surrounding parentheses when followed by a quantifier.
    fn is_atom(&self) -> bool {
        match self {
            Regex::Concat(..) => false,
            Regex::Repeat { .. } => self.is_epsilon(),
            _ => true,
        }
    }
}

fn write_symbol(f: &mut fmt::Formatter<'_>, symbol: i8) -> fmt::Result {
    let byte = symbol as u8;
    if is_metacharacter(byte) {
        write!(f, "\\{}", byte as char)
    } else if byte.is_ascii_graphic() || byte == b' ' {
        write!(f, "{}", byte as char)
    } else {
        write!(f, "\\x{:02x}", byte)
    }
}

fn write_range(f: &mut fmt::Formatter<'_>, lo: i8, hi: i8) -> fmt::Result {
    if (lo, hi) == (i8::MIN, i8::MAX) {
        return f.write_str(".");
    }
    write_symbol(f, lo)?;
    if lo != hi {
        f.write_str("-")?;
        write_symbol(f, hi)?;
    }
    Ok(())
}

// `lo > hi` is what a wraparound range with adjacent endpoints leaves behind,
// so it prints as that range again with the negation flipped. Anything else
// with `lo > hi` prints as `.` or `~.`, which accept the same bytes.
fn write_empty_gap(f: &mut fmt::Formatter<'_>, lo: i8, hi: i8, negation: &str) -> fmt::Result {
    if i16::from(lo) != i16::from(hi) + 1 {
        return write!(f, "{}.", negation);
    }
    f.write_str(negation)?;
    write_symbol(f, lo)?;
    f.write_str("-")?;
    write_symbol(f, hi)
}

/// Diagnostic rendering in pattern syntax.
///
/// Counted repetitions that only arise from differentiation print as `{n,m}`,
/// and unprintable bytes as `\xNN`; neither is accepted by the parser.
impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regex::Union(lhs, rhs) => write!(f, "({}|{})", lhs, rhs),
            Regex::Intersection(lhs, rhs) => write!(f, "({}&{})", lhs, rhs),
            Regex::Complement(inner) => write!(f, "(!{})", inner),
            Regex::Concat(lhs, rhs) => write!(f, "{}{}", lhs, rhs),
            Regex::Repeat {
                inner: Some(inner),
                lower,
                upper,
            } => {
                if inner.is_atom() {
                    write!(f, "{}", inner)?;
                } else {
                    write!(f, "({})", inner)?;
                }
                match (*lower, *upper) {
                    (0, None) => f.write_str("*"),
                    (1, None) => f.write_str("+"),
                    (0, Some(1)) => f.write_str("?"),
                    (n, None) => write!(f, "{{{},}}", n),
                    (n, Some(m)) => write!(f, "{{{},{}}}", n, m),
                }
            }
            Regex::Repeat { inner: None, .. } => f.write_str("()"),
            Regex::Range(lo, hi) if lo > hi => write_empty_gap(f, *lo, *hi, "~"),
            Regex::NegatedRange(lo, hi) if lo > hi => write_empty_gap(f, *lo, *hi, ""),
            Regex::Range(lo, hi) => write_range(f, *lo, *hi),
            Regex::NegatedRange(lo, hi) => {
                f.write_str("~")?;
                write_range(f, *lo, *hi)
            }
        }
    }
}
