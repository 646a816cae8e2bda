use std::fmt;

use crate::Error;

/// Three integers `[begin] [step] [end]` describing a regularly-spaced vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub begin: i64,
    pub step: i64,
    pub end: i64,
}

impl Span {
    pub fn new(begin: i64, step: i64, end: i64) -> Self {
        Self { begin, step, end }
    }

    /// True if any of the three numbers is smaller than 1.
    pub fn has_value_below_one(&self) -> bool {
        self.begin < 1 || self.step < 1 || self.end < 1
    }

    /// True if `begin` is greater than `end`.
    pub fn is_reversed(&self) -> bool {
        self.begin > self.end
    }
}

impl TryFrom<&[i64]> for Span {
    type Error = Error;
    fn try_from(values: &[i64]) -> Result<Self, Self::Error> {
        match values {
            [begin, step, end] => Ok(Self::new(*begin, *step, *end)),
            _ => Err(Error::SpanLength(values.len())),
        }
    }
}

/// Space-separated, as written to the options file.
impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.begin, self.step, self.end)
    }
}
