use std::fmt::{Display, Formatter};

use crate::errors::MappingResult;

/// One end of a [Range].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bound<T> {
    Inclusive(T),
    Exclusive(T),
    Unbounded,
}

impl<T> Bound<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Bound::Inclusive(v) | Bound::Exclusive(v) => Some(v),
            Bound::Unbounded => None,
        }
    }

    pub fn is_inclusive(&self) -> bool {
        matches!(self, Bound::Inclusive(_))
    }

    pub fn is_bounded(&self) -> bool {
        !matches!(self, Bound::Unbounded)
    }

    pub fn try_map<U, F>(self, f: F) -> MappingResult<Bound<U>>
    where
        F: FnOnce(T) -> MappingResult<U>,
    {
        Ok(match self {
            Bound::Inclusive(v) => Bound::Inclusive(f(v)?),
            Bound::Exclusive(v) => Bound::Exclusive(f(v)?),
            Bound::Unbounded => Bound::Unbounded,
        })
    }
}

/// A range of values with independently inclusive, exclusive or open ends.
///
/// Stored as `{"gte": lower, "lt": upper}` style documents by the range
/// property converter; unbounded ends are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range<T> {
    lower: Bound<T>,
    upper: Bound<T>,
}

impl<T> Range<T> {
    pub fn new(lower: Bound<T>, upper: Bound<T>) -> Self {
        Range { lower, upper }
    }

    /// `[lower, upper]`
    pub fn closed(lower: T, upper: T) -> Self {
        Range::new(Bound::Inclusive(lower), Bound::Inclusive(upper))
    }

    /// `(lower, upper)`
    pub fn open(lower: T, upper: T) -> Self {
        Range::new(Bound::Exclusive(lower), Bound::Exclusive(upper))
    }

    /// `[lower, upper)`
    pub fn right_open(lower: T, upper: T) -> Self {
        Range::new(Bound::Inclusive(lower), Bound::Exclusive(upper))
    }

    /// `(lower, upper]`
    pub fn left_open(lower: T, upper: T) -> Self {
        Range::new(Bound::Exclusive(lower), Bound::Inclusive(upper))
    }

    pub fn unbounded() -> Self {
        Range::new(Bound::Unbounded, Bound::Unbounded)
    }

    pub fn lower(&self) -> &Bound<T> {
        &self.lower
    }

    pub fn upper(&self) -> &Bound<T> {
        &self.upper
    }

    pub fn into_bounds(self) -> (Bound<T>, Bound<T>) {
        (self.lower, self.upper)
    }

    pub fn try_map<U, F>(self, mut f: F) -> MappingResult<Range<U>>
    where
        F: FnMut(T) -> MappingResult<U>,
    {
        Ok(Range {
            lower: self.lower.try_map(&mut f)?,
            upper: self.upper.try_map(&mut f)?,
        })
    }
}

impl<T: Display> Display for Range<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.lower {
            Bound::Inclusive(v) => write!(f, "[{}", v)?,
            Bound::Exclusive(v) => write!(f, "({}", v)?,
            Bound::Unbounded => write!(f, "(-∞")?,
        }
        write!(f, "..")?;
        match &self.upper {
            Bound::Inclusive(v) => write!(f, "{}]", v),
            Bound::Exclusive(v) => write!(f, "{})", v),
            Bound::Unbounded => write!(f, "+∞)"),
        }
    }
}
