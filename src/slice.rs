use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Upper bound of a line slice. `Unbounded` reads through end of file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBound {
    Bounded(i64),
    #[default]
    Unbounded,
}

impl From<i64> for LineBound {
    fn from(index: i64) -> Self {
        LineBound::Bounded(index)
    }
}

impl From<Option<i64>> for LineBound {
    fn from(index: Option<i64>) -> Self {
        index.map_or(LineBound::Unbounded, LineBound::Bounded)
    }
}

impl FromStr for LineBound {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        match input.to_lowercase().as_str() {
            "" | "none" | "end" => Ok(LineBound::Unbounded),
            _ => input
                .parse()
                .map(LineBound::Bounded)
                .map_err(|_| format!("invalid line index: {}", input)),
        }
    }
}

impl fmt::Display for LineBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineBound::Bounded(index) => write!(f, "{}", index),
            LineBound::Unbounded => write!(f, "none"),
        }
    }
}

/// A `[start:end]` selection over the lines of a file. Negative indices count
/// back from one past the last line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSlice {
    pub start: i64,
    pub end: LineBound,
}

impl LineSlice {
    pub fn new(start: i64, end: LineBound) -> Self {
        Self { start, end }
    }

    /// True when the slice selects nothing regardless of the file's length.
    pub fn is_empty_by_construction(&self) -> bool {
        match self.end {
            LineBound::Bounded(0) => true,
            LineBound::Bounded(end) => self.start >= 0 && end >= 0 && self.start >= end,
            LineBound::Unbounded => false,
        }
    }

    /// Clamp the slice onto a sequence of `len` lines.
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let start = clamp_index(self.start, len);
        let end = match self.end {
            LineBound::Bounded(end) => clamp_index(end, len),
            LineBound::Unbounded => len,
        };
        if start >= end {
            return start..start;
        }
        start..end
    }
}

fn clamp_index(index: i64, len: usize) -> usize {
    if index < 0 {
        let back = usize::try_from(index.unsigned_abs()).unwrap_or(usize::MAX);
        len.saturating_sub(back)
    } else {
        usize::try_from(index).unwrap_or(usize::MAX).min(len)
    }
}
