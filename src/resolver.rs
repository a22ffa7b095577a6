//! Turns a line slice into byte-level scan bounds for the forward emitter.
//!
//! Which bounds are needed depends on the signs of `start` and `end`:
//!
//! - both non-negative: scan from the top, skipping `start` lines
//! - `start >= 0, end < 0`: the line `end` from the bottom becomes a byte ceiling
//! - `start < 0, end >= 0`: the line `start` from the bottom becomes a byte floor
//! - `start < 0, end < 0` (or unbounded): scan begins at the line `start` from
//!   the bottom and `end` is rebased onto it

use std::io::{self, Read, Seek};

use log::debug;

use crate::backward::seek_back;
use crate::slice::{LineBound, LineSlice};

/// Byte and line bounds for one forward scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPlan {
    pub start_pos: u64,
    pub end_pos: Option<u64>,
    /// Lines starting below this offset are not yielded.
    pub min_pos: u64,
    // `skip` and `limit` count lines from `start_pos`.
    pub skip: u64,
    pub limit: Option<u64>,
}

impl ScanPlan {
    pub(crate) fn from_top() -> Self {
        Self {
            start_pos: 0,
            end_pos: None,
            min_pos: 0,
            skip: 0,
            limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Empty,
    Scan(ScanPlan),
}

pub fn resolve<R: Read + Seek>(
    slice: LineSlice,
    size: u64,
    chunk_size: usize,
    reader: &mut R,
) -> io::Result<Resolution> {
    if slice.is_empty_by_construction() {
        return Ok(Resolution::Empty);
    }

    let start = slice.start;
    let plan = match slice.end {
        LineBound::Bounded(end) if start >= 0 && end < 0 => {
            let ceiling = seek_back(reader, size, chunk_size, end.unsigned_abs())?;
            debug!("slice {}:{} ceiling at byte {}", start, end, ceiling.offset);
            if ceiling.offset == 0 {
                return Ok(Resolution::Empty);
            }
            ScanPlan {
                end_pos: Some(ceiling.offset),
                skip: start.unsigned_abs(),
                ..ScanPlan::from_top()
            }
        }
        LineBound::Bounded(end) if start < 0 && end > 0 => {
            let floor = seek_back(reader, size, chunk_size, start.unsigned_abs())?;
            debug!("slice {}:{} floor at byte {}", start, end, floor.offset);
            ScanPlan {
                min_pos: floor.offset,
                limit: Some(end.unsigned_abs()),
                ..ScanPlan::from_top()
            }
        }
        end if start < 0 => {
            let origin = seek_back(reader, size, chunk_size, start.unsigned_abs())?;
            // `origin.lines` lines remain from the origin to end of file, so a
            // negative end lands that many lines minus `|end|` past the origin.
            let limit = match end {
                LineBound::Bounded(end) => {
                    let remaining = origin.lines.checked_sub(end.unsigned_abs());
                    match remaining {
                        Some(limit) if limit > 0 => Some(limit),
                        _ => return Ok(Resolution::Empty),
                    }
                }
                LineBound::Unbounded => None,
            };
            debug!(
                "slice {}:{} origin at byte {} with {} lines left",
                start, end, origin.offset, origin.lines
            );
            ScanPlan {
                start_pos: origin.offset,
                limit,
                ..ScanPlan::from_top()
            }
        }
        end => {
            let limit = match end {
                LineBound::Bounded(end) => Some(end.unsigned_abs()),
                LineBound::Unbounded => None,
            };
            ScanPlan {
                skip: start.unsigned_abs(),
                limit,
                ..ScanPlan::from_top()
            }
        }
    };

    Ok(Resolution::Scan(plan))
}
