use std::io::{self, Read, Seek, SeekFrom};

use log::{debug, trace};
use memchr::memchr;

use crate::error::{Result, SliceError};
use crate::resolver::{resolve, Resolution, ScanPlan};
use crate::slice::LineSlice;

/// Lazily yields the lines of a slice by reading forward in bounded chunks.
///
/// Holds the reader for as long as it lives; dropping the iterator early
/// releases it. An I/O error ends iteration, a line that fails to decode
/// does not.
pub struct ChunkedLines<R> {
    reader: R,
    chunk_size: usize,
    plan: ScanPlan,
    // `pending[0]` sits at file offset `pending_base`.
    pending: Vec<u8>,
    pending_base: u64,
    cursor: usize,
    // `pending[cursor..searched]` holds no newline.
    searched: usize,
    read_pos: u64,
    line_start: u64,
    line_index: u64,
    finished: bool,
}

impl<R: Read + Seek> ChunkedLines<R> {
    /// Resolve `slice` against a source of `size` bytes and position the
    /// reader for the forward scan.
    pub fn new(mut reader: R, size: u64, slice: LineSlice, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(SliceError::InvalidChunkSize(chunk_size));
        }

        let (plan, finished) = match resolve(slice, size, chunk_size, &mut reader)? {
            Resolution::Scan(plan) => (plan, false),
            Resolution::Empty => {
                debug!("slice {}:{} selects nothing", slice.start, slice.end);
                (
                    ScanPlan {
                        end_pos: Some(0),
                        limit: Some(0),
                        ..ScanPlan::from_top()
                    },
                    true,
                )
            }
        };

        reader.seek(SeekFrom::Start(plan.start_pos))?;

        Ok(Self {
            reader,
            chunk_size,
            plan,
            pending: Vec::with_capacity(chunk_size),
            pending_base: plan.start_pos,
            cursor: 0,
            searched: 0,
            read_pos: plan.start_pos,
            line_start: plan.start_pos,
            line_index: 0,
            finished,
        })
    }

    fn suppressed(&self, index: u64, offset: u64) -> bool {
        index < self.plan.skip || offset < self.plan.min_pos
    }

    fn limit_reached(&self) -> bool {
        self.plan
            .limit
            .is_some_and(|limit| self.line_index >= limit)
    }

    /// Append up to one chunk to `pending`, stopping at the byte ceiling.
    fn fill(&mut self) -> io::Result<usize> {
        let want = match self.plan.end_pos {
            Some(end_pos) => (self.chunk_size as u64).min(end_pos.saturating_sub(self.read_pos)),
            None => self.chunk_size as u64,
        };
        if want == 0 {
            return Ok(0);
        }

        let read = (&mut self.reader).take(want).read_to_end(&mut self.pending)?;
        trace!("forward chunk {}..{}", self.read_pos, self.read_pos + read as u64);
        self.read_pos += read as u64;
        Ok(read)
    }

    /// Drop consumed bytes. The partial line is dropped as well when it will
    /// never be yielded, so long skipped lines do not accumulate.
    fn compact(&mut self, keep_partial: bool) {
        if keep_partial {
            self.pending.drain(..self.cursor);
            self.pending_base += self.cursor as u64;
        } else {
            self.pending_base += self.pending.len() as u64;
            self.pending.clear();
        }
        self.cursor = 0;
    }
}

fn decode(bytes: &[u8]) -> Result<String> {
    Ok(String::from_utf8(bytes.to_vec())?)
}

impl<R: Read + Seek> Iterator for ChunkedLines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished || self.limit_reached() {
                self.finished = true;
                return None;
            }

            let from = self.searched.max(self.cursor);
            if let Some(found) = memchr(b'\n', &self.pending[from..]) {
                let line = self.cursor..from + found;
                let index = self.line_index;
                let offset = self.line_start;

                self.cursor = line.end + 1;
                self.line_index += 1;
                self.line_start = self.pending_base + self.cursor as u64;

                if self.suppressed(index, offset) {
                    continue;
                }
                return Some(decode(&self.pending[line]));
            }

            let keep_partial = !self.suppressed(self.line_index, self.line_start);
            self.compact(keep_partial);
            self.searched = self.pending.len();

            match self.fill() {
                Ok(0) => {
                    // No more input: whatever is left is a final line with
                    // no terminating newline.
                    self.finished = true;
                    if !keep_partial || self.pending.is_empty() {
                        return None;
                    }
                    self.line_index += 1;
                    return Some(decode(&self.pending));
                }
                Ok(_) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
