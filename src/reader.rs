use std::fs::File;
use std::path::Path;

use log::debug;

use crate::error::{Result, SliceError};
use crate::file_loader::{MappedFile, MappedLines};
use crate::forward::ChunkedLines;
use crate::slice::{LineBound, LineSlice};

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Lines selected by [`read_lines`].
pub enum ReadLines {
    Empty,
    Mapped(MappedLines),
    Chunked(ChunkedLines<File>),
}

impl Iterator for ReadLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ReadLines::Empty => None,
            ReadLines::Mapped(lines) => lines.next(),
            ReadLines::Chunked(lines) => lines.next(),
        }
    }
}

/// Read lines `start..end` of the file at `path` as if the whole file had been
/// split into a list of lines and sliced, without holding more than a couple
/// of chunks in memory. Negative indices count back from the last line.
///
/// The file is opened and the slice resolved before returning; read errors
/// after that point come out of the iterator.
pub fn read_lines<P: AsRef<Path>>(
    path: P,
    start: i64,
    end: impl Into<LineBound>,
    chunk_size: usize,
) -> Result<ReadLines> {
    if chunk_size == 0 {
        return Err(SliceError::InvalidChunkSize(chunk_size));
    }

    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SliceError::from_open(e, path))?;
    let size = file.metadata()?.len();
    let slice = LineSlice::new(start, end.into());

    if size == 0 {
        return Ok(ReadLines::Empty);
    }

    if size <= (chunk_size as u64).saturating_mul(2) {
        debug!("{}: {} bytes, reading in one piece", path.display(), size);
        let mapped = MappedFile::map(&file)?;
        let range = slice.resolve(mapped.line_count());
        return Ok(ReadLines::Mapped(MappedLines::new(mapped, range)));
    }

    debug!(
        "{}: {} bytes, scanning in {} byte chunks",
        path.display(),
        size,
        chunk_size
    );
    Ok(ReadLines::Chunked(ChunkedLines::new(
        file, size, slice, chunk_size,
    )?))
}
