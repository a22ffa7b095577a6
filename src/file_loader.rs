use memmap2::Mmap;
use memchr::memchr_iter;
use std::fs::File;
use std::io;
use std::ops::Range;

use crate::error::Result;

/// A whole file mapped into memory with an index of line starts. Only used
/// for files small enough that chunked scanning is not worth its overhead.
pub struct MappedFile {
    mmap: Mmap,
    line_offsets: Vec<usize>,
}

impl MappedFile {
    /// Map an already opened, non-empty file.
    pub fn map(file: &File) -> io::Result<Self> {
        // SAFETY: the file is treated as read-only for the life of the map.
        let mmap = unsafe { Mmap::map(file)? };

        let mut loader = Self {
            mmap,
            line_offsets: Vec::new(),
        };

        loader.build_line_index();
        Ok(loader)
    }

    fn build_line_index(&mut self) {
        let data = &self.mmap[..];
        if data.is_empty() {
            return;
        }

        self.line_offsets.push(0);
        for i in memchr_iter(b'\n', data) {
            let next_line_start = i + 1;
            if next_line_start < data.len() {
                self.line_offsets.push(next_line_start);
            }
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }

    /// Raw bytes of a line without its terminating newline.
    pub fn get_line(&self, line_num: usize) -> Option<&[u8]> {
        let start = *self.line_offsets.get(line_num)?;
        let end = self
            .line_offsets
            .get(line_num + 1)
            .copied()
            .unwrap_or(self.mmap.len());

        let line_bytes = &self.mmap[start..end];
        Some(line_bytes.strip_suffix(b"\n").unwrap_or(line_bytes))
    }
}

/// Iterator over a range of lines of a [`MappedFile`].
pub struct MappedLines {
    file: MappedFile,
    range: Range<usize>,
}

impl MappedLines {
    pub fn new(file: MappedFile, range: Range<usize>) -> Self {
        Self { file, range }
    }
}

impl Iterator for MappedLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let line_num = self.range.next()?;
        let bytes = self.file.get_line(line_num)?;
        Some(String::from_utf8(bytes.to_vec()).map_err(Into::into))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}
