//! Backward scanning: locate the start of the n-th line from the end of a
//! file by reading fixed-size chunks towards the beginning.

use std::io::{self, Read, Seek, SeekFrom};

use log::trace;
use memchr::memrchr_iter;

/// Where a backward scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOffset {
    pub offset: u64,
    /// Lines from `offset` through end of file.
    pub lines: u64,
}

/// Running state of a scan. `position` is the exclusive end of the region
/// still to be searched; everything at or after it has been counted.
struct BackwardScan {
    position: u64,
    count: u64,
    buffer: Vec<u8>,
}

impl BackwardScan {
    fn new(size: u64, chunk_size: usize) -> Self {
        // A newline in the last byte terminates the last line rather than
        // starting a new one, so the search region stops short of it.
        Self {
            position: size.saturating_sub(1),
            count: 0,
            buffer: vec![0; chunk_size],
        }
    }

    fn step<R: Read + Seek>(&mut self, reader: &mut R, target: u64) -> io::Result<Option<u64>> {
        let len = (self.buffer.len() as u64).min(self.position);
        let base = self.position - len;
        let chunk = &mut self.buffer[..len as usize];

        reader.seek(SeekFrom::Start(base))?;
        reader.read_exact(chunk)?;
        trace!("backward chunk {}..{}", base, self.position);

        for idx in memrchr_iter(b'\n', chunk) {
            self.count += 1;
            if self.count == target {
                return Ok(Some(base + idx as u64 + 1));
            }
        }

        self.position = base;
        Ok(None)
    }
}

/// Find the start of the line `lines` back from the end of the file
/// (1 = last line). Requests deeper than the file clamp to offset 0.
pub fn seek_back<R: Read + Seek>(
    reader: &mut R,
    size: u64,
    chunk_size: usize,
    lines: u64,
) -> io::Result<LineOffset> {
    if lines == 0 {
        return Ok(LineOffset {
            offset: size,
            lines: 0,
        });
    }

    let mut scan = BackwardScan::new(size, chunk_size);
    while scan.position > 0 {
        if let Some(offset) = scan.step(reader, lines)? {
            return Ok(LineOffset { offset, lines });
        }
    }

    // Ran out of file: the first line is the deepest one available.
    let total = if size == 0 { 0 } else { scan.count + 1 };
    Ok(LineOffset {
        offset: 0,
        lines: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scan_all_chunks(content: &[u8], lines: u64) -> LineOffset {
        let size = content.len() as u64;
        let mut reader = Cursor::new(content);
        let expected = seek_back(&mut reader, size, 1, lines).unwrap();
        for chunk_size in 2..=content.len() + 1 {
            assert_eq!(
                seek_back(&mut reader, size, chunk_size, lines).unwrap(),
                expected,
                "chunk size {} changed the result",
                chunk_size
            );
        }
        expected
    }

    fn at(offset: u64, lines: u64) -> LineOffset {
        LineOffset { offset, lines }
    }

    #[test]
    fn test_trailing_newline() {
        let content = b"a\nbb\nccc\n";
        assert_eq!(scan_all_chunks(content, 1), at(5, 1));
        assert_eq!(scan_all_chunks(content, 2), at(2, 2));
        assert_eq!(scan_all_chunks(content, 3), at(0, 3));
    }

    #[test]
    fn test_no_trailing_newline() {
        let content = b"a\nbb\nccc\nd";
        assert_eq!(scan_all_chunks(content, 1), at(9, 1));
        assert_eq!(scan_all_chunks(content, 2), at(5, 2));
        assert_eq!(scan_all_chunks(content, 4), at(0, 4));
    }

    #[test]
    fn test_deeper_than_file_clamps() {
        assert_eq!(scan_all_chunks(b"a\nbb\nccc\n", 10), at(0, 3));
        assert_eq!(scan_all_chunks(b"a\nbb\nccc\nd", 5), at(0, 4));
        assert_eq!(scan_all_chunks(b"x", 3), at(0, 1));
    }

    #[test]
    fn test_blank_lines() {
        let content = b"\n\n";
        assert_eq!(scan_all_chunks(content, 1), at(1, 1));
        assert_eq!(scan_all_chunks(content, 2), at(0, 2));
        assert_eq!(scan_all_chunks(content, 3), at(0, 2));
    }

    #[test]
    fn test_empty_file() {
        let mut reader = Cursor::new(Vec::new());
        assert_eq!(seek_back(&mut reader, 0, 4, 1).unwrap(), at(0, 0));
    }

    #[test]
    fn test_zero_lines_is_end_of_file() {
        let mut reader = Cursor::new(b"a\nb\n".to_vec());
        assert_eq!(seek_back(&mut reader, 4, 2, 0).unwrap(), at(4, 0));
    }

    #[test]
    fn test_line_longer_than_chunk() {
        let content = b"short\na very long line indeed\nend\n";
        let long_start = 6;
        assert_eq!(scan_all_chunks(content, 2), at(long_start, 2));
        assert_eq!(scan_all_chunks(content, 3), at(0, 3));
    }
}
