//! Read an arbitrary `[start:end]` range of lines from a text file, with
//! negative indices counted from the end, using bounded chunk reads instead
//! of loading the whole file.

pub mod backward;
pub mod error;
pub mod file_loader;
pub mod forward;
pub mod reader;
pub mod resolver;
pub mod slice;

pub use error::{Result, SliceError};
pub use forward::ChunkedLines;
pub use reader::{read_lines, ReadLines, DEFAULT_CHUNK_SIZE};
pub use slice::{LineBound, LineSlice};
