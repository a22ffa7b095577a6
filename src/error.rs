use std::fmt;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum SliceError {
    Io(io::Error),
    Utf8(std::string::FromUtf8Error),
    FileNotFound { path: String },
    PermissionDenied { path: String },
    InvalidChunkSize(usize),
}

impl SliceError {
    /// Attach the path to open failures the caller is likely to act on.
    pub fn from_open(err: io::Error, path: &Path) -> Self {
        let path = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => SliceError::FileNotFound { path },
            io::ErrorKind::PermissionDenied => SliceError::PermissionDenied { path },
            _ => SliceError::Io(err),
        }
    }
}

impl std::error::Error for SliceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SliceError::Io(e) => Some(e),
            SliceError::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for SliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceError::Io(e) => write!(f, "I/O error: {}", e),
            SliceError::Utf8(e) => write!(f, "UTF-8 error: {}", e),
            SliceError::FileNotFound { path } => write!(f, "File not found: {}", path),
            SliceError::PermissionDenied { path } => write!(f, "Permission denied: {}", path),
            SliceError::InvalidChunkSize(size) => {
                write!(f, "Invalid chunk size {}: must be at least 1", size)
            }
        }
    }
}

impl From<io::Error> for SliceError {
    fn from(err: io::Error) -> Self {
        SliceError::Io(err)
    }
}

impl From<std::string::FromUtf8Error> for SliceError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        SliceError::Utf8(err)
    }
}

pub type Result<T> = std::result::Result<T, SliceError>;
