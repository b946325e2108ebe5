//! Custom error types for metadata extraction

use std::fmt;
use std::io;

/// Extraction-specific error types
#[derive(Debug)]
pub enum ExtractError {
    /// I/O error
    IoError(io::Error),
    /// Invalid EXIF/TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Tag not found
    TagNotFound(u16),
    /// No EXIF structure present in the buffer
    ExifNotFound,
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::IoError(e) => write!(f, "I/O error: {}", e),
            ExtractError::InvalidHeader => write!(f, "Invalid EXIF header"),
            ExtractError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            ExtractError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            ExtractError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            ExtractError::ExifNotFound => write!(f, "No EXIF structure found"),
            ExtractError::GenericError(msg) => write!(f, "Extraction error: {}", msg),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<io::Error> for ExtractError {
    fn from(error: io::Error) -> Self {
        ExtractError::IoError(error)
    }
}

impl From<String> for ExtractError {
    fn from(msg: String) -> Self {
        ExtractError::GenericError(msg)
    }
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;
