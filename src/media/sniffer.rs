//! Container format sniffing
//!
//! Classifies a byte buffer by its leading signature. Absence of a
//! signature yields a weaker classification, never an error.

use log::debug;

use crate::exif;
use crate::media::MediaBlob;
use crate::png;

/// Result of sniffing a media buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    /// Buffer starts with the 8-byte PNG signature
    Png,
    /// An EXIF/TIFF structure could be opened over the buffer
    ExifContainer,
    /// Anything else
    Generic,
}

impl MediaFormat {
    /// Returns a string representation of this format
    pub fn name(&self) -> &'static str {
        match self {
            MediaFormat::Png => "PNG",
            MediaFormat::ExifContainer => "EXIF container",
            MediaFormat::Generic => "generic binary",
        }
    }
}

/// Classifies a media buffer as PNG, EXIF-bearing or generic binary
pub fn sniff(blob: &MediaBlob) -> MediaFormat {
    let bytes = blob.bytes();

    let format = if png::has_signature(bytes) {
        MediaFormat::Png
    } else if exif::Exif::parse(bytes).is_ok() {
        MediaFormat::ExifContainer
    } else {
        MediaFormat::Generic
    };

    debug!("Sniffed {} bytes as {}", bytes.len(), format.name());
    format
}
