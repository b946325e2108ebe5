//! Metadata extraction strategies
//!
//! Each carrier of generation metadata (EXIF text tags, PNG text
//! chunks, loose JSON embedded in the byte stream) gets its own
//! strategy; the pipeline runs them in fixed priority order and takes
//! the first non-blank result.

mod exif_text;
mod json_scan;
mod png_text;
mod strategy;

pub use exif_text::ExifTextExtractor;
pub use json_scan::JsonScanExtractor;
pub use png_text::PngTextExtractor;
pub use strategy::{ExtractionPipeline, MetadataExtractor};
