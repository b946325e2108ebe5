//! Extraction strategy trait and pipeline
//!
//! The pipeline is the engine's single entry point: sniff the buffer,
//! run the extractors in fixed priority order, return the first
//! non-blank result. "Nothing found" is a normal outcome, never an
//! error.

use log::{debug, info};

use crate::extractor::{ExifTextExtractor, JsonScanExtractor, PngTextExtractor};
use crate::media::{sniff, MediaBlob, MediaFormat};
use crate::utils::string_utils;

/// Strategy interface for metadata extractors
///
/// An extractor inspects the blob and either produces a text result or
/// nothing. Extractors never fail: malformed input is simply "nothing".
pub trait MetadataExtractor {
    /// Name of this extractor, for logging
    fn name(&self) -> &'static str;

    /// Attempts to extract generation metadata from the blob
    fn extract(&self, blob: &MediaBlob) -> Option<String>;
}

/// Runs the extractors in fixed priority order
pub struct ExtractionPipeline;

impl ExtractionPipeline {
    /// Creates a new pipeline
    pub fn new() -> Self {
        ExtractionPipeline
    }

    /// Extracts the best-guess generation metadata string from a blob
    ///
    /// Order: EXIF text tags, PNG text chunks (only for a sniffed PNG),
    /// then the embedded-JSON scan over the raw bytes. The first
    /// non-blank result wins.
    pub fn extract(&self, blob: &MediaBlob) -> Option<String> {
        let format = sniff(blob);
        info!(
            "Extracting from {} byte blob (format: {}, declared type: {}, file: {})",
            blob.len(),
            format.name(),
            blob.mime_type().unwrap_or("unknown"),
            blob.filename().unwrap_or("<memory>")
        );

        let exif = ExifTextExtractor;
        let png = PngTextExtractor;
        let json = JsonScanExtractor;

        let extractors: Vec<&dyn MetadataExtractor> = if format == MediaFormat::Png {
            vec![&exif, &png, &json]
        } else {
            vec![&exif, &json]
        };

        for extractor in extractors {
            debug!("Trying extractor: {}", extractor.name());
            if let Some(result) = extractor.extract(blob) {
                if !string_utils::is_blank(&result) {
                    info!("Extractor {} produced {} chars", extractor.name(), result.len());
                    return Some(result);
                }
            }
        }

        debug!("No extractor produced a result");
        None
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new()
    }
}
