//! Main interface to the promptkit library

use std::fs;

use log::info;

use crate::errors::ExtractResult;
use crate::exif::Exif;
use crate::extractor::ExtractionPipeline;
use crate::media::{sniff, MediaBlob, MediaFormat};
use crate::png;
use crate::utils::logger::Logger;

/// Main interface to the promptkit library
pub struct PromptKit {
    #[allow(dead_code)]
    logger: Logger,
}

impl PromptKit {
    /// Create a new PromptKit instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "promptkit.log"
    ///
    /// # Returns
    /// A PromptKit instance or an error if initialization fails
    pub fn new(log_file: Option<&str>) -> ExtractResult<Self> {
        let log_path = log_file.unwrap_or("promptkit.log");
        let logger = Logger::new(log_path)?;
        Ok(PromptKit { logger })
    }

    /// Extract generation metadata from a media file on disk
    ///
    /// # Arguments
    /// * `input_path` - Path to the media file
    ///
    /// # Returns
    /// The recovered prompt text, None when the file carries no
    /// recognizable generation metadata, or an error for I/O failures
    pub fn extract_from_file(&self, input_path: &str) -> ExtractResult<Option<String>> {
        info!("Extracting generation metadata from {}", input_path);
        let bytes = fs::read(input_path)?;
        Ok(self.extract_from_bytes(&bytes, None, Some(input_path)))
    }

    /// Extract generation metadata from an in-memory buffer
    ///
    /// # Arguments
    /// * `bytes` - The fully-loaded media file
    /// * `mime_type` - Optional declared MIME type hint
    /// * `filename` - Optional filename hint
    ///
    /// # Returns
    /// The recovered prompt text, or None
    pub fn extract_from_bytes(
        &self,
        bytes: &[u8],
        mime_type: Option<&str>,
        filename: Option<&str>,
    ) -> Option<String> {
        let blob = MediaBlob::with_hints(bytes, mime_type, filename);
        ExtractionPipeline::new().extract(&blob)
    }

    /// Inspect a media file and report its metadata carriers
    ///
    /// Lists the sniffed container format, every PNG text chunk key,
    /// the EXIF text tags present, and the final extraction result.
    ///
    /// # Arguments
    /// * `input_path` - Path to the media file
    ///
    /// # Returns
    /// A human-readable report or an error for I/O failures
    pub fn inspect(&self, input_path: &str) -> ExtractResult<String> {
        info!("Inspecting {}", input_path);
        let bytes = fs::read(input_path)?;
        let blob = MediaBlob::with_hints(&bytes, None, Some(input_path));

        let format = sniff(&blob);
        let mut result = String::from("Media Inspection Results:\n");
        result.push_str(&format!("  File: {}\n", input_path));
        result.push_str(&format!("  Size: {} bytes\n", bytes.len()));
        result.push_str(&format!("  Format: {}\n", format.name()));

        if format == MediaFormat::Png {
            match png::list_text_entries(&bytes) {
                Some(entries) if !entries.is_empty() => {
                    result.push_str(&format!("  PNG text chunks: {}\n", entries.len()));
                    for entry in &entries {
                        result.push_str(&format!("    '{}': {} chars\n", entry.key, entry.value.len()));
                    }
                }
                _ => result.push_str("  PNG text chunks: none\n"),
            }
        }

        if let Ok(exif) = Exif::parse(&bytes) {
            result.push_str(&format!("  EXIF: {} IFDs, {}\n", exif.ifds.len(), exif.byte_order.name()));
            if let Some(comment) = exif.user_comment() {
                result.push_str(&format!("    UserComment: {} chars\n", comment.len()));
            }
            if let Some(description) = exif.image_description() {
                result.push_str(&format!("    ImageDescription: {} chars\n", description.len()));
            }
        }

        match ExtractionPipeline::new().extract(&blob) {
            Some(text) => result.push_str(&format!("  Extracted metadata:\n{}\n", text)),
            None => result.push_str("  Extracted metadata: none\n"),
        }

        Ok(result)
    }
}
