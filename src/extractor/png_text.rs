//! PNG text-chunk extraction strategy

use crate::extractor::MetadataExtractor;
use crate::media::MediaBlob;
use crate::png;

/// Extracts prompt text from PNG `tEXt`/`iTXt`/`zTXt` chunks under the
/// well-known generation metadata keys
pub struct PngTextExtractor;

impl MetadataExtractor for PngTextExtractor {
    fn name(&self) -> &'static str {
        "png-text"
    }

    fn extract(&self, blob: &MediaBlob) -> Option<String> {
        png::extract_text_metadata(blob.bytes())
    }
}
