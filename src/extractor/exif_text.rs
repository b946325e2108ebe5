//! EXIF text-tag extraction strategy

use crate::exif::Exif;
use crate::extractor::MetadataExtractor;
use crate::media::MediaBlob;

/// Extracts the UserComment or ImageDescription tag from an
/// EXIF-bearing container
///
/// Any parse failure means "no result"; it never propagates to the
/// pipeline as an error.
pub struct ExifTextExtractor;

impl MetadataExtractor for ExifTextExtractor {
    fn name(&self) -> &'static str {
        "exif-text"
    }

    fn extract(&self, blob: &MediaBlob) -> Option<String> {
        let exif = Exif::parse(blob.bytes()).ok()?;
        exif.text_value().map(str::to_string)
    }
}
