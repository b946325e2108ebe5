pub mod api;
pub mod commands;
pub mod errors;
pub mod exif;
pub mod extractor;
pub mod graph;
pub mod io;
pub mod media;
pub mod png;
pub mod utils;

pub use crate::api::PromptKit;

pub use errors::{ExtractError, ExtractResult};
pub use extractor::{ExtractionPipeline, MetadataExtractor};
pub use media::{sniff, MediaBlob, MediaFormat};
