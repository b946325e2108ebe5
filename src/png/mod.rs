//! PNG container parsing
//!
//! This module implements the lazy PNG chunk reader and the text-chunk
//! extraction used to recover generation metadata from `tEXt`, `iTXt`
//! and `zTXt` chunks.

mod chunk;
mod text;

pub use chunk::{has_signature, ChunkIter, PngChunk, PNG_SIGNATURE};
pub use text::{extract_text_metadata, list_text_entries, TextEntry};
