//! Media buffer types and format classification
//!
//! This module defines the caller-owned byte buffer the engine works on
//! and the sniffer that classifies it before extraction.

mod blob;
mod sniffer;

pub use blob::MediaBlob;
pub use sniffer::{sniff, MediaFormat};
