//! EXIF metadata parsing
//!
//! This module implements an in-memory EXIF reader: it locates the
//! TIFF structure (bare, or wrapped in a JPEG APP1 segment), walks the
//! IFD chain with byte-order strategy handlers and decodes the text
//! tags that generation tools repurpose for prompt storage.

pub mod constants;
pub mod ifd;
pub mod reader;

pub use ifd::{IFDEntry, IFD};
pub use reader::{Exif, ExifReader};
