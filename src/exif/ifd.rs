//! Image File Directory (IFD) structures and methods
//!
//! This module implements the TIFF IFD structures that carry EXIF
//! metadata. IFDs are collections of tag entries; each entry describes
//! one piece of metadata via a tag, a field type, a count and either an
//! inline value or an offset to the value data.

use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::exif::constants::{field_types, tags};

/// Represents an Image File Directory in an EXIF structure
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based; sub-IFDs continue the numbering)
    pub number: usize,
    /// Offset of this IFD relative to the TIFF header
    pub offset: u64,
    /// Cached tag values for quick lookup
    tag_map: HashMap<u16, IFDEntry>,
}

/// Represents an entry in an Image File Directory
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Value or offset to values
    pub value_offset: u64,
    /// Offset of this entry's raw 4-byte value field, for inline values
    pub value_field_offset: u64,
}

impl IFDEntry {
    /// Creates a new IFD entry
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64, value_field_offset: u64) -> Self {
        trace!("IFD entry: tag={} ({}), type={}, count={}, offset/value={}",
               tag, tag_name(tag), field_type, count, value_offset);

        Self {
            tag,
            field_type,
            count,
            value_offset,
            value_field_offset,
        }
    }

    /// Size in bytes of a single value of this entry's field type
    pub fn field_type_size(&self) -> usize {
        match self.field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
            field_types::SHORT | field_types::SSHORT => 2,
            field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
            field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
            _ => 1,
        }
    }

    /// Total size of this entry's value data in bytes
    pub fn value_size(&self) -> usize {
        self.field_type_size() * self.count as usize
    }

    /// Determines if the value is stored inline in the 4-byte value field
    /// rather than at the offset location
    pub fn is_value_inline(&self) -> bool {
        self.value_size() <= 4
    }
}

impl IFD {
    /// Creates a new empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        Self {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry to this IFD, updating the lookup cache
    pub fn add_entry(&mut self, entry: IFDEntry) {
        self.tag_map.insert(entry.tag, entry.clone());
        self.entries.push(entry);
    }

    /// Gets a tag's value/offset field directly
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.tag_map.get(&tag).map(|entry| entry.value_offset)
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag)
    }

    /// Number of entries in this IFD
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;
        for entry in &self.entries {
            writeln!(f, "    {} ({}): count={}, value/offset={}",
                     entry.tag, tag_name(entry.tag), entry.count, entry.value_offset)?;
        }
        Ok(())
    }
}

/// Human-readable name for the tags this crate cares about
pub fn tag_name(tag: u16) -> &'static str {
    match tag {
        tags::IMAGE_DESCRIPTION => "ImageDescription",
        tags::EXIF_IFD_POINTER => "ExifIFDPointer",
        tags::USER_COMMENT => "UserComment",
        _ => "Unknown",
    }
}
