//! EXIF reader implementation
//!
//! This module implements the in-memory EXIF reader. The reader locates
//! the TIFF structure inside the buffer, detects its byte order via the
//! Strategy pattern, walks the IFD chain (following the Exif sub-IFD
//! pointer) and decodes the free-form text tags.

use std::io::{Cursor, Read, Seek, SeekFrom};

use log::{debug, warn};

use crate::errors::{ExtractError, ExtractResult};
use crate::exif::constants::{field_types, header, jpeg, tags, user_comment};
use crate::exif::ifd::{IFDEntry, IFD};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::utils::string_utils;

/// Upper bound on chained IFDs, guards against corrupt next-IFD offsets
const MAX_IFDS: usize = 8;

/// Parsed EXIF structure with its decoded text tags
pub struct Exif {
    /// All IFDs read from the structure, sub-IFDs included
    pub ifds: Vec<IFD>,
    /// Byte order of the TIFF structure
    pub byte_order: ByteOrder,
    user_comment: Option<String>,
    image_description: Option<String>,
}

impl Exif {
    /// Parses an EXIF structure out of a media buffer
    ///
    /// Accepts a bare TIFF/EXIF buffer or a JPEG whose APP1 segment
    /// carries the `Exif\0\0` payload. Fails with an error when no
    /// structure can be located or its header is invalid; callers on
    /// the extraction path convert that to "no result".
    pub fn parse(data: &[u8]) -> ExtractResult<Exif> {
        let base = locate_tiff(data).ok_or(ExtractError::ExifNotFound)?;
        debug!("TIFF structure located at offset {}", base);

        let mut reader = ExifReader::new();
        reader.read(&data[base..])
    }

    /// The UserComment tag, when present and non-blank
    pub fn user_comment(&self) -> Option<&str> {
        self.user_comment.as_deref()
    }

    /// The ImageDescription tag, when present and non-blank
    pub fn image_description(&self) -> Option<&str> {
        self.image_description.as_deref()
    }

    /// The best text value: UserComment, else ImageDescription
    pub fn text_value(&self) -> Option<&str> {
        self.user_comment().or_else(|| self.image_description())
    }
}

/// Locates the TIFF header inside a media buffer
///
/// Returns the offset where the byte-order marker starts: 0 for a bare
/// TIFF/EXIF file, or inside an APP1 segment for a JPEG. None when the
/// buffer carries neither.
pub fn locate_tiff(data: &[u8]) -> Option<usize> {
    if data.len() < 8 {
        return None;
    }
    if data[..2] == header::LITTLE_ENDIAN_MARKER || data[..2] == header::BIG_ENDIAN_MARKER {
        return Some(0);
    }
    if data[..2] == jpeg::SOI {
        return locate_tiff_in_jpeg(data);
    }
    None
}

/// Walks JPEG marker segments looking for the EXIF APP1 payload
fn locate_tiff_in_jpeg(data: &[u8]) -> Option<usize> {
    let mut pos = 2;

    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        if marker == jpeg::SOS {
            // Entropy-coded data starts here, no more metadata segments
            return None;
        }

        let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if length < 2 {
            return None;
        }
        let payload_start = pos + 4;
        let payload_end = pos + 2 + length;
        if payload_end > data.len() {
            return None;
        }

        if marker == jpeg::APP1
            && data[payload_start..payload_end].starts_with(&jpeg::EXIF_IDENTIFIER)
        {
            return Some(payload_start + jpeg::EXIF_IDENTIFIER.len());
        }

        pos = payload_end;
    }

    None
}

/// Reader for EXIF/TIFF structures held in memory
pub struct ExifReader {
    /// Current byte order handler
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
}

impl ExifReader {
    /// Creates a new EXIF reader
    pub fn new() -> Self {
        ExifReader {
            byte_order_handler: None,
        }
    }

    /// Returns the byte order handler, with proper error handling for None case
    fn handler(&self) -> ExtractResult<&dyn ByteOrderHandler> {
        self.byte_order_handler
            .as_deref()
            .ok_or_else(|| ExtractError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Reads an EXIF structure from a buffer starting at its TIFF header
    ///
    /// 1. Detect byte order (II/MM)
    /// 2. Validate the TIFF version (42)
    /// 3. Read the IFD chain and the Exif sub-IFD
    /// 4. Decode the text tags of interest
    pub fn read(&mut self, data: &[u8]) -> ExtractResult<Exif> {
        let mut cursor = Cursor::new(data);

        let byte_order = ByteOrder::detect(&mut cursor)?;
        debug!("Detected byte order: {}", byte_order.name());
        self.byte_order_handler = Some(byte_order.create_handler());

        let handler = self.handler()?;
        let version = handler.read_u16(&mut cursor)?;
        if version != header::TIFF_VERSION {
            return Err(ExtractError::UnsupportedVersion(version));
        }

        let first_ifd_offset = handler.read_u32(&mut cursor)? as u64;
        validate_ifd_offset(first_ifd_offset, data.len() as u64)?;

        let mut ifds = self.read_ifd_chain(&mut cursor, first_ifd_offset, data.len() as u64)?;

        // Follow the Exif sub-IFD pointer out of any primary IFD
        let sub_offsets: Vec<u64> = ifds
            .iter()
            .filter_map(|ifd| ifd.get_tag_value(tags::EXIF_IFD_POINTER))
            .collect();
        for sub_offset in sub_offsets {
            if validate_ifd_offset(sub_offset, data.len() as u64).is_err() {
                warn!("Invalid Exif sub-IFD offset {}, skipping", sub_offset);
                continue;
            }
            match self.read_ifd(&mut cursor, sub_offset, ifds.len()) {
                Ok(ifd) => ifds.push(ifd),
                Err(e) => warn!("Error reading Exif sub-IFD: {}", e),
            }
        }

        debug!("Read {} IFDs from EXIF structure", ifds.len());

        let user_comment = self.decode_text_tag(&mut cursor, &ifds, tags::USER_COMMENT)?;
        let image_description = self.decode_text_tag(&mut cursor, &ifds, tags::IMAGE_DESCRIPTION)?;

        Ok(Exif {
            ifds,
            byte_order,
            user_comment,
            image_description,
        })
    }

    /// Reads a chain of IFDs starting from the given offset
    fn read_ifd_chain(
        &self,
        reader: &mut dyn SeekableReader,
        first_ifd_offset: u64,
        buffer_size: u64,
    ) -> ExtractResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut ifd_offset = first_ifd_offset;
        let mut ifd_number = 0;
        let handler = self.handler()?;

        while ifd_offset != 0 && ifd_number < MAX_IFDS {
            if ifd_offset >= buffer_size {
                warn!("IFD offset {} exceeds buffer size {}, stopping chain", ifd_offset, buffer_size);
                break;
            }

            match self.read_ifd(reader, ifd_offset, ifd_number) {
                Ok(ifd) => {
                    // The next-IFD offset follows the entry table directly
                    let next_ifd_offset = match handler.read_u32(reader) {
                        Ok(offset) => offset as u64,
                        Err(e) => {
                            warn!("Error reading next IFD offset: {}", e);
                            ifds.push(ifd);
                            break;
                        }
                    };

                    if next_ifd_offset != 0
                        && (next_ifd_offset >= buffer_size || next_ifd_offset < 8)
                    {
                        warn!("Invalid next IFD offset: {}, stopping chain", next_ifd_offset);
                        ifds.push(ifd);
                        break;
                    }

                    ifds.push(ifd);
                    ifd_offset = next_ifd_offset;
                    ifd_number += 1;
                }
                Err(e) => {
                    warn!("Error reading IFD {}: {}", ifd_number, e);
                    break;
                }
            }
        }

        Ok(ifds)
    }

    /// Reads a single IFD at the given offset
    fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> ExtractResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;

        let handler = self.handler()?;
        let entry_count = handler.read_u16(reader)?;
        debug!("IFD #{} at offset {}: {} entries", number, offset, entry_count);

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader)?;
            ifd.add_entry(entry);
        }

        Ok(ifd)
    }

    /// Reads a single IFD entry at the current position
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> ExtractResult<IFDEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = handler.read_u32(reader)? as u64;

        // Inline values live in the raw bytes of this 4-byte field, so
        // remember where it starts before decoding it as an offset.
        let value_field_offset = reader.stream_position()?;
        let value_offset = handler.read_u32(reader)? as u64;

        Ok(IFDEntry::new(tag, field_type, count, value_offset, value_field_offset))
    }

    /// Reads the raw value bytes for an entry, inline or at its offset
    fn read_entry_bytes(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> ExtractResult<Vec<u8>> {
        let size = entry.value_size();
        if size == 0 {
            return Ok(Vec::new());
        }

        let position = if entry.is_value_inline() {
            entry.value_field_offset
        } else {
            entry.value_offset
        };
        reader.seek(SeekFrom::Start(position))?;

        let mut buffer = vec![0u8; size];
        reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Decodes a text tag from whichever IFD carries it
    ///
    /// Returns None when the tag is absent or decodes to a blank string.
    fn decode_text_tag(
        &self,
        reader: &mut dyn SeekableReader,
        ifds: &[IFD],
        tag: u16,
    ) -> ExtractResult<Option<String>> {
        for ifd in ifds {
            let entry = match ifd.get_entry(tag) {
                Some(entry) => entry,
                None => continue,
            };

            let bytes = match self.read_entry_bytes(reader, entry) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Error reading value for tag {}: {}", tag, e);
                    continue;
                }
            };

            let text = match (tag, entry.field_type) {
                (tags::USER_COMMENT, field_types::UNDEFINED) => self.decode_user_comment(&bytes)?,
                _ => decode_ascii(&bytes),
            };

            if !string_utils::is_blank(&text) {
                return Ok(Some(text.trim().to_string()));
            }
        }

        Ok(None)
    }

    /// Decodes a UserComment payload, honouring its character-code prefix
    fn decode_user_comment(&self, bytes: &[u8]) -> ExtractResult<String> {
        if bytes.len() < 8 {
            return Ok(decode_ascii(bytes));
        }

        let (prefix, rest) = bytes.split_at(8);

        let text = if prefix == user_comment::ASCII
            || prefix == user_comment::JIS
            || prefix == user_comment::UNDEFINED
        {
            decode_ascii(rest)
        } else if prefix == user_comment::UNICODE {
            let handler = self.handler()?;
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| handler.u16_from_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        } else {
            // Unknown prefix: treat the whole payload as text
            decode_ascii(bytes)
        };

        Ok(text)
    }
}

impl Default for ExifReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes raw tag bytes as text, dropping trailing NUL padding
fn decode_ascii(bytes: &[u8]) -> String {
    let mut buffer = bytes.to_vec();
    string_utils::trim_trailing_nulls(&mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Validates an IFD offset against the buffer bounds
fn validate_ifd_offset(offset: u64, buffer_size: u64) -> ExtractResult<()> {
    if offset >= buffer_size || offset < 8 {
        return Err(ExtractError::GenericError(format!(
            "Invalid IFD offset: {} (buffer size: {})",
            offset, buffer_size
        )));
    }
    Ok(())
}
