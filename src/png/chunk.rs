//! PNG chunk framing
//!
//! A PNG file is the 8-byte signature followed by a sequence of chunks,
//! each framed as [4-byte big-endian length][4-byte ASCII type][data]
//! [4-byte CRC]. The CRC is not checked here.

use log::warn;

/// The fixed 8-byte PNG signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Bytes of chunk framing that are not payload (length + type + CRC)
const CHUNK_OVERHEAD: usize = 12;

/// Returns true if the buffer starts with the PNG signature
pub fn has_signature(bytes: &[u8]) -> bool {
    bytes.len() >= PNG_SIGNATURE.len() && bytes[..PNG_SIGNATURE.len()] == PNG_SIGNATURE
}

/// A single chunk scanned out of a PNG buffer
///
/// Borrows its data slice from the underlying buffer; nothing is copied
/// until a text value is actually decoded.
#[derive(Debug, Clone, Copy)]
pub struct PngChunk<'a> {
    /// 4-byte chunk type code, e.g. `tEXt`
    pub chunk_type: [u8; 4],
    /// Chunk payload (between type and CRC)
    pub data: &'a [u8],
}

impl<'a> PngChunk<'a> {
    /// Returns true if this chunk has the given type code
    pub fn is_type(&self, code: &[u8; 4]) -> bool {
        &self.chunk_type == code
    }

    /// Chunk type as a lossy string, for logging
    pub fn type_name(&self) -> String {
        String::from_utf8_lossy(&self.chunk_type).into_owned()
    }
}

/// Lazy, finite, non-restartable iterator over PNG chunks
///
/// Starts scanning at offset 8 (after the signature). Malformed framing
/// terminates the iteration early rather than erroring: a declared
/// length that would run past the end of the buffer, or a next offset
/// that fails to advance, both end the scan. Iteration also stops after
/// yielding the `IEND` chunk.
pub struct ChunkIter<'a> {
    data: &'a [u8],
    offset: usize,
    done: bool,
}

impl<'a> ChunkIter<'a> {
    /// Creates a chunk iterator over a buffer that starts with the PNG signature
    ///
    /// Returns None if the signature is missing.
    pub fn new(data: &'a [u8]) -> Option<Self> {
        if !has_signature(data) {
            return None;
        }
        Some(ChunkIter {
            data,
            offset: PNG_SIGNATURE.len(),
            done: false,
        })
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = PngChunk<'a>;

    fn next(&mut self) -> Option<PngChunk<'a>> {
        if self.done {
            return None;
        }

        let remaining = self.data.len().checked_sub(self.offset)?;
        if remaining < CHUNK_OVERHEAD {
            self.done = true;
            return None;
        }

        let header = &self.data[self.offset..];
        let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let chunk_type = [header[4], header[5], header[6], header[7]];

        // A declared length running past the buffer means corrupt framing;
        // stop and let the caller keep whatever was accumulated so far.
        if length > remaining - CHUNK_OVERHEAD {
            warn!(
                "Chunk length {} exceeds remaining buffer {} at offset {}, stopping scan",
                length,
                remaining - CHUNK_OVERHEAD,
                self.offset
            );
            self.done = true;
            return None;
        }

        let data_start = self.offset + 8;
        let chunk = PngChunk {
            chunk_type,
            data: &self.data[data_start..data_start + length],
        };

        // The offset must strictly advance each iteration
        let next_offset = match self.offset.checked_add(length + CHUNK_OVERHEAD) {
            Some(n) if n > self.offset => n,
            _ => {
                warn!("Chunk offset failed to advance at {}, stopping scan", self.offset);
                self.done = true;
                return Some(chunk);
            }
        };
        self.offset = next_offset;

        if chunk.is_type(b"IEND") {
            self.done = true;
        }

        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a chunk with correct framing and a dummy CRC
    fn make_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(chunk_type);
        out.extend_from_slice(data);
        out.extend_from_slice(&[0u8; 4]); // CRC, unchecked
        out
    }

    fn make_png(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
        let mut out = PNG_SIGNATURE.to_vec();
        for (t, d) in chunks {
            out.extend_from_slice(&make_chunk(t, d));
        }
        out
    }

    #[test]
    fn iterates_chunks_in_order() {
        let png = make_png(&[(b"IHDR", &[0u8; 13]), (b"tEXt", b"k\0v"), (b"IEND", b"")]);
        let types: Vec<String> = ChunkIter::new(&png).unwrap().map(|c| c.type_name()).collect();
        assert_eq!(types, vec!["IHDR", "tEXt", "IEND"]);
    }

    #[test]
    fn stops_after_iend() {
        let png = make_png(&[(b"IEND", b""), (b"tEXt", b"k\0v")]);
        let count = ChunkIter::new(&png).unwrap().count();
        assert_eq!(count, 1);
    }

    #[test]
    fn oversized_length_terminates_scan() {
        let mut png = make_png(&[(b"IHDR", &[0u8; 13])]);
        // Chunk claiming far more data than the buffer holds
        png.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
        png.extend_from_slice(b"tEXt");
        png.extend_from_slice(b"trunc");
        let types: Vec<String> = ChunkIter::new(&png).unwrap().map(|c| c.type_name()).collect();
        assert_eq!(types, vec!["IHDR"]);
    }

    #[test]
    fn rejects_missing_signature() {
        assert!(ChunkIter::new(b"not a png at all").is_none());
    }

    #[test]
    fn signature_with_no_chunks_yields_nothing() {
        let count = ChunkIter::new(&PNG_SIGNATURE).unwrap().count();
        assert_eq!(count, 0);
    }
}
