//! Text-chunk metadata extraction
//!
//! Pulls generation metadata out of PNG `tEXt`, `iTXt` and `zTXt`
//! chunks. Generation tools write their prompt or workflow under a
//! small set of well-known keys; everything else is ignored.

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::{debug, warn};

use crate::png::chunk::ChunkIter;
use crate::utils::string_utils;

/// Keys under which generation tools store prompt text.
///
/// Matching is case-insensitive across all three chunk variants; the
/// PNG spec treats keywords as case-sensitive, but writers disagree on
/// capitalization ("Comment" vs "comment") so a uniform policy wins.
const CANDIDATE_KEYS: [&str; 4] = ["parameters", "description", "comment", "prompt"];

/// A decoded key/value pair from a PNG text chunk
#[derive(Debug, Clone)]
pub struct TextEntry {
    /// Chunk keyword (before the first NUL)
    pub key: String,
    /// Decoded, decompressed text value
    pub value: String,
}

/// Extracts prompt metadata from PNG text chunks
///
/// Scans the chunk sequence for text chunks whose keyword matches one
/// of the candidate keys, decoding each (inflating compressed ones) and
/// joining the values with a blank-line separator. Returns None when no
/// matching chunk is present. Malformed framing or a corrupt compressed
/// entry never aborts the scan; whatever decoded cleanly is returned.
pub fn extract_text_metadata(data: &[u8]) -> Option<String> {
    let values: Vec<String> = list_text_entries(data)?
        .into_iter()
        .filter(|e| is_candidate_key(&e.key))
        .map(|e| e.value)
        .filter(|v| !string_utils::is_blank(v))
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join("\n\n"))
    }
}

/// Lists every decodable text entry in the PNG, candidate key or not
///
/// Used by the inspection report; the extraction path filters this down
/// to the candidate keys. Returns None if the buffer is not a PNG.
pub fn list_text_entries(data: &[u8]) -> Option<Vec<TextEntry>> {
    let iter = ChunkIter::new(data)?;
    let mut entries = Vec::new();

    for chunk in iter {
        let decoded = match &chunk.chunk_type {
            b"tEXt" => decode_text_chunk(chunk.data),
            b"iTXt" => decode_international_chunk(chunk.data),
            b"zTXt" => decode_compressed_chunk(chunk.data),
            _ => None,
        };

        if let Some(entry) = decoded {
            debug!("Decoded {} entry '{}' ({} chars)",
                   chunk.type_name(), entry.key, entry.value.len());
            entries.push(entry);
        }
    }

    Some(entries)
}

fn is_candidate_key(key: &str) -> bool {
    CANDIDATE_KEYS.iter().any(|c| key.eq_ignore_ascii_case(c))
}

/// Splits chunk data on the first NUL into (key, rest)
fn split_keyword(data: &[u8]) -> Option<(String, &[u8])> {
    let nul = data.iter().position(|&b| b == 0)?;
    let key = String::from_utf8_lossy(&data[..nul]).into_owned();
    Some((key, &data[nul + 1..]))
}

/// `tEXt`: keyword NUL text, Latin-1 per spec but decoded as lossy UTF-8
fn decode_text_chunk(data: &[u8]) -> Option<TextEntry> {
    let (key, rest) = split_keyword(data)?;
    Some(TextEntry {
        key,
        value: String::from_utf8_lossy(rest).into_owned(),
    })
}

/// `iTXt`: keyword NUL comp-flag comp-method language NUL translated NUL text
fn decode_international_chunk(data: &[u8]) -> Option<TextEntry> {
    let (key, rest) = split_keyword(data)?;
    if rest.len() < 2 {
        return None;
    }
    let compressed = rest[0] == 1;
    let after_flags = &rest[2..];

    // Skip the language tag and translated keyword, each NUL-terminated
    let mut nuls = 0;
    let mut text_start = after_flags.len();
    for (i, &b) in after_flags.iter().enumerate() {
        if b == 0 {
            nuls += 1;
            if nuls == 2 {
                text_start = i + 1;
                break;
            }
        }
    }
    let text = &after_flags[text_start..];

    let value = if compressed {
        match inflate(text) {
            Some(v) => v,
            None => {
                warn!("Corrupt compressed iTXt entry '{}', skipping", key);
                return None;
            }
        }
    } else {
        String::from_utf8_lossy(text).into_owned()
    };

    Some(TextEntry { key, value })
}

/// `zTXt`: keyword NUL comp-method zlib-stream
fn decode_compressed_chunk(data: &[u8]) -> Option<TextEntry> {
    let (key, rest) = split_keyword(data)?;
    if rest.is_empty() {
        return None;
    }
    // Compression method 0 (zlib/deflate) is the only defined value
    if rest[0] != 0 {
        warn!("Unknown zTXt compression method {} for '{}', skipping", rest[0], key);
        return None;
    }

    match inflate(&rest[1..]) {
        Some(value) => Some(TextEntry { key, value }),
        None => {
            warn!("Corrupt zTXt entry '{}', skipping", key);
            None
        }
    }
}

/// Inflates a zlib stream to lossy UTF-8 text; None on a corrupt stream
fn inflate(data: &[u8]) -> Option<String> {
    let mut decoder = ZlibDecoder::new(data);
    let mut decompressed = Vec::new();
    match decoder.read_to_end(&mut decompressed) {
        Ok(_) => Some(String::from_utf8_lossy(&decompressed).into_owned()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::png::chunk::PNG_SIGNATURE;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn make_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(chunk_type);
        out.extend_from_slice(data);
        out.extend_from_slice(&[0u8; 4]);
        out
    }

    fn make_png(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut out = PNG_SIGNATURE.to_vec();
        for (t, d) in chunks {
            out.extend_from_slice(&make_chunk(t, d));
        }
        out.extend_from_slice(&make_chunk(b"IEND", b""));
        out
    }

    fn deflate(text: &str) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn text_chunk_with_parameters_key() {
        let png = make_png(&[(b"tEXt", b"parameters\0a cat in the rain".to_vec())]);
        assert_eq!(extract_text_metadata(&png).unwrap(), "a cat in the rain");
    }

    #[test]
    fn key_match_is_case_insensitive() {
        let png = make_png(&[(b"tEXt", b"Comment\0sunset over mountains".to_vec())]);
        assert_eq!(extract_text_metadata(&png).unwrap(), "sunset over mountains");
    }

    #[test]
    fn non_candidate_keys_are_ignored() {
        let png = make_png(&[(b"tEXt", b"Software\0some editor".to_vec())]);
        assert_eq!(extract_text_metadata(&png), None);
    }

    #[test]
    fn multiple_values_join_with_blank_line() {
        let png = make_png(&[
            (b"tEXt", b"prompt\0first".to_vec()),
            (b"tEXt", b"comment\0second".to_vec()),
        ]);
        assert_eq!(extract_text_metadata(&png).unwrap(), "first\n\nsecond");
    }

    #[test]
    fn ztxt_chunk_is_inflated() {
        let mut data = b"parameters\0\0".to_vec();
        data.extend_from_slice(&deflate("compressed prompt text"));
        let png = make_png(&[(b"zTXt", data)]);
        assert_eq!(extract_text_metadata(&png).unwrap(), "compressed prompt text");
    }

    #[test]
    fn corrupt_ztxt_is_skipped_not_fatal() {
        let corrupt = b"parameters\0\0\xde\xad\xbe\xef".to_vec();
        let png = make_png(&[
            (b"zTXt", corrupt),
            (b"tEXt", b"comment\0still here".to_vec()),
        ]);
        assert_eq!(extract_text_metadata(&png).unwrap(), "still here");
    }

    #[test]
    fn itxt_uncompressed() {
        // keyword NUL flag method lang NUL translated NUL text
        let data = b"description\0\0\0en\0\0hello world from itxt".to_vec();
        let png = make_png(&[(b"iTXt", data)]);
        assert_eq!(extract_text_metadata(&png).unwrap(), "hello world from itxt");
    }

    #[test]
    fn itxt_compressed() {
        let mut data = b"prompt\0\x01\0\0\0".to_vec();
        data.extend_from_slice(&deflate("inflated itxt text"));
        let png = make_png(&[(b"iTXt", data)]);
        assert_eq!(extract_text_metadata(&png).unwrap(), "inflated itxt text");
    }

    #[test]
    fn not_a_png_returns_none() {
        assert_eq!(extract_text_metadata(b"\x00\x01\x02\x03 junk"), None);
    }

    #[test]
    fn inspection_lists_non_candidate_entries() {
        let png = make_png(&[
            (b"tEXt", b"Software\0editor".to_vec()),
            (b"tEXt", b"prompt\0a prompt".to_vec()),
        ]);
        let entries = list_text_entries(&png).unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["Software", "prompt"]);
    }
}
