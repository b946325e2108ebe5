//! Integration tests for the extraction pipeline

extern crate std;

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;

// Import crate items
use promptkit::extractor::ExtractionPipeline;
use promptkit::media::{sniff, MediaBlob, MediaFormat};

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Builds a PNG chunk with correct framing and a dummy CRC
fn make_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    out.extend_from_slice(&[0u8; 4]);
    out
}

/// Builds a minimal PNG holding the given chunks, terminated by IEND
fn make_png(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut out = PNG_SIGNATURE.to_vec();
    for (chunk_type, data) in chunks {
        out.extend_from_slice(&make_chunk(chunk_type, data));
    }
    out.extend_from_slice(&make_chunk(b"IEND", b""));
    out
}

/// Builds a little-endian EXIF buffer with an ImageDescription tag
fn make_exif(description: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_u16::<LittleEndian>(0x4949).unwrap(); // II
    buf.write_u16::<LittleEndian>(42).unwrap();     // TIFF magic number
    buf.write_u32::<LittleEndian>(8).unwrap();      // Offset to first IFD

    // IFD with one entry: ImageDescription (tag 270, ASCII)
    buf.write_u16::<LittleEndian>(1).unwrap();
    buf.write_u16::<LittleEndian>(270).unwrap();
    buf.write_u16::<LittleEndian>(2).unwrap();
    buf.write_u32::<LittleEndian>(description.len() as u32 + 1).unwrap();
    buf.write_u32::<LittleEndian>(26).unwrap(); // value offset past this IFD
    buf.write_u32::<LittleEndian>(0).unwrap();  // no more IFDs

    buf.extend_from_slice(description.as_bytes());
    buf.push(0);
    buf
}

fn extract(bytes: &[u8]) -> Option<String> {
    ExtractionPipeline::new().extract(&MediaBlob::new(bytes))
}

#[test]
fn test_png_text_chunk_roundtrip() {
    let png = make_png(&[(b"tEXt", b"parameters\0a watercolor of a fox".to_vec())]);
    std::assert_eq!(extract(&png).unwrap(), "a watercolor of a fox");
}

#[test]
fn test_png_comment_key_case_insensitive() {
    let png = make_png(&[(b"tEXt", b"Comment\0sunset over mountains".to_vec())]);
    std::assert_eq!(extract(&png).unwrap(), "sunset over mountains");
}

#[test]
fn test_png_ztxt_chunk() {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b"masterpiece, detailed sky").unwrap();
    let compressed = encoder.finish().unwrap();

    let mut data = b"parameters\0\0".to_vec();
    data.extend_from_slice(&compressed);
    let png = make_png(&[(b"zTXt", data)]);
    std::assert_eq!(extract(&png).unwrap(), "masterpiece, detailed sky");
}

#[test]
fn test_png_multiple_chunks_join_in_order() {
    let png = make_png(&[
        (b"tEXt", b"prompt\0first value".to_vec()),
        (b"tEXt", b"description\0second value".to_vec()),
    ]);
    std::assert_eq!(extract(&png).unwrap(), "first value\n\nsecond value");
}

#[test]
fn test_corrupt_ztxt_recovers() {
    let png = make_png(&[(b"zTXt", b"parameters\0\0\x01\x02\x03garbage".to_vec())]);
    std::assert_eq!(extract(&png), None);
}

#[test]
fn test_exif_image_description() {
    let exif = make_exif("an oil painting of a ship");
    std::assert_eq!(extract(&exif).unwrap(), "an oil painting of a ship");
}

#[test]
fn test_embedded_prompt_json_in_binary() {
    let mut data = vec![0x00, 0x01, 0x02, 0x03];
    data.extend_from_slice(br#"{"prompt": "A cat"}"#);
    data.extend_from_slice(&[0xfe, 0xff]);
    std::assert_eq!(extract(&data).unwrap(), "A cat");
}

#[test]
fn test_workflow_graph_positive_over_negative() {
    let data = br#""workflow":{"nodes":[
        {"id":"1","type":"CLIPTextEncode","_meta":{"title":"Positive prompt"},"inputs":{"text":"a dog running"}},
        {"id":"2","type":"CLIPTextEncode","_meta":{"title":"Negative prompt"},"inputs":{"text":"blurry"}}
    ]}"#;
    std::assert_eq!(extract(data).unwrap(), "a dog running");
}

#[test]
fn test_png_prompt_chunk_returned_verbatim() {
    // A "prompt" text chunk is a candidate key, so the chunk reader
    // returns its value as-is before the JSON scanner ever runs
    let json = br#"{"6":{"class_type":"CLIPTextEncode","_meta":{"title":"Positive"},"inputs":{"text":"neon city skyline"}}}"#;
    let mut data = b"prompt\0".to_vec();
    data.extend_from_slice(json);
    let png = make_png(&[(b"tEXt", data)]);
    std::assert_eq!(extract(&png).unwrap(), String::from_utf8_lossy(json));
}

#[test]
fn test_extraction_is_idempotent() {
    let png = make_png(&[(b"tEXt", b"parameters\0the same answer".to_vec())]);
    std::assert_eq!(extract(&png), extract(&png));
}

#[test]
fn test_empty_buffer() {
    std::assert_eq!(extract(b""), None);
}

#[test]
fn test_signature_only_png() {
    std::assert_eq!(extract(&PNG_SIGNATURE), None);
}

#[test]
fn test_random_bytes() {
    std::assert_eq!(extract(&[0x13, 0x37, 0xab, 0xcd, 0x42, 0x00, 0x99, 0x11]), None);
}

#[test]
fn test_sniffer_classifications() {
    let png = make_png(&[]);
    std::assert_eq!(sniff(&MediaBlob::new(&png)), MediaFormat::Png);

    let exif = make_exif("x y");
    std::assert_eq!(sniff(&MediaBlob::new(&exif)), MediaFormat::ExifContainer);

    std::assert_eq!(
        sniff(&MediaBlob::new(&[0x13, 0x37, 0xab, 0xcd, 0x42, 0x00, 0x99, 0x11])),
        MediaFormat::Generic
    );
}
