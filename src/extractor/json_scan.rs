//! Embedded-JSON scanning strategy
//!
//! Generation tools sometimes bury their prompt or workflow JSON in
//! places no container parser reaches: EXIF comment payloads, MP4 udta
//! boxes, raw appended bytes. This strategy decodes the whole buffer as
//! lossy UTF-8 and regex-locates JSON fragments worth parsing.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde_json::Value;

use crate::extractor::MetadataExtractor;
use crate::graph;
use crate::media::MediaBlob;
use crate::utils::string_utils;

lazy_static! {
    /// `"prompt"` keyed by either a JSON string literal or an object
    static ref PROMPT_KEY_RE: Regex =
        Regex::new(r#""prompt"\s*:\s*("(?:\\.|[^"\\])*"|\{)"#).unwrap();

    /// `"workflow"` keyed by an object
    static ref WORKFLOW_KEY_RE: Regex = Regex::new(r#""workflow"\s*:\s*\{"#).unwrap();

    /// Last resort: a CLIPTextEncode region with a positive title and a
    /// nearby text/string field, all within a bounded character window
    static ref CLIP_FALLBACK_RE: Regex = Regex::new(
        r#"(?is)CLIPTextEncode.{0,800}?"title"\s*:\s*"[^"]*positive[^"]*".{0,400}?"(?:text|string)"\s*:\s*"((?:\\.|[^"\\])*)""#
    ).unwrap();
}

/// Scans the raw byte buffer for embedded prompt/workflow JSON
pub struct JsonScanExtractor;

impl MetadataExtractor for JsonScanExtractor {
    fn name(&self) -> &'static str {
        "json-scan"
    }

    fn extract(&self, blob: &MediaBlob) -> Option<String> {
        scan(blob.bytes())
    }
}

/// Applies the three scan strategies in order, first success wins
pub fn scan(data: &[u8]) -> Option<String> {
    if data.is_empty() {
        return None;
    }
    let text = String::from_utf8_lossy(data);

    prompt_strategy(&text)
        .or_else(|| workflow_strategy(&text))
        .or_else(|| clip_fallback_strategy(&text))
}

/// Strategy 1: a `"prompt"` key carrying either prose, an escaped
/// serialized prompt map, or an inline object
fn prompt_strategy(text: &str) -> Option<String> {
    for caps in PROMPT_KEY_RE.captures_iter(text) {
        let matched = match caps.get(1) {
            Some(matched) => matched,
            None => continue,
        };

        if matched.as_str().starts_with('"') {
            // A quoted value decodes once as a JSON string; if the
            // decoded text is itself a JSON object it is a serialized
            // prompt map, otherwise it is the prompt text directly.
            let decoded = match serde_json::from_str::<String>(matched.as_str()) {
                Ok(decoded) => decoded,
                Err(_) => continue,
            };

            if let Ok(value) = serde_json::from_str::<Value>(&decoded) {
                if value.is_object() {
                    debug!("prompt key carried a serialized prompt map");
                    if let Some(resolved) = resolve_non_blank(&value) {
                        return Some(resolved);
                    }
                    continue;
                }
            }

            if !string_utils::is_blank(&decoded) && !graph::is_label_like(&decoded) {
                return Some(decoded);
            }
        } else if let Some(object_text) = balanced_object(text, matched.start()) {
            debug!("prompt key carried an inline object ({} chars)", object_text.len());
            if let Ok(value) = serde_json::from_str::<Value>(object_text) {
                if let Some(resolved) = resolve_non_blank(&value) {
                    return Some(resolved);
                }
            }
        }
    }
    None
}

/// Strategy 2: a `"workflow"` key carrying a node-graph object
fn workflow_strategy(text: &str) -> Option<String> {
    for matched in WORKFLOW_KEY_RE.find_iter(text) {
        // The match ends on the opening brace
        let brace = matched.end() - 1;
        if let Some(object_text) = balanced_object(text, brace) {
            debug!("workflow object located ({} chars)", object_text.len());
            if let Ok(value) = serde_json::from_str::<Value>(object_text) {
                if let Some(resolved) = resolve_non_blank(&value) {
                    return Some(resolved);
                }
            }
        }
    }
    None
}

/// Strategy 3: pull the raw text field out of a positively-titled
/// CLIPTextEncode region without parsing any JSON
fn clip_fallback_strategy(text: &str) -> Option<String> {
    for caps in CLIP_FALLBACK_RE.captures_iter(text) {
        let raw = match caps.get(1) {
            Some(matched) => matched.as_str(),
            None => continue,
        };
        // The capture is string-literal content; decode its escapes when valid
        let candidate = serde_json::from_str::<String>(&format!("\"{}\"", raw))
            .unwrap_or_else(|_| raw.to_string());

        if !string_utils::is_blank(&candidate) && !graph::is_label_like(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn resolve_non_blank(value: &Value) -> Option<String> {
    graph::resolve(value).filter(|s| !string_utils::is_blank(s))
}

/// Captures a balanced brace-delimited span starting at `start`
///
/// Walks the bytes tracking brace depth, string state and escapes.
/// Returns None when the braces never balance before the buffer ends.
fn balanced_object(text: &str, start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_prompt_string_in_binary_noise() {
        let mut data = vec![0xde, 0xad, 0xbe, 0xef];
        data.extend_from_slice(br#"{"prompt": "A cat"}"#);
        data.extend_from_slice(&[0xff, 0xfe]);
        assert_eq!(scan(&data).unwrap(), "A cat");
    }

    #[test]
    fn escaped_prompt_map_is_decoded_and_resolved() {
        // The prompt value is a serialized JSON object, escaped inside a string
        let inner = r#"{"6":{"class_type":"CLIPTextEncode","_meta":{"title":"Positive"},"inputs":{"text":"city at night in the rain"}}}"#;
        let outer = format!(r#"{{"prompt": {}}}"#, serde_json::to_string(inner).unwrap());
        assert_eq!(scan(outer.as_bytes()).unwrap(), "city at night in the rain");
    }

    #[test]
    fn inline_prompt_object_is_resolved() {
        let data = br#"junk before {"prompt": {"6": {"class_type": "CLIPTextEncode", "inputs": {"text": "a forest clearing at noon"}}}} junk after"#;
        assert_eq!(scan(data).unwrap(), "a forest clearing at noon");
    }

    #[test]
    fn workflow_object_is_resolved() {
        let data = br#"x"workflow":{"nodes":[{"id":"1","type":"CLIPTextEncode","_meta":{"title":"Positive"},"inputs":{"text":"a dog running"}}]}x"#;
        assert_eq!(scan(data).unwrap(), "a dog running");
    }

    #[test]
    fn nested_braces_are_balanced() {
        let data = br#""workflow":{"nodes":[{"id":"1","type":"CLIPTextEncode","title":"Positive","inputs":{"text":"layers {of} braces in a string"}}],"extra":{"a":{"b":1}}}"#;
        assert_eq!(scan(data).unwrap(), "layers {of} braces in a string");
    }

    #[test]
    fn clip_fallback_without_valid_json() {
        // Deliberately unparseable as JSON, the fallback regex still finds it
        let data = br#"...CLIPTextEncode... "title": "Positive Prompt" ... "text": "island with palm trees", garbage"#;
        assert_eq!(scan(data).unwrap(), "island with palm trees");
    }

    #[test]
    fn label_like_prompt_is_rejected() {
        let data = br#"{"prompt": "TxtEmbed_v2"}"#;
        assert_eq!(scan(data), None);
    }

    #[test]
    fn no_match_returns_none() {
        assert_eq!(scan(b"completely unrelated bytes"), None);
        assert_eq!(scan(b""), None);
    }

    #[test]
    fn unbalanced_object_is_skipped() {
        let data = br#""workflow":{"nodes":[{"id":"1","type":"CLIPTextEncode""#;
        assert_eq!(scan(data), None);
    }
}
