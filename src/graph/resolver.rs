//! Prompt resolution over workflow graphs
//!
//! Two resolution modes: a priority pass over a `nodes` array (with
//! recursive link following), and a scored heuristic traversal used as
//! the fallback and for flat prompt maps that carry no `nodes` array.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde_json::{Map, Value};

use crate::graph::node::{link_target, WorkflowNode};
use crate::utils::string_utils;

/// Link-following recursion bound, guards against cyclic graphs
const MAX_LINK_DEPTH: usize = 4;

/// Input keys checked first, in priority order, before falling back to
/// the longest string value
const PRIORITY_INPUT_KEYS: [&str; 8] = [
    "populated_text",
    "wildcard_text",
    "prompt",
    "positive_prompt",
    "result",
    "text",
    "string",
    "value",
];

/// Node types whose text is trusted enough to resolve through links
const WILDCARD_NODE_TYPES: [&str; 3] = [
    "impactwildcardprocessor",
    "wanvideotextencodesingle",
    "wanvideotextencode",
];

lazy_static! {
    static ref LABEL_PREFIX_RE: Regex = Regex::new(r"(?i)^(TxtEmb|TextEmb)").unwrap();
    static ref EXCLUDED_NAME_RE: Regex =
        Regex::new(r"PointMosaic|Mosaic|Mask|TxtEmb|TextEmb").unwrap();
    static ref UTILITY_TYPE_RE: Regex =
        Regex::new(r"ShowText|Display|Note|Preview|VHS_|Image|Resize|Seed|INTConstant|SimpleMath|Any Switch")
            .unwrap();
}

/// Resolves the best candidate prompt string out of a parsed JSON value
///
/// A value with a `nodes` array gets the graph priority rules; anything
/// else goes straight to the heuristic scan.
pub fn resolve(value: &Value) -> Option<String> {
    match value.get("nodes").and_then(Value::as_array) {
        Some(nodes) => resolve_graph(nodes),
        None => heuristic_best(std::iter::once(value)),
    }
}

/// Returns true for strings that read as parameter names rather than
/// natural-language prompt text
///
/// A trimmed string is label-like when it starts with a text-embedding
/// prefix, or when it contains no whitespace and is shorter than 24
/// characters. Such strings may be traversed past during resolution but
/// are never returned as the final answer.
pub fn is_label_like(s: &str) -> bool {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return false;
    }
    LABEL_PREFIX_RE.is_match(trimmed)
        || (!trimmed.contains(char::is_whitespace) && trimmed.chars().count() < 24)
}

/// Priority pass over a workflow's `nodes` array
fn resolve_graph(nodes: &[Value]) -> Option<String> {
    let mut index: HashMap<String, &Value> = HashMap::new();
    for value in nodes {
        if let Some(id) = WorkflowNode::new(value).and_then(|n| n.id()) {
            index.insert(id, value);
        }
    }

    // (a) wildcard / video text-encode nodes, with full link resolution
    for node in nodes.iter().filter_map(WorkflowNode::new) {
        let node_type = node.node_type().to_lowercase();
        if WILDCARD_NODE_TYPES.iter().any(|t| node_type.contains(t)) {
            if let Some(text) = resolve_node(node, &index, 0) {
                debug!("Resolved prompt from wildcard node type '{}'", node.node_type());
                return Some(text);
            }
        }
    }

    // (b) positively-titled CLIP text encoders
    for node in nodes.iter().filter_map(WorkflowNode::new) {
        if node.node_type().contains("CLIPTextEncode") && title_is_positive(node.title()) {
            if let Some(text) = extract_direct(&node) {
                debug!("Resolved prompt from CLIPTextEncode '{}'", node.title());
                return Some(text);
            }
        }
    }

    // (c) any other positively-titled node, minus known non-prompt titles
    for node in nodes.iter().filter_map(WorkflowNode::new) {
        let title = node.title();
        if title_is_positive(title) && !EXCLUDED_NAME_RE.is_match(title) {
            if let Some(text) = extract_direct(&node) {
                debug!("Resolved prompt from positively-titled node '{}'", title);
                return Some(text);
            }
        }
    }

    // (d) nothing matched the priority rules, fall back to scoring
    heuristic_best(nodes.iter())
}

fn title_is_positive(title: &str) -> bool {
    let lower = title.to_lowercase();
    lower.contains("positive") && !lower.contains("negative")
}

/// Extracts a node's own text without following links
fn extract_direct(node: &WorkflowNode) -> Option<String> {
    let text = node
        .inputs()
        .and_then(best_str_from_inputs)
        .or_else(|| node.first_widget_str().map(str::to_string))?;

    if string_utils::is_blank(&text) || is_label_like(&text) {
        None
    } else {
        Some(text)
    }
}

/// Resolves a node's text, following input links when the node itself
/// carries nothing usable
fn resolve_node(node: WorkflowNode, index: &HashMap<String, &Value>, depth: usize) -> Option<String> {
    if depth > MAX_LINK_DEPTH {
        return None;
    }

    if let Some(inputs) = node.inputs() {
        if let Some(text) = best_str_from_inputs(inputs) {
            if !is_label_like(&text) {
                return Some(text);
            }
        }

        // Inputs of the form [linkedNodeId, outputSlot] reference other
        // nodes; chase them in input-iteration order
        for value in inputs.values() {
            if let Some(target) = link_target(value) {
                let linked = index.get(&target).copied().and_then(WorkflowNode::new);
                if let Some(text) = linked.and_then(|n| resolve_node(n, index, depth + 1)) {
                    return Some(text);
                }
            }
        }
    }

    if let Some(widgets) = node.widgets_values() {
        for value in widgets {
            if let Some(s) = value.as_str() {
                if !string_utils::is_blank(s) && !is_label_like(s) {
                    return Some(s.to_string());
                }
            }
        }
    }

    None
}

/// Picks the best string out of a node's inputs
///
/// Priority keys first; otherwise the longest non-blank string value,
/// first seen winning ties.
fn best_str_from_inputs(inputs: &Map<String, Value>) -> Option<String> {
    for key in PRIORITY_INPUT_KEYS {
        if let Some(s) = inputs.get(key).and_then(Value::as_str) {
            if !string_utils::is_blank(s) {
                return Some(s.to_string());
            }
        }
    }

    let mut best: Option<&str> = None;
    for value in inputs.values() {
        if let Some(s) = value.as_str() {
            if !string_utils::is_blank(s) && best.map_or(true, |b| s.len() > b.len()) {
                best = Some(s);
            }
        }
    }
    best.map(str::to_string)
}

/// Scored heuristic scan over one or more JSON roots
///
/// Iterative depth-first traversal with an explicit stack. Every object
/// resembling a node contributes a candidate; the highest score wins
/// and ties keep the first candidate found.
fn heuristic_best<'a>(roots: impl Iterator<Item = &'a Value>) -> Option<String> {
    let mut best: Option<(i64, String)> = None;
    let mut stack: Vec<&Value> = Vec::new();

    // Reverse-push so the stack pops in natural reading order
    let roots: Vec<&Value> = roots.collect();
    for root in roots.into_iter().rev() {
        stack.push(root);
    }

    while let Some(value) = stack.pop() {
        match value {
            Value::Object(map) => {
                if WorkflowNode::looks_like_node(value) {
                    if let Some(node) = WorkflowNode::new(value) {
                        if let Some(candidate) = extract_direct(&node) {
                            let score = score_candidate(&node, &candidate);
                            debug!("Heuristic candidate from '{}' scored {}", node.node_type(), score);
                            let replace = match &best {
                                Some((best_score, _)) => score > *best_score,
                                None => true,
                            };
                            if replace {
                                best = Some((score, candidate));
                            }
                        }
                    }
                }
                for child in map.values().rev() {
                    stack.push(child);
                }
            }
            Value::Array(array) => {
                for child in array.iter().rev() {
                    stack.push(child);
                }
            }
            _ => {}
        }
    }

    best.map(|(_, text)| text.trim().to_string())
}

/// Scores a non-blank, non-label-like candidate string for a node
fn score_candidate(node: &WorkflowNode, text: &str) -> i64 {
    let title = node.title();
    let node_type = node.node_type();
    let title_lower = title.to_lowercase();

    let mut score = 0i64;
    if title_lower.contains("positive") {
        score += 1000;
    }
    if title_lower.contains("negative") {
        score -= 1000;
    }
    if node_type.contains("TextEncode") || node_type.contains("CLIPText") {
        score += 120;
    }
    if node_type.contains("ImpactWildcardProcessor") || node_type.contains("WanVideoTextEncodeSingle") {
        score += 300;
    }
    score += (text.chars().count() as i64 / 8).min(220);
    if EXCLUDED_NAME_RE.is_match(title) || EXCLUDED_NAME_RE.is_match(node_type) {
        score -= 900;
    }
    if is_utility_type(node_type) {
        score -= 400;
    }
    score
}

/// Display / plumbing node types whose text is rarely the prompt
fn is_utility_type(node_type: &str) -> bool {
    // StringConstantMultiline is the one StringConstant variant that
    // legitimately holds prompt text (the regex crate has no lookahead,
    // so the exception lives here)
    UTILITY_TYPE_RE.is_match(node_type)
        || (node_type.contains("StringConstant") && !node_type.contains("StringConstantMultiline"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn positive_clip_node_wins_over_negative() {
        let workflow = json!({
            "nodes": [
                {"id": "1", "type": "CLIPTextEncode", "title": "Negative prompt",
                 "inputs": {"text": "blurry"}},
                {"id": "2", "type": "CLIPTextEncode", "title": "Positive prompt",
                 "inputs": {"text": "a dog running"}},
            ]
        });
        assert_eq!(resolve(&workflow).unwrap(), "a dog running");
    }

    #[test]
    fn meta_title_is_recognized() {
        let workflow = json!({
            "nodes": [
                {"id": "1", "type": "CLIPTextEncode", "_meta": {"title": "Positive"},
                 "inputs": {"text": "a dog running"}}
            ]
        });
        assert_eq!(resolve(&workflow).unwrap(), "a dog running");
    }

    #[test]
    fn wildcard_node_takes_priority() {
        let workflow = json!({
            "nodes": [
                {"id": "1", "type": "CLIPTextEncode", "title": "Positive",
                 "inputs": {"text": "clip encoded text here"}},
                {"id": "2", "type": "ImpactWildcardProcessor",
                 "inputs": {"populated_text": "the wildcard resolved prompt"}},
            ]
        });
        assert_eq!(resolve(&workflow).unwrap(), "the wildcard resolved prompt");
    }

    #[test]
    fn links_are_followed_to_the_source_node() {
        let workflow = json!({
            "nodes": [
                {"id": "7", "type": "WanVideoTextEncode",
                 "inputs": {"positive_prompt": ["3", 0]}},
                {"id": "3", "type": "StringConstantMultiline",
                 "inputs": {"string": "a long prompt carried by a constant node"}},
            ]
        });
        assert_eq!(
            resolve(&workflow).unwrap(),
            "a long prompt carried by a constant node"
        );
    }

    #[test]
    fn cyclic_links_terminate() {
        let workflow = json!({
            "nodes": [
                {"id": "1", "type": "WanVideoTextEncode", "inputs": {"positive_prompt": ["2", 0]}},
                {"id": "2", "type": "WanVideoTextEncode", "inputs": {"positive_prompt": ["1", 0]}},
            ]
        });
        assert_eq!(resolve(&workflow), None);
    }

    #[test]
    fn label_like_strings_are_never_final_answers() {
        let workflow = json!({
            "nodes": [
                {"id": "1", "type": "CLIPTextEncode", "title": "Positive",
                 "inputs": {"text": "TxtEmbed_v2"}}
            ]
        });
        assert_eq!(resolve(&workflow), None);
    }

    #[test]
    fn label_like_is_traversed_past_to_widgets() {
        let workflow = json!({
            "nodes": [
                {"id": "1", "type": "ImpactWildcardProcessor",
                 "inputs": {"wildcard_text": "short_id"},
                 "widgets_values": ["a castle on a hill at sunset"]},
            ]
        });
        assert_eq!(resolve(&workflow).unwrap(), "a castle on a hill at sunset");
    }

    #[test]
    fn flat_prompt_map_uses_heuristic_scan() {
        let prompt_map = json!({
            "3": {"class_type": "KSampler", "inputs": {"seed": 5}},
            "6": {"class_type": "CLIPTextEncode", "_meta": {"title": "Positive Prompt"},
                  "inputs": {"text": "a cute cat wearing a hat"}},
            "7": {"class_type": "CLIPTextEncode", "_meta": {"title": "Negative Prompt"},
                  "inputs": {"text": "ugly and deformed image"}},
        });
        assert_eq!(resolve(&prompt_map).unwrap(), "a cute cat wearing a hat");
    }

    #[test]
    fn mosaic_titled_nodes_are_excluded() {
        let workflow = json!({
            "nodes": [
                {"id": "1", "type": "GroupNode", "title": "Positive PointMosaic",
                 "inputs": {"text": "mask region description text"}},
                {"id": "2", "type": "CLIPTextEncode", "title": "untitled",
                 "inputs": {"text": "the actual scene description"}},
            ]
        });
        assert_eq!(resolve(&workflow).unwrap(), "the actual scene description");
    }

    #[test]
    fn utility_nodes_lose_to_encode_nodes() {
        let prompt_map = json!({
            "1": {"class_type": "ShowText", "inputs": {"text": "some displayed message text"}},
            "2": {"class_type": "CLIPTextEncode", "inputs": {"text": "a painting of the sea"}},
        });
        assert_eq!(resolve(&prompt_map).unwrap(), "a painting of the sea");
    }

    #[test]
    fn priority_keys_beat_longer_strings() {
        let prompt_map = json!({
            "1": {"class_type": "CLIPTextEncode",
                  "inputs": {"text": "the chosen prompt",
                             "extra": "this other string value happens to be much longer"}},
        });
        assert_eq!(resolve(&prompt_map).unwrap(), "the chosen prompt");
    }

    #[test]
    fn label_like_predicate() {
        assert!(is_label_like("TxtEmbed_v2"));
        assert!(is_label_like("textemb something longer than limit"));
        assert!(is_label_like("short_identifier"));
        assert!(!is_label_like("a cat"));
        assert!(!is_label_like("averyveryverylongidentifierwithoutspaces"));
        assert!(!is_label_like(""));
    }
}
