//! Workflow node view over a JSON object

use serde_json::{Map, Value};

/// A lightweight view over a JSON object that describes one node of a
/// generation workflow
///
/// Nothing is copied; accessors normalize the shape differences between
/// the "workflow" format (`type`, `title`, `widgets_values`) and the
/// "prompt map" format (`class_type`, `_meta.title`, `inputs`).
#[derive(Debug, Clone, Copy)]
pub struct WorkflowNode<'a> {
    value: &'a Value,
}

impl<'a> WorkflowNode<'a> {
    /// Wraps a JSON value; returns None unless it is an object
    pub fn new(value: &'a Value) -> Option<Self> {
        if value.is_object() {
            Some(WorkflowNode { value })
        } else {
            None
        }
    }

    /// Returns true if the object carries enough node-shaped fields to
    /// be worth scoring: a type plus inputs or widget values
    pub fn looks_like_node(value: &Value) -> bool {
        match value.as_object() {
            Some(map) => {
                (map.contains_key("type") || map.contains_key("class_type"))
                    && (map.contains_key("inputs") || map.contains_key("widgets_values"))
            }
            None => false,
        }
    }

    /// Node id, normalized to a string (ids appear as numbers or strings)
    pub fn id(&self) -> Option<String> {
        match self.value.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Node type from `type` or `class_type`, empty when absent
    pub fn node_type(&self) -> &'a str {
        self.value
            .get("type")
            .or_else(|| self.value.get("class_type"))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// Node title from `title` or `_meta.title`, empty when absent
    pub fn title(&self) -> &'a str {
        self.value
            .get("title")
            .and_then(Value::as_str)
            .or_else(|| {
                self.value
                    .get("_meta")
                    .and_then(|meta| meta.get("title"))
                    .and_then(Value::as_str)
            })
            .unwrap_or("")
    }

    /// The node's inputs mapping, when present
    pub fn inputs(&self) -> Option<&'a Map<String, Value>> {
        self.value.get("inputs").and_then(Value::as_object)
    }

    /// The node's ordered widget values, when present
    pub fn widgets_values(&self) -> Option<&'a Vec<Value>> {
        self.value.get("widgets_values").and_then(Value::as_array)
    }

    /// First widget value, as a string, when present
    pub fn first_widget_str(&self) -> Option<&'a str> {
        self.widgets_values()?.first()?.as_str()
    }
}

/// Interprets an input value as a `[linkedNodeId, outputSlot]` link,
/// returning the normalized target node id
pub fn link_target(value: &Value) -> Option<String> {
    let array = value.as_array()?;
    if array.len() != 2 {
        return None;
    }
    match &array[0] {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
