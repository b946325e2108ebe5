//! Workflow node-graph resolution
//!
//! Node-based generation tools persist their pipeline as JSON: either a
//! flat map of node id to node, or an object with a `nodes` array where
//! inputs may reference other nodes by id. This module digs the single
//! best prompt string out of such a structure.

mod node;
mod resolver;

pub use node::WorkflowNode;
pub use resolver::{is_label_like, resolve};
