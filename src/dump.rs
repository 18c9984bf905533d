//! JSON dump of a bucket's node structure, for debugging.

use std::fmt::Debug;

use serde::Serialize;

use crate::node::Node;

#[derive(Serialize)]
pub(crate) struct NodeInfo {
    info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    left: Option<Box<NodeInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right: Option<Box<NodeInfo>>,
}

impl NodeInfo {
    pub(crate) fn build<V: Debug>(node: &Node<V>, start: usize) -> Self {
        let mut info = node.describe_segment(start);
        if let Some(value) = &node.value {
            info.push_str(&format!("={value:?}"));
        }
        let end = start + node.bit_len;
        let child = |c: &Option<Box<Node<V>>>| c.as_deref().map(|c| Box::new(Self::build(c, end)));
        Self {
            info,
            left: child(&node.left),
            right: child(&node.right),
        }
    }
}
