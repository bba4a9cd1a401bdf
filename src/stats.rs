//! Structural introspection.
//!
//! Reports how a tree's logical contents are laid out physically: how many
//! nodes of each width exist, how densely they are populated, and how deep
//! the tree runs. Useful for memory analysis and for verifying that the
//! adaptive layout behaves as intended on a given key distribution.

use std::collections::HashMap;

use crate::node::{Content, Node};

pub trait TreeStatsTrait {
    fn tree_stats(&self) -> TreeStats;
}

#[derive(Debug, Default)]
pub struct NodeStats {
    /// Child capacity of this layout.
    pub width: usize,
    pub total_nodes: usize,
    pub total_children: usize,
    /// total_children / (width * total_nodes).
    pub density: f64,
}

#[derive(Debug, Default)]
pub struct TreeStats {
    pub node_stats: HashMap<&'static str, NodeStats>,
    pub num_leaves: usize,
    pub num_inner_nodes: usize,
    pub total_density: f64,
    pub max_height: usize,
}

pub(crate) fn update_tree_stats<V>(tree_stats: &mut TreeStats, node: &Node<V>) {
    let (name, width) = match &node.content {
        Content::Node4(_) => ("Node4", 4),
        Content::Node16(_) => ("Node16", 16),
        Content::Node48(_) => ("Node48", 48),
        Content::Node256(_) => ("Node256", 256),
        Content::Leaf(_) => return,
    };

    let num_children = node.num_children();
    tree_stats
        .node_stats
        .entry(name)
        .and_modify(|e| {
            e.total_nodes += 1;
            e.total_children += num_children;
        })
        .or_insert(NodeStats {
            width,
            total_nodes: 1,
            total_children: num_children,
            density: 0.0,
        });
}
