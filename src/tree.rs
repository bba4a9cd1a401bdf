//! Adaptive Radix Tree implementation.
//!
//! This module contains the main [`AdaptiveRadixTree`] type: the handle
//! owning the root node and the leaf count, and the search and insertion
//! engines that operate on it.

use thiserror::Error;

use crate::node::{Content, Node};
use crate::prefix::{common_prefix_length, Prefix};
use crate::stats::{update_tree_stats, TreeStats, TreeStatsTrait};

/// Why an insertion was refused. A refused insertion leaves the tree
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsertError {
    /// The empty key cannot be stored; there is no byte to branch on.
    #[error("empty keys are not supported")]
    EmptyKey,
    /// The key is a proper prefix of a stored key, or a stored key is a
    /// proper prefix of it. Keys must be prefix-free; encode variable
    /// length keys with a terminator (see [`crate::keys::KeyBytes`]).
    #[error("key is a proper prefix of an existing key (or vice versa)")]
    KeyIsPrefix,
}

/// An Adaptive Radix Tree: an ordered map from byte-string keys to owned
/// values.
///
/// Internal nodes switch among four physical layouts (4, 16, 48 and 256
/// children) as their fanout grows, and chains of single-child nodes are
/// collapsed into per-node compressed prefixes, so depth is proportional
/// to the distinguishing prefix of the stored keys rather than to key
/// length.
///
/// Keys are compared lexicographically by unsigned byte value and must be
/// non-empty and prefix-free; see [`crate::keys::KeyBytes`] for encodings
/// that guarantee both for integers and strings.
///
/// ## Examples
///
/// ```rust
/// use artree::AdaptiveRadixTree;
///
/// let mut tree = AdaptiveRadixTree::new();
/// tree.insert(b"apple", "fruit".to_string()).unwrap();
/// tree.insert(b"appetite", "hunger".to_string()).unwrap();
///
/// assert_eq!(tree.get(b"apple"), Some(&"fruit".to_string()));
/// assert_eq!(tree.get(b"orange"), None);
/// assert_eq!(tree.len(), 2);
/// ```
pub struct AdaptiveRadixTree<V> {
    root: Option<Node<V>>,
    size: usize,
}

impl<V> Default for AdaptiveRadixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> AdaptiveRadixTree<V> {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            root: None,
            size: 0,
        }
    }

    /// Number of keys stored, which equals the number of leaves.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Look up a key.
    #[inline]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        Self::get_iterate(self.root.as_ref()?, key.as_ref())
    }

    /// Look up a key and return a mutable reference to its value.
    #[inline]
    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut V> {
        Self::get_iterate_mut(self.root.as_mut()?, key.as_ref())
    }

    /// Insert a key-value pair.
    ///
    /// Returns `Ok(None)` when the key was new and `Ok(Some(old))` when an
    /// equal key was already present, in which case the stored value is
    /// replaced and the old one handed back. Rejected keys (see
    /// [`InsertError`]) leave the tree exactly as it was.
    ///
    /// ```rust
    /// use artree::AdaptiveRadixTree;
    ///
    /// let mut tree = AdaptiveRadixTree::new();
    /// assert_eq!(tree.insert(b"key", 100), Ok(None));
    /// assert_eq!(tree.insert(b"key", 200), Ok(Some(100)));
    /// assert_eq!(tree.get(b"key"), Some(&200));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: impl AsRef<[u8]>, value: V) -> Result<Option<V>, InsertError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(InsertError::EmptyKey);
        }

        let Some(root) = self.root.as_mut() else {
            self.root = Some(Node::new_leaf(key, value));
            self.size = 1;
            return Ok(None);
        };

        let replaced = Self::insert_recurse(root, key, value, 0)?;
        if replaced.is_none() {
            self.size += 1;
        }
        Ok(replaced)
    }
}

// Internals.
impl<V> AdaptiveRadixTree<V> {
    fn get_iterate<'a>(cur_node: &'a Node<V>, key: &[u8]) -> Option<&'a V> {
        let mut cur_node = cur_node;
        let mut depth = 0;
        loop {
            if let Content::Leaf(leaf) = &cur_node.content {
                // The stored key settles the lookup outright, including
                // any prefix bytes that were not cached along the path.
                if leaf.key.as_ref() == key {
                    return Some(&leaf.value);
                }
                return None;
            }

            if cur_node.prefix.match_key(key, depth) < cur_node.prefix.cached_len() {
                return None;
            }
            let next = depth + cur_node.prefix.len();
            if next >= key.len() {
                return None;
            }
            cur_node = cur_node.seek_child(key[next])?;
            depth = next + 1;
        }
    }

    fn get_iterate_mut<'a>(cur_node: &'a mut Node<V>, key: &[u8]) -> Option<&'a mut V> {
        let mut cur_node: *mut Node<V> = cur_node;
        let mut depth = 0;
        loop {
            // SAFETY: `cur_node` always points to a valid, uniquely-borrowed
            // node reachable from the original `&'a mut Node<V>`; the loop
            // only ever advances to children of that node, never aliasing,
            // and the raw pointer is immediately converted back to a
            // reference before any use.
            let next_node: *mut Node<V>;
            unsafe {
                if let Content::Leaf(leaf) = &mut (*cur_node).content {
                    if leaf.key.as_ref() == key {
                        return Some(&mut leaf.value);
                    }
                    return None;
                }

                if (*cur_node).prefix.match_key(key, depth) < (*cur_node).prefix.cached_len() {
                    return None;
                }
                let next = depth + (*cur_node).prefix.len();
                if next >= key.len() {
                    return None;
                }
                next_node = (*cur_node).seek_child_mut(key[next])?;
                depth = next + 1;
            }
            cur_node = next_node;
        }
    }

    fn insert_recurse(
        cur_node: &mut Node<V>,
        key: &[u8],
        value: V,
        depth: usize,
    ) -> Result<Option<V>, InsertError> {
        if let Content::Leaf(leaf) = &mut cur_node.content {
            if leaf.key.as_ref() == key {
                return Ok(Some(std::mem::replace(&mut leaf.value, value)));
            }

            // Lazy leaf split: push the existing leaf and the new one
            // under a fresh node4 that captures their common prefix.
            let split = depth + common_prefix_length(&leaf.key, key, depth);
            if split == key.len() || split == leaf.key.len() {
                return Err(InsertError::KeyIsPrefix);
            }
            let old_byte = leaf.key[split];
            let new_byte = key[split];

            let branch = Node::new_node4(Prefix::from_slice(&key[depth..split]));
            let old_leaf = std::mem::replace(cur_node, branch);
            cur_node.add_child(old_byte, old_leaf);
            cur_node.add_child(new_byte, Node::new_leaf(key, value));
            return Ok(None);
        }

        let mismatch = cur_node.prefix_mismatch(key, depth);
        if mismatch < cur_node.prefix.len() {
            // The key diverges inside this node's compressed prefix.
            // Bifurcate: a new node4 keeps the agreeing part, the current
            // node keeps the tail past the diverging byte.
            if depth + mismatch == key.len() {
                return Err(InsertError::KeyIsPrefix);
            }
            let new_byte = key[depth + mismatch];

            let (old_byte, trimmed) = if cur_node.prefix.is_exact() {
                let cached = cur_node.prefix.cached();
                (
                    cached[mismatch],
                    Prefix::from_slice(&cached[mismatch + 1..]),
                )
            } else {
                // The tail is not fully cached; restore it from a leaf,
                // which carries the whole path.
                let leaf = cur_node.min_leaf().expect("inner node without leaves");
                let tail_len = cur_node.prefix.len() - mismatch - 1;
                (
                    leaf.key[depth + mismatch],
                    Prefix::from_slice_with_len(&leaf.key[depth + mismatch + 1..], tail_len),
                )
            };

            let branch = Node::new_node4(Prefix::from_slice(&key[depth..depth + mismatch]));
            let mut old_node = std::mem::replace(cur_node, branch);
            old_node.prefix = trimmed;
            cur_node.add_child(old_byte, old_node);
            cur_node.add_child(new_byte, Node::new_leaf(key, value));
            return Ok(None);
        }

        // The whole prefix agrees; step past it and branch.
        let next = depth + cur_node.prefix.len();
        if next == key.len() {
            return Err(InsertError::KeyIsPrefix);
        }
        let byte = key[next];

        if let Some(child) = cur_node.seek_child_mut(byte) {
            return Self::insert_recurse(child, key, value, next + 1);
        }
        cur_node.add_child(byte, Node::new_leaf(key, value));
        Ok(None)
    }

    fn tree_stats_recurse(node: &Node<V>, stats: &mut TreeStats, height: usize) {
        if height > stats.max_height {
            stats.max_height = height;
        }
        match &node.content {
            Content::Leaf(_) => stats.num_leaves += 1,
            _ => update_tree_stats(stats, node),
        }
        for (_k, child) in node.iter() {
            Self::tree_stats_recurse(child, stats, height + 1);
        }
    }
}

impl<V> TreeStatsTrait for AdaptiveRadixTree<V> {
    fn tree_stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let Some(root) = self.root.as_ref() else {
            return stats;
        };

        Self::tree_stats_recurse(root, &mut stats, 1);

        let mut total_children = 0;
        let mut total_width = 0;
        for ns in stats.node_stats.values_mut() {
            total_children += ns.total_children;
            total_width += ns.width * ns.total_nodes;
            ns.density = ns.total_children as f64 / (ns.width * ns.total_nodes) as f64;
        }
        stats.num_inner_nodes = stats.node_stats.values().map(|ns| ns.total_nodes).sum();
        if total_width > 0 {
            stats.total_density = total_children as f64 / total_width as f64;
        }
        stats
    }
}
