use std::cmp::min;

use crate::mapping::direct_mapping::DirectMapping;
use crate::mapping::indexed_mapping::IndexedMapping;
use crate::mapping::sorted_keyed_mapping::SortedKeyedMapping;
use crate::mapping::NodeMapping;
use crate::prefix::{common_prefix_length, Prefix};

/// A path-terminating node: the full key it was inserted under, plus the
/// value. The stored key is what makes verification beyond the in-node
/// prefix cache possible.
pub(crate) struct Leaf<V> {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: V,
}

pub(crate) enum Content<V> {
    Leaf(Leaf<V>),
    Node4(SortedKeyedMapping<Node<V>, 4>),
    Node16(SortedKeyedMapping<Node<V>, 16>),
    Node48(IndexedMapping<Node<V>, 48>),
    Node256(DirectMapping<Node<V>>),
}

/// A tree node: the compressed prefix shared by every descendant, plus the
/// variant-specific payload. Leaves keep the prefix empty and rely on
/// their stored key instead.
pub(crate) struct Node<V> {
    pub(crate) prefix: Prefix,
    pub(crate) content: Content<V>,
}

impl<V> Node<V> {
    #[inline]
    pub(crate) fn new_leaf(key: &[u8], value: V) -> Self {
        Self {
            prefix: Prefix::empty(),
            content: Content::Leaf(Leaf {
                key: Box::from(key),
                value,
            }),
        }
    }

    #[inline]
    pub(crate) fn new_node4(prefix: Prefix) -> Self {
        Self {
            prefix,
            content: Content::Node4(SortedKeyedMapping::new()),
        }
    }

    pub(crate) fn num_children(&self) -> usize {
        match &self.content {
            Content::Node4(km) => km.num_children(),
            Content::Node16(km) => km.num_children(),
            Content::Node48(im) => im.num_children(),
            Content::Node256(dm) => dm.num_children(),
            Content::Leaf(_) => 0,
        }
    }

    pub(crate) fn seek_child(&self, key: u8) -> Option<&Self> {
        match &self.content {
            Content::Node4(km) => km.seek_child(key),
            Content::Node16(km) => km.seek_child(key),
            Content::Node48(im) => im.seek_child(key),
            Content::Node256(dm) => dm.seek_child(key),
            Content::Leaf(_) => None,
        }
    }

    pub(crate) fn seek_child_mut(&mut self, key: u8) -> Option<&mut Self> {
        match &mut self.content {
            Content::Node4(km) => km.seek_child_mut(key),
            Content::Node16(km) => km.seek_child_mut(key),
            Content::Node48(im) => im.seek_child_mut(key),
            Content::Node256(dm) => dm.seek_child_mut(key),
            Content::Leaf(_) => None,
        }
    }

    /// Attach a child under `key`, stepping up to the next wider layout
    /// first when the current one is full. The insert path guarantees the
    /// byte is not already present.
    pub(crate) fn add_child(&mut self, key: u8, child: Self) {
        if self.is_full() {
            self.grow();
        }

        match &mut self.content {
            Content::Node4(km) => km.add_child(key, child),
            Content::Node16(km) => km.add_child(key, child),
            Content::Node48(im) => im.add_child(key, child),
            Content::Node256(dm) => dm.add_child(key, child),
            Content::Leaf(_) => unreachable!("leaves have no children"),
        }
    }

    #[inline]
    fn is_full(&self) -> bool {
        match &self.content {
            Content::Node4(km) => km.num_children() >= km.width(),
            Content::Node16(km) => km.num_children() >= km.width(),
            Content::Node48(im) => im.num_children() >= im.width(),
            // A direct node covers the whole byte range; a present byte is
            // found by seek_child and never reaches add_child.
            Content::Node256(_) => false,
            Content::Leaf(_) => unreachable!("leaves have no children"),
        }
    }

    /// Replace a full layout by the next wider one. The set of
    /// (key, child) pairs is invariant across the transition; the old
    /// mapping is dropped once drained.
    fn grow(&mut self) {
        match &mut self.content {
            Content::Node4(km) => {
                let grown = Content::Node16(SortedKeyedMapping::from_resized(km));
                self.content = grown;
            }
            Content::Node16(km) => {
                let grown = Content::Node48(IndexedMapping::from_sorted(km));
                self.content = grown;
            }
            Content::Node48(im) => {
                let grown = Content::Node256(DirectMapping::from_indexed(im));
                self.content = grown;
            }
            Content::Node256(_) => unreachable!("node256 cannot grow"),
            Content::Leaf(_) => unreachable!("leaves do not grow"),
        }
    }

    /// The leaf reached by always taking the smallest child. Any leaf
    /// would do for residual-prefix verification; the minimum is cheap to
    /// find in every layout.
    pub(crate) fn min_leaf(&self) -> Option<&Leaf<V>> {
        let mut node = self;
        loop {
            match &node.content {
                Content::Leaf(leaf) => return Some(leaf),
                Content::Node4(km) => node = km.min_child()?,
                Content::Node16(km) => node = km.min_child()?,
                Content::Node48(im) => node = im.min_child()?,
                Content::Node256(dm) => node = dm.min_child()?,
            }
        }
    }

    /// Agreement length of `key[depth..]` with this node's full prefix.
    /// Within the cache this is a plain compare; past it the comparison
    /// continues against a descendant leaf's stored key.
    pub(crate) fn prefix_mismatch(&self, key: &[u8], depth: usize) -> usize {
        let matched = self.prefix.match_key(key, depth);
        if matched < self.prefix.cached_len() || self.prefix.is_exact() {
            return matched;
        }

        let Some(leaf) = self.min_leaf() else {
            return matched;
        };
        let residual = common_prefix_length(&leaf.key, key, depth + matched);
        min(matched + residual, self.prefix.len())
    }

    /// Children in ascending key-byte order.
    pub(crate) fn iter(&self) -> Box<dyn Iterator<Item = (u8, &Self)> + '_> {
        match &self.content {
            Content::Node4(km) => Box::new(km.iter()),
            Content::Node16(km) => Box::new(km.iter()),
            Content::Node48(im) => Box::new(im.iter()),
            Content::Node256(dm) => Box::new(dm.iter()),
            Content::Leaf(_) => Box::new(std::iter::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{Content, Node};
    use crate::prefix::Prefix;

    fn leaf_value(node: &Node<u32>) -> u32 {
        match &node.content {
            Content::Leaf(leaf) => leaf.value,
            _ => panic!("expected a leaf"),
        }
    }

    #[test]
    fn add_and_seek_through_all_layouts() {
        let mut node = Node::new_node4(Prefix::from_slice(b"abc"));

        // Cross each growth boundary and verify every earlier child is
        // still reachable afterwards.
        for (count, expected) in
            [(4usize, "Node4"), (16, "Node16"), (48, "Node48"), (256, "Node256")]
        {
            while node.num_children() < count {
                let b = node.num_children() as u8;
                node.add_child(b, Node::new_leaf(&[b], b as u32));
            }
            let name = match &node.content {
                Content::Node4(_) => "Node4",
                Content::Node16(_) => "Node16",
                Content::Node48(_) => "Node48",
                Content::Node256(_) => "Node256",
                Content::Leaf(_) => "Leaf",
            };
            assert_eq!(name, expected);
            assert_eq!(node.prefix.cached(), b"abc");
            for b in 0..count as u16 {
                let child = node.seek_child(b as u8).unwrap();
                assert_eq!(leaf_value(child), b as u32);
            }
            if count < 256 {
                assert!(node.seek_child(count as u8).is_none());
            }
        }
    }

    #[test]
    fn children_iterate_in_byte_order_after_growth() {
        let mut node = Node::new_node4(Prefix::empty());
        let bytes = [250u8, 3, 99, 180, 42, 7, 210, 128, 64, 1, 33, 77, 150, 200, 90, 10, 5];
        for b in bytes {
            node.add_child(b, Node::new_leaf(&[b], b as u32));
        }
        assert!(matches!(node.content, Content::Node48(_)));
        let seen: Vec<u8> = node.iter().map(|(k, _)| k).collect();
        let mut sorted = bytes.to_vec();
        sorted.sort_unstable();
        assert_eq!(seen, sorted);
    }

    #[test]
    fn min_leaf_descends_smallest_branch() {
        let mut node = Node::new_node4(Prefix::empty());
        node.add_child(9, Node::new_leaf(b"9x", 90));
        node.add_child(2, Node::new_leaf(b"2x", 20));

        let mut inner = Node::new_node4(Prefix::empty());
        inner.add_child(5, Node::new_leaf(b"05", 5));
        inner.add_child(8, Node::new_leaf(b"08", 8));
        node.add_child(0, inner);

        let leaf = node.min_leaf().unwrap();
        assert_eq!(leaf.key.as_ref(), b"05");
    }

    #[test]
    fn prefix_mismatch_consults_leaf_past_cache() {
        let mut key_a = vec![b'a'; 40];
        key_a.push(b'1');
        let mut key_b = vec![b'a'; 40];
        key_b.push(b'2');

        // A node whose true prefix (40 bytes) exceeds the cache, holding
        // two leaves that embody it.
        let mut node = Node::new_node4(Prefix::from_slice(&vec![b'a'; 40]));
        node.add_child(b'1', Node::new_leaf(&key_a, 1u32));
        node.add_child(b'2', Node::new_leaf(&key_b, 2u32));

        // Agreeing for the whole 40 bytes.
        let mut probe = vec![b'a'; 40];
        probe.push(b'3');
        assert_eq!(node.prefix_mismatch(&probe, 0), 40);

        // Diverging at byte 35, beyond the 32-byte cache: only the leaf
        // key can reveal it.
        let mut probe = vec![b'a'; 35];
        probe.extend_from_slice(&[b'z'; 6]);
        assert_eq!(node.prefix_mismatch(&probe, 0), 35);

        // Diverging inside the cache.
        let mut probe = vec![b'a'; 10];
        probe.extend_from_slice(&[b'z'; 31]);
        assert_eq!(node.prefix_mismatch(&probe, 0), 10);
    }
}
