//! # artree: Adaptive Radix Tree
//!
//! An in-memory, ordered index mapping byte-string keys to owned values.
//!
//! ## Overview
//!
//! An Adaptive Radix Tree (ART) is a trie whose inner nodes switch among
//! several physical layouts (fanouts of 4, 16, 48 and 256 here) according
//! to how many children they actually carry:
//!
//! - **Space efficient**: each node uses the narrowest layout that fits
//! - **Cache friendly**: narrow nodes are a handful of cache lines;
//!   lookups in the 16-wide layout use a single SIMD compare
//! - **Path compressed**: runs of single-child nodes collapse into a
//!   per-node prefix, and single-key subtrees are just a leaf holding the
//!   full key, so depth tracks the distinguishing prefix, not key length
//!
//! ## Quick start
//!
//! ```rust
//! use artree::{AdaptiveRadixTree, KeyBytes};
//!
//! let mut tree = AdaptiveRadixTree::new();
//!
//! // Keys are byte strings; insert hands back the previous value when a
//! // key is overwritten.
//! tree.insert(b"hello", "world".to_string()).unwrap();
//! assert_eq!(tree.insert(b"hello", "again".to_string()), Ok(Some("world".to_string())));
//!
//! assert_eq!(tree.get(b"hello"), Some(&"again".to_string()));
//! assert_eq!(tree.get(b"missing"), None);
//!
//! // Typed keys encode to order-preserving byte strings.
//! tree.insert(42u64.key_bytes(), "answer".to_string()).unwrap();
//! assert_eq!(tree.get(42u64.key_bytes()), Some(&"answer".to_string()));
//! ```
//!
//! ## Keys
//!
//! Keys are compared lexicographically by unsigned byte value and must be
//! non-empty and prefix-free: inserting a key that is a proper prefix of a
//! stored key (or the reverse) is refused, because an inner node cannot
//! also terminate a path. The [`keys::KeyBytes`] encodings guarantee both
//! properties for integers (fixed-width big-endian) and strings
//! (NUL-terminated).

// Private implementation modules
mod node;

// Internal modules (public for benchmarking, not part of the stable API)
#[doc(hidden)]
pub mod mapping;
#[doc(hidden)]
pub mod utils;

// Public API modules
pub mod keys;
pub mod prefix;
pub mod stats;
pub mod tree;

// Re-export main types for convenience
pub use keys::KeyBytes;
pub use prefix::MAX_PREFIX_LENGTH;
pub use tree::{AdaptiveRadixTree, InsertError};
