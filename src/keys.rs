//! Typed key encoding.
//!
//! The tree itself only understands byte strings ordered by unsigned byte
//! value. [`KeyBytes`] encodes common key types into byte strings whose
//! lexicographic order matches the type's natural order:
//!
//! - unsigned integers encode big-endian;
//! - signed integers flip the sign bit first, mapping negatives below
//!   positives;
//! - strings gain a trailing `0x00` terminator, so no encoded string is a
//!   proper prefix of another encoded string (strings with interior NUL
//!   bytes are not supported by this encoding).
//!
//! ```rust
//! use artree::{AdaptiveRadixTree, KeyBytes};
//!
//! let mut tree = AdaptiveRadixTree::new();
//! tree.insert(42u64.key_bytes(), "answer").unwrap();
//! tree.insert("forty-two".key_bytes(), "spelled out").unwrap();
//! assert_eq!(tree.get(42u64.key_bytes()), Some(&"answer"));
//! ```

/// Encodes a typed key as a byte string whose lexicographic order matches
/// the type's natural order.
pub trait KeyBytes {
    type Encoded: AsRef<[u8]>;

    fn key_bytes(&self) -> Self::Encoded;
}

macro_rules! impl_key_bytes_unsigned {
    ( $($t:ty),* ) => {
        $(
        impl KeyBytes for $t {
            type Encoded = [u8; std::mem::size_of::<$t>()];

            fn key_bytes(&self) -> Self::Encoded {
                self.to_be_bytes()
            }
        }
        )*
    }
}
impl_key_bytes_unsigned!(u8, u16, u32, u64, u128, usize);

macro_rules! impl_key_bytes_signed {
    ( $($t:ty => $tu:ty),* ) => {
        $(
        impl KeyBytes for $t {
            type Encoded = [u8; std::mem::size_of::<$t>()];

            fn key_bytes(&self) -> Self::Encoded {
                // Flipping the sign bit maps the value range onto the
                // unsigned range with order preserved.
                let flipped = (*self as $tu) ^ ((1 as $tu) << (<$tu>::BITS - 1));
                flipped.to_be_bytes()
            }
        }
        )*
    }
}
impl_key_bytes_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128, isize => usize);

impl KeyBytes for str {
    type Encoded = Vec<u8>;

    fn key_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len() + 1);
        bytes.extend_from_slice(self.as_bytes());
        bytes.push(0);
        bytes
    }
}

impl KeyBytes for String {
    type Encoded = Vec<u8>;

    fn key_bytes(&self) -> Vec<u8> {
        self.as_str().key_bytes()
    }
}

#[cfg(test)]
mod tests {
    use crate::keys::KeyBytes;

    #[test]
    fn unsigned_encoding_preserves_order() {
        let values = [0u64, 1, 255, 256, 1 << 20, u64::MAX - 1, u64::MAX];
        for pair in values.windows(2) {
            assert!(pair[0].key_bytes() < pair[1].key_bytes());
        }
    }

    #[test]
    fn signed_encoding_preserves_order() {
        let values = [i32::MIN, -70000, -1, 0, 1, 70000, i32::MAX];
        for pair in values.windows(2) {
            assert!(pair[0].key_bytes() < pair[1].key_bytes());
        }
    }

    #[test]
    fn string_encoding_terminates() {
        let short = "key1".key_bytes();
        let long = "key16".key_bytes();
        assert_eq!(short, b"key1\0");
        // The terminator keeps one encoded string from being a proper
        // prefix of another.
        assert!(!long.starts_with(&short));
        assert!(short < long);
    }
}
