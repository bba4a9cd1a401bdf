use crate::mapping::indexed_mapping::IndexedMapping;
use crate::mapping::NodeMapping;
use crate::utils::bitarray::BitArray;
use crate::utils::bitset::Bitset64;

/// The widest layout: children indexed directly by key byte. Lookup is a
/// single load; occupancy is tracked in the slot array's bitset.
pub struct DirectMapping<N> {
    pub(crate) children: BitArray<N, 256, Bitset64<4>>,
    num_children: usize,
}

impl<N> Default for DirectMapping<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> DirectMapping<N> {
    pub fn new() -> Self {
        Self {
            children: BitArray::new(),
            num_children: 0,
        }
    }

    pub(crate) fn from_indexed<const WIDTH: usize>(im: &mut IndexedMapping<N, WIDTH>) -> Self {
        let mut dm = Self::new();
        for b in 0..256 {
            let slot = im.slots[b];
            if slot == 0 {
                continue;
            }
            let child = im.children.erase(slot as usize - 1).expect("slot occupied");
            im.slots[b] = 0;
            dm.add_child(b as u8, child);
        }
        im.num_children = 0;
        dm
    }

    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (u8, &N)> {
        self.children.iter().map(|(b, child)| (b as u8, child))
    }
}

impl<N> NodeMapping<N, 256> for DirectMapping<N> {
    #[inline]
    fn add_child(&mut self, key: u8, node: N) {
        self.children.set(key as usize, node);
        self.num_children += 1;
    }

    #[inline]
    fn seek_child(&self, key: u8) -> Option<&N> {
        self.children.get(key as usize)
    }

    #[inline]
    fn seek_child_mut(&mut self, key: u8) -> Option<&mut N> {
        self.children.get_mut(key as usize)
    }

    #[inline]
    fn min_child(&self) -> Option<&N> {
        self.children
            .first_used_pos()
            .and_then(|pos| self.children.get(pos))
    }

    #[inline]
    fn num_children(&self) -> usize {
        self.num_children
    }
}

#[cfg(test)]
mod tests {
    use crate::mapping::direct_mapping::DirectMapping;
    use crate::mapping::NodeMapping;

    #[test]
    fn test_fill_and_seek() {
        let mut dm = DirectMapping::new();
        for b in 0..=255u8 {
            dm.add_child(b, b);
        }
        assert_eq!(dm.num_children(), 256);
        for b in 0..=255u8 {
            assert_eq!(dm.seek_child(b), Some(&b));
        }
    }

    #[test]
    fn iter_yields_key_order_for_sparse_children() {
        let mut dm = DirectMapping::new();
        for key in [200u8, 3, 250, 17, 128] {
            dm.add_child(key, key);
        }
        let keys: Vec<u8> = dm.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![3, 17, 128, 200, 250]);
        assert_eq!(dm.min_child(), Some(&3));
    }
}
