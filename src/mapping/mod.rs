pub mod direct_mapping;
pub mod indexed_mapping;
pub mod sorted_keyed_mapping;

/// Association of key bytes to child nodes, implemented differently per
/// node width. Growth moves the whole association into the next wider
/// layout, so every mapping can be drained by its successor.
pub trait NodeMapping<N, const NUM_CHILDREN: usize> {
    const NUM_CHILDREN: usize = NUM_CHILDREN;

    fn add_child(&mut self, key: u8, node: N);
    fn seek_child(&self, key: u8) -> Option<&N>;
    fn seek_child_mut(&mut self, key: u8) -> Option<&mut N>;
    /// Child under the smallest key byte.
    fn min_child(&self) -> Option<&N>;
    fn num_children(&self) -> usize;
    fn width(&self) -> usize {
        Self::NUM_CHILDREN
    }
}
