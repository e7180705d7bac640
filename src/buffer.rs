// buffer.rs
use crate::{config, error::GeometryError, vertex::{TexturedVertex, Vertex}};

/// Append-only buffer with an explicit upper bound.
///
/// Generators write into these once at startup and the result is uploaded
/// to the GPU as-is. Going past `capacity` is reported as an error rather
/// than growing the buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedBuffer<T> {
    items: Vec<T>,
    capacity: usize,
}

pub type VertexBuffer = BoundedBuffer<Vertex>;
pub type TexturedVertexBuffer = BoundedBuffer<TexturedVertex>;
pub type IndexBuffer = BoundedBuffer<u32>;
pub type FloatBuffer = BoundedBuffer<f32>;

impl<T> BoundedBuffer<T> {
    pub fn new() -> Self {
        Self { items: Vec::new(), capacity: config::CAPACITY }
    }

    // Pre-sized: no reallocation while filling
    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, item: T) -> Result<(), GeometryError> {
        self.reserve_for(1)?;
        self.items.push(item);
        Ok(())
    }

    /// Checks that `additional` more items fit without writing anything.
    pub fn reserve_for(&self, additional: usize) -> Result<(), GeometryError> {
        let requested = self.items.len().saturating_add(additional);
        if requested > self.capacity {
            return Err(GeometryError::CapacityExceeded { capacity: self.capacity, requested });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    // Only called after `reserve_for` has succeeded for the whole batch
    pub(crate) fn push_unchecked(&mut self, item: T) {
        debug_assert!(self.items.len() < self.capacity);
        self.items.push(item);
    }
}

impl<T> Default for BoundedBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Index<usize> for BoundedBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_up_to_capacity() {
        let mut buf = IndexBuffer::with_capacity(3);
        for i in 0..3 {
            buf.push(i).unwrap();
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(
            buf.push(3),
            Err(GeometryError::CapacityExceeded { capacity: 3, requested: 4 })
        );
        assert_eq!(buf.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn reserve_for_does_not_write() {
        let buf = FloatBuffer::with_capacity(8);
        assert!(buf.reserve_for(8).is_ok());
        assert!(buf.reserve_for(9).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn default_uses_global_capacity() {
        let buf = VertexBuffer::default();
        assert_eq!(buf.capacity(), config::CAPACITY);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = FloatBuffer::with_capacity(2);
        buf.push(1.0).unwrap();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 2);
    }
}
