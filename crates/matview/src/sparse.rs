use crate::Shape;

/// Block-sparse bookkeeping that travels with a view.
///
/// Nothing in this crate reads it to resolve elements; it is only carried
/// through shape propagation and constrain so that a caller encoding
/// per-submatrix offsets and sizes can keep them attached to the view.
#[derive(Clone, Debug, Default, PartialEq, Eq, derive_new::new)]
pub struct SparseMeta<'a> {
    shape: Shape,
    offsets: &'a [usize],
    sizes: &'a [usize],
}

impl<'a> SparseMeta<'a> {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn offsets(&self) -> &'a [usize] {
        self.offsets
    }

    pub fn sizes(&self) -> &'a [usize] {
        self.sizes
    }

    pub fn is_empty(&self) -> bool {
        self.shape.is_empty() && self.offsets.is_empty() && self.sizes.is_empty()
    }

    /// Takes only the shape, leaving the borrowed sequences in place.
    pub(crate) fn assign_shape(&mut self, src: &SparseMeta<'_>) {
        self.shape = src.shape.clone();
    }

    /// Metadata for a sub-view that drops `len` leading axes and starts
    /// `offset` elements into the parent.
    pub(crate) fn constrain(&self, len: usize, offset: usize) -> Self {
        Self {
            shape: self.shape.slice_from(len),
            offsets: self.offsets.get(offset..).unwrap_or(&[]),
            sizes: self.sizes,
        }
    }
}
