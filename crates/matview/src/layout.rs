use crate::{Enforcer, InvariantError, RVec, Shape, Strides};

/// # Layout
///
/// The shape descriptor of a view: axis lengths and the strides used to walk
/// them. A layout knows nothing about the buffer it is laid over, so every
/// transformation here is pure metadata.
///
/// `shape` and `strides` always have the same length, the current rank.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
}

impl Layout {
    /// Row-major layout for `shape`.
    pub fn contiguous(shape: Shape) -> Self {
        let strides = Strides::from(&shape);
        Self { shape, strides }
    }

    /// Layout with explicit strides, e.g. one produced by another library.
    pub fn from_parts(shape: Shape, strides: Strides) -> Result<Self, InvariantError> {
        if shape.rank() != strides.len() {
            return Err(InvariantError::RankMismatch {
                accepted: shape.rank()..=shape.rank(),
                actual: strides.len(),
            });
        }
        Ok(Self { shape, strides })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    pub fn dim(&self, axis: usize) -> Result<usize, InvariantError> {
        Enforcer::check_axis(self, axis)?;
        Ok(self.shape[axis])
    }

    pub fn stride(&self, axis: usize) -> Result<usize, InvariantError> {
        Enforcer::check_axis(self, axis)?;
        Ok(self.strides[axis])
    }

    /// Linear offset of `idxs`: the dot product of the indices with the
    /// leading strides. Fewer indices than axes address the first element of
    /// a sub-block.
    ///
    /// Indices are not validated against the dims outside of debug builds.
    #[inline]
    pub fn offset(&self, idxs: &[usize]) -> usize {
        debug_assert!(
            Enforcer::check_indices(self, idxs).is_ok(),
            "index {:?} out of bounds for {:?}",
            idxs,
            self.shape
        );
        idxs.iter()
            .zip(self.strides.iter())
            .map(|(idx, stride)| idx * stride)
            .sum()
    }

    pub fn checked_offset(&self, idxs: &[usize]) -> Result<usize, InvariantError> {
        Enforcer::check_indices(self, idxs)?;
        Ok(self.offset(idxs))
    }

    /// Number of buffer elements a view with this layout may touch: one past
    /// the largest offset reachable with in-bounds indices, 0 for an empty
    /// layout.
    pub fn extent(&self) -> Result<usize, InvariantError> {
        if self.shape.iter().any(|&dim| dim == 0) {
            return Ok(0);
        }
        self.shape
            .iter()
            .zip(self.strides.iter())
            .try_fold(1usize, |acc, (&dim, &stride)| {
                (dim - 1)
                    .checked_mul(stride)
                    .and_then(|span| acc.checked_add(span))
            })
            .ok_or_else(|| InvariantError::ShapeOverflow {
                dims: self.shape.to_vec(),
            })
    }

    pub fn is_contiguous(&self) -> bool {
        self.strides == Strides::from(&self.shape)
    }

    /// Replaces the dims and recomputes row-major strides. Offsets computed
    /// against the previous shape are meaningless afterwards.
    pub fn reshape(&mut self, dims: &[usize]) -> Result<(), InvariantError> {
        let shape = Shape::try_new(dims)?;
        log::debug!("reshape {:?} -> {:?}", self.shape, shape);
        *self = Self::contiguous(shape);
        Ok(())
    }

    /// Reverses the axis order. Applying it twice is the identity.
    pub fn transpose(&mut self) {
        self.shape.reverse();
        self.strides.reverse();
    }

    /// Fixes the leading `idxs.len()` axes. Returns the trailing layout and
    /// the offset of the selected sub-block.
    pub fn constrain(&self, idxs: &[usize]) -> Result<(Layout, usize), InvariantError> {
        let offset = self.checked_offset(idxs)?;
        let len = idxs.len();
        let sub = Layout {
            shape: self.shape.slice_from(len),
            strides: self.strides.slice_from(len),
        };
        log::debug!(
            "constrain {:?} at {:?} -> {:?} (+{})",
            self.shape,
            idxs,
            sub.shape,
            offset
        );
        Ok((sub, offset))
    }

    /// Enumerates every valid index vector in row-major order.
    pub fn indices(&self) -> impl Iterator<Item = RVec<usize>> + '_ {
        let numel = self.numel();
        (0..numel).map(move |mut flat| {
            let mut idx: RVec<usize> = RVec::from_elem(0, self.rank());
            for axis in (0..self.rank()).rev() {
                let dim = self.shape[axis];
                idx[axis] = flat % dim;
                flat /= dim;
            }
            idx
        })
    }
}

impl From<Shape> for Layout {
    fn from(shape: Shape) -> Self {
        Self::contiguous(shape)
    }
}

impl std::fmt::Debug for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Layout({:?}, strides={:?})", self.shape, self.strides)
    }
}
