use std::ops::RangeInclusive;

use crate::{Layout, MAX_RANK};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("Rank {actual} exceeds the maximum rank of {max}.")]
    RankOverflow { max: usize, actual: usize },
    #[error("Rank mismatch. {accepted:?} != {actual}.")]
    RankMismatch {
        accepted: RangeInclusive<usize>,
        actual: usize,
    },
    #[error("Wrong index arity. Allowed range is {accepted:?}, got {actual} indices.")]
    IndexArity {
        accepted: RangeInclusive<usize>,
        actual: usize,
    },
    #[error("Index {index} out of bounds for axis {axis} of size {dim}.")]
    IndexOutOfBounds { axis: usize, index: usize, dim: usize },
    #[error("Axis {axis} out of range for rank {rank}.")]
    AxisOutOfRange { axis: usize, rank: usize },
    #[error("Layout addresses {required} elements but the buffer holds {actual}.")]
    BufferTooSmall { required: usize, actual: usize },
    #[error("Destination holds {actual} elements, {required} are needed.")]
    DestinationTooSmall { required: usize, actual: usize },
    #[error("Offsets of shape {dims:?} overflow usize.")]
    ShapeOverflow { dims: Vec<usize> },
}

/// # Enforcer
///
/// Enforcer enforces common invariants on layouts and index vectors.
pub struct Enforcer;

impl Enforcer {
    pub fn check_rank(rank: usize) -> Result<(), InvariantError> {
        if rank > MAX_RANK {
            return Err(InvariantError::RankOverflow {
                max: MAX_RANK,
                actual: rank,
            });
        }
        Ok(())
    }

    /// Rank limit plus the row-major products of `dims`: every stride and the
    /// element count must fit in `usize`.
    pub fn check_shape(dims: &[usize]) -> Result<(), InvariantError> {
        Self::check_rank(dims.len())?;
        dims.iter()
            .rev()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .map(|_| ())
            .ok_or_else(|| InvariantError::ShapeOverflow {
                dims: dims.to_vec(),
            })
    }

    pub fn check_rank_range(
        layout: &Layout,
        accepted: RangeInclusive<usize>,
    ) -> Result<(), InvariantError> {
        let actual = layout.rank();
        if !accepted.contains(&actual) {
            return Err(InvariantError::RankMismatch { accepted, actual });
        }
        Ok(())
    }

    pub fn check_axis(layout: &Layout, axis: usize) -> Result<(), InvariantError> {
        let rank = layout.rank();
        if axis >= rank {
            return Err(InvariantError::AxisOutOfRange { axis, rank });
        }
        Ok(())
    }

    /// Validates a (possibly partial) index vector against the leading dims.
    pub fn check_indices(layout: &Layout, idxs: &[usize]) -> Result<(), InvariantError> {
        let rank = layout.rank();
        if idxs.len() > rank {
            return Err(InvariantError::IndexArity {
                accepted: 0..=rank,
                actual: idxs.len(),
            });
        }
        for (axis, (&index, &dim)) in idxs.iter().zip(layout.shape().iter()).enumerate() {
            if index >= dim {
                return Err(InvariantError::IndexOutOfBounds { axis, index, dim });
            }
        }
        Ok(())
    }

    /// Validates a full index vector, one index per axis.
    pub fn check_full_indices(layout: &Layout, idxs: &[usize]) -> Result<(), InvariantError> {
        let rank = layout.rank();
        if idxs.len() != rank {
            return Err(InvariantError::IndexArity {
                accepted: rank..=rank,
                actual: idxs.len(),
            });
        }
        Self::check_indices(layout, idxs)
    }

    /// Every element reachable through `layout` must lie inside a buffer of `len`.
    pub fn check_buffer(layout: &Layout, len: usize) -> Result<(), InvariantError> {
        let required = layout.extent()?;
        if required > len {
            return Err(InvariantError::BufferTooSmall {
                required,
                actual: len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape;

    #[test]
    fn test_rank_overflow() {
        assert!(Enforcer::check_rank(MAX_RANK).is_ok());
        assert_eq!(
            Enforcer::check_rank(MAX_RANK + 1),
            Err(InvariantError::RankOverflow {
                max: MAX_RANK,
                actual: MAX_RANK + 1
            })
        );
    }

    #[test]
    fn test_check_indices() {
        let layout = Layout::from(shape![2, 3]);
        assert!(Enforcer::check_indices(&layout, &[1]).is_ok());
        assert!(Enforcer::check_indices(&layout, &[]).is_ok());
        assert_eq!(
            Enforcer::check_indices(&layout, &[1, 3]),
            Err(InvariantError::IndexOutOfBounds {
                axis: 1,
                index: 3,
                dim: 3
            })
        );
        assert!(matches!(
            Enforcer::check_indices(&layout, &[0, 0, 0]),
            Err(InvariantError::IndexArity { actual: 3, .. })
        ));
        assert!(matches!(
            Enforcer::check_full_indices(&layout, &[0]),
            Err(InvariantError::IndexArity { actual: 1, .. })
        ));
    }

    #[test]
    fn test_check_buffer() {
        let layout = Layout::from(shape![2, 3]);
        assert!(Enforcer::check_buffer(&layout, 6).is_ok());
        assert_eq!(
            Enforcer::check_buffer(&layout, 5),
            Err(InvariantError::BufferTooSmall {
                required: 6,
                actual: 5
            })
        );
        let empty = Layout::from(shape![0, 3]);
        assert!(Enforcer::check_buffer(&empty, 0).is_ok());
    }

    #[test]
    fn test_check_shape_overflow() {
        assert!(Enforcer::check_shape(&[1 << 8, 1 << 8]).is_ok());
        assert!(Enforcer::check_shape(&[usize::MAX, 0]).is_ok());
        // The leading stride of this one is already out of range.
        assert!(Enforcer::check_shape(&[0, usize::MAX / 2, 4]).is_err());
        assert_eq!(
            Enforcer::check_shape(&[usize::MAX, 2]),
            Err(InvariantError::ShapeOverflow {
                dims: vec![usize::MAX, 2]
            })
        );
        assert!(matches!(
            Enforcer::check_shape(&[1; MAX_RANK + 1]),
            Err(InvariantError::RankOverflow { .. })
        ));
    }

    #[test]
    fn test_check_rank_range() {
        let layout = Layout::from(shape![2, 3]);
        assert!(Enforcer::check_rank_range(&layout, 2..=3).is_ok());
        assert_eq!(
            Enforcer::check_rank_range(&layout, 3..=4),
            Err(InvariantError::RankMismatch {
                accepted: 3..=4,
                actual: 2
            })
        );
    }
}
