use crate::{Enforcer, InvariantError, RVec, MAX_RANK};
use std::ops::{RangeFrom, RangeTo};

/// Axis lengths of a view, at most [`MAX_RANK`] of them.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(RVec<usize>);

impl Shape {
    pub fn new(shape: RVec<usize>) -> Self {
        assert!(
            shape.len() <= MAX_RANK,
            "Shape of rank {} exceeds MAX_RANK",
            shape.len()
        );
        Self(shape)
    }

    /// Fallible constructor: rejects more than [`MAX_RANK`] dims and dims whose
    /// row-major strides or element count do not fit in `usize`.
    pub fn try_new(dims: &[usize]) -> Result<Self, InvariantError> {
        Enforcer::check_shape(dims)?;
        Ok(Self(dims.into()))
    }

    pub(crate) fn inner(&self) -> &RVec<usize> {
        &self.0
    }

    /// Number of elements addressed by this shape, `None` if it overflows.
    pub fn checked_numel(&self) -> Option<usize> {
        if self.0.contains(&0) {
            return Some(0);
        }
        self.0
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
    }

    /// Number of elements addressed by this shape. A rank-0 shape is a scalar.
    /// Saturates at `usize::MAX`, which only shapes built with [`Shape::new`]
    /// can reach.
    pub fn numel(&self) -> usize {
        self.checked_numel().unwrap_or(usize::MAX)
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.0.to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = &usize> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rank(&self) -> usize {
        self.len()
    }

    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    pub fn slice_from(&self, start: usize) -> Self {
        Shape(self.0[start.min(self.len())..].into())
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dims = self.0.iter().map(|d| d.to_string()).collect::<Vec<_>>();
        write!(f, "[{}]", dims.join("x"))
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl std::ops::Index<usize> for Shape {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl std::ops::IndexMut<usize> for Shape {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl std::ops::Index<RangeTo<usize>> for Shape {
    type Output = [usize];

    fn index(&self, index: RangeTo<usize>) -> &Self::Output {
        &self.0[index]
    }
}

impl std::ops::Index<RangeFrom<usize>> for Shape {
    type Output = [usize];

    fn index(&self, index: RangeFrom<usize>) -> &Self::Output {
        &self.0[index]
    }
}

impl TryFrom<&[usize]> for Shape {
    type Error = InvariantError;

    fn try_from(dims: &[usize]) -> Result<Self, Self::Error> {
        Self::try_new(dims)
    }
}

impl TryFrom<Vec<usize>> for Shape {
    type Error = InvariantError;

    fn try_from(dims: Vec<usize>) -> Result<Self, Self::Error> {
        Self::try_new(&dims)
    }
}
