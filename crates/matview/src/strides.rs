use crate::{rvec, RVec, Shape};

/// Per-axis element strides, parallel to a [`Shape`].
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct Strides(RVec<usize>);

impl Strides {
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
        self.0.is_empty()
    }

    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    pub fn slice_from(&self, start: usize) -> Self {
        Strides(self.0[start.min(self.len())..].into())
    }
}

impl std::fmt::Debug for Strides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strides = self.0.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        write!(f, "[{}]", strides.join("x"))
    }
}

impl std::ops::Index<usize> for Strides {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Row-major (C order) strides: the last axis is contiguous.
///
/// Strides saturate at `usize::MAX`. [`Shape::try_new`] rejects dims that
/// would get there, and [`crate::Layout::extent`] reports the overflow for
/// shapes built without it.
impl From<&Shape> for Strides {
    fn from(shape: &Shape) -> Self {
        let mut strides = rvec![];
        let mut stride = 1usize;
        for size in shape.inner().iter().rev() {
            strides.push(stride);
            stride = stride.saturating_mul(*size);
        }
        strides.reverse();
        Self(strides)
    }
}

impl From<RVec<usize>> for Strides {
    fn from(strides: RVec<usize>) -> Self {
        Self(strides)
    }
}
