use std::ops::{Index, IndexMut};

use crate::{Element, Enforcer, InvariantError, Layout, Shape, SparseMeta, Strides};

/// Shape queries shared by every view type.
pub trait Strided {
    fn layout(&self) -> &Layout;

    fn sparse(&self) -> &SparseMeta<'_>;

    fn rank(&self) -> usize {
        self.layout().rank()
    }

    fn shape(&self) -> &Shape {
        self.layout().shape()
    }

    fn strides(&self) -> &Strides {
        self.layout().strides()
    }

    fn dim(&self, axis: usize) -> Result<usize, InvariantError> {
        self.layout().dim(axis)
    }

    fn stride(&self, axis: usize) -> Result<usize, InvariantError> {
        self.layout().stride(axis)
    }

    /// Total element count, the product of all dims.
    fn numel(&self) -> usize {
        self.layout().numel()
    }

    fn is_contiguous(&self) -> bool {
        self.layout().is_contiguous()
    }
}

/// A shared strided view over a borrowed buffer.
///
/// `data` starts at the view's first element. Views derived from this one
/// (constrain, [`MatView::copy_shape`]) borrow the same buffer for the same
/// lifetime `'a`, so they may outlive the view they were derived from but
/// never the buffer.
#[derive(Clone, Debug)]
pub struct MatView<'a, T> {
    data: &'a [T],
    layout: Layout,
    sparse: SparseMeta<'a>,
}

/// An exclusive strided view. Sub-views reborrow it, so two mutable views of
/// the same elements cannot coexist.
#[derive(Debug)]
pub struct MatViewMut<'a, T> {
    data: &'a mut [T],
    layout: Layout,
    sparse: SparseMeta<'a>,
}

impl<'a, T: Element> MatView<'a, T> {
    /// Row-major view of `data` with the given dims.
    pub fn new(data: &'a [T], dims: &[usize]) -> Result<Self, InvariantError> {
        Self::from_layout(data, Layout::contiguous(Shape::try_new(dims)?))
    }

    pub fn from_layout(data: &'a [T], layout: Layout) -> Result<Self, InvariantError> {
        Enforcer::check_buffer(&layout, data.len())?;
        Ok(Self {
            data,
            layout,
            sparse: SparseMeta::default(),
        })
    }

    /// Rank-1 view over the whole buffer, usually reshaped right after.
    pub fn flat(data: &'a [T]) -> Self {
        Self {
            layout: Layout::contiguous(crate::shape![data.len()]),
            data,
            sparse: SparseMeta::default(),
        }
    }

    pub fn with_sparse(mut self, sparse: SparseMeta<'a>) -> Self {
        self.sparse = sparse;
        self
    }

    /// The buffer from this view's first element to the end of the backing store.
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    pub fn reshape(&mut self, dims: &[usize]) -> Result<(), InvariantError> {
        self.layout = reshaped(&self.layout, dims, self.data.len())?;
        Ok(())
    }

    pub fn transpose(&mut self) {
        self.layout.transpose();
    }

    /// Fixes the leading `idxs.len()` axes, yielding a lower rank view into the
    /// same buffer. Fixing every axis yields a rank-0 scalar view.
    pub fn constrain(&self, idxs: &[usize]) -> Result<MatView<'a, T>, InvariantError> {
        let (layout, offset) = self.layout.constrain(idxs)?;
        Ok(MatView {
            data: tail(self.data, offset)?,
            layout,
            sparse: self.sparse.constrain(idxs.len(), offset),
        })
    }

    pub fn get(&self, idxs: &[usize]) -> Result<T, InvariantError> {
        self.get_ref(idxs).copied()
    }

    pub fn get_ref(&self, idxs: &[usize]) -> Result<&'a T, InvariantError> {
        Enforcer::check_full_indices(&self.layout, idxs)?;
        Ok(&self.data[self.layout.offset(idxs)])
    }

    /// Adopts the shape of `src` while keeping this view's buffer.
    pub fn same_shape<V: Strided>(&mut self, src: &V) -> Result<(), InvariantError> {
        Enforcer::check_buffer(src.layout(), self.data.len())?;
        self.layout = src.layout().clone();
        self.sparse.assign_shape(src.sparse());
        Ok(())
    }

    /// Turns this view into an alias of `src`: same buffer, same shape.
    pub fn copy_shape(&mut self, src: &MatView<'a, T>) {
        *self = src.clone();
    }

    /// Elements in logical row-major order of this view's shape.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.layout
            .indices()
            .map(move |idx| self.data[self.layout.offset(&idx)])
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<'a, T: Element> MatViewMut<'a, T> {
    pub fn new(data: &'a mut [T], dims: &[usize]) -> Result<Self, InvariantError> {
        Self::from_layout(data, Layout::contiguous(Shape::try_new(dims)?))
    }

    pub fn from_layout(data: &'a mut [T], layout: Layout) -> Result<Self, InvariantError> {
        Enforcer::check_buffer(&layout, data.len())?;
        Ok(Self {
            data,
            layout,
            sparse: SparseMeta::default(),
        })
    }

    pub fn flat(data: &'a mut [T]) -> Self {
        Self {
            layout: Layout::contiguous(crate::shape![data.len()]),
            data,
            sparse: SparseMeta::default(),
        }
    }

    pub fn with_sparse(mut self, sparse: SparseMeta<'a>) -> Self {
        self.sparse = sparse;
        self
    }

    pub fn as_view(&self) -> MatView<'_, T> {
        MatView {
            data: &*self.data,
            layout: self.layout.clone(),
            sparse: self.sparse.clone(),
        }
    }

    pub fn into_view(self) -> MatView<'a, T> {
        MatView {
            data: self.data,
            layout: self.layout,
            sparse: self.sparse,
        }
    }

    pub fn data(&self) -> &[T] {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }

    pub fn reshape(&mut self, dims: &[usize]) -> Result<(), InvariantError> {
        self.layout = reshaped(&self.layout, dims, self.data.len())?;
        Ok(())
    }

    pub fn transpose(&mut self) {
        self.layout.transpose();
    }

    pub fn constrain(&self, idxs: &[usize]) -> Result<MatView<'_, T>, InvariantError> {
        self.as_view().constrain(idxs)
    }

    /// Mutable sub-view that reborrows this one.
    pub fn constrain_mut(&mut self, idxs: &[usize]) -> Result<MatViewMut<'_, T>, InvariantError> {
        let (layout, offset) = self.layout.constrain(idxs)?;
        let sparse = self.sparse.constrain(idxs.len(), offset);
        Ok(MatViewMut {
            data: tail_mut(self.data, offset)?,
            layout,
            sparse,
        })
    }

    /// Mutable sub-view that keeps the full buffer lifetime, consuming the parent.
    pub fn into_constrained(self, idxs: &[usize]) -> Result<MatViewMut<'a, T>, InvariantError> {
        let (layout, offset) = self.layout.constrain(idxs)?;
        let sparse = self.sparse.constrain(idxs.len(), offset);
        Ok(MatViewMut {
            data: tail_mut(self.data, offset)?,
            layout,
            sparse,
        })
    }

    pub fn get(&self, idxs: &[usize]) -> Result<T, InvariantError> {
        self.get_ref(idxs).copied()
    }

    pub fn get_ref(&self, idxs: &[usize]) -> Result<&T, InvariantError> {
        Enforcer::check_full_indices(&self.layout, idxs)?;
        Ok(&self.data[self.layout.offset(idxs)])
    }

    pub fn get_mut(&mut self, idxs: &[usize]) -> Result<&mut T, InvariantError> {
        Enforcer::check_full_indices(&self.layout, idxs)?;
        Ok(&mut self.data[self.layout.offset(idxs)])
    }

    pub fn set(&mut self, idxs: &[usize], value: T) -> Result<(), InvariantError> {
        *self.get_mut(idxs)? = value;
        Ok(())
    }

    pub fn same_shape<V: Strided>(&mut self, src: &V) -> Result<(), InvariantError> {
        Enforcer::check_buffer(src.layout(), self.data.len())?;
        self.layout = src.layout().clone();
        self.sparse.assign_shape(src.sparse());
        Ok(())
    }

    /// Writes `value` to every element addressed by the view.
    pub fn fill(&mut self, value: T) {
        for idx in self.layout.indices() {
            self.data[self.layout.offset(&idx)] = value;
        }
    }
}

fn reshaped(layout: &Layout, dims: &[usize], len: usize) -> Result<Layout, InvariantError> {
    let mut next = layout.clone();
    next.reshape(dims)?;
    Enforcer::check_buffer(&next, len)?;
    Ok(next)
}

fn tail<T>(data: &[T], offset: usize) -> Result<&[T], InvariantError> {
    let actual = data.len();
    data.get(offset..).ok_or(InvariantError::BufferTooSmall {
        required: offset,
        actual,
    })
}

fn tail_mut<T>(data: &mut [T], offset: usize) -> Result<&mut [T], InvariantError> {
    let actual = data.len();
    data.get_mut(offset..).ok_or(InvariantError::BufferTooSmall {
        required: offset,
        actual,
    })
}

impl<T> Strided for MatView<'_, T> {
    fn layout(&self) -> &Layout {
        &self.layout
    }

    fn sparse(&self) -> &SparseMeta<'_> {
        &self.sparse
    }
}

impl<T> Strided for MatViewMut<'_, T> {
    fn layout(&self) -> &Layout {
        &self.layout
    }

    fn sparse(&self) -> &SparseMeta<'_> {
        &self.sparse
    }
}

/// Unchecked fast path: the offset is computed without validating indices
/// against the dims (debug builds still assert). Indices past the end of the
/// buffer panic.
impl<T> Index<&[usize]> for MatView<'_, T> {
    type Output = T;

    fn index(&self, idxs: &[usize]) -> &Self::Output {
        &self.data[self.layout.offset(idxs)]
    }
}

impl<T, const N: usize> Index<[usize; N]> for MatView<'_, T> {
    type Output = T;

    fn index(&self, idxs: [usize; N]) -> &Self::Output {
        &self[&idxs[..]]
    }
}

impl<T> Index<&[usize]> for MatViewMut<'_, T> {
    type Output = T;

    fn index(&self, idxs: &[usize]) -> &Self::Output {
        &self.data[self.layout.offset(idxs)]
    }
}

impl<T, const N: usize> Index<[usize; N]> for MatViewMut<'_, T> {
    type Output = T;

    fn index(&self, idxs: [usize; N]) -> &Self::Output {
        &self[&idxs[..]]
    }
}

impl<T> IndexMut<&[usize]> for MatViewMut<'_, T> {
    fn index_mut(&mut self, idxs: &[usize]) -> &mut Self::Output {
        let offset = self.layout.offset(idxs);
        &mut self.data[offset]
    }
}

impl<T, const N: usize> IndexMut<[usize; N]> for MatViewMut<'_, T> {
    fn index_mut(&mut self, idxs: [usize; N]) -> &mut Self::Output {
        &mut self[&idxs[..]]
    }
}
