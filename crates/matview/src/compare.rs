use crate::{Element, MatView, Strided};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompareError {
    #[error("Element count mismatch, {left} != {right}.")]
    NumelMismatch { left: usize, right: usize },
    #[error("Buffer holds {actual} elements but the view counts {numel}.")]
    BufferTooShort { numel: usize, actual: usize },
    #[error("{fail_count} elements differ, first at index {index}: {left} vs {right}.")]
    ValueMismatch {
        index: usize,
        left: String,
        right: String,
        fail_count: usize,
    },
}

/// Summary of an element-wise comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseStats<T> {
    pub element_count: usize,
    pub fail_count: usize,
    pub max_abs_error: T,
    pub max_abs_error_index: Option<usize>,
    first_failure: Option<(usize, T, T)>,
}

impl<T: Element> CloseStats<T> {
    fn new() -> Self {
        Self {
            element_count: 0,
            fail_count: 0,
            max_abs_error: T::zero(),
            max_abs_error_index: None,
            first_failure: None,
        }
    }

    fn update(&mut self, index: usize, a: T, b: T, matches: bool) {
        let abs_diff = a.abs_diff(b);
        self.element_count += 1;

        if abs_diff > self.max_abs_error {
            self.max_abs_error = abs_diff;
            self.max_abs_error_index = Some(index);
        }

        if !matches {
            self.fail_count += 1;
            if self.first_failure.is_none() {
                self.first_failure = Some((index, a, b));
            }
        }
    }

    fn into_result(self) -> Result<Self, CompareError> {
        match self.first_failure {
            Some((index, left, right)) => Err(CompareError::ValueMismatch {
                index,
                left: left.to_string(),
                right: right.to_string(),
                fail_count: self.fail_count,
            }),
            None => Ok(self),
        }
    }
}

/// The leading `numel` elements of both buffers, in raw buffer order.
///
/// Strides are ignored on purpose: two views compare equal when their
/// flattened storage matches, only the element counts have to agree.
fn flattened<'v, T: Element>(
    a: &MatView<'v, T>,
    b: &MatView<'v, T>,
) -> Result<(&'v [T], &'v [T]), CompareError> {
    let (left, right) = (a.numel(), b.numel());
    if left != right {
        return Err(CompareError::NumelMismatch { left, right });
    }
    let take = |view: &MatView<'v, T>| {
        let data = view.data();
        data.get(..left).ok_or(CompareError::BufferTooShort {
            numel: left,
            actual: data.len(),
        })
    };
    Ok((take(a)?, take(b)?))
}

fn compare<T: Element>(
    a: &MatView<'_, T>,
    b: &MatView<'_, T>,
    matches: impl Fn(T, T) -> bool,
) -> Result<CloseStats<T>, CompareError> {
    let (lhs, rhs) = flattened(a, b)?;
    let mut stats = CloseStats::new();
    for (index, (&x, &y)) in lhs.iter().zip(rhs.iter()).enumerate() {
        stats.update(index, x, y, matches(x, y));
    }
    stats.into_result()
}

/// Exact element-wise equality of the flattened buffers, see [`Element::same`].
pub fn ensure_same<T: Element>(
    a: &MatView<'_, T>,
    b: &MatView<'_, T>,
) -> Result<CloseStats<T>, CompareError> {
    compare(a, b, |x, y| x.same(y))
}

/// Element-wise closeness of the flattened buffers. A pair matches when it is
/// identical or its absolute difference is strictly below `tolerance`.
pub fn ensure_close<T: Element>(
    a: &MatView<'_, T>,
    b: &MatView<'_, T>,
    tolerance: T,
) -> Result<CloseStats<T>, CompareError> {
    compare(a, b, |x, y| x.same(y) || x.abs_diff(y) < tolerance)
}

pub fn same_values<T: Element>(a: &MatView<'_, T>, b: &MatView<'_, T>) -> bool {
    match ensure_same(a, b) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("NOT SAME: {}", e);
            false
        }
    }
}

pub fn close_values<T: Element>(a: &MatView<'_, T>, b: &MatView<'_, T>, tolerance: T) -> bool {
    match ensure_close(a, b, tolerance) {
        Ok(stats) => {
            log::debug!(
                "All close - MAE={} at {:?}",
                stats.max_abs_error,
                stats.max_abs_error_index
            );
            true
        }
        Err(e) => {
            log::warn!("NOT CLOSE: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rvec, shape, Fixed, Layout, Strides};
    use test_strategy::proptest;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_same_values_reflexive() {
        init_logger();
        let buf = (0..12).collect::<Vec<i32>>();
        let view = MatView::new(&buf, &[3, 4]).unwrap();
        assert!(same_values(&view, &view));
    }

    #[test]
    fn test_same_values_ignores_shape() {
        init_logger();
        let buf = (0..12).collect::<Vec<i32>>();
        let a = MatView::new(&buf, &[3, 4]).unwrap();
        let b = MatView::new(&buf, &[2, 6]).unwrap();
        assert!(same_values(&a, &b));

        let mut t = a.clone();
        t.transpose();
        // Raw buffer order, so a transposed alias still matches.
        assert!(same_values(&a, &t));
    }

    #[test]
    fn test_numel_mismatch() {
        init_logger();
        let buf = (0..12).collect::<Vec<i32>>();
        let a = MatView::new(&buf, &[3, 4]).unwrap();
        let b = MatView::new(&buf, &[3, 3]).unwrap();
        assert!(!same_values(&a, &b));
        assert_eq!(
            ensure_same(&a, &b).unwrap_err(),
            CompareError::NumelMismatch { left: 12, right: 9 }
        );
        assert!(!close_values(&a, &b, 100));
    }

    #[test]
    fn test_value_mismatch_report() {
        init_logger();
        let a = vec![1, 2, 3, 4];
        let b = vec![1, 9, 3, 0];
        let (va, vb) = (
            MatView::new(&a, &[2, 2]).unwrap(),
            MatView::new(&b, &[2, 2]).unwrap(),
        );
        assert!(!same_values(&va, &vb));
        match ensure_same(&va, &vb).unwrap_err() {
            CompareError::ValueMismatch {
                index, fail_count, ..
            } => {
                assert_eq!(index, 1);
                assert_eq!(fail_count, 2);
            }
            e => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn test_close_values_tolerance_is_strict() {
        init_logger();
        let a = [1.0f32, 2.0, 3.0];
        let b = [1.5f32, 2.0, 2.5];
        let (va, vb) = (
            MatView::new(&a, &[3]).unwrap(),
            MatView::new(&b, &[3]).unwrap(),
        );
        assert!(!close_values(&va, &vb, 0.5));
        assert!(close_values(&va, &vb, 0.51));
        // Order of operands does not matter.
        assert!(close_values(&vb, &va, 0.51));
        let stats = ensure_close(&va, &vb, 0.51).unwrap();
        assert_eq!(stats.max_abs_error, 0.5);
        assert_eq!(stats.max_abs_error_index, Some(0));
    }

    #[test]
    fn test_close_values_fixed() {
        init_logger();
        let a = [Fixed::from_f32(0.5), Fixed::from_f32(-1.0)];
        let b = [Fixed::from_f32(0.5), Fixed::from_f32(-1.0) + Fixed::EPSILON];
        let (va, vb) = (
            MatView::new(&a, &[2]).unwrap(),
            MatView::new(&b, &[2]).unwrap(),
        );
        assert!(!same_values(&va, &vb));
        assert!(!close_values(&va, &vb, Fixed::EPSILON));
        assert!(close_values(&va, &vb, Fixed::EPSILON + Fixed::EPSILON));
    }

    #[test]
    fn test_constrained_compares_raw_tail() {
        init_logger();
        let buf = (0..6).collect::<Vec<i32>>();
        let mut col = MatView::new(&buf, &[2, 3]).unwrap();
        col.transpose();
        let last_col = col.constrain(&[2]).unwrap();
        // Logically [2, 5], but the comparison walks buf[2..4].
        assert_eq!(last_col.to_vec(), vec![2, 5]);
        assert!(same_values(&last_col, &MatView::new(&buf[2..], &[2]).unwrap()));
        assert!(!same_values(&last_col, &MatView::new(&buf[..2], &[2]).unwrap()));
    }

    #[test]
    fn test_buffer_too_short() {
        init_logger();
        let buf = [7i32];
        let layout = Layout::from_parts(shape![4], Strides::from(rvec![0])).unwrap();
        let broadcast = MatView::from_layout(&buf, layout).unwrap();
        let other = [7i32; 4];
        let other = MatView::new(&other, &[4]).unwrap();
        assert_eq!(
            ensure_same(&broadcast, &other).unwrap_err(),
            CompareError::BufferTooShort {
                numel: 4,
                actual: 1
            }
        );
    }

    #[test]
    fn test_nan_compares_to_itself() {
        init_logger();
        let a = [1.0f32, f32::NAN, -0.0];
        let view = MatView::new(&a, &[3]).unwrap();
        assert!(same_values(&view, &view));
        assert!(close_values(&view, &view, 0.0));

        let b = [1.0f32, 2.0, 0.0];
        let other = MatView::new(&b, &[3]).unwrap();
        assert!(!same_values(&view, &other));
        assert_eq!(close_values(&view, &other, 0.0), same_values(&view, &other));
        assert!(!close_values(&view, &other, 10.0));
    }

    #[proptest(cases = 64)]
    fn test_zero_tolerance_matches_same(
        #[strategy(proptest::collection::vec(-3i32..3, 1..16))] a: Vec<i32>,
        #[strategy(proptest::collection::vec(-3i32..3, #a.len()))] b: Vec<i32>,
    ) {
        let (va, vb) = (
            MatView::new(&a, &[a.len()]).unwrap(),
            MatView::new(&b, &[b.len()]).unwrap(),
        );
        assert_eq!(close_values(&va, &vb, 0), same_values(&va, &vb));
    }
}
