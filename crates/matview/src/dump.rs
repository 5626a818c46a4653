use crate::{Element, Enforcer, InvariantError, MatView, Strided};

/// Printable grid of a 2D plane, see [`MatView::plane_dump`].
#[derive(Debug, Clone)]
pub struct PlaneDump<'a, T> {
    plane: MatView<'a, T>,
}

impl<T: Element> std::fmt::Display for PlaneDump<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (rows, cols) = (self.plane.shape()[0], self.plane.shape()[1]);
        writeln!(f, "=====================")?;
        writeln!(f, "Rows: {}", rows)?;
        writeln!(f, "Cols: {}", cols)?;
        for i in 0..rows {
            for j in 0..cols {
                write!(f, "{} ", self.plane[[i, j]])?;
            }
            writeln!(f)?;
        }
        write!(f, "done =====================")
    }
}

impl<'a, T: Element> MatView<'a, T> {
    /// The 2D plane addressed by the last two axes. For a rank 3 view the
    /// leading axis is fixed to `which`; a rank 2 view ignores it.
    pub fn plane(&self, which: usize) -> Result<MatView<'a, T>, InvariantError> {
        Enforcer::check_rank_range(self.layout(), 2..=3)?;
        if self.rank() == 3 {
            self.constrain(&[which])
        } else {
            Ok(self.clone())
        }
    }

    pub fn plane_dump(&self, which: usize) -> Result<PlaneDump<'a, T>, InvariantError> {
        Ok(PlaneDump {
            plane: self.plane(which)?,
        })
    }

    /// Logs the selected plane at info level.
    pub fn dump(&self, which: usize) -> Result<(), InvariantError> {
        let dump = self.plane_dump(which)?;
        log::info!("\n{}", dump);
        Ok(())
    }

    /// Copies the selected plane into `dst` in row-major order and returns the
    /// number of elements written.
    pub fn debug_extract(&self, which: usize, dst: &mut [T]) -> Result<usize, InvariantError> {
        let plane = self.plane(which)?;
        let required = plane.numel();
        if dst.len() < required {
            return Err(InvariantError::DestinationTooSmall {
                required,
                actual: dst.len(),
            });
        }
        for (slot, value) in dst.iter_mut().zip(plane.iter()) {
            *slot = value;
        }
        Ok(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fixed;

    #[test]
    fn test_dump_2d() {
        let _ = env_logger::builder().is_test(true).try_init();
        let buf = (0..6).collect::<Vec<i32>>();
        let view = MatView::new(&buf, &[2, 3]).unwrap();
        let expected = "=====================\nRows: 2\nCols: 3\n0 1 2 \n3 4 5 \ndone =====================";
        assert_eq!(view.plane_dump(7).unwrap().to_string(), expected);
        view.dump(0).unwrap();
    }

    #[test]
    fn test_dump_3d_selects_plane() {
        let buf = (0..12).collect::<Vec<i32>>();
        let view = MatView::new(&buf, &[2, 2, 3]).unwrap();
        let text = view.plane_dump(1).unwrap().to_string();
        assert!(text.contains("6 7 8 \n9 10 11 \n"));
    }

    #[test]
    fn test_dump_rejects_rank() {
        let buf = (0..6).collect::<Vec<i32>>();
        let view = MatView::new(&buf, &[6]).unwrap();
        assert!(matches!(
            view.dump(0),
            Err(InvariantError::RankMismatch { actual: 1, .. })
        ));
        let deep = MatView::new(&buf, &[1, 1, 2, 3]).unwrap();
        assert!(deep.plane(0).is_err());
        let cube = MatView::new(&buf, &[1, 2, 3]).unwrap();
        assert!(cube.plane(1).is_err());
    }

    #[test]
    fn test_debug_extract() {
        let buf = (0..12).map(|v| Fixed::from_int(v as i8)).collect::<Vec<_>>();
        let view = MatView::new(&buf, &[2, 2, 3]).unwrap();
        let mut dst = [Fixed::default(); 6];
        assert_eq!(view.debug_extract(1, &mut dst).unwrap(), 6);
        assert_eq!(&dst[..], &buf[6..]);

        let mut small = [Fixed::default(); 5];
        assert_eq!(
            view.debug_extract(0, &mut small),
            Err(InvariantError::DestinationTooSmall {
                required: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_debug_extract_transposed() {
        let buf = (0..6).collect::<Vec<i32>>();
        let mut view = MatView::new(&buf, &[2, 3]).unwrap();
        view.transpose();
        let mut dst = [0; 6];
        view.debug_extract(0, &mut dst).unwrap();
        assert_eq!(dst, [0, 3, 1, 4, 2, 5]);
    }
}
