mod compare;
mod dtype;
mod dump;
mod enforcer;
mod layout;
mod shape;
mod sparse;
mod strides;
mod view;

pub use compare::*;
pub use dtype::*;
pub use dump::*;
pub use enforcer::*;
pub use layout::*;
pub use shape::*;
pub use sparse::*;
pub use strides::*;
pub use view::*;

use smallvec::SmallVec;

/// Maximum number of axes a view can carry.
pub const MAX_RANK: usize = 10;

/// Inline storage for per-axis metadata. Never spills for a valid rank.
pub type RVec<T> = SmallVec<[T; MAX_RANK]>;

//https://github.com/sonos/tract/blob/main/data/src/macros.rs#L2
#[macro_export]
macro_rules! rvec {
    (@one $x:expr) => (1usize);
    ($elem:expr; $n:expr) => ({
        $crate::RVec::from_elem($elem, $n)
    });
    ($($x:expr),*$(,)*) => ({
        let count = 0usize $(+ $crate::rvec![@one $x])*;
        #[allow(unused_mut)]
        let mut vec = $crate::RVec::new();
        if count <= vec.inline_size() {
            $(vec.push($x);)*
            vec
        } else {
            $crate::RVec::from_vec(vec![$($x,)*])
        }
    });
}

/// Builds a [`Shape`]. Panics if more than [`MAX_RANK`] dims are given.
#[macro_export]
macro_rules! shape {
    ($($x:expr),*$(,)*) => ({
        use $crate::rvec;
        $crate::Shape::new(rvec![$($x,)*])
    });
}

pub mod prelude {
    pub use crate::{rvec, shape, Element, Fixed, MatView, MatViewMut, Shape, Strided, MAX_RANK};
}
