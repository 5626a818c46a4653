use std::fmt::{Debug, Display};

use bytemuck::{Pod, Zeroable};

/// A value that can live in a view's buffer.
///
/// Views only ever copy, compare and subtract elements, so the bound is kept to
/// what the comparators need.
pub trait Element:
    Copy + Debug + Display + PartialEq + PartialOrd + num_traits::Zero + Pod + Send + Sync + 'static
{
    /// Magnitude of the difference between `self` and `other`, independent of
    /// which one is larger.
    fn abs_diff(self, other: Self) -> Self;

    /// Exact equality used by the comparators. Unlike `==` it is reflexive for
    /// every value, so a NaN matches an identical NaN.
    fn same(self, other: Self) -> bool {
        self == other
    }
}

macro_rules! impl_element_int {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                fn abs_diff(self, other: Self) -> Self {
                    if self > other {
                        self.saturating_sub(other)
                    } else {
                        other.saturating_sub(self)
                    }
                }
            }
        )*
    };
}

impl_element_int!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! impl_element_float {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                fn abs_diff(self, other: Self) -> Self {
                    (self - other).abs()
                }

                fn same(self, other: Self) -> bool {
                    self == other || self.to_bits() == other.to_bits()
                }
            }
        )*
    };
}

impl_element_float!(f32, f64);

#[cfg(feature = "half")]
impl Element for half::f16 {
    fn abs_diff(self, other: Self) -> Self {
        if self > other {
            self - other
        } else {
            other - self
        }
    }

    fn same(self, other: Self) -> bool {
        self == other || self.to_bits() == other.to_bits()
    }
}

#[cfg(feature = "half")]
impl Element for half::bf16 {
    fn abs_diff(self, other: Self) -> Self {
        if self > other {
            self - other
        } else {
            other - self
        }
    }

    fn same(self, other: Self) -> bool {
        self == other || self.to_bits() == other.to_bits()
    }
}

/// Signed Q8.8 fixed point number.
///
/// Arithmetic saturates at the representable range.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Fixed(i16);

impl Fixed {
    pub const FRAC_BITS: u32 = 8;
    pub const ONE: Fixed = Fixed(1 << Self::FRAC_BITS);
    pub const MIN: Fixed = Fixed(i16::MIN);
    pub const MAX: Fixed = Fixed(i16::MAX);
    /// Smallest positive step.
    pub const EPSILON: Fixed = Fixed(1);

    pub const fn from_bits(bits: i16) -> Self {
        Self(bits)
    }

    pub const fn to_bits(self) -> i16 {
        self.0
    }

    pub fn from_int(v: i8) -> Self {
        Self((v as i16) << Self::FRAC_BITS)
    }

    pub fn from_f32(v: f32) -> Self {
        let scaled = (v * (1 << Self::FRAC_BITS) as f32).round();
        Self(scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16)
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / (1 << Self::FRAC_BITS) as f32
    }
}

impl std::ops::Add for Fixed {
    type Output = Fixed;

    fn add(self, rhs: Self) -> Self::Output {
        Fixed(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::Sub for Fixed {
    type Output = Fixed;

    fn sub(self, rhs: Self) -> Self::Output {
        Fixed(self.0.saturating_sub(rhs.0))
    }
}

impl num_traits::Zero for Fixed {
    fn zero() -> Self {
        Fixed(0)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Element for Fixed {
    fn abs_diff(self, other: Self) -> Self {
        if self > other {
            self - other
        } else {
            other - self
        }
    }
}

impl From<i8> for Fixed {
    fn from(v: i8) -> Self {
        Self::from_int(v)
    }
}

impl Debug for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fixed({})", self.to_f32())
    }
}

impl Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}
