// Tropical semiring weights.

/// Weight in the tropical semiring (min, +).
///
/// Zero is positive infinity and marks a non-accepting state; one is `0.0`.
/// Analyses are never ranked by weight, so the only question this crate asks
/// of a weight is whether it is zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TropicalWeight(pub f32);

impl TropicalWeight {
    /// The additive identity (non-final).
    #[inline]
    pub const fn zero() -> Self {
        Self(f32::INFINITY)
    }

    /// The multiplicative identity.
    #[inline]
    pub const fn one() -> Self {
        Self(0.0)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == f32::INFINITY
    }

    /// Semiring product: weights add along a path.
    #[inline]
    pub fn times(self, other: Self) -> Self {
        if self.is_zero() || other.is_zero() {
            Self::zero()
        } else {
            Self(self.0 + other.0)
        }
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for TropicalWeight {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<f32> for TropicalWeight {
    fn from(value: f32) -> Self {
        Self(value)
    }
}
