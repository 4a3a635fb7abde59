use std::fmt::Debug;

use num_traits::{Bounded, Float, FromPrimitive, NumCast, ToPrimitive};

/// A trait for types that can be used for indexed coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Subdivision bisects node
/// rectangles at their midpoint, so only floating point coordinates are supported.
pub trait IndexableNum:
    private::Sealed
    + Float
    + FromPrimitive
    + NumCast
    + ToPrimitive
    + Bounded
    + Default
    + Debug
    + Send
    + Sync
    + 'static
{
    /// The midpoint between `a` and `b`.
    #[inline]
    fn midpoint(a: Self, b: Self) -> Self {
        (a + b) / (Self::one() + Self::one())
    }
}

impl IndexableNum for f32 {}

impl IndexableNum for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
