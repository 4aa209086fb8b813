//! Comparison of operands by value.
//!
//! Numeric primitives compare by mathematical value regardless of width or
//! signedness, so `1u32` equals `1u64` and `-1i8` is less than `0u128`. All other
//! operand pairs compare through their own `PartialEq` / `PartialOrd`
//! implementations. The choice is made at the macro call site (see [`dispatch`]).

use crate::format::Describe;
use std::cmp::Ordering;
use std::ops::Sub;

/// A numeric primitive widened to a common representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// Any signed integer.
    Signed(i128),
    /// Any unsigned integer.
    Unsigned(u128),
    /// Any floating-point value.
    Float(f64),
}

impl Number {
    /// Compares two numbers by mathematical value. Returns `None` when either is NaN.
    pub fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Signed(a), Self::Signed(b)) => Some(a.cmp(&b)),
            (Self::Unsigned(a), Self::Unsigned(b)) => Some(a.cmp(&b)),
            (Self::Signed(a), Self::Unsigned(b)) => Some(compare_signed_unsigned(a, b)),
            (Self::Unsigned(a), Self::Signed(b)) => {
                Some(compare_signed_unsigned(b, a).reverse())
            }
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(&b),
            (Self::Float(a), Self::Signed(b)) => compare_float_signed(a, b),
            (Self::Signed(a), Self::Float(b)) => compare_float_signed(b, a).map(Ordering::reverse),
            (Self::Float(a), Self::Unsigned(b)) => compare_float_unsigned(a, b),
            (Self::Unsigned(a), Self::Float(b)) => {
                compare_float_unsigned(b, a).map(Ordering::reverse)
            }
        }
    }
}

fn compare_signed_unsigned(a: i128, b: u128) -> Ordering {
    if a < 0 {
        Ordering::Less
    } else {
        (a as u128).cmp(&b)
    }
}

// The integer is first compared after rounding to f64. Only when that comparison
// is a tie is the float integral, in which case the exact integer comparison
// settles it.
fn compare_float_signed(a: f64, b: i128) -> Option<Ordering> {
    let approximate = a.partial_cmp(&(b as f64))?;
    if approximate != Ordering::Equal {
        return Some(approximate);
    }
    if a >= 2f64.powi(127) {
        return Some(Ordering::Greater);
    }
    Some((a as i128).cmp(&b))
}

fn compare_float_unsigned(a: f64, b: u128) -> Option<Ordering> {
    let approximate = a.partial_cmp(&(b as f64))?;
    if approximate != Ordering::Equal {
        return Some(approximate);
    }
    if a >= 2f64.powi(128) {
        return Some(Ordering::Greater);
    }
    Some((a as u128).cmp(&b))
}

/// Numeric primitives that compare by value across widths.
pub trait Numeric {
    /// Widens `self` to a [`Number`].
    fn to_number(&self) -> Number;
}

macro_rules! numeric {
    ($variant:ident as $wide:ty: $($t:ty),+) => {
        $(
            impl Numeric for $t {
                fn to_number(&self) -> Number {
                    Number::$variant(<$wide>::from(*self))
                }
            }
        )+
    };
}

numeric!(Signed as i128: i8, i16, i32, i64, i128);
numeric!(Unsigned as u128: u8, u16, u32, u64, u128);
numeric!(Float as f64: f32, f64);

impl Numeric for isize {
    fn to_number(&self) -> Number {
        Number::Signed(*self as i128)
    }
}

impl Numeric for usize {
    fn to_number(&self) -> Number {
        Number::Unsigned(*self as u128)
    }
}

impl<T: Numeric + ?Sized> Numeric for &T {
    fn to_number(&self) -> Number {
        (**self).to_number()
    }
}

/// Operand-pair probing used by the comparison assertions.
///
/// `(&Operands(a, b)).values_equal()` resolves to the numeric comparison when both
/// operand types are [`Numeric`], and to `PartialEq` otherwise; the ordering
/// traits work the same way with `PartialOrd`.
pub mod dispatch {
    use super::{Numeric, Ordering};

    /// A pair of operands under comparison.
    pub struct Operands<'a, A: ?Sized, B: ?Sized>(pub &'a A, pub &'a B);

    impl<A: ?Sized, B: ?Sized> Clone for Operands<'_, A, B> {
        fn clone(&self) -> Self {
            *self
        }
    }

    impl<A: ?Sized, B: ?Sized> Copy for Operands<'_, A, B> {}

    /// Equality of numeric operands by value.
    pub trait ViaNumericEq {
        /// Returns whether the operands are equal.
        fn values_equal(self) -> bool;
        /// Returns whether the operands differ.
        fn values_differ(self) -> bool;
    }

    impl<A: Numeric + ?Sized, B: Numeric + ?Sized> ViaNumericEq for &Operands<'_, A, B> {
        fn values_equal(self) -> bool {
            self.0.to_number().compare(self.1.to_number()) == Some(Ordering::Equal)
        }

        fn values_differ(self) -> bool {
            !self.values_equal()
        }
    }

    /// Equality through the operands' own `PartialEq`.
    pub trait ViaPartialEq {
        /// Returns whether the operands are equal.
        fn values_equal(self) -> bool;
        /// Returns whether the operands differ.
        fn values_differ(self) -> bool;
    }

    impl<A: PartialEq<B> + ?Sized, B: ?Sized> ViaPartialEq for Operands<'_, A, B> {
        fn values_equal(self) -> bool {
            PartialEq::eq(self.0, self.1)
        }

        fn values_differ(self) -> bool {
            PartialEq::ne(self.0, self.1)
        }
    }

    /// Ordering of numeric operands by value.
    pub trait ViaNumericOrd {
        /// Returns the ordering of the first operand relative to the second.
        fn value_ordering(self) -> Option<Ordering>;
    }

    impl<A: Numeric + ?Sized, B: Numeric + ?Sized> ViaNumericOrd for &Operands<'_, A, B> {
        fn value_ordering(self) -> Option<Ordering> {
            self.0.to_number().compare(self.1.to_number())
        }
    }

    /// Ordering through the operands' own `PartialOrd`.
    pub trait ViaPartialOrd {
        /// Returns the ordering of the first operand relative to the second.
        fn value_ordering(self) -> Option<Ordering>;
    }

    impl<A: PartialOrd<B> + ?Sized, B: ?Sized> ViaPartialOrd for Operands<'_, A, B> {
        fn value_ordering(self) -> Option<Ordering> {
            PartialOrd::partial_cmp(self.0, self.1)
        }
    }
}

/// The relation an ordering assertion checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    /// `lhs > rhs`
    Greater,
    /// `lhs >= rhs`
    GreaterOrEqual,
    /// `lhs < rhs`
    Less,
    /// `lhs <= rhs`
    LessOrEqual,
}

impl Relation {
    /// Returns whether `ordering` (of lhs relative to rhs) satisfies the relation.
    /// Unordered operands satisfy no relation.
    pub const fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Self::Greater, Some(Ordering::Greater))
            | (Self::GreaterOrEqual, Some(Ordering::Greater | Ordering::Equal))
            | (Self::Less, Some(Ordering::Less))
            | (Self::LessOrEqual, Some(Ordering::Less | Ordering::Equal)) => true,
            _ => false,
        }
    }
}

/// Floating-point kinds accepted by the closeness assertion.
pub trait Float: Copy + PartialOrd + Describe + Sub<Output = Self> {
    /// Returns the absolute value of `self`.
    fn magnitude(self) -> Self;
}

impl Float for f32 {
    fn magnitude(self) -> Self {
        self.abs()
    }
}

impl Float for f64 {
    fn magnitude(self) -> Self {
        self.abs()
    }
}

/// Returns whether `|lhs - rhs| < epsilon`. NaN operands are never close.
pub fn is_close<F: Float>(lhs: F, rhs: F, epsilon: F) -> bool {
    (lhs - rhs).magnitude() < epsilon
}

/// Compares two operands for equality, by value for numeric primitives.
///
/// ```
/// assert!(stf::values_equal!(1u32, 1u64));
/// assert!(stf::values_equal!("a", String::from("a")));
/// ```
#[macro_export]
macro_rules! values_equal {
    ($lhs:expr, $rhs:expr) => {{
        #[allow(unused_imports)]
        use $crate::compare::dispatch::{ViaNumericEq as _, ViaPartialEq as _};
        (&$crate::compare::dispatch::Operands(&$lhs, &$rhs)).values_equal()
    }};
}

#[cfg(test)]
mod tests {
    use super::dispatch::*;
    use super::*;

    #[derive(Debug, PartialEq, PartialOrd)]
    struct Meters(u32);

    #[test]
    fn test_cross_width_equality() {
        assert!(values_equal!(1u32, 1u64));
        assert!(values_equal!(1u8, 1i128));
        assert!(values_equal!(255u8, 255i16));
        assert!(!values_equal!(-1i32, u32::MAX));
        assert!(!values_equal!(-1i64, u128::MAX));
        assert!(values_equal!(2.0f32, 2u16));
        assert!(values_equal!(0.5f32, 0.5f64));
    }

    #[test]
    fn test_cross_width_ordering() {
        let ordering = (&Operands(&-1i8, &0u128)).value_ordering();
        assert_eq!(ordering, Some(Ordering::Less));

        let ordering = (&Operands(&u64::MAX, &-5i64)).value_ordering();
        assert_eq!(ordering, Some(Ordering::Greater));

        let ordering = (&Operands(&2.5f64, &2i32)).value_ordering();
        assert_eq!(ordering, Some(Ordering::Greater));

        let ordering = (&Operands(&f64::NAN, &2i32)).value_ordering();
        assert_eq!(ordering, None);
    }

    #[test]
    fn test_float_integer_exact_tie_break() {
        // 2^53 + 1 is not representable as f64; it rounds to 2^53.
        let big = (1i128 << 53) + 1;
        let float = 2f64.powi(53);
        assert_eq!(
            Number::Float(float).compare(Number::Signed(big)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::Unsigned(u128::MAX).compare(Number::Float(2f64.powi(128))),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_non_numeric_operands_use_own_relations() {
        assert!(values_equal!(Meters(3), Meters(3)));
        assert!(!values_equal!(Meters(3), Meters(4)));
        assert!((&Operands(&Meters(3), &Meters(4))).values_differ());

        let ordering = (&Operands(&Meters(5), &Meters(4))).value_ordering();
        assert_eq!(ordering, Some(Ordering::Greater));

        assert!(values_equal!(String::from("abc"), "abc"));
    }

    #[test]
    fn test_closeness_is_strict() {
        assert!(is_close(1.0f64, 1.05, 0.1));
        assert!(!is_close(1.0f64, 1.5, 0.5));
        assert!(is_close(-2.0f32, -2.25, 0.5));
        assert!(!is_close(f64::NAN, 1.0, 10.0));
    }

    #[test]
    fn test_relations() {
        assert!(Relation::Greater.holds(Some(Ordering::Greater)));
        assert!(!Relation::Greater.holds(Some(Ordering::Equal)));
        assert!(Relation::GreaterOrEqual.holds(Some(Ordering::Equal)));
        assert!(Relation::Less.holds(Some(Ordering::Less)));
        assert!(Relation::LessOrEqual.holds(Some(Ordering::Equal)));
        assert!(!Relation::LessOrEqual.holds(None));
    }
}
