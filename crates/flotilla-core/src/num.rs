// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.


//! # Cost Numeric Trait
//!
//! Unified numeric bound for solution costs. Search problems come with integer
//! costs (makespans, tardiness) as well as floating-point costs (continuous
//! objectives), and the orchestration layer must handle both without rounding
//! integers through `f64`. `Cost` collects the required capabilities into a
//! single alias so generic signatures stay short.
//!
//! ## Highlights
//!
//! - `Cost::worst()` is the sentinel for "no solution recorded yet" and equals
//!   `Bounded::max_value()` of the domain (`i64::MAX`, `f64::MAX`, ...).
//! - `Cost::as_f64()` is a lossy view for reporting and heuristics only. It is
//!   never used to decide whether a candidate improves on the incumbent.
//! - `Send + Sync + 'static` so costs can cross worker threads freely.

use num_traits::{Bounded, ToPrimitive};

/// A trait alias for numeric types usable as solution costs.
/// Lower is better. Implemented for every primitive integer and float type.
///
/// # Note
///
/// Floating-point costs only admit a partial order. A `NaN` cost never compares
/// as an improvement, so it can never be installed as the best known cost.
pub trait Cost:
    Bounded
    + ToPrimitive
    + PartialOrd
    + Copy
    + std::fmt::Debug
    + std::fmt::Display
    + Send
    + Sync
    + 'static
{
    /// Returns the worst representable cost, used before any solution exists.
    #[inline]
    fn worst() -> Self {
        Self::max_value()
    }

    /// Returns the cost as `f64`, or `NaN` if it cannot be represented.
    #[inline]
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    /// Returns `true` if `self` is strictly better (lower) than `other`.
    #[inline]
    fn improves_on(self, other: Self) -> bool {
        self < other
    }
}

impl<T> Cost for T where
    T: Bounded
        + ToPrimitive
        + PartialOrd
        + Copy
        + std::fmt::Debug
        + std::fmt::Display
        + Send
        + Sync
        + 'static
{
}

#[cfg(test)]
mod tests {
    use super::Cost;

    #[test]
    fn test_worst_is_domain_maximum() {
        assert_eq!(<i32 as Cost>::worst(), i32::MAX);
        assert_eq!(<i64 as Cost>::worst(), i64::MAX);
        assert_eq!(<f64 as Cost>::worst(), f64::MAX);
        assert_eq!(<u32 as Cost>::worst(), u32::MAX);
    }

    #[test]
    fn test_as_f64_converts_integers_and_floats() {
        assert_eq!(42i64.as_f64(), 42.0);
        assert_eq!((-7i32).as_f64(), -7.0);
        assert_eq!(2.5f32.as_f64(), 2.5);
        assert!(f64::NAN.as_f64().is_nan());
    }

    #[test]
    fn test_improves_on_is_strict() {
        assert!(3i64.improves_on(4));
        assert!(!4i64.improves_on(4));
        assert!(!5i64.improves_on(4));
        assert!(1.5f64.improves_on(1.75));
        assert!(!f64::NAN.improves_on(1.0));
        assert!(!1.0f64.improves_on(f64::NAN));
    }

    #[test]
    fn test_large_integers_keep_precision() {
        // Neighbouring i64 values above 2^53 collapse in f64 but not as costs.
        let a: i64 = (1 << 60) + 1;
        let b: i64 = 1 << 60;
        assert_eq!(a.as_f64(), b.as_f64());
        assert!(b.improves_on(a));
    }
}
