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


//! Restart schedules.
//!
//! A schedule decides the run length of each restart a driver performs. The
//! constant schedule gives every restart the same budget; the Luby schedule
//! follows the universal sequence of Luby, Sinclair and Zuckerman
//! (1, 1, 2, 1, 1, 2, 4, 1, 1, 2, ...) scaled by a base length, which hedges
//! against not knowing the right run length in advance.

/// Supplies the run length of successive restarts.
pub trait RestartSchedule: Send + std::fmt::Debug {
    /// Returns the run length for the next restart and advances the schedule.
    fn next_run_length(&mut self) -> u64;

    /// Rewinds the schedule to its first run length.
    fn reset(&mut self);
}

/// Every restart gets the same run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantRestartSchedule {
    run_length: u64,
}

impl ConstantRestartSchedule {
    /// Creates a schedule that always returns `run_length`.
    #[inline]
    pub fn new(run_length: u64) -> Self {
        Self { run_length }
    }

    /// Returns the constant run length.
    #[inline]
    pub fn run_length(&self) -> u64 {
        self.run_length
    }
}

impl RestartSchedule for ConstantRestartSchedule {
    #[inline]
    fn next_run_length(&mut self) -> u64 {
        self.run_length
    }

    #[inline]
    fn reset(&mut self) {}
}

/// Run lengths follow the Luby sequence scaled by `base`.
///
/// Uses Knuth's "reluctant doubling" pair `(u, v)`: the current term is `v`;
/// when `u & -u == v` the sequence restarts at 1 with `u + 1`, otherwise `v`
/// doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LubyRestartSchedule {
    base: u64,
    u: u64,
    v: u64,
}

impl LubyRestartSchedule {
    /// Creates a Luby schedule with the given base run length.
    ///
    /// # Panics
    ///
    /// Panics if `base` is zero.
    #[inline]
    pub fn new(base: u64) -> Self {
        assert!(
            base > 0,
            "called `LubyRestartSchedule::new()` with invalid base: {}. Must be positive",
            base
        );
        Self { base, u: 1, v: 1 }
    }

    /// Returns the base run length.
    #[inline]
    pub fn base(&self) -> u64 {
        self.base
    }
}

impl RestartSchedule for LubyRestartSchedule {
    fn next_run_length(&mut self) -> u64 {
        let current = self.v;
        if (self.u & self.u.wrapping_neg()) == self.v {
            self.u += 1;
            self.v = 1;
        } else {
            self.v <<= 1;
        }
        self.base.saturating_mul(current)
    }

    #[inline]
    fn reset(&mut self) {
        self.u = 1;
        self.v = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{ConstantRestartSchedule, LubyRestartSchedule, RestartSchedule};
    use proptest::prelude::*;

    /// Reference recursive definition of the Luby sequence (1-indexed).
    fn luby(i: u64) -> u64 {
        let mut k = 1;
        while (1u64 << k) - 1 < i {
            k += 1;
        }
        if i == (1u64 << k) - 1 {
            1u64 << (k - 1)
        } else {
            luby(i - (1u64 << (k - 1)) + 1)
        }
    }

    #[test]
    fn test_constant_schedule() {
        let mut s = ConstantRestartSchedule::new(1000);
        assert_eq!(s.run_length(), 1000);
        for _ in 0..5 {
            assert_eq!(s.next_run_length(), 1000);
        }
        s.reset();
        assert_eq!(s.next_run_length(), 1000);
    }

    #[test]
    fn test_luby_prefix() {
        let mut s = LubyRestartSchedule::new(1);
        let prefix: Vec<u64> = (0..15).map(|_| s.next_run_length()).collect();
        assert_eq!(prefix, vec![1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8]);
    }

    #[test]
    fn test_luby_scaled_and_reset() {
        let mut s = LubyRestartSchedule::new(100);
        assert_eq!(s.base(), 100);
        let first: Vec<u64> = (0..7).map(|_| s.next_run_length()).collect();
        assert_eq!(first, vec![100, 100, 200, 100, 100, 200, 400]);
        s.reset();
        assert_eq!(s.next_run_length(), 100);
        assert_eq!(s.next_run_length(), 100);
        assert_eq!(s.next_run_length(), 200);
    }

    #[test]
    #[should_panic(expected = "invalid base")]
    fn test_luby_rejects_zero_base() {
        let _ = LubyRestartSchedule::new(0);
    }

    proptest! {
        #[test]
        fn prop_luby_matches_reference(n in 1usize..300, base in 1u64..50) {
            let mut s = LubyRestartSchedule::new(base);
            for i in 1..=n as u64 {
                prop_assert_eq!(s.next_run_length(), base * luby(i));
            }
        }
    }
}
