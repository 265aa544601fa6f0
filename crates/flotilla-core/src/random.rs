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


//! Splittable pseudo-random number generation.
//!
//! `SplittableRng` wraps `ChaCha8Rng`. Splitting draws a full 256-bit seed
//! from the parent stream, so a tree of generators derived from one root seed
//! is reproducible while every child stream is independent of its parent and
//! of its siblings.

use crate::split::Splittable;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A deterministic random number generator that supports `split`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplittableRng {
    rng: ChaCha8Rng,
}

impl SplittableRng {
    /// Creates a generator from a 64-bit seed.
    #[inline]
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from the thread-local entropy source.
    #[inline]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }
}

impl Default for SplittableRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RngCore for SplittableRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}

impl Splittable for SplittableRng {
    fn split(&mut self) -> Self {
        let mut seed = <ChaCha8Rng as SeedableRng>::Seed::default();
        self.rng.fill_bytes(&mut seed);
        Self {
            rng: ChaCha8Rng::from_seed(seed),
        }
    }
}
