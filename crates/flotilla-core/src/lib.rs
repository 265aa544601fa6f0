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


//! # Flotilla Core
//!
//! Foundational building blocks shared by the Flotilla crates: the numeric
//! bound for solution costs and the splitting capability used to replicate
//! stateful objects across worker threads.
//!
//! ## Modules
//!
//! - `num`: The `Cost` trait, a single bound covering both integer and
//!   floating-point cost domains, with the "no solution yet" sentinel.
//! - `split`: The `Splittable` capability that produces an independent copy of
//!   a stateful, non-thread-safe object for use on another thread.
//! - `random`: `SplittableRng`, a ChaCha-backed generator whose splits are
//!   deterministic and statistically independent of the parent stream.

pub mod num;
pub mod random;
pub mod split;
