//! Parallel or sequential iteration behind one API.
//!
//! With the `parallel` feature the per-row kernels and the per-photo assembler
//! run on rayon's pool. Without it, `into_par_iter()` is plain `into_iter()`,
//! so the same `.map()`/`.flat_map()`/`.collect()` chains compile against
//! `std::iter::Iterator` and run on the calling thread.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
pub use sequential::IntoParallelIterator;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Sequential stand-in for `rayon::iter::IntoParallelIterator`.
    pub trait IntoParallelIterator: IntoIterator + Sized {
        fn into_par_iter(self) -> Self::IntoIter {
            self.into_iter()
        }
    }

    impl<I: IntoIterator> IntoParallelIterator for I {}
}
