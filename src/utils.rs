//! Common utilities used across the crate.

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// When `Parallel`, batch operations may use `rayon` parallel iterators on the
/// current pool. When `Sequential`, they iterate on the calling thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    #[default]
    Parallel,
}

impl Parallelism {
    /// Map `f` over `iter`, preserving order.
    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        match self {
            Parallelism::Parallel => iter.into_par_iter().map(f).collect(),
            Parallelism::Sequential => iter.into_iter().map(f).collect(),
        }
    }
}
