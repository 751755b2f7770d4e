//! Row-parallel iteration.
//!
//! With the `parallel` feature rows are handed to rayon; without it they
//! run in order on the calling thread. Each row is computed independently,
//! so both paths produce identical output.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `f(row_index, row)` for every `row_len`-sized chunk of `data`.
#[cfg(feature = "parallel")]
pub(crate) fn for_each_row<T, F>(data: &mut [T], row_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

/// Calls `f(row_index, row)` for every `row_len`-sized chunk of `data`.
#[cfg(not(feature = "parallel"))]
pub(crate) fn for_each_row<T, F>(data: &mut [T], row_len: usize, f: F)
where
    F: Fn(usize, &mut [T]),
{
    data.chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}
