/* ************************************************************************ **
** This file is part of rsp2, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of rsp2 is provided under this permissive license, **
** and that the project as a whole is licensed under the GPL 3.0.           **
** ************************************************************************ */

//! Division of a term list into contiguous per-thread ranges.

use std::ops::Range;

/// The half-open range of terms handled by thread `tid` out of `nthreads`.
///
/// The first `n % nthreads` threads receive one extra term, so that range
/// lengths differ by at most one.  Concatenating the ranges of all threads in
/// order of `tid` yields exactly `0..n`.
///
/// # Panics
///
/// Panics if `nthreads == 0` or `tid >= nthreads`.
pub fn thread_range(n: usize, nthreads: usize, tid: usize) -> Range<usize> {
    assert!(nthreads > 0, "at least one thread is required");
    assert!(tid < nthreads, "thread id {} out of range for {} threads", tid, nthreads);

    let base = n / nthreads;
    let rem = n % nthreads;
    let start = tid * base + tid.min(rem);
    let len = base + (tid < rem) as usize;
    start..start + len
}

/// The ranges of every thread, in order of thread id.
pub fn thread_ranges(n: usize, nthreads: usize) -> Vec<Range<usize>> {
    (0..nthreads).map(|tid| thread_range(n, nthreads, tid)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_everything_once() {
        for n in 0..50 {
            for nthreads in 1..12 {
                let ranges = thread_ranges(n, nthreads);
                assert_eq!(ranges.len(), nthreads);

                let mut next = 0;
                for range in &ranges {
                    assert_eq!(range.start, next, "gap or overlap at n={}, t={}", n, nthreads);
                    next = range.end;
                }
                assert_eq!(next, n);

                let min = ranges.iter().map(|r| r.len()).min().unwrap();
                let max = ranges.iter().map(|r| r.len()).max().unwrap();
                assert!(max - min <= 1);
            }
        }
    }

    #[test]
    fn more_threads_than_terms() {
        assert_eq!(thread_ranges(2, 4), vec![0..1, 1..2, 2..2, 2..2]);
        assert_eq!(thread_ranges(0, 3), vec![0..0, 0..0, 0..0]);
    }

    #[test]
    fn uneven_split() {
        assert_eq!(thread_ranges(10, 4), vec![0..3, 3..6, 6..8, 8..10]);
        assert_eq!(thread_ranges(7, 1), vec![0..7]);
    }

    #[test]
    #[should_panic]
    fn zero_threads() { thread_range(5, 0, 0); }
}
