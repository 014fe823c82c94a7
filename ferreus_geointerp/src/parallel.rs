/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides the range-partitioned worker dispatch used by every vectorized query.
//
// Created on: 21 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # parallel
//!
//! Deterministic range partitioning of an output index space over rayon
//! workers. Every exposed call is synchronous: the helpers below return only
//! after all workers complete. `num_threads == 0` selects all logical CPUs
//! and `1` runs strictly sequentially. Each output element is computed by
//! exactly one worker with the same arithmetic sequence, so pure queries are
//! bit-exact regardless of the worker count.

use crate::error::{Error, Result};
use rayon::prelude::*;

/// Resolves the requested worker count against the hardware concurrency.
pub fn get_num_threads(num_threads: usize) -> usize {
    match num_threads == 0 {
        true => std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
        false => num_threads,
    }
}

/// Length of the contiguous chunk assigned to each worker.
#[inline]
fn chunk_length(size: usize, threads: usize) -> usize {
    size.div_ceil(threads).max(1)
}

/// Evaluates `f` for every index in `0..size` and collects the results in
/// order. Worker errors are captured; after all ranges complete, the last
/// captured error is returned and partial results are discarded.
pub fn try_map<R, F>(size: usize, num_threads: usize, f: F) -> Result<Vec<R>>
where
    R: Send,
    F: Fn(usize) -> Result<R> + Send + Sync,
{
    let threads = get_num_threads(num_threads);
    if threads <= 1 || size <= 1 {
        return (0..size).map(f).collect();
    }

    let chunk = chunk_length(size, threads);
    let ranges: Vec<_> = (0..size)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(size))
        .collect();

    let partial: Vec<Result<Vec<R>>> = ranges
        .into_par_iter()
        .map(|range| range.map(&f).collect())
        .collect();

    let mut out = Vec::with_capacity(size);
    let mut last_error: Option<Error> = None;
    for result in partial {
        match result {
            Ok(values) => out.extend(values),
            Err(error) => last_error = Some(error),
        }
    }
    match last_error {
        Some(error) => Err(error),
        None => Ok(out),
    }
}

/// Like [`try_map`], but each worker range owns a scratch state built by
/// `init` and reset-reused across its indices (e.g. a spline workspace).
pub fn try_map_with<R, S, F, I>(
    size: usize,
    num_threads: usize,
    init: I,
    f: F,
) -> Result<Vec<R>>
where
    R: Send,
    S: Send,
    I: Fn() -> S + Send + Sync,
    F: Fn(&mut S, usize) -> Result<R> + Send + Sync,
{
    let threads = get_num_threads(num_threads);
    if threads <= 1 || size <= 1 {
        let mut state = init();
        return (0..size).map(|index| f(&mut state, index)).collect();
    }

    let chunk = chunk_length(size, threads);
    let ranges: Vec<_> = (0..size)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(size))
        .collect();

    let partial: Vec<Result<Vec<R>>> = ranges
        .into_par_iter()
        .map(|range| {
            let mut state = init();
            range.map(|index| f(&mut state, index)).collect()
        })
        .collect();

    let mut out = Vec::with_capacity(size);
    let mut last_error: Option<Error> = None;
    for result in partial {
        match result {
            Ok(values) => out.extend(values),
            Err(error) => last_error = Some(error),
        }
    }
    match last_error {
        Some(error) => Err(error),
        None => Ok(out)
    }
}

/// Runs `worker` over contiguous chunks of `output`, each aligned to a
/// multiple of `align` elements, and collects one reduction value per chunk.
///
/// The worker receives the starting element index of its chunk and the
/// mutable chunk itself; shared inputs are captured by the closure.
pub fn dispatch_reduce<T, R, F>(
    output: &mut [T],
    align: usize,
    num_threads: usize,
    worker: F,
) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(usize, &mut [T]) -> R + Send + Sync,
{
    debug_assert!(align >= 1);
    debug_assert_eq!(output.len() % align, 0);

    let threads = get_num_threads(num_threads);
    let rows = output.len() / align;
    if threads <= 1 || rows <= 1 {
        return vec![worker(0, output)];
    }

    let chunk = chunk_length(rows, threads) * align;
    output
        .par_chunks_mut(chunk)
        .enumerate()
        .map(|(index, slice)| worker(index * chunk, slice))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_map_preserves_order() {
        for num_threads in [1, 2, 4, 0] {
            let out = try_map(1000, num_threads, |i| Ok(i * i)).unwrap();
            assert_eq!(out.len(), 1000);
            for (i, v) in out.iter().enumerate() {
                assert_eq!(*v, i * i);
            }
        }
    }

    #[test]
    fn try_map_returns_identical_results_for_any_worker_count() {
        let f = |i: usize| Ok((i as f64).sin().exp());
        let sequential = try_map(257, 1, f).unwrap();
        for num_threads in [2, 3, 8, 0] {
            let parallel = try_map(257, num_threads, f).unwrap();
            assert_eq!(sequential, parallel);
        }
    }

    #[test]
    fn try_map_discards_partial_results_on_error() {
        let result: Result<Vec<usize>> = try_map(100, 4, |i| match i == 63 {
            true => Err(Error::invalid_argument("boom")),
            false => Ok(i),
        });
        assert!(result.is_err());
    }

    #[test]
    fn dispatch_reduce_visits_every_element_once() {
        let mut output = vec![0usize; 120];
        for num_threads in [1, 3, 0] {
            output.iter_mut().for_each(|v| *v = 0);
            let counts = dispatch_reduce(&mut output, 4, num_threads, |start, chunk| {
                for (offset, value) in chunk.iter_mut().enumerate() {
                    *value += start + offset + 1;
                }
                chunk.len()
            });
            assert_eq!(counts.iter().sum::<usize>(), 120);
            for (i, v) in output.iter().enumerate() {
                assert_eq!(*v, i + 1);
            }
        }
    }

    #[test]
    fn dispatch_reduce_respects_alignment() {
        let mut output = vec![0usize; 30];
        dispatch_reduce(&mut output, 10, 4, |start, chunk| {
            assert_eq!(start % 10, 0);
            assert_eq!(chunk.len() % 10, 0);
        });
    }
}
