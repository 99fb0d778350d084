// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parallel-for over a flat buffer.  Every stage of the renderer is
//! "compute a value for each index and store it at that index," so
//! the only capability a back-end has to offer is filling a slice from
//! a function of the index and not returning until every slot is
//! written.

use crossbeam;
use num_cpus;
use std::ops::Range;

use error::{ConfigError, RenderError};

/// Fills every slot of `out` with `f(index)`, returning only once all
/// of them are written.  Implementations may run `f` on any thread and
/// in any order, so `f` must not depend on the order of evaluation.
pub trait ParallelFor {
    /// Write `f(i)` into `out[i]` for every `i`.
    fn fill<T, F>(&self, out: &mut [T], f: F) -> Result<(), RenderError>
    where
        T: Send,
        F: Fn(usize) -> T + Sync;
}

/// Runs the whole range on the calling thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sequential;

impl ParallelFor for Sequential {
    fn fill<T, F>(&self, out: &mut [T], f: F) -> Result<(), RenderError>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        fill_range(out, 0, &f);
        Ok(())
    }
}

/// Splits the buffer into one contiguous chunk per worker and runs
/// them on scoped threads.  Chunks are all the same size, save the
/// last, which picks up the remainder; the calling thread renders that
/// last chunk itself while the others run.
#[derive(Copy, Clone, Debug)]
pub struct WorkPartitioner {
    workers: usize,
}

impl WorkPartitioner {
    /// A partitioner that spreads work over `workers` threads, the
    /// calling thread included.
    pub fn new(workers: usize) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(WorkPartitioner { workers })
    }

    /// One worker per logical CPU.
    pub fn per_cpu() -> Self {
        WorkPartitioner {
            workers: num_cpus::get().max(1),
        }
    }

    /// How many chunks the work is cut into.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The index ranges handed to each worker, in order.  They are
    /// disjoint and together cover `0..total` exactly.
    pub fn chunks(&self, total: usize) -> Vec<Range<usize>> {
        let job_size = total / self.workers;
        (0..self.workers)
            .map(|i| {
                let start = job_size * i;
                if i + 1 == self.workers {
                    start..total
                } else {
                    start..start + job_size
                }
            })
            .collect()
    }
}

impl ParallelFor for WorkPartitioner {
    fn fill<T, F>(&self, out: &mut [T], f: F) -> Result<(), RenderError>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        if self.workers == 1 {
            return Sequential.fill(out, f);
        }

        let ranges = self.chunks(out.len());
        debug!(
            "partitioning {} cells into {} chunks of {}",
            out.len(),
            ranges.len(),
            ranges[0].len()
        );

        let f = &f;
        crossbeam::scope(move |spawner| {
            let mut rest: &mut [T] = out;
            let (last, others) = match ranges.split_last() {
                Some(split) => split,
                None => return,
            };
            for range in others {
                let (chunk, tail) = { rest }.split_at_mut(range.len());
                rest = tail;
                let start = range.start;
                spawner.spawn(move |_| fill_range(chunk, start, f));
            }
            fill_range(rest, last.start, f);
        })
        .map_err(|_| RenderError::WorkerPanicked)
    }
}

fn fill_range<T, F>(chunk: &mut [T], start: usize, f: &F)
where
    F: Fn(usize) -> T,
{
    trace!("filling {}..{}", start, start + chunk.len());
    for (offset, slot) in chunk.iter_mut().enumerate() {
        *slot = f(start + offset);
    }
}
