// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The data-parallel cost engine.
//!
//! The DP's rows depend strictly on the row above, so the only
//! parallelism on offer is within a row.  The device form therefore
//! runs one dispatch per row: the row is split into contiguous column
//! spans, every span is shipped to a worker pool, and the dispatching
//! thread blocks until every span's reply is back before the next row
//! goes out.  That reply collection is the inter-row barrier; no span
//! of row y+1 can be submitted, let alone run, while row y is
//! outstanding.
//!
//! Workers never touch shared matrices.  A span job carries an owned
//! copy of its energy cells and of the whole previous cost row, and
//! hands back an owned vector of results.  Disjoint spans plus
//! identical per-cell arithmetic make the engine bit-for-bit equal to
//! the host form.

use crate::cost::CostEngine;
use crate::cq;
use crate::error::CarveError;
use crate::matrix::Matrix;
use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, info};
use std::thread;

/// One span of one row, with everything a worker needs to compute it.
struct Dispatch {
    start: usize,
    energy: Vec<f32>,
    /// The fully materialized previous cost row; empty for row 0.
    prev: Vec<f32>,
    width: usize,
    reply: Sender<SpanResult>,
}

struct SpanResult {
    start: usize,
    values: Vec<f32>,
}

fn worker_loop(jobs: Receiver<Dispatch>) {
    for job in jobs.iter() {
        let mut values = Vec::with_capacity(job.energy.len());
        for (i, &e) in job.energy.iter().enumerate() {
            let x = job.start + i;
            let value = if job.prev.is_empty() {
                // Row 0 is the base case: energy copied verbatim.
                e
            } else {
                let left = job.prev[cq!(x == 0, 0, x - 1)];
                let mid = job.prev[x];
                let right = job.prev[cq!(x + 1 >= job.width, job.width - 1, x + 1)];
                e + left.min(mid).min(right)
            };
            values.push(value);
        }
        // A dead reply channel means the dispatcher already bailed.
        let _ = job.reply.send(SpanResult {
            start: job.start,
            values,
        });
    }
}

/// A pool of worker threads standing in for a compute device.  The
/// carve core only ever submits span jobs against it; construction and
/// teardown belong to the caller.
pub struct ComputeContext {
    jobs: Option<Sender<Dispatch>>,
    workers: Vec<thread::JoinHandle<()>>,
    pool_size: usize,
}

impl ComputeContext {
    /// Bring up a pool with one worker per logical CPU.
    pub fn new() -> Result<Self, CarveError> {
        Self::with_workers(num_cpus::get())
    }

    /// Bring up a pool of exactly `pool_size` workers.
    pub fn with_workers(pool_size: usize) -> Result<Self, CarveError> {
        if pool_size == 0 {
            return Err(CarveError::DeviceInit(
                "worker pool size must be nonzero".to_string(),
            ));
        }
        let (jobs, job_rx) = channel::unbounded::<Dispatch>();
        let mut workers = Vec::with_capacity(pool_size);
        for n in 0..pool_size {
            let rx = job_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("carve-worker-{}", n))
                .spawn(move || worker_loop(rx))
                .map_err(|e| {
                    CarveError::DeviceInit(format!("failed to spawn worker thread: {}", e))
                })?;
            workers.push(handle);
        }
        info!(
            "compute context up: {} workers, {} logical cpus",
            pool_size,
            num_cpus::get()
        );
        Ok(ComputeContext {
            jobs: Some(jobs),
            workers,
            pool_size,
        })
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    fn submit(&self, job: Dispatch) -> Result<(), CarveError> {
        match &self.jobs {
            Some(jobs) => jobs
                .send(job)
                .map_err(|_| CarveError::DeviceDispatch("worker pool is gone".to_string())),
            None => Err(CarveError::DeviceDispatch(
                "compute context already torn down".to_string(),
            )),
        }
    }
}

impl Drop for ComputeContext {
    fn drop(&mut self) {
        // Closing the job channel is the shutdown signal.
        self.jobs.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

/// The parallel engine: the cumulative-cost DP decomposed into one
/// barrier-separated dispatch per row against a [`ComputeContext`].
pub struct DeviceEngine {
    ctx: ComputeContext,
}

impl DeviceEngine {
    pub fn new(ctx: ComputeContext) -> Self {
        DeviceEngine { ctx }
    }

    fn dispatch_row(
        &self,
        energy_row: &[f32],
        prev: &[f32],
        width: usize,
    ) -> Result<Vec<f32>, CarveError> {
        let span_len = (width + self.ctx.pool_size() - 1) / self.ctx.pool_size();
        let starts: Vec<usize> = (0..width).step_by(span_len).collect();

        let (reply_tx, reply_rx) = channel::bounded(starts.len());
        for &start in &starts {
            let end = (start + span_len).min(width);
            self.ctx.submit(Dispatch {
                start,
                energy: energy_row[start..end].to_vec(),
                prev: prev.to_vec(),
                width,
                reply: reply_tx.clone(),
            })?;
        }
        drop(reply_tx);

        // Collect one reply per span.  This blocks until the whole row
        // is materialized, which is the ordering barrier the DP needs.
        let mut row = vec![0.0; width];
        for _ in 0..starts.len() {
            let span = reply_rx.recv().map_err(|_| {
                CarveError::DeviceDispatch("a worker dropped its span reply".to_string())
            })?;
            row[span.start..span.start + span.values.len()].copy_from_slice(&span.values);
        }
        Ok(row)
    }
}

impl CostEngine for DeviceEngine {
    fn cumulative_cost(&self, energy: &Matrix) -> Result<Matrix, CarveError> {
        let (height, width) = (energy.height(), energy.width());
        let mut cost = Matrix::new(height, width);
        let mut prev: Vec<f32> = Vec::new();
        for y in 0..height {
            let row = self.dispatch_row(energy.row(y), &prev, width)?;
            cost.row_mut(y).copy_from_slice(&row);
            prev = row;
        }
        debug!("device DP: {} rows of {} columns dispatched", height, width);
        Ok(cost)
    }
}
