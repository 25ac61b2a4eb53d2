//! Splits a sample grid into one work unit per row and renders the
//! rows on a small pool of scoped worker threads.
//!
//! Each worker pulls the next row from a shared queue, fills a buffer
//! it owns outright, and hands the finished units back through its
//! join handle.  Nothing is written to shared memory until every
//! worker has finished; the grid is then assembled by copying each
//! buffer into its row slot.  A row's contents depend only on the
//! viewport and its own index, so the grid comes out identical no
//! matter how many threads ran or in which order they finished.

use crate::errors::{Error, Result};
use crate::escape::{EscapeParams, EscapeResult, Evaluator};
use crate::grid::SampleGrid;
use crate::planes::{column_real, map_sample, row_imaginary, Viewport};
use crossbeam::thread::ScopedJoinHandle;
use itertools::iproduct;
use num::Complex;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A shared flag that asks a render pass to stop at the next work
/// unit boundary.  Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, unset token.
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One row of the grid and the buffer holding its results.
#[derive(Debug)]
pub struct WorkUnit {
    /// Which row of the grid this is.
    pub row: usize,
    /// One result per column, left to right.
    pub buffer: Vec<EscapeResult>,
}

impl WorkUnit {
    /// Render a single row.  The row's imaginary coordinate is
    /// computed once; only the real part changes along the row.
    pub fn render<E: Evaluator + ?Sized>(
        viewport: &Viewport,
        row: usize,
        columns: usize,
        params: EscapeParams,
        evaluator: &E,
    ) -> Result<WorkUnit> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(columns)
            .map_err(|e| Error::WorkerFailure {
                row,
                reason: e.to_string(),
            })?;
        let im = row_imaginary(viewport, row);
        for column in 0..columns {
            let c = Complex::new(column_real(viewport, column), im);
            buffer.push(evaluator.evaluate(c, params));
        }
        Ok(WorkUnit { row, buffer })
    }
}

/// The row reported by a failure that happened outside any work unit.
pub const NO_ROW: usize = usize::MAX;

/// The parallel renderer.  Holds the worker count and the
/// cancellation token; the viewport and parameters are passed to each
/// render call so that one scheduler can serve every frame.
#[derive(Clone, Debug)]
pub struct Scheduler {
    threads: usize,
    cancel: CancelToken,
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new(num_cpus::get())
    }
}

impl Scheduler {
    /// A scheduler running at most `threads` workers at once.  Zero is
    /// treated as one.
    pub fn new(threads: usize) -> Self {
        Scheduler {
            threads: threads.max(1),
            cancel: CancelToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The upper bound on concurrent workers.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// The token this scheduler checks between work units.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// The single-threaded reference renderer.  Produces exactly the
    /// grid `render` does, one sample at a time.
    pub fn render_serial<E: Evaluator + ?Sized>(
        &self,
        viewport: &Viewport,
        rows: usize,
        columns: usize,
        params: EscapeParams,
        evaluator: &E,
    ) -> Result<SampleGrid> {
        check_dimensions(viewport, rows, columns)?;
        let samples = iproduct!(0..rows, 0..columns)
            .map(|(row, column)| evaluator.evaluate(map_sample(viewport, row, column), params))
            .collect();
        Ok(SampleGrid::from_samples(rows, columns, samples))
    }

    /// The multi-threaded renderer.  Rows are queued and picked off by
    /// at most `threads` workers.  Fails as a whole if any row fails,
    /// and with `Cancelled` if the token is set before all rows have
    /// been claimed.
    pub fn render<E: Evaluator + ?Sized>(
        &self,
        viewport: &Viewport,
        rows: usize,
        columns: usize,
        params: EscapeParams,
        evaluator: &E,
    ) -> Result<SampleGrid> {
        check_dimensions(viewport, rows, columns)?;
        let workers = self.threads.min(rows);
        debug!(
            "rendering {}x{} samples on {} workers (cap {}, threshold {})",
            columns, rows, workers, params.iteration_cap, params.divergence_threshold
        );

        let queue = Mutex::new(0..rows);
        let failed = AtomicBool::new(false);

        let outcomes: Vec<Result<Vec<WorkUnit>>> = {
            let (queue, failed) = (&queue, &failed);
            let cancel = &self.cancel;
            crossbeam::scope(|spawner| {
                let handles: Vec<ScopedJoinHandle<Result<Vec<WorkUnit>>>> = (0..workers)
                    .map(|worker| {
                        spawner.spawn(move |_| {
                            let mut units: Vec<WorkUnit> = vec![];
                            loop {
                                if cancel.is_cancelled() {
                                    return Err(Error::Cancelled);
                                }
                                if failed.load(Ordering::SeqCst) {
                                    break;
                                }
                                let row = {
                                    queue
                                        .lock()
                                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                                        .next()
                                };
                                let row = match row {
                                    Some(row) => row,
                                    None => break,
                                };
                                trace!("worker {} takes row {}", worker, row);
                                let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
                                    WorkUnit::render(viewport, row, columns, params, evaluator)
                                }))
                                .unwrap_or_else(|payload| {
                                    Err(Error::WorkerFailure {
                                        row,
                                        reason: panic_message(payload.as_ref()),
                                    })
                                });
                                match rendered {
                                    Ok(unit) => units.push(unit),
                                    Err(e) => {
                                        failed.store(true, Ordering::SeqCst);
                                        return Err(e);
                                    }
                                }
                            }
                            Ok(units)
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| {
                        handle.join().unwrap_or_else(|payload| {
                            Err(Error::WorkerFailure {
                                row: NO_ROW,
                                reason: panic_message(payload.as_ref()),
                            })
                        })
                    })
                    .collect::<Vec<Result<Vec<WorkUnit>>>>()
            })
            .map_err(|payload| Error::WorkerFailure {
                row: NO_ROW,
                reason: panic_message(payload.as_ref()),
            })?
        };

        let samples = assemble(gather(outcomes)?, rows, columns)?;
        Ok(SampleGrid::from_samples(rows, columns, samples))
    }
}

/// Render a grid with a default scheduler: one worker per available
/// core.
pub fn render<E: Evaluator + ?Sized>(
    viewport: &Viewport,
    rows: usize,
    columns: usize,
    params: EscapeParams,
    evaluator: &E,
) -> Result<SampleGrid> {
    Scheduler::default().render(viewport, rows, columns, params, evaluator)
}

fn check_dimensions(viewport: &Viewport, rows: usize, columns: usize) -> Result<()> {
    viewport.validate()?;
    if rows == 0 || columns == 0 {
        return Err(Error::InvalidViewport(format!(
            "Cannot render a {}x{} grid",
            columns, rows
        )));
    }
    Ok(())
}

/// Collapse the per-worker outcomes into one list of finished units
/// or one error.  A failed row outranks cancellation, and among
/// failed rows the lowest index is reported, so the error does not
/// depend on scheduling order.
fn gather(outcomes: Vec<Result<Vec<WorkUnit>>>) -> Result<Vec<WorkUnit>> {
    let mut units = vec![];
    let mut failure: Option<Error> = None;
    let mut cancelled = false;
    for outcome in outcomes {
        match outcome {
            Ok(mut done) => units.append(&mut done),
            Err(Error::Cancelled) => cancelled = true,
            Err(Error::WorkerFailure { row, reason }) => {
                let lower = match &failure {
                    Some(Error::WorkerFailure { row: seen, .. }) => row < *seen,
                    _ => true,
                };
                if lower {
                    failure = Some(Error::WorkerFailure { row, reason });
                }
            }
            Err(e) => {
                if failure.is_none() {
                    failure = Some(e);
                }
            }
        }
    }
    if let Some(e) = failure {
        return Err(e);
    }
    if cancelled {
        warn!("render cancelled after {} rows", units.len());
        return Err(Error::Cancelled);
    }
    Ok(units)
}

/// Copy the finished rows into one row-major buffer.  Units are
/// placed in row order and each row buffer is released as soon as it
/// has been copied.
fn assemble(mut units: Vec<WorkUnit>, rows: usize, columns: usize) -> Result<Vec<EscapeResult>> {
    let size = rows.checked_mul(columns).ok_or_else(|| Error::WorkerFailure {
        row: NO_ROW,
        reason: format!("a {}x{} grid does not fit in memory", columns, rows),
    })?;
    let mut samples = Vec::new();
    samples.try_reserve_exact(size).map_err(|e| Error::WorkerFailure {
        row: NO_ROW,
        reason: e.to_string(),
    })?;
    units.sort_unstable_by_key(|unit| unit.row);
    for unit in units {
        samples.extend(unit.buffer);
    }
    Ok(samples)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
