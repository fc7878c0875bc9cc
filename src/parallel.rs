// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Two interchangeable ways of spreading a row-oriented render over
//! every core.
//!
//! Both take an output buffer that knows how to cut itself in two at a
//! row boundary (a [`Band`]), and a per-band kernel that fills in the
//! rows it is handed.  Because the buffer is split into disjoint mutable
//! slices before any work starts, no worker can ever see another
//! worker's rows, and the buffer itself needs no lock.
//!
//! * [`Strategy::FixedBands`] cuts the image into a fixed number of
//!   equal bands (the last one absorbing the remainder), drops them into
//!   a shared queue, and lets a fixed crew of scoped threads pull from
//!   the queue until it is empty.
//! * [`Strategy::RecursiveSplit`] halves the row range until a piece is
//!   no taller than a threshold and renders that piece directly, letting
//!   a work-stealing pool run the halves side by side.
//!
//! Given the same kernel, both produce identical buffers.

use crossbeam::thread::ScopedJoinHandle;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// A rectangular slab of output rows that can be cut in two.
pub trait Band: Send + Sized {
    /// How many rows this band covers.
    fn rows(&self) -> usize;

    /// Cut the band so the first part holds exactly `row` rows.
    fn split_at_row(self, row: usize) -> (Self, Self);
}

/// A band of a single-channel image, stored row-major.
#[derive(Debug)]
pub struct Plane<'a> {
    width: usize,
    data: &'a mut [i16],
}

impl<'a> Plane<'a> {
    /// Wraps a whole buffer of `width`-pixel rows.
    pub fn new(width: usize, data: &'a mut [i16]) -> Plane<'a> {
        debug_assert!(width > 0 && data.len() % width == 0);
        Plane { width, data }
    }

    /// Row width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Every pixel of the band, row-major.
    pub fn pixels_mut(&mut self) -> &mut [i16] {
        &mut self.data[..]
    }

    /// The pixels of row `row` of this band, counted from the band's
    /// own top.
    pub fn row_mut(&mut self, row: usize) -> &mut [i16] {
        &mut self.data[row * self.width..(row + 1) * self.width]
    }
}

impl<'a> Band for Plane<'a> {
    fn rows(&self) -> usize {
        self.data.len() / self.width
    }

    fn split_at_row(self, row: usize) -> (Self, Self) {
        let (top, bottom) = self.data.split_at_mut(row * self.width);
        (
            Plane::new(self.width, top),
            Plane::new(self.width, bottom),
        )
    }
}

/// A band of a three-channel image, one plane per channel.
#[derive(Debug)]
pub struct RgbPlanes<'a> {
    red: Plane<'a>,
    green: Plane<'a>,
    blue: Plane<'a>,
}

impl<'a> RgbPlanes<'a> {
    /// Wraps three equally sized channel buffers.
    pub fn new(width: usize, red: &'a mut [i16], green: &'a mut [i16], blue: &'a mut [i16]) -> Self {
        debug_assert!(red.len() == green.len() && green.len() == blue.len());
        RgbPlanes {
            red: Plane::new(width, red),
            green: Plane::new(width, green),
            blue: Plane::new(width, blue),
        }
    }

    /// Row width in pixels.
    pub fn width(&self) -> usize {
        self.red.width()
    }

    /// Stores one pixel, `x` columns into row `row` of this band.
    pub fn set(&mut self, row: usize, x: usize, rgb: [i16; 3]) {
        self.red.row_mut(row)[x] = rgb[0];
        self.green.row_mut(row)[x] = rgb[1];
        self.blue.row_mut(row)[x] = rgb[2];
    }
}

impl<'a> Band for RgbPlanes<'a> {
    fn rows(&self) -> usize {
        self.red.rows()
    }

    fn split_at_row(self, row: usize) -> (Self, Self) {
        let (red_top, red_bottom) = self.red.split_at_row(row);
        let (green_top, green_bottom) = self.green.split_at_row(row);
        let (blue_top, blue_bottom) = self.blue.split_at_row(row);
        (
            RgbPlanes {
                red: red_top,
                green: green_top,
                blue: blue_top,
            },
            RgbPlanes {
                red: red_bottom,
                green: green_bottom,
                blue: blue_bottom,
            },
        )
    }
}

/// How the rows of a render are handed out to threads.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Strategy {
    /// `tasks` equal bands, pulled from a queue by `workers` threads.
    FixedBands {
        /// Number of bands the image is cut into
        tasks: usize,
        /// Number of threads pulling from the band queue
        workers: usize,
    },
    /// Halve the rows until a piece is at most `threshold` rows tall.
    RecursiveSplit {
        /// Tallest piece that is rendered without splitting further
        threshold: usize,
        /// Size of the work-stealing pool
        workers: usize,
    },
}

impl Strategy {
    /// One thread per core, eight bands per thread.
    pub fn fixed_bands() -> Strategy {
        let workers = num_cpus::get();
        Strategy::FixedBands {
            tasks: workers * 8,
            workers,
        }
    }

    /// One thread per core, splitting down to four rows.
    pub fn recursive_split() -> Strategy {
        Strategy::RecursiveSplit {
            threshold: 4,
            workers: num_cpus::get(),
        }
    }

    /// Same strategy, different thread count.
    pub fn with_workers(self, workers: usize) -> Strategy {
        match self {
            Strategy::FixedBands { tasks, .. } => Strategy::FixedBands { tasks, workers },
            Strategy::RecursiveSplit { threshold, .. } => {
                Strategy::RecursiveSplit { threshold, workers }
            }
        }
    }

    /// Runs `kernel` over every row of `band` and returns once all of
    /// them are done.  The kernel is called with the index of the
    /// first image row of the band it is given.
    ///
    /// A failing band does not stop its siblings, and neither does a
    /// panicking one, which is reported as [`Error::WorkerPanicked`].
    /// Once every band has finished, the failure of the topmost failing
    /// band is returned.
    /// Setting `cancel` makes workers skip any band they have not
    /// started yet; bands already in flight run to completion unless
    /// the kernel itself watches the flag.
    pub fn run<B, K>(&self, band: B, cancel: &AtomicBool, kernel: K) -> Result<()>
    where
        B: Band,
        K: Fn(usize, B) -> Result<()> + Sync,
    {
        match *self {
            Strategy::FixedBands { tasks, workers } => {
                if tasks == 0 || workers == 0 {
                    return Err(Error::invalid("fixed bands need at least one task and one worker"));
                }
                fixed_bands(band, tasks, workers, cancel, &kernel)
            }
            Strategy::RecursiveSplit { threshold, workers } => {
                if threshold == 0 || workers == 0 {
                    return Err(Error::invalid("recursive split needs a positive threshold and worker count"));
                }
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()
                    .map_err(|e| Error::ThreadPool {
                        reason: e.to_string(),
                    })?;
                pool.install(|| recursive_split(0, band, threshold, cancel, &kernel))
            }
        }
    }
}

/// Runs the kernel over one band, turning a panic into an error.
fn guarded<B, K>(kernel: &K, first_row: usize, band: B) -> Result<()>
where
    B: Band,
    K: Fn(usize, B) -> Result<()> + Sync,
{
    panic::catch_unwind(AssertUnwindSafe(|| kernel(first_row, band))).unwrap_or_else(|_| {
        warn!(first_row, "render kernel panicked");
        Err(Error::WorkerPanicked)
    })
}

type BandQueue<B> = Arc<Mutex<std::vec::IntoIter<(usize, usize, B)>>>;

fn fixed_bands<B, K>(band: B, tasks: usize, workers: usize, cancel: &AtomicBool, kernel: &K) -> Result<()>
where
    B: Band,
    K: Fn(usize, B) -> Result<()> + Sync,
{
    let height = band.rows();
    let tasks = tasks.min(height.max(1));
    let rows_per_task = height / tasks;

    // (band index, first row, rows)
    let mut bands = Vec::with_capacity(tasks);
    let mut rest = band;
    for index in 0..tasks - 1 {
        let (head, tail) = rest.split_at_row(rows_per_task);
        bands.push((index, index * rows_per_task, head));
        rest = tail;
    }
    bands.push((tasks - 1, (tasks - 1) * rows_per_task, rest));
    debug!(tasks, rows_per_task, workers, "queued row bands");

    let queue: BandQueue<B> = Arc::new(Mutex::new(bands.into_iter()));
    let mut failures: Vec<(usize, Error)> = vec![];
    crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<Vec<(usize, Error)>>> = (0..workers)
            .map(|_| {
                let queue = queue.clone();
                spawner.spawn(move |_| {
                    let mut failures = vec![];
                    loop {
                        // Nothing panics while holding the lock, so a
                        // poisoned queue still has an intact iterator.
                        let next = {
                            let mut guard = queue.lock().unwrap_or_else(|e| e.into_inner());
                            guard.next()
                        };
                        match next {
                            Some((index, first_row, band)) => {
                                if cancel.load(Ordering::Relaxed) {
                                    failures.push((index, Error::Cancelled));
                                    continue;
                                }
                                if let Err(e) = guarded(kernel, first_row, band) {
                                    failures.push((index, e));
                                }
                            }
                            None => {
                                break;
                            }
                        }
                    }
                    failures
                })
            })
            .collect();

        failures = handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| vec![(usize::max_value(), Error::WorkerPanicked)])
            })
            .flatten()
            .collect();
    })
    .map_err(|_| Error::WorkerPanicked)?;

    match failures.into_iter().min_by_key(|(index, _)| *index) {
        None => Ok(()),
        Some((index, e)) => {
            warn!(band = index, error = %e, "row band failed");
            Err(e)
        }
    }
}

fn recursive_split<B, K>(first_row: usize, band: B, threshold: usize, cancel: &AtomicBool, kernel: &K) -> Result<()>
where
    B: Band,
    K: Fn(usize, B) -> Result<()> + Sync,
{
    if cancel.load(Ordering::Relaxed) {
        return Err(Error::Cancelled);
    }
    let rows = band.rows();
    if rows <= threshold {
        return guarded(kernel, first_row, band);
    }
    let middle = (rows + 1) / 2;
    let (top, bottom) = band.split_at_row(middle);
    let (top, bottom) = rayon::join(
        || recursive_split(first_row, top, threshold, cancel, kernel),
        || recursive_split(first_row + middle, bottom, threshold, cancel, kernel),
    );
    top.and(bottom)
}
