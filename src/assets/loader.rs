use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::assets::fetch::FrameFetcher;
use crate::foundation::error::{ScrubError, ScrubResult};

/// Decoded frames of one batch, index-aligned with the locators that produced them.
///
/// Either every locator resolved or the set is empty; partial sets never exist.
#[derive(Clone, Debug, Default)]
pub struct LoadedImageSet {
    images: Vec<Arc<PreparedImage>>,
}

impl LoadedImageSet {
    pub(crate) fn new(images: Vec<PreparedImage>) -> Self {
        Self {
            images: images.into_iter().map(Arc::new).collect(),
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the set holds no frames.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Frame at `index`.
    pub fn get(&self, index: usize) -> Option<&Arc<PreparedImage>> {
        self.images.get(index)
    }

    /// Frames in locator order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PreparedImage>> {
        self.images.iter()
    }
}

/// Resolution of the current batch.
#[derive(Clone, Debug)]
pub enum LoadOutcome {
    /// Every locator was fetched and decoded.
    Loaded {
        /// Generation of the batch.
        generation: u64,
        /// The decoded frames.
        images: LoadedImageSet,
    },
    /// At least one locator failed; the whole batch is discarded.
    Failed {
        /// Generation of the batch.
        generation: u64,
        /// First failure encountered.
        reason: String,
    },
}

impl LoadOutcome {
    /// Generation of the batch this outcome belongs to.
    pub fn generation(&self) -> u64 {
        match self {
            Self::Loaded { generation, .. } | Self::Failed { generation, .. } => *generation,
        }
    }

    /// The loaded frames; empty on failure.
    pub fn into_images(self) -> LoadedImageSet {
        match self {
            Self::Loaded { images, .. } => images,
            Self::Failed { .. } => LoadedImageSet::default(),
        }
    }
}

/// Handle identifying a started batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    /// Generation token of the batch.
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Batch counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoaderStats {
    /// Batches started.
    pub started: u64,
    /// Current-generation batches that resolved with every frame.
    pub succeeded: u64,
    /// Current-generation batches that failed.
    pub failed: u64,
    /// Resolutions of superseded or cancelled batches that were dropped.
    pub stale_discarded: u64,
}

struct BatchDone {
    generation: u64,
    result: Result<Vec<PreparedImage>, String>,
}

/// Concurrent, all-or-nothing frame loader with supersession.
///
/// Every [`AssetLoader::load`] or [`AssetLoader::cancel`] advances a shared generation counter.
/// Workers tag their result with the generation they were started under; results whose tag no
/// longer matches are dropped when received, so a late batch can never replace a newer one.
pub struct AssetLoader {
    fetcher: Arc<dyn FrameFetcher>,
    pool: Arc<rayon::ThreadPool>,
    generation: Arc<AtomicU64>,
    tx: mpsc::Sender<BatchDone>,
    rx: mpsc::Receiver<BatchDone>,
    in_flight: Option<u64>,
    stats: LoaderStats,
}

impl AssetLoader {
    /// Create a loader fetching through `fetcher` on a pool of `threads` workers (rayon default
    /// when `None`).
    pub fn new(fetcher: Arc<dyn FrameFetcher>, threads: Option<usize>) -> ScrubResult<Self> {
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            fetcher,
            pool: Arc::new(build_thread_pool(threads)?),
            generation: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
            in_flight: None,
            stats: LoaderStats::default(),
        })
    }

    /// Start loading `locators`, superseding any batch in flight.
    ///
    /// An empty list only cancels.
    #[tracing::instrument(skip(self, locators), fields(count = locators.len()))]
    pub fn load(&mut self, locators: &[String]) -> LoadTicket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if locators.is_empty() {
            self.in_flight = None;
            return LoadTicket { generation };
        }

        self.in_flight = Some(generation);
        self.stats.started += 1;
        tracing::debug!(generation, "frame batch started");

        let fetcher = Arc::clone(&self.fetcher);
        let token = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        let locators = locators.to_vec();
        self.pool.spawn(move || {
            let result = run_batch(fetcher.as_ref(), &token, generation, &locators);
            // The receiver only disappears with the loader itself.
            let _ = tx.send(BatchDone { generation, result });
        });

        LoadTicket { generation }
    }

    /// Invalidate the batch in flight; its eventual resolution is ignored.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        if self.in_flight.take().is_some() {
            tracing::debug!("frame batch cancelled");
        }
    }

    /// Current generation token.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Whether a current-generation batch has not resolved yet.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Batch counters.
    pub fn stats(&self) -> LoaderStats {
        self.stats
    }

    /// Drain finished batches without blocking. Returns the current batch's outcome once.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        let mut latest = None;
        while let Ok(done) = self.rx.try_recv() {
            if let Some(outcome) = self.accept(done) {
                latest = Some(outcome);
            }
        }
        latest
    }

    /// Block up to `timeout` for the current batch's outcome.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<LoadOutcome> {
        if let Some(outcome) = self.poll() {
            return Some(outcome);
        }
        let deadline = Instant::now() + timeout;
        while self.in_flight.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(done) => {
                    if let Some(outcome) = self.accept(done) {
                        return Some(outcome);
                    }
                }
                Err(_) => return None,
            }
        }
        None
    }

    fn accept(&mut self, done: BatchDone) -> Option<LoadOutcome> {
        let current = self.generation.load(Ordering::Acquire);
        if done.generation != current || self.in_flight != Some(done.generation) {
            self.stats.stale_discarded += 1;
            tracing::debug!(
                stale = done.generation,
                current,
                "discarding superseded frame batch"
            );
            return None;
        }

        self.in_flight = None;
        match done.result {
            Ok(images) => {
                self.stats.succeeded += 1;
                tracing::debug!(generation = done.generation, frames = images.len(), "frame batch loaded");
                Some(LoadOutcome::Loaded {
                    generation: done.generation,
                    images: LoadedImageSet::new(images),
                })
            }
            Err(reason) => {
                self.stats.failed += 1;
                tracing::warn!(generation = done.generation, %reason, "frame batch failed");
                Some(LoadOutcome::Failed {
                    generation: done.generation,
                    reason,
                })
            }
        }
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

fn run_batch(
    fetcher: &dyn FrameFetcher,
    token: &AtomicU64,
    generation: u64,
    locators: &[String],
) -> Result<Vec<PreparedImage>, String> {
    let superseded = || token.load(Ordering::Acquire) != generation;
    if superseded() {
        return Err("superseded before start".to_owned());
    }

    locators
        .par_iter()
        .enumerate()
        .map(|(i, locator)| {
            if superseded() {
                return Err("superseded".to_owned());
            }
            fetcher
                .fetch(locator)
                .and_then(|bytes| decode_image(&bytes))
                .map_err(|e| format!("frame {i} ('{locator}'): {e}"))
        })
        .collect()
}

fn build_thread_pool(threads: Option<usize>) -> ScrubResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ScrubError::validation(
            "loader_threads must be >= 1 when set",
        ));
    }

    let mut builder =
        rayon::ThreadPoolBuilder::new().thread_name(|i| format!("scrollscrub-load-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ScrubError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
