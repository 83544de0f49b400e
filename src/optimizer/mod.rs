pub mod crossover;
pub mod mutation;
pub mod runner;

pub use self::runner::{GaOptions, GeneticOptimizer};

use crate::cities::City;
use crate::config::JobConfig;
use crate::tour::Tour;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Snapshot of the best tour found so far in one job.
#[derive(Debug, Clone)]
pub struct TourEvent {
    /// Stamped by the controller when the event is relayed.
    pub job_id: u64,
    pub tour: Tour,
    /// Lower is better.
    pub fitness: f64,
    pub generation: u64,
    pub cities: Arc<[City]>,
    pub complete: bool,
}

impl TourEvent {
    pub fn new(tour: Tour, fitness: f64, generation: u64, cities: Arc<[City]>, complete: bool) -> Self {
        Self {
            job_id: 0,
            tour,
            fitness,
            generation,
            cities,
            complete,
        }
    }
}

/// Cooperative stop signal shared between the controller and a running optimizer.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Receives tour snapshots from a running optimizer. Must not block.
pub trait ProgressCallback: Send {
    fn on_progress(&mut self, event: TourEvent);
}

impl<F: FnMut(TourEvent) + Send> ProgressCallback for F {
    fn on_progress(&mut self, event: TourEvent) {
        self(event)
    }
}

/// A search over tours for a fixed city set.
///
/// `run` reports snapshots with non-decreasing generation numbers, checks
/// `cancel` at least once per generation, and ends with exactly one event
/// whose `complete` flag is set before returning.
pub trait Optimizer: Send + Sync + 'static {
    fn run(
        &self,
        config: &JobConfig,
        cities: Arc<[City]>,
        cancel: &CancelToken,
        callback: &mut dyn ProgressCallback,
    );
}
