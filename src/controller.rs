use crate::cities::{City, CitySource, CityStore};
use crate::config::{JobConfig, RawJobConfig};
use crate::error::{DeliveryError, JobActiveError, TfResult, TourForgeError};
use crate::optimizer::{CancelToken, Optimizer, ProgressCallback, TourEvent};
use crate::validator::validate;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use strum_macros::Display;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum JobState {
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { job_id: u64 },
    /// A job was already running; the call was treated as a halt request.
    /// The job may already have queued its final event; use
    /// [`JobController::wait_idle`] before starting again.
    HaltRequested,
}

struct Slot {
    state: JobState,
    job_id: u64,
    cancel: CancelToken,
    cities: CityStore,
    worker: Option<JoinHandle<()>>,
}

struct Shared {
    slot: Mutex<Slot>,
    idle: Condvar,
}

impl Shared {
    // Slot holds no invariant a panicking holder could break halfway.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Consumer end of the event channel. Drain it from the presentation thread.
pub struct EventStream {
    receiver: Receiver<TourEvent>,
}

impl EventStream {
    pub fn try_next(&self) -> Option<TourEvent> {
        self.receiver.try_recv().ok()
    }

    pub fn next_timeout(&self, timeout: Duration) -> Option<TourEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Everything queued right now, oldest first.
    pub fn drain(&self) -> Vec<TourEvent> {
        self.receiver.try_iter().collect()
    }
}

/// Owns the city set and at most one running optimization job.
///
/// All transitions go through one mutex, so two concurrent `start` calls can
/// never both launch a job. The slot returns to `Idle` on the worker thread
/// after the final event is queued and the optimizer has returned.
pub struct JobController<O: Optimizer> {
    optimizer: Arc<O>,
    shared: Arc<Shared>,
    sender: Sender<TourEvent>,
}

impl<O: Optimizer> JobController<O> {
    pub fn new(optimizer: O) -> (Self, EventStream) {
        let (sender, receiver) = mpsc::channel();
        let controller = Self {
            optimizer: Arc::new(optimizer),
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot {
                    state: JobState::Idle,
                    job_id: 0,
                    cancel: CancelToken::new(),
                    cities: CityStore::new(),
                    worker: None,
                }),
                idle: Condvar::new(),
            }),
            sender,
        };
        (controller, EventStream { receiver })
    }

    pub fn state(&self) -> JobState {
        self.shared.lock().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == JobState::Running
    }

    /// Id of the most recently started job (0 before the first start).
    pub fn last_job_id(&self) -> u64 {
        self.shared.lock().job_id
    }

    /// Start from raw input fields. While a job runs this is a halt request.
    ///
    /// The slot is released only after the optimizer has returned, which is
    /// shortly after the `complete` event is queued. A consumer that restarts
    /// as soon as it sees that event should call [`wait_idle`](Self::wait_idle)
    /// first, or the call lands on the finished job as a halt request.
    pub fn start(&self, fields: &RawJobConfig) -> TfResult<StartOutcome> {
        let mut slot = self.shared.lock();
        if slot.state == JobState::Running {
            return Ok(Self::halt_locked(&slot));
        }
        let config = fields.parse()?;
        self.launch(&mut slot, config)
    }

    /// Same as [`start`](Self::start) for an already parsed configuration.
    pub fn start_config(&self, config: JobConfig) -> TfResult<StartOutcome> {
        let mut slot = self.shared.lock();
        if slot.state == JobState::Running {
            return Ok(Self::halt_locked(&slot));
        }
        self.launch(&mut slot, config)
    }

    /// Asks the running optimizer to stop. The job stays `Running` until its
    /// final event has been queued.
    pub fn request_halt(&self) -> TfResult<()> {
        let slot = self.shared.lock();
        if slot.state != JobState::Running {
            return Err(TourForgeError::NotRunning);
        }
        Self::halt_locked(&slot);
        Ok(())
    }

    /// Blocks until the controller is `Idle` or `timeout` passes.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let slot = self.shared.lock();
        let (slot, _) = self
            .shared
            .idle
            .wait_timeout_while(slot, timeout, |s| s.state == JobState::Running)
            .unwrap_or_else(PoisonError::into_inner);
        slot.state == JobState::Idle
    }

    pub fn cities(&self) -> Arc<[City]> {
        self.shared.lock().cities.snapshot()
    }

    pub fn city_count(&self) -> usize {
        self.shared.lock().cities.len()
    }

    pub fn add_city(&self, x: f64, y: f64) -> TfResult<()> {
        let mut slot = self.idle_slot("add a city")?;
        slot.cities.push(City::new(x, y));
        Ok(())
    }

    pub fn clear_cities(&self) -> TfResult<()> {
        let mut slot = self.idle_slot("clear the city list")?;
        if !slot.cities.is_empty() {
            info!("Cleared {} cities", slot.cities.len());
        }
        slot.cities.clear();
        Ok(())
    }

    /// Reads the whole source, then appends it. A failing source appends nothing.
    pub fn load_cities<S: CitySource>(&self, source: S) -> TfResult<usize> {
        // Reject early so a running job does not wait on file IO.
        drop(self.idle_slot("load cities")?);
        let cities = source.read_cities()?;
        let count = cities.len();

        let mut slot = self.idle_slot("load cities")?;
        slot.cities.extend(cities);
        info!("Loaded {} cities ({} total)", count, slot.cities.len());
        Ok(count)
    }

    fn idle_slot(&self, action: &'static str) -> Result<MutexGuard<'_, Slot>, JobActiveError> {
        let slot = self.shared.lock();
        if slot.state == JobState::Running {
            warn!("Rejected request to {} while job {} runs", action, slot.job_id);
            return Err(JobActiveError { action });
        }
        Ok(slot)
    }

    fn halt_locked(slot: &Slot) -> StartOutcome {
        if !slot.cancel.is_cancelled() {
            info!("Halt requested for job {}", slot.job_id);
        }
        slot.cancel.cancel();
        StartOutcome::HaltRequested
    }

    fn launch(&self, slot: &mut Slot, config: JobConfig) -> TfResult<StartOutcome> {
        validate(&config, slot.cities.len())?;

        // The previous worker already released the slot; reap its thread.
        if let Some(handle) = slot.worker.take() {
            if handle.join().is_err() {
                error!("Job {} worker panicked", slot.job_id);
            }
        }

        let job_id = slot.job_id + 1;
        let cancel = CancelToken::new();
        let cities = slot.cities.snapshot();
        let optimizer = Arc::clone(&self.optimizer);
        let shared = Arc::clone(&self.shared);
        let sender = self.sender.clone();
        let worker_cancel = cancel.clone();

        info!(
            "Starting job {} over {} cities ({:?})",
            job_id,
            cities.len(),
            config
        );

        let handle = thread::Builder::new()
            .name(format!("tour-job-{}", job_id))
            .spawn(move || {
                let _release = SlotRelease { shared, job_id };
                let mut relay = Relay::new(job_id, sender, worker_cancel.clone());
                optimizer.run(&config, cities, &worker_cancel, &mut relay);
            })?;

        slot.job_id = job_id;
        slot.cancel = cancel;
        slot.state = JobState::Running;
        slot.worker = Some(handle);
        Ok(StartOutcome::Started { job_id })
    }
}

/// Returns the slot to `Idle` when the worker thread ends, panics included.
/// Release builds abort on panic, so there only the normal exit path runs.
struct SlotRelease {
    shared: Arc<Shared>,
    job_id: u64,
}

impl Drop for SlotRelease {
    fn drop(&mut self) {
        let mut slot = self.shared.lock();
        if slot.job_id == self.job_id && slot.state == JobState::Running {
            slot.state = JobState::Idle;
            info!("Job {} finished", self.job_id);
        }
        drop(slot);
        self.shared.idle.notify_all();
    }
}

/// Forwards optimizer events to the consumer channel in generation order.
/// Once a halt is requested only the final event gets through.
struct Relay {
    job_id: u64,
    sender: Sender<TourEvent>,
    cancel: CancelToken,
    last: Option<TourEvent>,
    finished: bool,
    delivery_failed: bool,
    held_after_halt: u64,
}

impl Relay {
    fn new(job_id: u64, sender: Sender<TourEvent>, cancel: CancelToken) -> Self {
        Self {
            job_id,
            sender,
            cancel,
            last: None,
            finished: false,
            delivery_failed: false,
            held_after_halt: 0,
        }
    }

    fn deliver(&mut self, event: TourEvent) {
        let generation = event.generation;
        if self.sender.send(event).is_err() && !self.delivery_failed {
            let err = DeliveryError {
                job_id: self.job_id,
                generation,
            };
            debug!("{}; consumer is gone, dropping further events", err);
            self.delivery_failed = true;
        }
    }
}

impl ProgressCallback for Relay {
    fn on_progress(&mut self, mut event: TourEvent) {
        if self.finished {
            warn!("Job {} sent an event after its final one; ignored", self.job_id);
            return;
        }

        if let Some(last) = &self.last {
            if event.generation < last.generation {
                if !event.complete {
                    warn!(
                        "Job {} went back from generation {} to {}; event dropped",
                        self.job_id, last.generation, event.generation
                    );
                    return;
                }
                event.generation = last.generation;
            }
        }

        event.job_id = self.job_id;

        // After a halt only the final event is delivered. A held snapshot
        // still backs the synthesized final event if the optimizer sends none.
        if !event.complete && self.cancel.is_cancelled() {
            self.held_after_halt += 1;
            self.last = Some(event);
            return;
        }

        self.finished = event.complete;
        if self.finished && self.held_after_halt > 0 {
            debug!(
                "Job {} held back {} progress events after the halt",
                self.job_id, self.held_after_halt
            );
        }
        self.last = Some(event.clone());
        self.deliver(event);
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        match self.last.take() {
            Some(mut last) => {
                warn!("Job {} ended without a final event; closing with the last tour", self.job_id);
                last.complete = true;
                self.deliver(last);
            }
            None => error!("Job {} ended without producing a tour", self.job_id),
        }
    }
}
