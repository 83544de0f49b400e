#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tourforge::cities::City;
use tourforge::config::JobConfig;
use tourforge::render::{Canvas, Point};
use tourforge::tour::{Link, Tour};
use tourforge::{CancelToken, EventStream, JobController, Optimizer, ProgressCallback, TourEvent};

pub const WAIT: Duration = Duration::from_secs(10);

// --- CITIES & TOURS ---

/// `n` cities spaced around a circle of radius 100.
pub fn ring_cities(n: usize) -> Vec<City> {
    (0..n)
        .map(|i| {
            let angle = i as f64 / n as f64 * std::f64::consts::TAU;
            City::new(100.0 * angle.cos(), 100.0 * angle.sin())
        })
        .collect()
}

pub fn identity_tour(n: usize) -> Tour {
    let order: Vec<usize> = (0..n).collect();
    Tour::from_order(&order)
}

/// Builds one link array out of several closed loops over disjoint cities.
pub fn cycles_tour(cycles: &[Vec<usize>]) -> Tour {
    let n = cycles.iter().map(Vec::len).sum();
    let mut links = vec![Link::new(0, 0); n];
    for cycle in cycles {
        let k = cycle.len();
        for (i, &city) in cycle.iter().enumerate() {
            links[city] = Link::new(cycle[(i + 1) % k], cycle[(i + k - 1) % k]);
        }
    }
    Tour::from_links(links)
}

/// Small config that passes validation for `ring_cities(10)`.
pub fn quick_config(max_generations: i32) -> JobConfig {
    JobConfig {
        population_size: 40,
        max_generations,
        mutation_rate: 10,
        group_size: 4,
        number_of_close_cities: 3,
        chance_use_close_city: 90,
        seed: 7,
    }
}

pub fn controller_with<O: Optimizer>(optimizer: O, cities: usize) -> (JobController<O>, EventStream) {
    let (controller, events) = JobController::new(optimizer);
    for city in ring_cities(cities) {
        controller.add_city(city.x, city.y).unwrap();
    }
    (controller, events)
}

/// Collects events until the complete one arrives, then waits for the slot
/// to go idle. Panics on timeout.
pub fn drain_until_complete(events: &EventStream, timeout: Duration) -> Vec<TourEvent> {
    let deadline = Instant::now() + timeout;
    let mut seen = Vec::new();
    while Instant::now() < deadline {
        if let Some(event) = events.next_timeout(Duration::from_millis(20)) {
            let done = event.complete;
            seen.push(event);
            if done {
                return seen;
            }
        }
    }
    panic!("no complete event within {:?}; got {} events", timeout, seen.len());
}

// --- OPTIMIZER DOUBLES ---

/// Run counters shared between a double and the test body.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub runs: Arc<AtomicUsize>,
    pub active: Arc<AtomicUsize>,
    pub max_active: Arc<AtomicUsize>,
}

impl RunStats {
    fn enter(&self) {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

fn event(cities: &Arc<[City]>, generation: u64, complete: bool) -> TourEvent {
    TourEvent::new(
        identity_tour(cities.len()),
        1000.0 - generation as f64,
        generation,
        Arc::clone(cities),
        complete,
    )
}

/// Emits one event per generation until `max_generations` or a halt.
#[derive(Debug, Clone, Default)]
pub struct PacedOptimizer {
    pub pace: Duration,
    pub stats: RunStats,
}

impl Optimizer for PacedOptimizer {
    fn run(&self, config: &JobConfig, cities: Arc<[City]>, cancel: &CancelToken, callback: &mut dyn ProgressCallback) {
        self.stats.enter();
        let limit = config.max_generations as u64;
        let mut generation = 0;
        while generation < limit && !cancel.is_cancelled() {
            generation += 1;
            callback.on_progress(event(&cities, generation, false));
            thread::sleep(self.pace);
        }
        callback.on_progress(event(&cities, generation, true));
        self.stats.exit();
    }
}

/// Emits generation 1, then blocks until halted before finishing.
#[derive(Debug, Clone, Default)]
pub struct HaltGatedOptimizer {
    pub stats: RunStats,
}

impl Optimizer for HaltGatedOptimizer {
    fn run(&self, _config: &JobConfig, cities: Arc<[City]>, cancel: &CancelToken, callback: &mut dyn ProgressCallback) {
        self.stats.enter();
        callback.on_progress(event(&cities, 1, false));
        while !cancel.is_cancelled() {
            thread::sleep(Duration::from_millis(2));
        }
        callback.on_progress(event(&cities, 2, true));
        self.stats.exit();
    }
}

/// Replays a fixed list of `(generation, complete)` pairs verbatim.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOptimizer {
    pub script: Vec<(u64, bool)>,
    pub panic_at_end: bool,
}

impl Optimizer for ScriptedOptimizer {
    fn run(&self, _config: &JobConfig, cities: Arc<[City]>, _cancel: &CancelToken, callback: &mut dyn ProgressCallback) {
        for &(generation, complete) in &self.script {
            callback.on_progress(event(&cities, generation, complete));
        }
        if self.panic_at_end {
            panic!("scripted optimizer failure");
        }
    }
}

/// Notices a halt only between generations, then keeps reporting for
/// `linger` more generations before its final event.
#[derive(Debug, Clone, Default)]
pub struct LingeringOptimizer {
    pub linger: u64,
    /// Generation of the first event sent after the halt was seen.
    pub first_after_halt: Arc<AtomicU64>,
}

impl Optimizer for LingeringOptimizer {
    fn run(&self, config: &JobConfig, cities: Arc<[City]>, cancel: &CancelToken, callback: &mut dyn ProgressCallback) {
        let limit = config.max_generations as u64;
        let mut generation = 0;
        while generation < limit && !cancel.is_cancelled() {
            generation += 1;
            callback.on_progress(event(&cities, generation, false));
            thread::sleep(Duration::from_millis(1));
        }
        generation += 1;
        self.first_after_halt.store(generation, Ordering::SeqCst);
        for _ in 0..self.linger {
            callback.on_progress(event(&cities, generation, false));
            generation += 1;
        }
        callback.on_progress(event(&cities, generation, true));
    }
}

/// Wraps another optimizer and logs the generation of every progress event
/// it emits while the halt flag is already set.
#[derive(Clone, Default)]
pub struct CancelAudit<O> {
    pub inner: O,
    pub emitted_after_halt: Arc<Mutex<Vec<u64>>>,
}

impl<O: Optimizer> Optimizer for CancelAudit<O> {
    fn run(&self, config: &JobConfig, cities: Arc<[City]>, cancel: &CancelToken, callback: &mut dyn ProgressCallback) {
        let log = Arc::clone(&self.emitted_after_halt);
        let mut audit = |event: TourEvent| {
            if !event.complete && cancel.is_cancelled() {
                log.lock().unwrap().push(event.generation);
            }
            callback.on_progress(event);
        };
        self.inner.run(config, cities, cancel, &mut audit);
    }
}

// --- CANVAS DOUBLE ---

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Point(Point),
    Edge(Point, Point),
}

/// Records draw calls; `presented` holds one entry per completed frame.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub pending: Vec<DrawOp>,
    pub presented: Vec<Vec<DrawOp>>,
}

impl RecordingCanvas {
    pub fn visible(&self) -> Option<&Vec<DrawOp>> {
        self.presented.last()
    }

    pub fn count_points(frame: &[DrawOp]) -> usize {
        frame.iter().filter(|op| matches!(op, DrawOp::Point(_))).count()
    }

    pub fn count_edges(frame: &[DrawOp]) -> usize {
        frame.iter().filter(|op| matches!(op, DrawOp::Edge(..))).count()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self) {
        self.pending.clear();
        self.pending.push(DrawOp::Clear);
    }

    fn draw_point(&mut self, at: Point) {
        self.pending.push(DrawOp::Point(at));
    }

    fn draw_edge(&mut self, from: Point, to: Point) {
        self.pending.push(DrawOp::Edge(from, to));
    }

    fn present(&mut self) {
        self.presented.push(std::mem::take(&mut self.pending));
    }
}
