pub mod cities;
pub mod config;
pub mod controller;
pub mod error;
pub mod optimizer;
pub mod render;
pub mod tour;
pub mod validator;
// cmd and reports are modules of the binary crate (main.rs).

pub use crate::controller::{EventStream, JobController, JobState, StartOutcome};
pub use crate::error::{TfResult, TourForgeError};
pub use crate::optimizer::{CancelToken, GeneticOptimizer, Optimizer, ProgressCallback, TourEvent};
