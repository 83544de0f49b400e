use crate::config::ConfigField;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TourForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input Error: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tour Error: {0}")]
    MalformedTour(#[from] MalformedTourError),

    #[error(transparent)]
    JobActive(#[from] JobActiveError),

    #[error("No optimization job is running")]
    NotRunning,
}

pub type TfResult<T> = Result<T, TourForgeError>;

/// A textual input field that is not a valid integer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid integer for {field}")]
pub struct ParseError {
    pub field: ConfigField,
    pub value: String,
}

/// The first validation rule a job configuration violates.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
pub enum ConfigError {
    #[error("population size must be greater than 0 (got {0})")]
    InvalidPopulationSize(i32),

    #[error("max generations must be greater than 0 (got {0})")]
    InvalidGenerationLimit(i32),

    #[error("mutation rate must be between 0 and 100 (got {0})")]
    InvalidMutationRate(i32),

    #[error("group size must be between 2 and the population size {population_size} (got {group_size})")]
    InvalidGroupSize {
        group_size: i32,
        population_size: i32,
    },

    #[error("number of close cities must be at least 3 and less than the city count {city_count} (got {close_cities})")]
    InvalidCloseCityCount {
        close_cities: i32,
        city_count: usize,
    },

    #[error("close city chance must be between 0 and 95 (got {0})")]
    InvalidCloseCityChance(i32),

    #[error("random seed must not be negative (got {0})")]
    InvalidSeed(i32),

    #[error("at least 5 cities are required (got {0})")]
    InsufficientCities(usize),
}

impl ConfigError {
    /// Variant name, used as the rule label in reports.
    pub fn rule(&self) -> &'static str {
        self.into()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedTourError {
    #[error("tour has no cities")]
    Empty,

    #[error("start city {start} is outside a tour of {len} cities")]
    StartOutOfRange { start: usize, len: usize },

    #[error("city {city} links to {neighbor}, outside a tour of {len} cities")]
    NeighborOutOfRange {
        city: usize,
        neighbor: usize,
        len: usize,
    },

    #[error("city {city} is linked to itself")]
    SelfLoop { city: usize },

    #[error("city {city} reaches {previous} through both connections")]
    DuplicateEdge { city: usize, previous: usize },

    #[error("city {city} does not link back to {previous}")]
    BrokenSymmetry { city: usize, previous: usize },

    #[error("city {city} revisited after {visited} of {len} cities")]
    SubCycle {
        city: usize,
        visited: usize,
        len: usize,
    },

    #[error("tour has {tour_len} entries but {city_count} cities were supplied")]
    CityCountMismatch { tour_len: usize, city_count: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Cannot {action} while an optimization job is running")]
pub struct JobActiveError {
    pub action: &'static str,
}

/// The consumer side of an event channel is gone. Never surfaced to the optimizer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("event for job {job_id} (generation {generation}) could not be delivered")]
pub struct DeliveryError {
    pub job_id: u64,
    pub generation: u64,
}
