pub mod solve;
pub mod validate;

use clap::Args;
use std::path::PathBuf;
use tourforge::cities::{CsvCitySource, RandomCitySource};
use tourforge::config::JobConfig;
use tourforge::{JobController, Optimizer, TfResult};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CityArgs {
    /// CSV file with `x,y` columns.
    #[arg(short = 'c', long, conflicts_with = "random")]
    pub cities: Option<PathBuf>,

    /// Scatter this many random cities instead of reading a file.
    #[arg(short = 'r', long)]
    pub random: Option<usize>,

    #[arg(long, default_value_t = 1000.0)]
    pub area_width: f64,

    #[arg(long, default_value_t = 1000.0)]
    pub area_height: f64,

    #[arg(long)]
    pub city_seed: Option<u64>,
}

impl CityArgs {
    pub fn load_into<O: Optimizer>(&self, controller: &JobController<O>) -> TfResult<usize> {
        if let Some(path) = &self.cities {
            println!("📂 Loading Cities: {}", path.display());
            return controller.load_cities(CsvCitySource::from_path(path)?);
        }
        let count = self.random.unwrap_or(50);
        info!("Scattering {} random cities", count);
        controller.load_cities(RandomCitySource {
            count,
            width: self.area_width,
            height: self.area_height,
            seed: self.city_seed,
        })
    }
}

/// A JSON file replaces the flag values entirely; missing keys fall back to defaults.
pub fn resolve_config(flags: &JobConfig, file: Option<&PathBuf>) -> TfResult<JobConfig> {
    match file {
        Some(path) => {
            println!("⚙️  Loading Config from: {}", path.display());
            JobConfig::load_from_file(path)
        }
        None => Ok(*flags),
    }
}
