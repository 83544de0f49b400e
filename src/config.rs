use crate::error::{ParseError, TfResult};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumIter};

/// Parameters for one optimization job. Built fresh for every start attempt
/// and never touched again once validation passes.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    #[arg(long, default_value_t = 10_000)]
    pub population_size: i32,
    #[arg(long, default_value_t = 100_000)]
    pub max_generations: i32,
    /// Percent chance that a child is mutated.
    #[arg(long, default_value_t = 3)]
    pub mutation_rate: i32,
    #[arg(long, default_value_t = 5)]
    pub group_size: i32,
    #[arg(long, default_value_t = 5)]
    pub number_of_close_cities: i32,
    /// Percent chance of picking a close city while seeding the population.
    #[arg(long, default_value_t = 90)]
    pub chance_use_close_city: i32,
    #[arg(long, default_value_t = 0)]
    pub seed: i32,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            population_size: 10_000,
            max_generations: 100_000,
            mutation_rate: 3,
            group_size: 5,
            number_of_close_cities: 5,
            chance_use_close_city: 90,
            seed: 0,
        }
    }
}

impl JobConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn to_raw(&self) -> RawJobConfig {
        RawJobConfig {
            population_size: self.population_size.to_string(),
            max_generations: self.max_generations.to_string(),
            mutation_rate: self.mutation_rate.to_string(),
            group_size: self.group_size.to_string(),
            number_of_close_cities: self.number_of_close_cities.to_string(),
            chance_use_close_city: self.chance_use_close_city.to_string(),
            seed: self.seed.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum ConfigField {
    PopulationSize,
    MaxGenerations,
    MutationRate,
    GroupSize,
    NumberOfCloseCities,
    ChanceUseCloseCity,
    Seed,
}

/// The seven input fields exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawJobConfig {
    pub population_size: String,
    pub max_generations: String,
    pub mutation_rate: String,
    pub group_size: String,
    pub number_of_close_cities: String,
    pub chance_use_close_city: String,
    pub seed: String,
}

impl RawJobConfig {
    pub fn field(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::PopulationSize => &self.population_size,
            ConfigField::MaxGenerations => &self.max_generations,
            ConfigField::MutationRate => &self.mutation_rate,
            ConfigField::GroupSize => &self.group_size,
            ConfigField::NumberOfCloseCities => &self.number_of_close_cities,
            ConfigField::ChanceUseCloseCity => &self.chance_use_close_city,
            ConfigField::Seed => &self.seed,
        }
    }

    /// Parses every field in declaration order; the first bad field wins.
    /// An unparsable field is an error, never a zero.
    pub fn parse(&self) -> Result<JobConfig, ParseError> {
        let int = |field: ConfigField| -> Result<i32, ParseError> {
            let value = self.field(field);
            value.trim().parse::<i32>().map_err(|_| ParseError {
                field,
                value: value.to_string(),
            })
        };

        Ok(JobConfig {
            population_size: int(ConfigField::PopulationSize)?,
            max_generations: int(ConfigField::MaxGenerations)?,
            mutation_rate: int(ConfigField::MutationRate)?,
            group_size: int(ConfigField::GroupSize)?,
            number_of_close_cities: int(ConfigField::NumberOfCloseCities)?,
            chance_use_close_city: int(ConfigField::ChanceUseCloseCity)?,
            seed: int(ConfigField::Seed)?,
        })
    }
}
