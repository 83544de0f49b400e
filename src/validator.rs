use crate::config::JobConfig;
use crate::error::ConfigError;

pub const MIN_CITIES: usize = 5;
pub const MIN_CLOSE_CITIES: i32 = 3;
pub const MAX_CLOSE_CITY_CHANCE: i32 = 95;

/// Gate that must pass before a job may start. Rules run in a fixed order and
/// the first violation is returned.
pub fn validate(config: &JobConfig, city_count: usize) -> Result<(), ConfigError> {
    if config.population_size <= 0 {
        return Err(ConfigError::InvalidPopulationSize(config.population_size));
    }
    if config.max_generations <= 0 {
        return Err(ConfigError::InvalidGenerationLimit(config.max_generations));
    }
    if !(0..=100).contains(&config.mutation_rate) {
        return Err(ConfigError::InvalidMutationRate(config.mutation_rate));
    }
    if config.group_size < 2 || config.group_size > config.population_size {
        return Err(ConfigError::InvalidGroupSize {
            group_size: config.group_size,
            population_size: config.population_size,
        });
    }
    // Compared in i64 so a huge city count cannot wrap.
    if config.number_of_close_cities < MIN_CLOSE_CITIES
        || i64::from(config.number_of_close_cities) >= city_count as i64
    {
        return Err(ConfigError::InvalidCloseCityCount {
            close_cities: config.number_of_close_cities,
            city_count,
        });
    }
    if !(0..=MAX_CLOSE_CITY_CHANCE).contains(&config.chance_use_close_city) {
        return Err(ConfigError::InvalidCloseCityChance(
            config.chance_use_close_city,
        ));
    }
    if config.seed < 0 {
        return Err(ConfigError::InvalidSeed(config.seed));
    }
    if city_count < MIN_CITIES {
        return Err(ConfigError::InsufficientCities(city_count));
    }
    Ok(())
}
