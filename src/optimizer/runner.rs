use crate::cities::City;
use crate::config::JobConfig;
use crate::optimizer::crossover::order_crossover;
use crate::optimizer::{mutation, CancelToken, Optimizer, ProgressCallback, TourEvent};
use crate::tour::{closed_length, Tour};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub struct GaOptions {
    pub population_size: usize,
    pub max_generations: u64,
    pub mutation_chance: f32,
    pub group_size: usize,
    pub close_cities: usize,
    pub close_city_chance: f32,
    pub seed: u64,
}

impl From<&JobConfig> for GaOptions {
    fn from(cfg: &JobConfig) -> Self {
        Self {
            population_size: cfg.population_size.max(2) as usize,
            max_generations: cfg.max_generations.max(0) as u64,
            mutation_chance: cfg.mutation_rate.clamp(0, 100) as f32 / 100.0,
            group_size: cfg.group_size.max(2) as usize,
            close_cities: cfg.number_of_close_cities.max(0) as usize,
            close_city_chance: cfg.chance_use_close_city.clamp(0, 100) as f32 / 100.0,
            seed: cfg.seed.max(0) as u64,
        }
    }
}

#[derive(Clone)]
struct Individual {
    order: Vec<usize>,
    fitness: f64,
}

/// Steady-state genetic search. Each generation breeds the two fittest members
/// of a random group and replaces the group's two weakest with the children.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneticOptimizer;

impl GeneticOptimizer {
    pub fn new() -> Self {
        Self
    }
}

impl Optimizer for GeneticOptimizer {
    fn run(
        &self,
        config: &JobConfig,
        cities: Arc<[City]>,
        cancel: &CancelToken,
        callback: &mut dyn ProgressCallback,
    ) {
        let opts = GaOptions::from(config);
        let n = cities.len();
        let start_time = Instant::now();

        // Every ordering of three or fewer cities is the same cycle.
        if n <= 3 {
            let order: Vec<usize> = (0..n).collect();
            let fitness = closed_length(&order, &cities);
            callback.on_progress(TourEvent::new(Tour::from_order(&order), fitness, 0, cities, true));
            return;
        }

        let mut rng = fastrand::Rng::with_seed(opts.seed);

        // 1. Initial Population
        let close = mutation::close_cities(&cities, opts.close_cities);
        let orders: Vec<Vec<usize>> = (0..opts.population_size)
            .map(|_| mutation::seed_tour(&mut rng, &close, opts.close_city_chance))
            .collect();
        let mut population: Vec<Individual> = orders
            .into_par_iter()
            .map(|order| {
                let fitness = closed_length(&order, &cities);
                Individual { order, fitness }
            })
            .collect();

        let mut best = population
            .iter()
            .min_by(|a, b| a.fitness.total_cmp(&b.fitness))
            .cloned()
            .unwrap_or_else(|| Individual {
                order: (0..n).collect(),
                fitness: f64::MAX,
            });

        debug!(
            "Seeded {} tours over {} cities in {:?} (best {:.2})",
            population.len(),
            n,
            start_time.elapsed(),
            best.fitness
        );
        callback.on_progress(TourEvent::new(
            Tour::from_order(&best.order),
            best.fitness,
            0,
            cities.clone(),
            false,
        ));

        let pop_len = population.len();
        let group_size = opts.group_size.min(pop_len);
        let mut group: Vec<usize> = Vec::with_capacity(group_size);
        let mut generation: u64 = 0;

        // 2. Main Loop
        while generation < opts.max_generations {
            if cancel.is_cancelled() {
                info!("Halt observed at generation {}", generation);
                break;
            }
            generation += 1;

            // A. Draw a tournament group
            group.clear();
            if group_size * 2 > pop_len {
                let mut all: Vec<usize> = (0..pop_len).collect();
                rng.shuffle(&mut all);
                group.extend_from_slice(&all[..group_size]);
            } else {
                while group.len() < group_size {
                    let idx = rng.usize(0..pop_len);
                    if !group.contains(&idx) {
                        group.push(idx);
                    }
                }
            }
            group.sort_by(|&a, &b| population[a].fitness.total_cmp(&population[b].fitness));

            // B. Breed the two fittest
            let p1 = &population[group[0]].order;
            let p2 = &population[group[1]].order;
            let mut children = [
                order_crossover(p1, p2, &mut rng),
                order_crossover(p2, p1, &mut rng),
            ];
            for child in children.iter_mut() {
                if rng.f32() < opts.mutation_chance {
                    mutation::mutate(child, &mut rng);
                }
            }

            // C. Replace the two weakest
            let mut improved = false;
            for (child, &slot) in children.into_iter().zip(group.iter().rev()) {
                let fitness = closed_length(&child, &cities);
                if fitness < best.fitness {
                    best = Individual {
                        order: child.clone(),
                        fitness,
                    };
                    improved = true;
                }
                population[slot] = Individual {
                    order: child,
                    fitness,
                };
            }

            // D. Report Progress (a halt that landed mid-generation leaves it to the final event)
            if improved && !cancel.is_cancelled() {
                callback.on_progress(TourEvent::new(
                    Tour::from_order(&best.order),
                    best.fitness,
                    generation,
                    cities.clone(),
                    false,
                ));
            }
        }

        info!(
            "Search finished after {} generations in {:.1}s (best {:.2})",
            generation,
            start_time.elapsed().as_secs_f32(),
            best.fitness
        );
        callback.on_progress(TourEvent::new(
            Tour::from_order(&best.order),
            best.fitness,
            generation,
            cities,
            true,
        ));
    }
}
