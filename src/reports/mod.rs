use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;
use std::time::Duration;
use tourforge::config::JobConfig;
use tourforge::error::{ConfigError, ParseError};
use tourforge::{TfResult, TourEvent};

/// Serializable view of a finished job.
#[derive(Debug, Serialize)]
pub struct TourSummary {
    pub job_id: u64,
    pub generation: u64,
    pub fitness: f64,
    pub complete: bool,
    pub order: Vec<usize>,
}

impl TourSummary {
    pub fn from_event(event: &TourEvent) -> TfResult<Self> {
        Ok(Self {
            job_id: event.job_id,
            generation: event.generation,
            fitness: event.fitness,
            complete: event.complete,
            order: event.tour.visit_order(0)?,
        })
    }
}

pub fn config_table(config: &JobConfig, city_count: usize) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Parameter").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    let rows: [(&str, String); 8] = [
        ("Cities", city_count.to_string()),
        ("Population", config.population_size.to_string()),
        ("Max Generations", config.max_generations.to_string()),
        ("Mutation %", config.mutation_rate.to_string()),
        ("Group Size", config.group_size.to_string()),
        ("Close Cities", config.number_of_close_cities.to_string()),
        ("Close City %", config.chance_use_close_city.to_string()),
        ("Seed", config.seed.to_string()),
    ];
    for (name, value) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn print_config(config: &JobConfig, city_count: usize) {
    println!("{}", config_table(config, city_count));
}

pub fn print_validation(verdict: &Result<(), ConfigError>) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    match verdict {
        Ok(()) => {
            table.add_row(vec![
                Cell::new("PASS").fg(Color::Green).add_attribute(Attribute::Bold),
                Cell::new("All rules satisfied"),
            ]);
        }
        Err(e) => {
            table.add_row(vec![
                Cell::new("FAIL").fg(Color::Red).add_attribute(Attribute::Bold),
                Cell::new(e.rule()),
                Cell::new(e.to_string()),
            ]);
        }
    }
    println!("{}", table);
}

pub fn print_parse_failure(err: &ParseError) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("PARSE").fg(Color::Red).add_attribute(Attribute::Bold),
        Cell::new(err.field.to_string()),
        Cell::new(format!("{:?}", err.value)),
    ]);
    println!("{}", table);
}

pub fn summary_table(event: &TourEvent, updates: usize, elapsed: Duration, halted: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Job").add_attribute(Attribute::Bold),
        Cell::new("Cities"),
        Cell::new("Generation"),
        Cell::new("Length").fg(Color::Cyan),
        Cell::new("Updates"),
        Cell::new("Time (s)"),
        Cell::new("Stopped By"),
    ]);

    let stopped_by = if halted { "halt" } else { "limit" };
    table.add_row(vec![
        Cell::new(event.job_id),
        Cell::new(event.cities.len()),
        Cell::new(event.generation),
        Cell::new(format!("{:.2}", event.fitness)),
        Cell::new(updates),
        Cell::new(format!("{:.1}", elapsed.as_secs_f32())),
        Cell::new(stopped_by),
    ]);

    for i in 1..=5 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

pub fn print_summary(event: &TourEvent, updates: usize, elapsed: Duration, halted: bool) {
    println!("\n=== 🏆 FINAL TOUR ===");
    println!("{}", summary_table(event, updates, elapsed, halted));
}
