use crate::cmd::{resolve_config, CityArgs};
use crate::reports;
use clap::Args;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tourforge::config::JobConfig;
use tourforge::render::{render_cities, render_tour, AsciiCanvas};
use tourforge::{GeneticOptimizer, JobController, StartOutcome, TfResult, TourEvent};
use tracing::{debug, info, warn};

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    #[command(flatten)]
    pub cities: CityArgs,

    #[command(flatten)]
    pub config: JobConfig,

    /// JSON job configuration; overrides the individual flags.
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Halt the search after this many seconds.
    #[arg(short = 'T', long)]
    pub time: Option<u64>,

    #[arg(long, default_value_t = 72)]
    pub map_width: usize,

    #[arg(long, default_value_t = 24)]
    pub map_height: usize,

    /// Print the final tour as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: SolveArgs) -> TfResult<()> {
    let (controller, events) = JobController::new(GeneticOptimizer::new());

    args.cities.load_into(&controller)?;
    let config = resolve_config(&args.config, args.config_file.as_ref())?;
    reports::print_config(&config, controller.city_count());

    let cities = controller.cities();
    let mut canvas = AsciiCanvas::fit(args.map_width, args.map_height, &cities);
    render_cities(&cities, &mut canvas);

    let job_id = match controller.start_config(config)? {
        StartOutcome::Started { job_id } => job_id,
        StartOutcome::HaltRequested => {
            warn!("A job was already running; halted it instead of starting");
            return Ok(());
        }
    };
    println!("\n🧬 Job #{} running over {} cities", job_id, cities.len());

    let start_time = Instant::now();
    let max_duration = args.time.map(Duration::from_secs);
    let mut halted = false;
    let mut updates = 0usize;
    let mut last_print = Instant::now();
    let mut final_event: Option<TourEvent> = None;

    // Consumer loop: this thread owns the canvas and drains events on its own schedule.
    loop {
        if let Some(limit) = max_duration {
            if !halted && start_time.elapsed() >= limit {
                info!("Time limit reached, halting...");
                controller.request_halt()?;
                halted = true;
            }
        }

        let Some(event) = events.next_timeout(Duration::from_millis(100)) else {
            if !controller.is_running() {
                // Anything still queued was sent before the slot was released.
                if let Some(event) = events.drain().into_iter().find(|e| e.complete) {
                    final_event = Some(event);
                } else {
                    warn!("Job ended without a final tour");
                }
                break;
            }
            continue;
        };

        updates += 1;
        if let Err(e) = render_tour(&event, &mut canvas) {
            warn!("Skipping frame for generation {}: {}", event.generation, e);
        }

        if event.complete {
            final_event = Some(event);
            break;
        }

        debug!("Gen {:7} | Best: {:.2}", event.generation, event.fitness);
        if last_print.elapsed() >= Duration::from_secs(1) {
            println!("Gen {:7} | Best: {:.2}", event.generation, event.fitness);
            last_print = Instant::now();
        }
    }

    controller.wait_idle(Duration::from_secs(5));

    let Some(event) = final_event else {
        return Ok(());
    };

    println!("\n{}", canvas);
    reports::print_summary(&event, updates, start_time.elapsed(), halted);

    if args.json {
        let summary = reports::TourSummary::from_event(&event)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
