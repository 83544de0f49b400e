use crate::cmd::{resolve_config, CityArgs};
use crate::reports;
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tourforge::config::{JobConfig, RawJobConfig};
use tourforge::validator::validate;
use tourforge::{GeneticOptimizer, JobController, TfResult};

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub cities: CityArgs,

    #[command(flatten)]
    pub config: JobConfig,

    /// JSON job configuration; overrides the individual flags.
    #[arg(long, conflicts_with = "form")]
    pub config_file: Option<PathBuf>,

    /// JSON object of the seven fields as raw text, checked exactly like form input.
    #[arg(long)]
    pub form: Option<PathBuf>,
}

pub fn run(args: ValidateArgs) -> TfResult<()> {
    let (controller, _events) = JobController::new(GeneticOptimizer::new());
    let city_count = args.cities.load_into(&controller)?;

    println!("\n🔎 === CONFIG AUDIT === 🔎");

    let config = match &args.form {
        Some(path) => {
            let raw: RawJobConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
            match raw.parse() {
                Ok(config) => config,
                Err(e) => {
                    reports::print_parse_failure(&e);
                    return Err(e.into());
                }
            }
        }
        None => resolve_config(&args.config, args.config_file.as_ref())?,
    };

    reports::print_config(&config, city_count);
    let verdict = validate(&config, city_count);
    reports::print_validation(&verdict);
    verdict.map_err(Into::into)
}
