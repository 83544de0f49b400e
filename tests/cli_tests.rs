use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    _dir: TempDir,
    cities_path: PathBuf,
    form_path: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let cities_path = dir.path().join("cities.csv");
        let form_path = dir.path().join("form.json");

        let mut cities = File::create(&cities_path).unwrap();
        writeln!(cities, "x,y").unwrap();
        for (x, y) in [(0, 0), (40, 0), (80, 10), (80, 60), (30, 70), (0, 40)] {
            writeln!(cities, "{},{}", x, y).unwrap();
        }

        let mut form = File::create(&form_path).unwrap();
        writeln!(
            form,
            r#"{{"population_size": "100", "max_generations": "ten", "mutation_rate": "3",
                "group_size": "5", "number_of_close_cities": "3",
                "chance_use_close_city": "90", "seed": "1"}}"#
        )
        .unwrap();

        Self {
            _dir: dir,
            cities_path,
            form_path,
        }
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tourforge"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

#[test]
fn test_cli_validate_passes_defaults() {
    let ctx = TestContext::new();
    let output = run(&["validate", "--cities", ctx.cities_path.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stdout:\n{}", stdout);
    assert!(stdout.contains("PASS"));
}

#[test]
fn test_cli_validate_reports_first_rule() {
    let ctx = TestContext::new();
    let output = run(&[
        "validate",
        "--cities",
        ctx.cities_path.to_str().unwrap(),
        "--number-of-close-cities",
        "6",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success());
    assert!(stdout.contains("InvalidCloseCityCount"), "stdout:\n{}", stdout);
}

#[test]
fn test_cli_validate_form_parse_failure() {
    let ctx = TestContext::new();
    let output = run(&[
        "validate",
        "--cities",
        ctx.cities_path.to_str().unwrap(),
        "--form",
        ctx.form_path.to_str().unwrap(),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success());
    assert!(stdout.contains("PARSE"));
    assert!(stdout.contains("max_generations"), "stdout:\n{}", stdout);
}

#[test]
fn test_cli_solve_prints_json_tour() {
    let output = run(&[
        "solve",
        "--random",
        "12",
        "--city-seed",
        "4",
        "--population-size",
        "60",
        "--max-generations",
        "300",
        "--number-of-close-cities",
        "3",
        "--json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout:\n{}", stdout);

    // Log lines share stdout; the pretty JSON object is the last block.
    let json_start = stdout.rfind("\n{").expect("no JSON in output") + 1;
    let summary: serde_json::Value = serde_json::from_str(stdout[json_start..].trim()).unwrap();
    assert_eq!(summary["complete"], true);
    assert_eq!(summary["order"].as_array().unwrap().len(), 12);
}
