use std::path::PathBuf;

use model::config::RunConfig;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("usage: single_run <day-instance.json> [more-days.json ...]");
        std::process::exit(1);
    }

    let output_dir = PathBuf::from("output");
    let config = RunConfig::default();
    let paths: Vec<PathBuf> = args.into_iter().map(PathBuf::from).collect();

    if paths.len() == 1 {
        match cli::solve_file(&paths[0], &config) {
            Ok(json) => {
                println!("{}", serde_json::to_string_pretty(&json).unwrap());
            }
            Err(err) => {
                eprintln!("day failed: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    let results = cli::run_batch(&paths, &config, &output_dir);
    let mut failures = 0;
    for (path, result) in &results {
        match result {
            Ok(out_path) => println!("{} -> {}", path.display(), out_path.display()),
            Err(err) => {
                failures += 1;
                eprintln!("{} failed: {err}", path.display());
            }
        }
    }
    if failures > 0 {
        eprintln!("{failures} day(s) failed out of {}", results.len());
        std::process::exit(1);
    }
}
