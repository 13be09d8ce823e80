use anyhow::{anyhow, Result};
use clap::{arg, Command};
use futures::stream::{self, StreamExt};
use std::{collections::BTreeMap, fs, path::PathBuf, sync::Arc};
use tokio::runtime::Runtime;
use tsp_instances::load_instance;
use tsp_memetic::{solve_instance, GaParams, RunOutcome};

fn cli() -> Command {
    Command::new("tsp-worker")
        .about("Runs the optimizer over a batch of independent instances")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve_batch")
                .about("Solves a batch of instances across worker tasks")
                .arg(
                    arg!(<INSTANCES> ... "Paths to instance files (.json or TSPLIB)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--params [PARAMS] "Hyperparameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--seed [SEED] "Base seed; the run for instance i uses seed + i")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--workers [WORKERS] "Number of worker tasks")
                        .default_value("1")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--output [OUTPUT_FOLDER] "If set, the result record for each instance will be saved as '<name>.json' in this folder")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve_batch", sub_m)) => solve_batch(
            sub_m
                .get_many::<PathBuf>("INSTANCES")
                .unwrap()
                .cloned()
                .collect(),
            sub_m.get_one::<String>("params").cloned(),
            *sub_m.get_one::<u64>("seed").unwrap(),
            *sub_m.get_one::<usize>("workers").unwrap(),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn solve_batch(
    instance_paths: Vec<PathBuf>,
    params: Option<String>,
    base_seed: u64,
    num_workers: usize,
    output_folder: Option<PathBuf>,
) -> Result<()> {
    if num_workers == 0 {
        return Err(anyhow!("Number of workers must be non-zero"));
    }
    if let Some(path) = &output_folder {
        fs::create_dir_all(path)?;
    }
    let params = Arc::new(load_params(params.as_deref())?);
    let runtime = Runtime::new()?;

    runtime.block_on(async {
        // One task per instance; every task owns its instance, run state and
        // seeded generator, so nothing is shared between concurrent runs and
        // completion order never affects any individual result.
        let results = stream::iter(instance_paths.into_iter().enumerate())
            .map(|(index, path)| {
                let params = Arc::clone(&params);
                tokio::spawn(async move {
                    let instance = load_instance(&path)
                        .map_err(|e| anyhow!("{}: {}", path.display(), e))?;
                    solve_instance(
                        &instance,
                        &params,
                        make_seed(base_seed.wrapping_add(index as u64)),
                    )
                    .map_err(|e| anyhow!("{}: {}", path.display(), e))
                })
            })
            .buffer_unordered(num_workers)
            .collect::<Vec<_>>()
            .await;

        let mut summary: BTreeMap<String, f32> = BTreeMap::new();
        let mut num_failed = 0usize;
        for result in results {
            match result? {
                Ok(outcome) => {
                    report(&outcome);
                    if let Some(folder) = &output_folder {
                        let path = folder.join(format!("{}.json", outcome.instance));
                        fs::write(&path, serde_json::to_string(&outcome)?)?;
                    }
                    summary.insert(outcome.instance.clone(), outcome.cost);
                }
                // one bad instance must not take the rest of the batch down
                Err(e) => {
                    eprintln!("Run failed: {}", e);
                    num_failed += 1;
                }
            }
        }

        let summary_json = serde_json::to_string_pretty(&summary)?;
        if let Some(folder) = &output_folder {
            let path = folder.join("summary.json");
            fs::write(&path, &summary_json)?;
            println!("summary written to: {:?}", path);
        } else {
            println!("{}", summary_json);
        }

        if summary.is_empty() && num_failed > 0 {
            Err(anyhow!("All {} runs failed", num_failed))
        } else {
            Ok(())
        }
    })
}

fn report(outcome: &RunOutcome) {
    println!(
        "{}: cost {:.2} after {} generations ({:.2}s)",
        outcome.instance,
        outcome.cost,
        outcome.cost_history.len(),
        outcome.elapsed_secs
    );
}

fn load_params(params: Option<&str>) -> Result<GaParams> {
    let Some(params) = params else {
        return Ok(GaParams::default());
    };
    let text = if params.ends_with(".json") {
        fs::read_to_string(params)
            .map_err(|e| anyhow!("Failed to read params file {}: {}", params, e))?
    } else {
        params.to_string()
    };
    let map = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&text)
        .map_err(|e| anyhow!("Failed to parse params: {}", e))?;
    Ok(GaParams::from_hyperparameters(&Some(map)))
}

fn make_seed(index: u64) -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed[0..8].copy_from_slice(&index.to_le_bytes());
    seed
}
