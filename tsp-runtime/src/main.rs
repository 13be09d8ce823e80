use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, Command};
use flate2::{write::ZlibEncoder, Compression};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{fs, io::Read, io::Write, path::PathBuf};
use tsp_instances::{load_instance, Instance};
use tsp_memetic::{solve_instance, GaParams};

fn cli() -> Command {
    Command::new("tsp-runtime")
        .about("Generates instances, computes and verifies tours")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("generate_instance")
                .about("Generates a seeded random instance")
                .arg(arg!(<SIZE> "Number of nodes").value_parser(clap::value_parser!(usize)))
                .arg(
                    arg!(--seed [SEED] "Seed for instance generation")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--clusters [CLUSTERS] "Number of clusters (0 = uniform placement)")
                        .default_value("0")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(arg!(--name [NAME] "Instance name").value_parser(clap::value_parser!(String)))
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the instance json will be saved to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("solve_instance")
                .about("Runs the memetic optimizer on one instance")
                .arg(
                    arg!(<INSTANCE> "Path to an instance file (.json or TSPLIB)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--params [PARAMS] "Hyperparameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--seed [SEED] "Run seed")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the result record will be saved to this file path (default json)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--compress [COMPRESS] "If output file is set, the result record will be compressed as zlib")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("verify_route")
                .about("Verifies a route against an instance")
                .arg(
                    arg!(<INSTANCE> "Path to an instance file (.json or TSPLIB)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<ROUTE> "Route json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("generate_instance", sub_m)) => generate_instance(
            *sub_m.get_one::<usize>("SIZE").unwrap(),
            *sub_m.get_one::<u64>("seed").unwrap(),
            *sub_m.get_one::<usize>("clusters").unwrap(),
            sub_m.get_one::<String>("name").cloned(),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        Some(("solve_instance", sub_m)) => solve(
            sub_m.get_one::<PathBuf>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<String>("params").cloned(),
            *sub_m.get_one::<u64>("seed").unwrap(),
            sub_m.get_one::<PathBuf>("output").cloned(),
            *sub_m.get_one::<bool>("compress").unwrap(),
        ),
        Some(("verify_route", sub_m)) => verify_route(
            sub_m.get_one::<PathBuf>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<String>("ROUTE").unwrap().clone(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn generate_instance(
    size: usize,
    seed: u64,
    clusters: usize,
    name: Option<String>,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let name = name.unwrap_or_else(|| format!("random_{}_{}", size, seed));
    let instance = Instance::generate(&name, &make_seed(seed), size, clusters)?;
    let json = serde_json::to_string(&instance)?;
    if let Some(path) = output_file {
        fs::write(&path, json)?;
        println!("instance written to: {:?}", path);
    } else {
        println!("{}", json);
    }
    Ok(())
}

fn solve(
    instance_path: PathBuf,
    params: Option<String>,
    seed: u64,
    output_file: Option<PathBuf>,
    compress: bool,
) -> Result<()> {
    let instance = load_instance(&instance_path)?;
    let params = load_params(params.as_deref())?;
    let outcome = solve_instance(&instance, &params, make_seed(seed))?;

    if let Some(path) = output_file {
        if compress {
            fs::write(&path, compress_obj(&outcome)?)?;
        } else {
            fs::write(&path, serde_json::to_string(&outcome)?)?;
        }
        println!("result record written to: {:?}", path);
    } else {
        println!("{}", serde_json::to_string(&outcome)?);
    }
    Ok(())
}

fn verify_route(instance_path: PathBuf, route: String) -> Result<()> {
    let instance = load_instance(&instance_path)?;
    let route = load_route(&route)?;
    let cost = instance
        .verify_route(&route)
        .map_err(|e| anyhow!("Invalid route: {}", e))?;
    println!(
        "Route is valid: cost {} (nearest-neighbor baseline: {})",
        cost, instance.baseline_cost
    );
    Ok(())
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
    let map = serde_json::from_str::<Map<String, Value>>(&text)
        .map_err(|e| anyhow!("Failed to parse params: {}", e))?;
    Ok(GaParams::from_hyperparameters(&Some(map)))
}

fn load_route(route: &str) -> Result<Vec<usize>> {
    let text = if route == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read route from stdin: {}", e))?;
        buffer
    } else if route.ends_with(".json") {
        fs::read_to_string(route)
            .map_err(|e| anyhow!("Failed to read route file {}: {}", route, e))?
    } else {
        route.to_string()
    };
    serde_json::from_str::<Vec<usize>>(&text).map_err(|e| anyhow!("Failed to parse route: {}", e))
}

fn compress_obj<T: Serialize>(obj: &T) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(serde_json::to_string(obj)?.as_bytes())?;
    Ok(encoder.finish()?)
}

fn make_seed(index: u64) -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed[0..8].copy_from_slice(&index.to_le_bytes());
    seed
}
