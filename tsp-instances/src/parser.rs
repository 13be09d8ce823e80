use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};

use crate::instance::Instance;
use crate::metric::DistanceMode;

/// Loads an instance from disk: `.json` files deserialize directly, anything
/// else is parsed as a TSPLIB-style coordinate file.
pub fn load_instance(path: &Path) -> Result<Instance> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read instance file {}: {}", path.display(), e))?;
    if path.extension().map_or(false, |ext| ext == "json") {
        let instance = serde_json::from_str::<Instance>(&text)
            .map_err(|e| anyhow!("Failed to parse instance {}: {}", path.display(), e))?;
        instance.validate()?;
        Ok(instance)
    } else {
        parse_tsplib(&text)
    }
}

/// Parses a TSPLIB-style coordinate file: header keywords followed by a
/// `NODE_COORD_SECTION` with one `<index> <x> <y>` line per node.
pub fn parse_tsplib(text: &str) -> Result<Instance> {
    let mut name = String::from("unnamed");
    let mut dimension: Option<usize> = None;
    let mut mode: Option<DistanceMode> = None;
    let mut coords: Vec<(f64, f64)> = Vec::new();
    let mut in_coord_section = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line == "EOF" {
            continue;
        }
        if in_coord_section {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(anyhow!("Malformed coordinate line: '{}'", line));
            }
            let x = fields[1]
                .parse::<f64>()
                .map_err(|_| anyhow!("Malformed coordinate line: '{}'", line))?;
            let y = fields[2]
                .parse::<f64>()
                .map_err(|_| anyhow!("Malformed coordinate line: '{}'", line))?;
            coords.push((x, y));
            continue;
        }
        if line == "NODE_COORD_SECTION" {
            // The distance mode must be resolved before any coordinates are
            // consumed; an unsupported mode fails this instance only.
            if mode.is_none() {
                return Err(anyhow!("Missing EDGE_WEIGHT_TYPE before NODE_COORD_SECTION"));
            }
            in_coord_section = true;
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim();
            match key.trim() {
                "NAME" => name = value.to_string(),
                "DIMENSION" => {
                    dimension = Some(
                        value
                            .parse::<usize>()
                            .map_err(|_| anyhow!("Malformed DIMENSION: '{}'", value))?,
                    )
                }
                "EDGE_WEIGHT_TYPE" => mode = Some(DistanceMode::from_edge_weight_type(value)?),
                // TYPE, COMMENT and other keywords carry no information we use
                _ => {}
            }
        }
    }

    let dimension = dimension.ok_or_else(|| anyhow!("Missing DIMENSION"))?;
    let mode = mode.ok_or_else(|| anyhow!("Missing EDGE_WEIGHT_TYPE"))?;
    if coords.len() != dimension {
        return Err(anyhow!(
            "Expected {} coordinates, found {}",
            dimension,
            coords.len()
        ));
    }
    Instance::from_coords(&name, coords, mode)
}
