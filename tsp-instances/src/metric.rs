use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Radius of the TSPLIB idealized sphere, in kilometers.
const EARTH_RADIUS_KM: f64 = 6378.388;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DistanceMode {
    Euclid2d,
    Geographic,
}

impl DistanceMode {
    /// Resolves a TSPLIB `EDGE_WEIGHT_TYPE` keyword. An unrecognized keyword
    /// is a fatal condition for that instance and is surfaced here, before
    /// any distance matrix is built.
    pub fn from_edge_weight_type(keyword: &str) -> Result<Self> {
        match keyword {
            "EUC_2D" => Ok(Self::Euclid2d),
            "GEO" => Ok(Self::Geographic),
            other => Err(anyhow!("Unsupported edge weight type: {}", other)),
        }
    }

    pub fn distance(&self, from: (f64, f64), to: (f64, f64)) -> f32 {
        match self {
            Self::Euclid2d => {
                let dx = (from.0 - to.0) as f32;
                let dy = (from.1 - to.1) as f32;
                dx.hypot(dy)
            }
            Self::Geographic => geographic_distance(from, to) as f32,
        }
    }
}

// Geographic coordinates use the TSPLIB degree.minute encoding: the integer
// part is degrees, the fractional part is minutes.
fn to_radians(coordinate: f64) -> f64 {
    let degrees = coordinate.trunc();
    let minutes = coordinate - degrees;
    PI * (degrees + 5.0 * minutes / 3.0) / 180.0
}

fn geographic_distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat_i, lon_i) = (to_radians(from.0), to_radians(from.1));
    let (lat_j, lon_j) = (to_radians(to.0), to_radians(to.1));
    let q1 = (lon_i - lon_j).cos();
    let q2 = (lat_i - lat_j).cos();
    let q3 = (lat_i + lat_j).cos();
    let arc = 0.5 * ((1.0 + q1) * q2 - (1.0 - q1) * q3);
    EARTH_RADIUS_KM * arc.clamp(-1.0, 1.0).acos()
}
