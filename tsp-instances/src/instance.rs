use std::collections::HashSet;

use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use statrs::function::erf::{erf, erf_inv};

use crate::metric::DistanceMode;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Instance {
    pub name: String,
    pub num_nodes: usize,
    pub node_positions: Option<Vec<(f64, f64)>>,
    pub distance_matrix: Vec<Vec<f32>>,
    pub baseline_route: Vec<usize>,
    pub baseline_cost: f32,
}

impl Instance {
    pub fn from_coords(name: &str, coords: Vec<(f64, f64)>, mode: DistanceMode) -> Result<Self> {
        if coords.len() < 3 {
            return Err(anyhow!(
                "Instance must have at least 3 nodes, got {}",
                coords.len()
            ));
        }
        let distance_matrix: Vec<Vec<f32>> = coords
            .iter()
            .map(|&from| coords.iter().map(|&to| mode.distance(from, to)).collect())
            .collect();
        Self::build(name, Some(coords), distance_matrix)
    }

    pub fn from_matrix(name: &str, distance_matrix: Vec<Vec<f32>>) -> Result<Self> {
        Self::build(name, None, distance_matrix)
    }

    fn build(
        name: &str,
        node_positions: Option<Vec<(f64, f64)>>,
        distance_matrix: Vec<Vec<f32>>,
    ) -> Result<Self> {
        validate_matrix(&distance_matrix)?;
        let baseline_route = nearest_neighbor_route(&distance_matrix);
        let baseline_cost = tour_cost(&baseline_route, &distance_matrix);
        Ok(Self {
            name: name.to_string(),
            num_nodes: distance_matrix.len(),
            node_positions,
            distance_matrix,
            baseline_route,
            baseline_cost,
        })
    }

    /// Generates a seeded Euclidean instance on the 0..=1000 grid. With
    /// `num_clusters == 0` every node is placed uniformly; otherwise roughly
    /// half the nodes gather around the first `num_clusters` nodes.
    pub fn generate(
        name: &str,
        seed: &[u8; 32],
        num_nodes: usize,
        num_clusters: usize,
    ) -> Result<Self> {
        if num_nodes < 3 {
            return Err(anyhow!("Instance must have at least 3 nodes"));
        }
        let mut rng = SmallRng::from_seed(seed.clone());

        let mut node_positions: Vec<(i32, i32)> = Vec::with_capacity(num_nodes);
        let mut node_positions_set: HashSet<(i32, i32)> = HashSet::with_capacity(num_nodes);
        while node_positions.len() < num_nodes {
            let node = node_positions.len();
            let pos = if num_clusters == 0 || node <= num_clusters || rng.gen::<f64>() < 0.5 {
                (rng.gen_range(0..=1000), rng.gen_range(0..=1000))
            } else {
                let center = node_positions[rng.gen_range(0..num_clusters)];
                (
                    truncated_normal_sample(&mut rng, center.0 as f64, 60.0, 0.0, 1000.0).round()
                        as i32,
                    truncated_normal_sample(&mut rng, center.1 as f64, 60.0, 0.0, 1000.0).round()
                        as i32,
                )
            };
            if node_positions_set.contains(&pos) {
                continue;
            }
            node_positions.push(pos.clone());
            node_positions_set.insert(pos);
        }

        let coords = node_positions
            .into_iter()
            .map(|(x, y)| (x as f64, y as f64))
            .collect();
        Self::from_coords(name, coords, DistanceMode::Euclid2d)
    }

    /// Re-checks invariants after deserializing from an external source.
    pub fn validate(&self) -> Result<()> {
        validate_matrix(&self.distance_matrix)?;
        if self.num_nodes != self.distance_matrix.len() {
            return Err(anyhow!(
                "num_nodes ({}) does not match matrix size ({})",
                self.num_nodes,
                self.distance_matrix.len()
            ));
        }
        Ok(())
    }

    /// Checks that `route` is a permutation of the instance's nodes and
    /// returns its cyclic cost.
    pub fn verify_route(&self, route: &[usize]) -> Result<f32> {
        if route.len() != self.num_nodes {
            return Err(anyhow!(
                "Route length ({}) does not match number of nodes ({})",
                route.len(),
                self.num_nodes
            ));
        }
        let visited = route.iter().cloned().collect::<HashSet<usize>>();
        if visited.len() != route.len() {
            return Err(anyhow!("Route contains duplicate nodes"));
        }
        if route.iter().any(|&node| node >= self.num_nodes) {
            return Err(anyhow!("Route contains invalid nodes"));
        }
        Ok(tour_cost(route, &self.distance_matrix))
    }
}

/// Refuses empty, ragged, asymmetric or non-finite distance matrices before
/// an optimization run ever starts.
pub fn validate_matrix(matrix: &[Vec<f32>]) -> Result<()> {
    let n = matrix.len();
    if n < 3 {
        return Err(anyhow!("Distance matrix must cover at least 3 nodes"));
    }
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != n {
            return Err(anyhow!(
                "Distance matrix row {} has length {}, expected {}",
                i,
                row.len(),
                n
            ));
        }
        for (j, &d) in row.iter().enumerate() {
            if !d.is_finite() || d < 0.0 {
                return Err(anyhow!(
                    "Distance matrix entry [{}][{}] must be a non-negative finite number",
                    i,
                    j
                ));
            }
            if d != matrix[j][i] {
                return Err(anyhow!(
                    "Distance matrix is not symmetric at [{}][{}]",
                    i,
                    j
                ));
            }
            if i == j && d != 0.0 {
                return Err(anyhow!("Distance matrix diagonal entry [{}] must be zero", i));
            }
        }
    }
    Ok(())
}

/// Cyclic cost of a tour: all consecutive edges plus the closing edge back
/// to the start. The caller guarantees `route` is a valid permutation.
pub fn tour_cost(route: &[usize], matrix: &[Vec<f32>]) -> f32 {
    route.windows(2).map(|w| matrix[w[0]][w[1]]).sum::<f32>()
        + matrix[route[route.len() - 1]][route[0]]
}

/// Greedy construction: start at node 0 and repeatedly append the nearest
/// unvisited node. Distance ties break toward the lowest index, since only a
/// strictly smaller distance displaces the current candidate.
pub fn nearest_neighbor_route(matrix: &[Vec<f32>]) -> Vec<usize> {
    let num_nodes = matrix.len();
    let mut visited = vec![false; num_nodes];
    let mut route = Vec::with_capacity(num_nodes);
    let mut current = 0;
    visited[current] = true;
    route.push(current);
    while route.len() < num_nodes {
        let mut next = usize::MAX;
        let mut best = f32::INFINITY;
        for candidate in 0..num_nodes {
            if !visited[candidate] && matrix[current][candidate] < best {
                best = matrix[current][candidate];
                next = candidate;
            }
        }
        visited[next] = true;
        route.push(next);
        current = next;
    }
    route
}

fn truncated_normal_sample<T: Rng>(
    rng: &mut T,
    mean: f64,
    std_dev: f64,
    min_val: f64,
    max_val: f64,
) -> f64 {
    let cdf_min = 0.5 * (1.0 + erf((min_val - mean) / (std_dev * (2.0_f64).sqrt())));
    let cdf_max = 0.5 * (1.0 + erf((max_val - mean) / (std_dev * (2.0_f64).sqrt())));
    let sample = rng.gen::<f64>() * (cdf_max - cdf_min) + cdf_min;
    mean + std_dev * (2.0_f64).sqrt() * erf_inv(2.0 * sample - 1.0)
}
