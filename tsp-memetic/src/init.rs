use rand::prelude::SliceRandom;
use rand::Rng;
use tsp_instances::nearest_neighbor_route;

use crate::types::ScoredTour;

/// Builds the starting generation: `size - 1` uniformly random permutations
/// (duplicates across the population are allowed) plus one greedy
/// nearest-neighbor tour appended last, all scored against `matrix`. The
/// greedy seed pulls the initial population toward a reasonable tour without
/// collapsing its diversity.
pub fn initialize<R: Rng>(matrix: &[Vec<f32>], size: usize, rng: &mut R) -> Vec<ScoredTour> {
    let num_nodes = matrix.len();
    let mut population = Vec::with_capacity(size);
    for _ in 0..size.saturating_sub(1) {
        let mut route: Vec<usize> = (0..num_nodes).collect();
        route.shuffle(rng);
        population.push(ScoredTour::new(route, matrix));
    }
    population.push(ScoredTour::new(nearest_neighbor_route(matrix), matrix));
    population
}
