use rand::Rng;

use crate::types::ScoredTour;

/// Tournament selection: samples `size` distinct members without replacement
/// (partial Fisher-Yates over the index range) and returns the cheapest.
/// Cost ties go to the first sampled member. The population is never
/// mutated.
pub fn tournament<'a, R: Rng>(
    population: &'a [ScoredTour],
    size: usize,
    rng: &mut R,
) -> &'a ScoredTour {
    let k = size.clamp(1, population.len());
    let mut indices: Vec<usize> = (0..population.len()).collect();
    for j in 0..k {
        let pick = rng.gen_range(j..indices.len());
        indices.swap(j, pick);
    }
    let mut best = &population[indices[0]];
    for &index in &indices[1..k] {
        let candidate = &population[index];
        if candidate.cost < best.cost {
            best = candidate;
        }
    }
    best
}
