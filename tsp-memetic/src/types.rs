use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tsp_instances::tour_cost;

/// A tour paired with its cached cyclic cost. The cost is computed when the
/// route is set and the pair is treated as immutable afterwards; operators
/// build new `ScoredTour`s instead of editing routes in place.
#[derive(Clone, Debug)]
pub struct ScoredTour {
    pub route: Vec<usize>,
    pub cost: f32,
}

impl ScoredTour {
    pub fn new(route: Vec<usize>, matrix: &[Vec<f32>]) -> Self {
        let cost = tour_cost(&route, matrix);
        Self { route, cost }
    }
}

/// True when `route` visits every index in `[0, route.len())` exactly once.
pub fn is_permutation(route: &[usize]) -> bool {
    let mut seen = vec![false; route.len()];
    route
        .iter()
        .all(|&node| node < seen.len() && !std::mem::replace(&mut seen[node], true))
}

/// Optimizer configuration. `None` fields resolve against the instance size
/// at run start; everything else is used as-is.
#[derive(Clone, Copy, Debug)]
pub struct GaParams {
    /// Target population size. Default: `max(100, n)`.
    pub population_size: Option<usize>,
    /// Members copied verbatim into the next generation.
    pub elitism: usize,
    /// Distinct members sampled per tournament.
    pub tournament_size: usize,
    /// Probability that a parent pair recombines; otherwise the children are
    /// copies of the parents. 1.0 means crossover is ungated.
    pub crossover_rate: f64,
    /// Mutation probability decays linearly from `base + floor` at the first
    /// generation down to `floor` at the last.
    pub mutation_base: f64,
    pub mutation_floor: f64,
    /// Generation budget. Default: `max(5000, 20 * n)`.
    pub max_generations: Option<usize>,
    /// Consecutive non-improving generations before the run stops.
    /// Default: `max(300, 2 * n)`.
    pub stagnation_limit: Option<usize>,
    /// Every this many generations the current best tour is refined with
    /// 2-opt and appended to the population. 0 disables hybridization.
    pub hybrid_period: usize,
    /// 2-opt sweep cap for the periodic refinement. A sweep costs O(n^2)
    /// delta evaluations, so this bounds how much of a generation's time the
    /// refiner may take; raising it trades time for tour quality.
    pub local_search_sweeps: usize,
    /// 2-opt sweep cap for the final polish of the best tour.
    pub polish_sweeps: usize,
}

impl Default for GaParams {
    fn default() -> Self {
        Self {
            population_size: None,
            elitism: 2,
            tournament_size: 5,
            crossover_rate: 1.0,
            mutation_base: 0.2,
            mutation_floor: 0.05,
            max_generations: None,
            stagnation_limit: None,
            hybrid_period: 50,
            local_search_sweeps: 10,
            polish_sweeps: 50,
        }
    }
}

impl GaParams {
    pub fn from_hyperparameters(hyperparameters: &Option<Map<String, Value>>) -> Self {
        let mut params = Self::default();
        let Some(map) = hyperparameters else {
            return params;
        };
        let get_usize = |key: &str| map.get(key).and_then(|v| v.as_u64()).map(|v| v as usize);
        let get_f64 = |key: &str| map.get(key).and_then(|v| v.as_f64());

        if let Some(v) = get_usize("population_size") {
            params.population_size = Some(v.clamp(2, 100_000));
        }
        if let Some(v) = get_usize("elitism") {
            params.elitism = v;
        }
        if let Some(v) = get_usize("tournament_size") {
            params.tournament_size = v.max(1);
        }
        if let Some(v) = get_f64("crossover_rate") {
            params.crossover_rate = v.clamp(0.0, 1.0);
        }
        if let Some(v) = get_f64("mutation_base") {
            params.mutation_base = v.clamp(0.0, 1.0);
        }
        if let Some(v) = get_f64("mutation_floor") {
            params.mutation_floor = v.clamp(0.0, 1.0);
        }
        if let Some(v) = get_usize("max_generations") {
            params.max_generations = Some(v.max(1));
        }
        if let Some(v) = get_usize("stagnation_limit") {
            params.stagnation_limit = Some(v.max(1));
        }
        if let Some(v) = get_usize("hybrid_period") {
            params.hybrid_period = v;
        }
        if let Some(v) = get_usize("local_search_sweeps") {
            params.local_search_sweeps = v;
        }
        if let Some(v) = get_usize("polish_sweeps") {
            params.polish_sweeps = v;
        }
        params
    }

    pub fn population_size_for(&self, num_nodes: usize) -> usize {
        self.population_size.unwrap_or(num_nodes.max(100)).max(2)
    }

    pub fn max_generations_for(&self, num_nodes: usize) -> usize {
        self.max_generations.unwrap_or((num_nodes * 20).max(5000))
    }

    pub fn stagnation_limit_for(&self, num_nodes: usize) -> usize {
        self.stagnation_limit.unwrap_or((num_nodes * 2).max(300))
    }

    pub fn mutation_probability(&self, generation: usize, max_generations: usize) -> f64 {
        let progress = generation as f64 / max_generations.max(1) as f64;
        self.mutation_base * (1.0 - progress) + self.mutation_floor
    }
}

/// The result record of one optimization run. `instance` is the caller's
/// opaque label, passed through untouched for downstream reporting.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunOutcome {
    pub instance: String,
    pub route: Vec<usize>,
    pub cost: f32,
    pub elapsed_secs: f64,
    pub cost_history: Vec<f32>,
}
