use std::time::Instant;

use anyhow::Result;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use tsp_instances::{validate_matrix, Instance};

use crate::crossover::order_crossover;
use crate::init::initialize;
use crate::local_search::refine;
use crate::mutation::mutate;
use crate::selection::tournament;
use crate::types::{GaParams, RunOutcome, ScoredTour};

/// Runs one full evolutionary optimization over `instance`. The run owns all
/// of its state (population, counters, history, RNG), so independent runs
/// can execute concurrently as long as each gets its own seed.
pub fn solve_instance(instance: &Instance, params: &GaParams, seed: [u8; 32]) -> Result<RunOutcome> {
    let matrix = &instance.distance_matrix;
    validate_matrix(matrix)?;
    let num_nodes = matrix.len();

    let start = Instant::now();
    let mut rng = SmallRng::from_seed(seed);

    let population_size = params.population_size_for(num_nodes);
    let max_generations = params.max_generations_for(num_nodes);
    let stagnation_limit = params.stagnation_limit_for(num_nodes);

    let mut population = initialize(matrix, population_size, &mut rng);
    let mut best = cheapest(&population).clone();
    let mut cost_history = Vec::new();
    let mut stagnation = 0usize;

    for generation in 0..max_generations {
        population.sort_by(|a, b| a.cost.partial_cmp(&b.cost).unwrap());

        // The next generation replaces the current one wholesale; elites are
        // cloned in so carry-overs never alias freshly bred offspring.
        let mut next = Vec::with_capacity(population_size + 1);
        next.extend(
            population
                .iter()
                .take(params.elitism.min(population_size))
                .cloned(),
        );

        let mutation_probability = params.mutation_probability(generation, max_generations);
        while next.len() < population_size {
            let parent_a = tournament(&population, params.tournament_size, &mut rng);
            let parent_b = tournament(&population, params.tournament_size, &mut rng);
            for child in breed(
                parent_a,
                parent_b,
                mutation_probability,
                params,
                matrix,
                &mut rng,
            ) {
                // the second child is dropped if it would overshoot
                if next.len() < population_size {
                    next.push(child);
                }
            }
        }

        if params.hybrid_period > 0 && (generation + 1) % params.hybrid_period == 0 {
            // Hybridization: refine this generation's best and append it,
            // letting the population exceed the target size by one until the
            // next refill.
            let mut route = cheapest(&next).route.clone();
            let cost = refine(&mut route, matrix, params.local_search_sweeps);
            next.push(ScoredTour { route, cost });
        }

        population = next;

        let generation_best = cheapest(&population);
        cost_history.push(generation_best.cost);
        if generation_best.cost < best.cost {
            best = generation_best.clone();
            stagnation = 0;
        } else {
            stagnation += 1;
        }
        if stagnation >= stagnation_limit {
            break;
        }
    }

    let mut route = best.route;
    let cost = refine(&mut route, matrix, params.polish_sweeps);
    Ok(RunOutcome {
        instance: instance.name.clone(),
        route,
        cost,
        elapsed_secs: start.elapsed().as_secs_f64(),
        cost_history,
    })
}

fn breed<R: Rng>(
    parent_a: &ScoredTour,
    parent_b: &ScoredTour,
    mutation_probability: f64,
    params: &GaParams,
    matrix: &[Vec<f32>],
    rng: &mut R,
) -> [ScoredTour; 2] {
    let (mut first, mut second) = if rng.gen::<f64>() < params.crossover_rate {
        (
            order_crossover(&parent_a.route, &parent_b.route, rng),
            order_crossover(&parent_b.route, &parent_a.route, rng),
        )
    } else {
        (parent_a.route.clone(), parent_b.route.clone())
    };
    mutate(&mut first, mutation_probability, rng);
    mutate(&mut second, mutation_probability, rng);
    [
        ScoredTour::new(first, matrix),
        ScoredTour::new(second, matrix),
    ]
}

fn cheapest(population: &[ScoredTour]) -> &ScoredTour {
    population
        .iter()
        .min_by(|a, b| a.cost.partial_cmp(&b.cost).unwrap())
        .unwrap()
}
