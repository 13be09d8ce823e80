use tsp_instances::tour_cost;

/// Bounded 2-opt refinement. Sweeps segment reversals `[i, j)` over
/// `1 <= i < n-2`, `i+2 <= j < n`; adjacent pairs are skipped since
/// reversing them is a no-op on a cycle, and the closing edge stays fixed.
/// Acceptance is first-improvement: a reversal whose two-edge delta strictly
/// lowers the cost is applied immediately and later pairs in the same sweep
/// see the updated route. The search stops after an improvement-free sweep
/// or after `max_sweeps` sweeps, whichever comes first; the cap keeps the
/// O(n^2)-per-sweep refiner from dominating generation time on large
/// instances. Returns the cost of the refined route, never above the cost of
/// the input route.
pub fn refine(route: &mut [usize], matrix: &[Vec<f32>], max_sweeps: usize) -> f32 {
    let n = route.len();
    if n >= 4 {
        for _ in 0..max_sweeps {
            let mut improved = false;
            for i in 1..n - 2 {
                for j in (i + 2)..n {
                    let removed = matrix[route[i - 1]][route[i]] + matrix[route[j - 1]][route[j]];
                    let added = matrix[route[i - 1]][route[j - 1]] + matrix[route[i]][route[j]];
                    if added < removed {
                        route[i..j].reverse();
                        improved = true;
                    }
                }
            }
            if !improved {
                break;
            }
        }
    }
    tour_cost(route, matrix)
}
