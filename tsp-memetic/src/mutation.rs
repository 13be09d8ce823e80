use rand::Rng;

/// With probability `probability`, applies one of two equally likely
/// perturbations: swap two distinct positions, or reverse the inclusive
/// segment between two distinct positions. The route must be an offspring
/// owned by the caller; elites still referenced in the population are never
/// handed to this function.
pub fn mutate<R: Rng>(route: &mut [usize], probability: f64, rng: &mut R) {
    let n = route.len();
    if n < 2 || rng.gen::<f64>() >= probability {
        return;
    }
    let first = rng.gen_range(0..n);
    let mut second = rng.gen_range(0..n);
    while second == first {
        second = rng.gen_range(0..n);
    }
    let (lo, hi) = if first < second {
        (first, second)
    } else {
        (second, first)
    };
    if rng.gen_bool(0.5) {
        route.swap(lo, hi);
    } else {
        route[lo..=hi].reverse();
    }
}
