use crate::cities::City;
use fastrand::Rng;
use rayon::prelude::*;

/// For every city, the indices of its `k` nearest other cities, nearest first.
pub fn close_cities(cities: &[City], k: usize) -> Vec<Vec<usize>> {
    let n = cities.len();
    let k = k.min(n.saturating_sub(1));

    (0..n)
        .into_par_iter()
        .map(|i| {
            let mut others: Vec<(f64, usize)> = (0..n)
                .filter(|&j| j != i)
                .map(|j| (cities[i].distance(&cities[j]), j))
                .collect();
            if k == 0 {
                return Vec::new();
            }
            if k < others.len() {
                others.select_nth_unstable_by(k - 1, |a, b| a.0.total_cmp(&b.0));
                others.truncate(k);
            }
            others.sort_by(|a, b| a.0.total_cmp(&b.0));
            others.into_iter().map(|(_, j)| j).collect()
        })
        .collect()
}

/// Builds a starting permutation. Each step moves to an unvisited close city
/// with probability `close_chance`, otherwise to any unvisited city.
pub fn seed_tour(rng: &mut Rng, close: &[Vec<usize>], close_chance: f32) -> Vec<usize> {
    let n = close.len();
    if n == 0 {
        return Vec::new();
    }

    // `remaining` holds unvisited cities; `slot[c]` is c's index in it.
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut slot: Vec<usize> = (0..n).collect();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let mut take = |city: usize, remaining: &mut Vec<usize>, visited: &mut Vec<bool>| {
        let idx = slot[city];
        let last = *remaining.last().unwrap_or(&city);
        remaining.swap_remove(idx);
        if last != city {
            slot[last] = idx;
        }
        visited[city] = true;
    };

    let mut current = rng.usize(0..n);
    take(current, &mut remaining, &mut visited);
    order.push(current);

    while !remaining.is_empty() {
        let mut next = None;
        if rng.f32() < close_chance {
            let candidates: Vec<usize> = close[current]
                .iter()
                .copied()
                .filter(|&c| !visited[c])
                .collect();
            if !candidates.is_empty() {
                next = Some(candidates[rng.usize(0..candidates.len())]);
            }
        }
        let city = next.unwrap_or_else(|| remaining[rng.usize(0..remaining.len())]);
        take(city, &mut remaining, &mut visited);
        order.push(city);
        current = city;
    }
    order
}

/// Reverses a random segment or swaps two cities.
pub fn mutate(order: &mut [usize], rng: &mut Rng) {
    let n = order.len();
    if n < 2 {
        return;
    }
    let mut i = rng.usize(0..n);
    let mut j = rng.usize(0..n);
    if rng.bool() {
        if i > j {
            std::mem::swap(&mut i, &mut j);
        }
        order[i..=j].reverse();
    } else {
        order.swap(i, j);
    }
}
