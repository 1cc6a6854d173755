//! Seeding: slot order for a power-of-two bracket and an optional random draw.

use crate::models::Competitor;
use rand::seq::SliceRandom;
use rand::Rng;

/// Smallest power of two that holds `n` competitors (at least 2).
pub fn bracket_size(n: usize) -> usize {
    n.max(2).next_power_of_two()
}

/// 1-based seeds in round-1 slot order for a bracket of `size` slots.
///
/// Pairs are (1, size), (size/2 + 1, size/2), ... so that the top seeds can only meet
/// in the latest rounds. `size` must be a power of two.
pub fn seed_positions(size: usize) -> Vec<usize> {
    let mut seeds = vec![1usize];
    while seeds.len() < size {
        let n = seeds.len();
        seeds = seeds
            .iter()
            .flat_map(|&seed| [seed, n * 2 + 1 - seed])
            .collect();
    }
    seeds
}

/// Randomise the seeding order in place (for a random draw instead of ranked seeding).
pub fn shuffle_seeding<R: Rng + ?Sized>(competitors: &mut [Competitor], rng: &mut R) {
    competitors.shuffle(rng);
}
