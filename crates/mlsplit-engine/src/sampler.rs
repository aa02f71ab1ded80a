//! Uniform subset sampling.

use rand::{Rng, seq::index};

/// Draws `k` distinct integers uniformly from the inclusive range `[low, high]`.
///
/// Consumes `rng`; the same stream state always yields the same subset. The
/// order of the returned values is random.
///
/// # Panics
///
/// Panics if `low > high` or if `k` exceeds the size of the range.
///
/// # Examples
///
/// ```
/// use mlsplit_engine::sampler::combination;
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(7);
/// let mut subset = combination(10, 19, 4, &mut rng);
/// subset.sort_unstable();
/// subset.dedup();
/// assert_eq!(subset.len(), 4);
/// assert!(subset.iter().all(|i| (10..=19).contains(i)));
/// ```
pub fn combination<R>(low: usize, high: usize, k: usize, rng: &mut R) -> Vec<usize>
where
    R: Rng + ?Sized,
{
    assert!(low <= high, "empty range [{low}, {high}]");
    let length = high - low + 1;
    assert!(k <= length, "cannot draw {k} distinct values from {length}");
    index::sample(rng, length, k)
        .into_iter()
        .map(|i| low + i)
        .collect()
}
