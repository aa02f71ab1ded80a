//! Threshold-constrained local moves on a single member.
//!
//! Each attempt swaps one feature of the subset for a feature drawn uniformly
//! from the whole range. A swap is accepted only if the resulting score stays
//! at or above the current threshold, so the score of a member never drops
//! below the last recorded level. This is a hard constraint rather than a
//! Metropolis ratio: inside the admissible region every proposal is accepted.
//!
//! # Draw order
//!
//! Within one attempt the slot to drop is drawn before the replacement
//! feature. A replacement already present in the subset spends the attempt
//! without a move and without redrawing.

use std::mem;

use rand::Rng;

use crate::{population::Member, scoring::ScoringModel};

/// Performs `attempts` swap attempts on `member` and returns the number of
/// accepted moves.
///
/// On acceptance the subset, profile and cached score of `member` are
/// replaced; rejected proposals leave it untouched.
pub fn mutate_member<M, R>(
    model: &M,
    member: &mut Member<M::Profile>,
    threshold: f64,
    attempts: usize,
    rng: &mut R,
) -> usize
where
    M: ScoringModel,
    R: Rng + ?Sized,
{
    let num_features = model.num_features();
    let geneset_size = member.subset.len();
    let mut candidate = member.profile.clone();
    let mut moves = 0;

    for _ in 0..attempts {
        let to_drop = rng.random_range(0..geneset_size);
        let index_in = rng.random_range(0..num_features);
        if member.subset.contains(&index_in) {
            continue;
        }

        let index_out = member.subset[to_drop];
        model.adjust_profile(&member.profile, &mut candidate, index_in, index_out);
        let new_score = model.score(&candidate);
        if new_score >= threshold {
            member.subset[to_drop] = index_in;
            mem::swap(&mut member.profile, &mut candidate);
            member.score = new_score;
            moves += 1;
        }
    }
    moves
}
