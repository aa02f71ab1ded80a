//! Population of candidate subsets and the selection/duplication step.
//!
//! # Duplication
//!
//! One round of [`Population::duplicate`] on a population of odd size `n`:
//!
//! 1. Rank members by score (ascending, ties keep slot order)
//! 2. Record the `ceil(n / 2)` lowest scores in the [`LevelHistory`]
//! 3. Clone each of the `(n - 1) / 2` best members twice
//! 4. Append one copy of the member of rank `n / 2`, the boundary member whose
//!    score is the level just recorded
//!
//! The rebuilt buffer replaces the old one, so the size stays `n` and every
//! member scores at or above the new threshold.
//!
//! ```text
//! ranks:   0  1  2  3 | 4  5  6        (n = 7)
//!          recorded   | kept
//! next:    6 6 5 5 4 4 3
//! ```

use rand::Rng;

use mlsplit_stats::summary::ScoreSummary;

use crate::{level_history::LevelHistory, sampler, scoring::ScoringModel};

/// A candidate subset together with its cached profile and score.
#[derive(Debug, Clone, PartialEq)]
pub struct Member<P> {
    pub(crate) subset: Vec<usize>,
    pub(crate) profile: P,
    pub(crate) score: f64,
}

impl<P> Member<P> {
    /// Creates a member by scoring `subset` with `model`.
    pub fn new<M>(model: &M, subset: Vec<usize>) -> Self
    where
        M: ScoringModel<Profile = P>,
    {
        let profile = model.profile(&subset);
        let score = model.score(&profile);
        Self {
            subset,
            profile,
            score,
        }
    }

    #[must_use]
    pub fn subset(&self) -> &[usize] {
        &self.subset
    }

    #[must_use]
    pub fn profile(&self) -> &P {
        &self.profile
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// The current generation of a splitting run.
#[derive(Debug, Clone)]
pub struct Population<P> {
    members: Vec<Member<P>>,
}

impl<P> Population<P>
where
    P: Clone,
{
    /// Creates an empty population able to hold `sample_size` members.
    #[must_use]
    pub fn with_capacity(sample_size: usize) -> Self {
        Self {
            members: Vec::with_capacity(sample_size),
        }
    }

    /// Draws `sample_size` uniform random subsets of `geneset_size` features.
    ///
    /// Subsets are drawn slot by slot from the same stream.
    pub fn random<M, R>(model: &M, sample_size: usize, geneset_size: usize, rng: &mut R) -> Self
    where
        M: ScoringModel<Profile = P>,
        R: Rng + ?Sized,
    {
        let high = model.num_features() - 1;
        let members = (0..sample_size)
            .map(|_| Member::new(model, sampler::combination(0, high, geneset_size, rng)))
            .collect();
        Self { members }
    }

    #[must_use]
    pub fn members(&self) -> &[Member<P>] {
        &self.members
    }

    pub(crate) fn members_mut(&mut self) -> &mut [Member<P>] {
        &mut self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.members.iter().map(|m| m.score)
    }

    /// Summary of the current scores, `None` if the population is empty.
    #[must_use]
    pub fn summary(&self) -> Option<ScoreSummary> {
        ScoreSummary::new(self.scores())
    }

    /// Runs one selection/duplication round and returns the new threshold.
    ///
    /// Returns `None` (and leaves everything untouched) if the population is
    /// empty.
    pub fn duplicate(&mut self, levels: &mut LevelHistory) -> Option<f64> {
        let n = self.members.len();
        if n == 0 {
            return None;
        }

        let mut ranked = self
            .members
            .iter()
            .enumerate()
            .map(|(index, member)| (member.score, index))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        levels.push_round(ranked[..n.div_ceil(2)].iter().map(|&(score, _)| score));

        let survivors = n.saturating_sub(2).div_ceil(2);
        let boundary = ranked[n >> 1].1;
        let mut next = Vec::with_capacity(n);
        for &(_, index) in ranked.iter().rev().take(survivors) {
            next.push(self.members[index].clone());
            next.push(self.members[index].clone());
        }
        next.push(self.members[boundary].clone());

        self.members = next;
        levels.last()
    }
}
