/*
This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
If a copy of the MPL was not distributed with this file,
You can obtain one at https://mozilla.org/MPL/2.0/.
*/
//! Tie-break strategies - how to pick one Action out of several candidates.
//!
//! Candidate selection only tells us which Actions are presumed to help the most urgent
//! goal that can be helped; it says nothing about which of them to run. That is what
//! the `TieBreakStrategy` is for.
//!
//! Every strategy shares the same fallback: if it comes up empty (no candidates, or the
//! strategy ignores candidates altogether), the Action with the highest summed influence
//! over the *whole* registry wins. As long as one Action is registered, a decision always
//! produces an Action.
//!
//! Deterministic strategies resolve ties by registration order - the first Action
//! to reach the maximum keeps it.

use rand::Rng;
use rand::seq::SliceRandom;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use crate::candidates::CandidateSet;
use crate::identifiers::ActionHandle;
use crate::influence::InfluenceScheme;
use crate::types::InfluenceStep;


#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TieBreakStrategy {
    /// The candidate with the largest summed influence over all goals.
    /// Prefers Actions that help across the board.
    #[default]
    Sum,

    /// The candidate with the largest influence on the prioritized goal alone.
    /// Greedy on the most urgent problem, blind to side effects.
    Prio,

    /// A uniformly random candidate.
    Random,

    /// Ignores urgency entirely and always uses the global fallback.
    Overall,
}

impl TieBreakStrategy {
    pub const ALL: [Self; 4] = [Self::Sum, Self::Prio, Self::Random, Self::Overall];

    /// Picks from the candidates, without falling back.
    ///
    /// Returns None if the candidate set is empty or the strategy does not use candidates.
    pub fn choose<R: Rng + ?Sized>(
        self,
        candidates: &CandidateSet,
        scheme: &InfluenceScheme,
        rng: &mut R,
    ) -> Option<ActionHandle> {
        match self {
            Self::Sum => best_by(&candidates.actions, scheme, sum_of),
            Self::Prio => {
                let goal = candidates.prioritized_goal.goal()?;
                best_by(&candidates.actions, scheme, |influence| influence[goal])
            },
            Self::Random => candidates.actions.choose(rng).copied(),
            Self::Overall => None,
        }
    }

    /// Picks from the candidates, falling back to `fallback()` when that yields nothing.
    ///
    /// The bool is true if the fallback produced the pick.
    pub fn choose_or_fallback<R: Rng + ?Sized>(
        self,
        candidates: &CandidateSet,
        scheme: &InfluenceScheme,
        rng: &mut R,
    ) -> Option<(ActionHandle, bool)> {
        match self.choose(candidates, scheme, rng) {
            Some(picked) => Some((picked, false)),
            None => {
                #[cfg(feature = "logging")]
                bevy::log::debug!(
                    "choose_or_fallback: strategy {:?} found nothing among {} candidate(s) for {:?}, falling back",
                    self, candidates.actions.len(), candidates.prioritized_goal,
                );
                fallback(scheme).map(|picked| (picked, true))
            },
        }
    }
}

impl core::fmt::Display for TieBreakStrategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Sum => "SUM",
            Self::Prio => "PRIO",
            Self::Random => "RANDOM",
            Self::Overall => "OVERALL",
        };
        f.write_str(name)
    }
}


/// The Action with the largest summed influence across the entire registry.
///
/// None only if nothing is registered.
pub fn fallback(scheme: &InfluenceScheme) -> Option<ActionHandle> {
    let all: Vec<ActionHandle> = scheme.iter().map(|(handle, _)| handle).collect();
    best_by(&all, scheme, sum_of)
}

fn sum_of(influence: &[InfluenceStep]) -> InfluenceStep {
    influence.iter().fold(0, |acc, step| acc.saturating_add(*step))
}

/// Arg-max over `handles`; a later handle only wins with a strictly larger score.
fn best_by<F: Fn(&[InfluenceStep]) -> InfluenceStep>(
    handles: &[ActionHandle],
    scheme: &InfluenceScheme,
    score: F,
) -> Option<ActionHandle> {
    let mut best: Option<(ActionHandle, InfluenceStep)> = None;

    for handle in handles {
        let Some(influence) = scheme.influence_of(*handle) else {
            continue
        };
        let curr_score = score(influence);

        let beats_best = match best {
            None => true,
            Some((_, best_score)) => curr_score > best_score,
        };

        if beats_best {
            best = Some((*handle, curr_score));
        }
    }

    best.map(|(handle, _)| handle)
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use crate::actions::NoOpAction;
    use crate::candidates::select_candidates;

    fn scheme_with(rows: &[&[InfluenceStep]]) -> InfluenceScheme {
        let mut scheme = InfluenceScheme::new(rows[0].len());
        for row in rows {
            scheme.register(Box::new(NoOpAction), None, row.to_vec()).unwrap();
        }
        scheme
    }

    fn h(idx: usize) -> ActionHandle {
        ActionHandle::new(idx)
    }

    #[test]
    fn sum_and_prio_disagree_on_side_effects() {
        // Both help goal 0; #0 helps it more, #1 helps more overall.
        let scheme = scheme_with(&[&[5, -4, 0], &[2, 3, 1]]);
        let candidates = select_candidates(&[0, 1, 2], &scheme);
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(TieBreakStrategy::Sum.choose(&candidates, &scheme, &mut rng), Some(h(1)));
        assert_eq!(TieBreakStrategy::Prio.choose(&candidates, &scheme, &mut rng), Some(h(0)));
    }

    #[test]
    fn ties_go_to_the_first_registered() {
        let scheme = scheme_with(&[&[0, 1], &[1, 2], &[2, 1], &[3, 0]]);
        let candidates = select_candidates(&[0, 1], &scheme);
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(candidates.actions, vec![h(1), h(2), h(3)]);
        assert_eq!(TieBreakStrategy::Sum.choose(&candidates, &scheme, &mut rng), Some(h(1)));
        assert_eq!(TieBreakStrategy::Prio.choose(&candidates, &scheme, &mut rng), Some(h(3)));
        assert_eq!(fallback(&scheme), Some(h(1)));
    }

    #[test]
    fn overall_always_falls_back() {
        let scheme = scheme_with(&[&[1, 0], &[0, 4]]);
        let candidates = select_candidates(&[0, 1], &scheme);
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(TieBreakStrategy::Overall.choose(&candidates, &scheme, &mut rng), None);
        assert_eq!(
            TieBreakStrategy::Overall.choose_or_fallback(&candidates, &scheme, &mut rng),
            Some((h(1), true)),
        );
    }

    #[test]
    fn every_strategy_falls_back_on_empty_candidates() {
        let scheme = scheme_with(&[&[-1, -5], &[0, -1], &[-2, 0]]);
        let candidates = select_candidates(&[1, 0], &scheme);
        let mut rng = StdRng::seed_from_u64(7);

        for strategy in TieBreakStrategy::ALL {
            assert_eq!(
                strategy.choose_or_fallback(&candidates, &scheme, &mut rng),
                Some((h(1), true)),
                "{}", strategy,
            );
        }
    }

    #[test]
    fn random_stays_within_candidates() {
        let scheme = scheme_with(&[&[1, 0], &[0, 1], &[2, 0], &[3, 0]]);
        let candidates = select_candidates(&[0, 1], &scheme);
        let mut rng = StdRng::seed_from_u64(1234);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            let picked = TieBreakStrategy::Random.choose(&candidates, &scheme, &mut rng).unwrap();
            assert!(candidates.actions.contains(&picked));
            seen.insert(picked);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn random_is_reproducible_with_a_seed() {
        let scheme = scheme_with(&[&[1], &[1], &[1], &[1], &[1]]);
        let candidates = select_candidates(&[0], &scheme);

        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| TieBreakStrategy::Random.choose(&candidates, &scheme, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(99), draw(99));
    }

    #[test]
    fn empty_registry_has_no_fallback() {
        let scheme = InfluenceScheme::new(2);
        assert_eq!(fallback(&scheme), None);
    }
}
