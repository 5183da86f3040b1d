//! Urgency ranking.
//!
//! Goals below their aspiration limit are served first, in their a-priori priority
//! order. The remaining, 'safe' goals follow in *reverse* priority order: the least
//! important safe goal is the first one the agent is willing to work on (or give up
//! ground on) when nothing helps any urgent goal - a retreat from the bottom up.

use crate::goals::GoalVariable;
use crate::types::GoalIndex;

/// Writes the urgency order for `goals` into `order`, replacing its contents.
///
/// The result is always a permutation of `0..goals.len()`:
/// urgent indices ascending, followed by non-urgent indices descending.
pub fn rank_by_urgency<G: GoalVariable>(goals: &[G], order: &mut Vec<GoalIndex>) {
    let urgent: Vec<bool> = goals.iter().map(GoalVariable::is_urgent).collect();
    rank_urgency_flags(&urgent, order);
}

/// Same as `rank_by_urgency()`, for precomputed urgency flags.
pub fn rank_urgency_flags(urgent: &[bool], order: &mut Vec<GoalIndex>) {
    order.clear();
    order.reserve(urgent.len());

    order.extend(
        urgent.iter()
            .enumerate()
            .filter(|(_, is_urgent)| **is_urgent)
            .map(|(idx, _)| idx)
    );

    order.extend(
        urgent.iter()
            .enumerate()
            .rev()
            .filter(|(_, is_urgent)| !**is_urgent)
            .map(|(idx, _)| idx)
    );
}
