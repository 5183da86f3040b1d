//! Candidate selection.
//!
//! Walks the urgency order goal by goal and stops at the first goal that *some*
//! registered Action is presumed to help. Less urgent goals are never consulted
//! once a more urgent one has a helper.

use crate::identifiers::ActionHandle;
use crate::influence::InfluenceScheme;
use crate::types::GoalIndex;


/// The goal a decision cycle ended up serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrioritizedGoal {
    /// The most urgent goal that at least one Action is presumed to help.
    Goal(GoalIndex),
    /// No Action is presumed to help any goal.
    Unserved,
}

impl PrioritizedGoal {
    /// The goal index, or the sentinel `dim` for `Unserved`.
    pub fn to_index(self, dim: usize) -> GoalIndex {
        match self {
            Self::Goal(idx) => idx,
            Self::Unserved => dim,
        }
    }

    pub fn goal(self) -> Option<GoalIndex> {
        match self {
            Self::Goal(idx) => Some(idx),
            Self::Unserved => None,
        }
    }
}


/// The outcome of a candidate search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    pub prioritized_goal: PrioritizedGoal,
    /// Helpers of the prioritized goal, in registration order. Empty iff `Unserved`.
    pub actions: Vec<ActionHandle>,
}

/// Finds the Actions presumed to help the most urgent goal that can be helped at all.
pub fn select_candidates(urgency_order: &[GoalIndex], scheme: &InfluenceScheme) -> CandidateSet {
    for &goal in urgency_order {
        let helpers: Vec<ActionHandle> = scheme
            .iter()
            .filter(|(_, entry)| entry.influence()[goal] > 0)
            .map(|(handle, _)| handle)
            .collect();

        if !helpers.is_empty() {
            #[cfg(feature = "logging")]
            bevy::log::debug!(
                "select_candidates: goal {} has {} helper(s): {:?}",
                goal, helpers.len(), helpers,
            );

            return CandidateSet {
                prioritized_goal: PrioritizedGoal::Goal(goal),
                actions: helpers,
            }
        }
    }

    #[cfg(feature = "logging")]
    bevy::log::debug!("select_candidates: no Action is presumed to help any goal");

    CandidateSet {
        prioritized_goal: PrioritizedGoal::Unserved,
        actions: Vec::new(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::NoOpAction;
    use crate::types::InfluenceStep;

    fn scheme_with(rows: &[&[InfluenceStep]]) -> InfluenceScheme {
        let mut scheme = InfluenceScheme::new(rows[0].len());
        for row in rows {
            scheme.register(Box::new(NoOpAction), None, row.to_vec()).unwrap();
        }
        scheme
    }

    fn handles(indices: &[usize]) -> Vec<ActionHandle> {
        indices.iter().map(|idx| ActionHandle::new(*idx)).collect()
    }

    #[test]
    fn first_helped_goal_wins() {
        let scheme = scheme_with(&[&[1, 0], &[0, 1]]);
        let found = select_candidates(&[0, 1], &scheme);
        assert_eq!(found.prioritized_goal, PrioritizedGoal::Goal(0));
        assert_eq!(found.actions, handles(&[0]));
    }

    #[test]
    fn skips_goals_nobody_helps() {
        let scheme = scheme_with(&[&[0, 1], &[-2, 3], &[0, 0]]);
        let found = select_candidates(&[0, 1], &scheme);
        assert_eq!(found.prioritized_goal, PrioritizedGoal::Goal(1));
        assert_eq!(found.actions, handles(&[0, 1]));
    }

    #[test]
    fn follows_urgency_order_not_index_order() {
        let scheme = scheme_with(&[&[1, 0, 0], &[0, 0, 1]]);
        let found = select_candidates(&[2, 1, 0], &scheme);
        assert_eq!(found.prioritized_goal, PrioritizedGoal::Goal(2));
        assert_eq!(found.actions, handles(&[1]));
    }

    #[test]
    fn nothing_helps_anything() {
        let scheme = scheme_with(&[&[0, -1], &[-3, 0]]);
        let found = select_candidates(&[0, 1], &scheme);
        assert_eq!(found.prioritized_goal, PrioritizedGoal::Unserved);
        assert_eq!(found.prioritized_goal.to_index(2), 2);
        assert!(found.actions.is_empty());
    }
}
