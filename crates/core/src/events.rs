/*
This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
If a copy of the MPL was not distributed with this file,
You can obtain one at https://mozilla.org/MPL/2.0/.
*/
use bevy::prelude::*;

use crate::candidates::PrioritizedGoal;
use crate::identifiers::{ActionHandle, ActionName};
use crate::types::AgentEntity;


/// Requests one decision cycle for an agent.
///
/// This is the hook for whatever scheduler drives the simulation: raise it whenever
/// the agent should re-evaluate its strategy. The goal values should have settled
/// after the previous Action by then, since the change is attributed to that Action.
///
/// Should generally NOT be raised more than once per Entity per evaluation,
/// as every cycle refines the influence estimates.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct AspirationDecisionRequested {
    pub entity: AgentEntity,
}

impl AspirationDecisionRequested {
    pub fn new(entity: AgentEntity) -> Self {
        Self { entity }
    }
}


/// Signals that the decision engine picked the next Action for an agent.
///
/// Raised by the `decision_engine()` observer. Listeners can use it for bookkeeping;
/// running the Action itself is handled by the dispatch systems.
#[derive(EntityEvent, Debug, Clone)]
pub struct AspirationActionPicked {
    /// The agent that picked this Action.
    pub entity: AgentEntity,

    /// The Action's handle in the agent's engine.
    pub action: ActionHandle,

    /// The name the Action was registered with, if any.
    pub action_name: Option<ActionName>,

    /// The goal the decision was made for.
    pub prioritized_goal: PrioritizedGoal,

    /// Whether the global fallback made the pick.
    pub used_fallback: bool,
}


/// Signals that an agent's pick is being handed off to be executed.
///
/// Execution needs mutable access to the agent's engine, so it runs in a regular
/// system reading these Messages rather than inside the pick observer.
#[derive(Message, Debug, Clone)]
pub struct AspirationActionDispatch {
    pub entity: AgentEntity,
    pub action: ActionHandle,
    pub action_name: Option<ActionName>,
}

impl AspirationActionDispatch {
    pub fn new(entity: AgentEntity, action: ActionHandle, action_name: Option<ActionName>) -> Self {
        #[cfg(feature = "logging")]
        bevy::log::debug!(
            "Creating a new AspirationActionDispatch message for {:?} with Action {} ({:?})",
            entity, action, action_name,
        );

        Self { entity, action, action_name }
    }
}

impl From<&AspirationActionPicked> for AspirationActionDispatch {
    fn from(picked: &AspirationActionPicked) -> Self {
        Self::new(picked.entity, picked.action, picked.action_name.clone())
    }
}
