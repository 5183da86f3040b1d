/* 
This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. 
If a copy of the MPL was not distributed with this file, 
You can obtain one at https://mozilla.org/MPL/2.0/. 
*/
//! Core of the Aspiration library - a decision engine after Selten's Aspiration Adaptation Theory.
//! 
//! An agent with several goal variables (profitability, equity ratio, market share, ...) cannot 
//! fold them into a single utility function, but it can rank them. Each decision cycle the engine:
//! 
//! 1) refines its estimate of what the previously picked Action did to every goal, 
//! 2) orders the goals by urgency, 
//! 3) collects the Actions presumed to help the most urgent goal that any Action can help, 
//! 4) picks one of them using the configured `TieBreakStrategy` (or falls back to the 
//!    globally best-looking Action), and
//! 5) remembers the current goal values as the baseline for the next cycle.
//! 
//! The engine itself lives in [`engine::AspirationEngine`] and has no ECS dependencies; 
//! the [`agent`], [`events`] and [`decision_loop`] modules wrap it for use inside a Bevy App.

pub mod actions;
pub mod agent;
pub mod candidates;
pub mod decision_loop;
pub mod engine;
pub mod errors;
pub mod events;
pub mod goals;
pub mod identifiers;
pub mod influence;
#[cfg(feature = "serde")]
pub mod presets;
pub mod strategies;
pub mod types;
pub mod urgency;

pub mod prelude {
    pub use crate::actions::Action;
    pub use crate::agent::AspirationAgent;
    pub use crate::candidates::PrioritizedGoal;
    pub use crate::engine::{AspirationEngine, Decision, EngineState};
    pub use crate::errors::{AspirationError, EmptyRegistryStrategy, EmptyRegistryStrategyConfig};
    pub use crate::events::{AspirationActionPicked, AspirationDecisionRequested};
    pub use crate::goals::{FnGoal, GoalReading, GoalVariable, MeasuredGoal};
    pub use crate::identifiers::{ActionHandle, ActionName};
    pub use crate::strategies::TieBreakStrategy;
    #[cfg(feature = "serde")]
    pub use crate::presets::{ActionPreset, InfluencePreset};
}
