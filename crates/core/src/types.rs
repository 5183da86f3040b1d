//! Type aliases to express intent better and make it easy to switch out 
//! the underlying datatypes used for goal values and influence estimates.

/// A measurement of a goal variable (e.g. a return on equity of 0.07).
pub type GoalValue = f64;

/// An influence estimate, in units of a goal's discretization step.
pub type InfluenceStep = i64;

/// One influence estimate per goal, in goal priority order.
pub type InfluenceVector = Vec<InfluenceStep>;

/// A position in the priority-ordered goal array (0 = most important).
pub type GoalIndex = usize;

/// Used to derive the default discretization step of a goal from its limit.
pub const DEFAULT_STEPS_PER_LIMIT: GoalValue = 100.;

pub type AgentEntity = bevy::prelude::Entity;
