use bevy::ecs::resource::Resource;

use crate::identifiers::ActionHandle;

/// Everything that can go wrong when configuring or querying an `AspirationEngine`.
///
/// None of these are transient - the engine does no I/O - so retrying the same
/// call without changing its inputs will fail the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AspirationError {
    /// An influence vector did not have exactly one entry per goal.
    /// The registration was rejected and the engine was left untouched.
    InfluenceDimensionMismatch {
        expected: usize,
        actual: usize,
    },

    /// A decision was requested before any Action was registered.
    /// There is nothing to fall back on, so the caller must register at least one Action first.
    NoActionsRegistered,

    /// A preset referred to an Action name the resolver could not provide.
    UnknownAction(String),

    /// A handle that was not issued by this engine.
    UnknownHandle(ActionHandle),
}

impl core::fmt::Display for AspirationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InfluenceDimensionMismatch { expected, actual } => write!(
                f, "influence vector has {} entries, but the engine tracks {} goals", actual, expected
            ),
            Self::NoActionsRegistered => write!(f, "cannot decide - no Actions have been registered"),
            Self::UnknownAction(name) => write!(f, "no Action implementation available for {:?}", name),
            Self::UnknownHandle(handle) => write!(f, "Action handle {} was not issued by this engine", handle),
        }
    }
}

impl core::error::Error for AspirationError {}


/// A config value indicating how the decision loop should handle an agent whose engine
/// has no registered Actions when a decision is requested for it.
///
/// Deciding without any Actions is a precondition violation, so by default the decision
/// loop will panic rather than leave the agent silently idle, but users may opt in to
/// skipping such agents at their own responsibility.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EmptyRegistryStrategy {
    #[default]
    Panic,
    SkipWithLog,
    SkipSilently,
}

impl EmptyRegistryStrategy {
    pub const fn panic() -> Self {
        Self::Panic
    }

    pub const fn skip_with_log() -> Self {
        Self::SkipWithLog
    }

    pub const fn skip_silently() -> Self {
        Self::SkipSilently
    }
}

/// A Resource that represents app-wide configuration for agents without Actions.
#[derive(Resource, Default, Debug)]
pub struct EmptyRegistryStrategyConfig(pub EmptyRegistryStrategy);

impl EmptyRegistryStrategyConfig {
    pub fn get_current_value(&self) -> EmptyRegistryStrategy {
        self.0
    }

    /// Sets the handler to one of the supported strategies.
    pub fn set(&mut self, strategy: EmptyRegistryStrategy) -> &mut Self {
        self.0 = strategy;
        self
    }

    /// Configures the app to panic if an agent without Actions is asked to decide.
    ///
    /// This is the default behavior, so this method is only useful if something
    /// else has already modified the default settings.
    pub fn set_panic(&mut self) -> &mut Self {
        self.set(EmptyRegistryStrategy::panic())
    }

    /// Configures the app to log a warning and skip the decision.
    ///
    /// No `AspirationActionPicked` event is raised for the agent, so whatever
    /// is waiting on it needs to cope with an agent that did nothing this cycle.
    pub fn set_skip_with_log(&mut self) -> &mut Self {
        self.set(EmptyRegistryStrategy::skip_with_log())
    }

    /// Same as `set_skip_with_log()`, minus the warning.
    ///
    /// Meant for setups where agents are spawned first and receive their Actions
    /// a few ticks later, so an empty registry is expected rather than a bug.
    pub fn set_skip_silently(&mut self) -> &mut Self {
        self.set(EmptyRegistryStrategy::skip_silently())
    }
}
