//! The influence model - what the engine believes each Action does to each goal.
//!
//! Every registered Action owns one row: an integer vector with one entry per goal,
//! measured in discretized steps. A positive entry means the Action is presumed to push
//! that goal up; the magnitude says by roughly how many steps.
//!
//! Rows start out as the caller's best guess and are then overwritten with what was
//! actually observed, one row per decision cycle (see `InfluenceScheme::refine()`).
//! The attribution is deliberately naive - the whole observed change is credited
//! to the single Action that ran, even if something else in the simulation moved the goals.

use crate::actions::Action;
use crate::errors::AspirationError;
use crate::identifiers::{ActionHandle, ActionName};
use crate::types::{GoalValue, InfluenceStep, InfluenceVector};


/// One registered Action together with its current influence estimate.
pub struct InfluenceEntry {
    action: Box<dyn Action>,
    name: Option<ActionName>,
    influence: InfluenceVector,
}

impl InfluenceEntry {
    pub fn action(&self) -> &dyn Action {
        self.action.as_ref()
    }

    pub fn name(&self) -> Option<&ActionName> {
        self.name.as_ref()
    }

    pub fn influence(&self) -> &[InfluenceStep] {
        &self.influence
    }

    /// The sum of all components - how much the Action is presumed to help overall.
    pub fn total_influence(&self) -> InfluenceStep {
        self.influence.iter().fold(0, |acc, step| acc.saturating_add(*step))
    }
}

impl core::fmt::Debug for InfluenceEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InfluenceEntry")
            .field("name", &self.name)
            .field("influence", &self.influence)
            .finish_non_exhaustive()
    }
}


/// An arena of registered Actions, indexed by `ActionHandle`.
#[derive(Debug)]
pub struct InfluenceScheme {
    dim: usize,
    entries: Vec<InfluenceEntry>,
}

impl InfluenceScheme {
    pub fn new(dim: usize) -> Self {
        Self { dim, entries: Vec::new() }
    }

    /// The number of goals every row must cover.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers an Action with an initial influence estimate.
    ///
    /// Fails without modifying the scheme if the vector does not have exactly `dim` entries.
    pub fn register(
        &mut self,
        action: Box<dyn Action>,
        name: Option<ActionName>,
        influence: InfluenceVector,
    ) -> Result<ActionHandle, AspirationError> {
        if influence.len() != self.dim {
            return Err(AspirationError::InfluenceDimensionMismatch {
                expected: self.dim,
                actual: influence.len(),
            })
        }

        let handle = ActionHandle::new(self.entries.len());
        self.entries.push(InfluenceEntry { action, name, influence });
        Ok(handle)
    }

    pub fn get(&self, handle: ActionHandle) -> Option<&InfluenceEntry> {
        self.entries.get(handle.index())
    }

    pub fn influence_of(&self, handle: ActionHandle) -> Option<&[InfluenceStep]> {
        self.get(handle).map(InfluenceEntry::influence)
    }

    pub fn handle_by_name(&self, name: &str) -> Option<ActionHandle> {
        self.entries
            .iter()
            .position(|entry| entry.name.as_ref().map(ActionName::as_str) == Some(name))
            .map(ActionHandle::new)
    }

    /// All registered Actions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ActionHandle, &InfluenceEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (ActionHandle::new(idx), entry))
    }

    /// Overwrites the row of `handle` with the observed change in goal values.
    ///
    /// Each component becomes `round((current - previous) / step)`.
    /// A component is left at its previous estimate if the ratio cannot be computed
    /// (zero or non-finite step, non-finite readings).
    ///
    /// All three slices must be `dim` long; rows of other Actions are never touched.
    pub fn refine(
        &mut self,
        handle: ActionHandle,
        previous: &[GoalValue],
        current: &[GoalValue],
        steps: &[GoalValue],
    ) -> Result<(), AspirationError> {
        let dim = self.dim;
        let entry = self.entries
            .get_mut(handle.index())
            .ok_or(AspirationError::UnknownHandle(handle))?;

        for idx in 0..dim {
            match discretize(current[idx] - previous[idx], steps[idx]) {
                Some(estimate) => entry.influence[idx] = estimate,
                None => {
                    #[cfg(feature = "logging")]
                    bevy::log::warn!(
                        "refine: Action {} - cannot discretize change {:?} -> {:?} on goal {} with step {:?}, keeping estimate {}",
                        handle, previous[idx], current[idx], idx, steps[idx], entry.influence[idx],
                    );
                }
            }
        }

        #[cfg(feature = "logging")]
        bevy::log::debug!(
            "refine: Action {} ({:?}) - influence is now {:?}",
            handle, entry.name, entry.influence,
        );

        Ok(())
    }
}


/// Converts a raw change in goal value into a number of steps.
///
/// Rounds half away from zero; out-of-range results saturate at the `InfluenceStep` bounds.
fn discretize(delta: GoalValue, step: GoalValue) -> Option<InfluenceStep> {
    if step == 0. || !step.is_finite() {
        return None
    }

    let ratio = delta / step;
    match ratio.is_finite() {
        true => Some(ratio.round() as InfluenceStep),
        false => None,
    }
}
