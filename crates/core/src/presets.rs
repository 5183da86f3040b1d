/*
This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
If a copy of the MPL was not distributed with this file,
You can obtain one at https://mozilla.org/MPL/2.0/.
*/
//! Influence presets - initial best-guess influence rows as data.
//!
//! A preset names a strategy and a list of Actions with their starting influence vectors.
//! Action *implementations* cannot be serialized, so the caller supplies a resolver that
//! maps each preset name onto an `Action`.
//!
//! Presets only seed the engine. The rows the engine learns afterwards are not written back.

use serde::{Serialize, Deserialize};

use rand::Rng;
use rand::rngs::StdRng;

use crate::actions::Action;
use crate::engine::AspirationEngine;
use crate::errors::AspirationError;
use crate::goals::GoalVariable;
use crate::identifiers::{ActionHandle, ActionName};
use crate::strategies::TieBreakStrategy;
use crate::types::InfluenceVector;


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionPreset {
    pub name: ActionName,
    pub influence: InfluenceVector,
}


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "preset_loader", derive(bevy::asset::Asset, bevy::reflect::TypePath))]
pub struct InfluencePreset {
    pub name: String,

    #[serde(default)]
    pub strategy: TieBreakStrategy,

    pub actions: Vec<ActionPreset>,
}

impl InfluencePreset {
    /// Checks every row against `dim` and resolves every name, without registering anything.
    fn resolve<F>(&self, dim: usize, mut resolver: F) -> Result<Vec<(ActionName, Box<dyn Action>, InfluenceVector)>, AspirationError>
    where F: FnMut(&str) -> Option<Box<dyn Action>>
    {
        self.actions
            .iter()
            .map(|preset| {
                if preset.influence.len() != dim {
                    return Err(AspirationError::InfluenceDimensionMismatch {
                        expected: dim,
                        actual: preset.influence.len(),
                    })
                }

                let action = resolver(preset.name.as_str())
                    .ok_or_else(|| AspirationError::UnknownAction(preset.name.as_str().to_owned()))?;

                Ok((preset.name.clone(), action, preset.influence.clone()))
            })
            .collect()
    }
}


impl AspirationEngine<StdRng> {
    /// Builds an engine from a preset, using the preset's strategy.
    ///
    /// # Errors
    /// `UnknownAction` if the resolver has no implementation for a name,
    /// `InfluenceDimensionMismatch` if a row does not have one entry per goal.
    /// No engine is returned in either case.
    pub fn from_preset<F>(
        goals: Vec<Box<dyn GoalVariable>>,
        preset: &InfluencePreset,
        resolver: F,
    ) -> Result<Self, AspirationError>
    where F: FnMut(&str) -> Option<Box<dyn Action>>
    {
        let mut engine = Self::new(goals, preset.strategy);
        engine.apply_preset(preset, resolver)?;
        Ok(engine)
    }
}

impl<R: Rng> AspirationEngine<R> {
    /// Registers every Action in the preset, in preset order.
    ///
    /// The preset's strategy is ignored; an engine keeps the strategy it was built with.
    /// Either all Actions are registered or, on error, none are.
    pub fn apply_preset<F>(
        &mut self,
        preset: &InfluencePreset,
        resolver: F,
    ) -> Result<Vec<ActionHandle>, AspirationError>
    where F: FnMut(&str) -> Option<Box<dyn Action>>
    {
        let resolved = match preset.resolve(self.dim(), resolver) {
            Ok(resolved) => resolved,
            Err(err) => {
                #[cfg(feature = "logging")]
                bevy::log::error!("apply_preset: cannot apply preset {:?} - {}", preset.name, err);
                return Err(err)
            }
        };

        #[cfg(feature = "logging")]
        bevy::log::debug!("apply_preset: registering {} Action(s) from preset {:?}", resolved.len(), preset.name);

        resolved
            .into_iter()
            .map(|(name, action, influence)| self.register(action, Some(name), influence))
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::NoOpAction;
    use crate::goals::{GoalReading, MeasuredGoal};

    const FIRM_PRESET: &str = r#"{
        "name": "cautious_firm",
        "strategy": "prio",
        "actions": [
            {"name": "RaisePrice", "influence": [2, 0, -1]},
            {"name": "CutPrice", "influence": [-1, 0, 2]},
            {"name": "ImproveQuality", "influence": [-1, -1, 1]}
        ]
    }"#;

    fn three_goals() -> Vec<Box<dyn GoalVariable>> {
        [(-1., 0.), (1., 0.), (0.5, 0.)]
            .into_iter()
            .map(|(value, limit)| Box::new(MeasuredGoal::new(GoalReading::new(value), limit)) as Box<dyn GoalVariable>)
            .collect()
    }

    fn resolve_any(_name: &str) -> Option<Box<dyn Action>> {
        Some(Box::new(NoOpAction))
    }

    #[test]
    fn parses_from_json() {
        let preset: InfluencePreset = serde_json::from_str(FIRM_PRESET).unwrap();
        assert_eq!(preset.name, "cautious_firm");
        assert_eq!(preset.strategy, TieBreakStrategy::Prio);
        assert_eq!(preset.actions.len(), 3);
        assert_eq!(preset.actions[1].name.as_str(), "CutPrice");
        assert_eq!(preset.actions[1].influence, vec![-1, 0, 2]);
    }

    #[test]
    fn strategy_defaults_to_sum() {
        let preset: InfluencePreset = serde_json::from_str(r#"{"name": "x", "actions": []}"#).unwrap();
        assert_eq!(preset.strategy, TieBreakStrategy::Sum);
    }

    #[test]
    fn builds_an_engine() {
        let preset: InfluencePreset = serde_json::from_str(FIRM_PRESET).unwrap();
        let mut engine = AspirationEngine::from_preset(three_goals(), &preset, resolve_any).unwrap();

        assert_eq!(engine.strategy(), TieBreakStrategy::Prio);
        assert_eq!(engine.action_count(), 3);

        let raise = engine.handle_by_name("RaisePrice").unwrap();
        assert_eq!(engine.influence_of(raise), Some(&[2, 0, -1][..]));
        assert_eq!(engine.decide_action().unwrap(), raise);
    }

    #[test]
    fn unknown_action_yields_no_engine() {
        let preset: InfluencePreset = serde_json::from_str(FIRM_PRESET).unwrap();
        let res = AspirationEngine::from_preset(three_goals(), &preset, |name| match name {
            "CutPrice" => None,
            _ => Some(Box::new(NoOpAction) as Box<dyn Action>),
        });
        assert_eq!(res.unwrap_err(), AspirationError::UnknownAction("CutPrice".to_owned()));
    }

    #[test]
    fn failed_apply_registers_nothing() {
        let preset = InfluencePreset {
            name: "lopsided".to_owned(),
            strategy: TieBreakStrategy::Sum,
            actions: vec![
                ActionPreset { name: "Fine".into(), influence: vec![1, 1, 1] },
                ActionPreset { name: "Short".into(), influence: vec![1, 1] },
            ],
        };
        let mut engine = AspirationEngine::with_seed(three_goals(), TieBreakStrategy::Sum, 3);

        let res = engine.apply_preset(&preset, resolve_any);
        assert_eq!(res, Err(AspirationError::InfluenceDimensionMismatch { expected: 3, actual: 2 }));
        assert_eq!(engine.action_count(), 0);
    }

    #[test]
    fn roundtrips_strategy_names() {
        let text = serde_json::to_string(&TieBreakStrategy::Overall).unwrap();
        assert_eq!(text, "\"overall\"");
    }
}
