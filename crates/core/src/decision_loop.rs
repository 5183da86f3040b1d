/*
This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
If a copy of the MPL was not distributed with this file,
You can obtain one at https://mozilla.org/MPL/2.0/.
*/
use bevy::prelude::*;

use crate::agent::AspirationAgent;
use crate::errors::{AspirationError, EmptyRegistryStrategy, EmptyRegistryStrategyConfig};
use crate::events::{AspirationActionDispatch, AspirationActionPicked, AspirationDecisionRequested};


/// Runs one decision cycle for the agent named in the request.
///
/// Requests for Entities without an `AspirationAgent` are ignored.
/// Agents without any Actions are handled according to `EmptyRegistryStrategyConfig`
/// (panicking if the Resource is absent).
pub fn decision_engine(
    event: On<AspirationDecisionRequested>,
    mut agents: Query<&mut AspirationAgent>,
    empty_registry_config: Option<Res<EmptyRegistryStrategyConfig>>,
    mut commands: Commands,
) {
    let audience = event.event().entity;

    let mut agent = match agents.get_mut(audience) {
        Ok(agent) => agent,
        Err(_err) => {
            #[cfg(feature = "logging")]
            bevy::log::debug!(
                "decision_engine: Entity {:?} is not an AspirationAgent ({:?}), ignoring the request.",
                audience, _err,
            );
            return;
        }
    };

    let decision = match agent.engine.decide() {
        Ok(decision) => decision,
        Err(AspirationError::NoActionsRegistered) => {
            let strategy = empty_registry_config
                .map(|cfg| cfg.get_current_value())
                .unwrap_or_default();

            match strategy {
                EmptyRegistryStrategy::Panic => {
                    #[cfg(feature = "logging")]
                    bevy::log::error!(
                        "decision_engine: AI {:?} - no Actions registered, default behavior - panicking!",
                        audience,
                    );
                    panic!("decision_engine: AI {:?} - no Actions registered.", audience)
                },
                EmptyRegistryStrategy::SkipWithLog => {
                    #[cfg(feature = "logging")]
                    bevy::log::warn!(
                        "decision_engine: AI {:?} - no Actions registered, skipping the decision.",
                        audience,
                    );
                    return;
                },
                EmptyRegistryStrategy::SkipSilently => return,
            }
        },
        Err(_err) => {
            #[cfg(feature = "logging")]
            bevy::log::error!("decision_engine: AI {:?} - decision failed: {}", audience, _err);
            return;
        }
    };

    let action_name = agent.engine.name_of(decision.action).cloned();

    #[cfg(feature = "logging")]
    bevy::log::info!(
        "decision_engine: AI {:?} - Picking Action {} ({:?}) for goal {:?}{}.",
        audience,
        decision.action,
        action_name,
        decision.prioritized_goal,
        if decision.used_fallback { " via fallback" } else { "" },
    );

    commands.trigger(AspirationActionPicked {
        entity: audience,
        action: decision.action,
        action_name,
        prioritized_goal: decision.prioritized_goal,
        used_fallback: decision.used_fallback,
    });
}

pub fn trigger_dispatch_to_user_actions(
    trigger: On<AspirationActionPicked>,
    mut writer: MessageWriter<AspirationActionDispatch>,
) {
    let event = trigger.event();
    #[cfg(feature = "logging")]
    bevy::log::debug!(
        "dispatch_to_user_actions - Running for Action {} for Pick Event {:?}",
        event.action, event
    );

    writer.write(AspirationActionDispatch::from(event));
}

/// Runs the picked Actions on behalf of their agents.
pub fn handle_dispatch_to_user_actions(
    agents: Query<&AspirationAgent>,
    mut reader: MessageReader<AspirationActionDispatch>,
) {
    for msg in reader.read() {
        #[cfg(feature = "logging")]
        bevy::log::debug!(
            "dispatch_to_user_actions - Running for Action {} for message {:?}",
            msg.action, &msg
        );

        let agent = match agents.get(msg.entity) {
            Ok(agent) => agent,
            Err(_err) => {
                #[cfg(feature = "logging")]
                bevy::log::error!(
                    "dispatch_to_user_actions - AI {:?} is gone or no longer an AspirationAgent ({:?}), skipping!",
                    msg.entity, _err
                );
                continue;
            }
        };

        if let Err(_err) = agent.engine.execute(msg.action) {
            #[cfg(feature = "logging")]
            bevy::log::error!(
                "dispatch_to_user_actions - AI {:?} could not run Action {}: {}, skipping!",
                msg.entity, msg.action, _err
            );
        }
    }
}
