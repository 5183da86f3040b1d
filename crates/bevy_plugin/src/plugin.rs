/* 
This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. 
If a copy of the MPL was not distributed with this file, 
You can obtain one at https://mozilla.org/MPL/2.0/. 
*/

use bevy::prelude::*;
use aspiration_core::decision_loop;
use aspiration_core::errors::EmptyRegistryStrategyConfig;
use aspiration_core::events::AspirationActionDispatch;

#[cfg(feature = "include_preset_loader")]
use aspiration_preset_loader::{PresetAssetPlugin, json_support::JsonPresetLoader};

pub struct AspirationPlugin; 

impl Plugin for AspirationPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(feature = "include_preset_loader")]
        app
        .add_plugins((
            PresetAssetPlugin::<JsonPresetLoader>::default(), 
        ));

        app
        .init_resource::<EmptyRegistryStrategyConfig>()
        .add_message::<AspirationActionDispatch>()
        .add_observer(decision_loop::decision_engine)
        .add_observer(decision_loop::trigger_dispatch_to_user_actions)
        .add_systems(PostUpdate, decision_loop::handle_dispatch_to_user_actions)
        ;
    }
}
