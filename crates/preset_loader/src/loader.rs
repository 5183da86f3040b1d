/*
This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
If a copy of the MPL was not distributed with this file,
You can obtain one at https://mozilla.org/MPL/2.0/.
*/
use core::marker::PhantomData;
use core::time::Duration;

use bevy::asset::{AssetLoader, LoadContext, io::Reader};
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use aspiration_core::presets::InfluencePreset;


pub trait PresetLoaderBackend: Send + Sync + 'static {
    /// What type does the loader return as a loader on error.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Must be able to load from a byte array.
    fn from_slice<'a>(v: &'a [u8]) -> core::result::Result<InfluencePreset, Self::Error>;

    /// What extensions should be read for this (by default)?
    fn extensions() -> &'static [&'static str] {
        &[]
    }
}

#[cfg(any(feature = "json_support", test))]
pub mod json_support {
    use super::{PresetLoaderBackend, InfluencePreset};

    #[derive(Default)]
    pub struct JsonPresetLoader;

    impl PresetLoaderBackend for JsonPresetLoader {
        type Error = serde_json::Error;

        fn from_slice<'a>(v: &'a [u8]) -> core::result::Result<InfluencePreset, Self::Error> {
            serde_json::from_slice(v)
        }

        fn extensions() -> &'static [&'static str] {
            &["json"]
        }
    }
}


#[cfg(feature = "toml_support")]
pub mod toml_support {
    use super::{PresetLoaderBackend, InfluencePreset};

    #[derive(Default)]
    pub struct TomlPresetLoader;

    impl PresetLoaderBackend for TomlPresetLoader {
        type Error = toml::de::Error;

        fn from_slice<'a>(v: &'a [u8]) -> core::result::Result<InfluencePreset, Self::Error> {
            toml::from_slice(v)
        }

        fn extensions() -> &'static [&'static str] {
            &["toml"]
        }
    }
}


#[cfg(feature = "msgpack_support")]
pub mod msgpack_support {
    use super::{PresetLoaderBackend, InfluencePreset};

    #[derive(Default)]
    pub struct MsgpackPresetLoader;

    impl PresetLoaderBackend for MsgpackPresetLoader {
        type Error = rmp_serde::decode::Error;

        fn from_slice<'a>(v: &'a [u8]) -> core::result::Result<InfluencePreset, Self::Error> {
            rmp_serde::decode::from_slice(v)
        }

        fn extensions() -> &'static [&'static str] {
            &["msgpack"]
        }
    }
}


#[cfg(feature = "cbor_support")]
pub mod cbor_support {
    use super::{PresetLoaderBackend, InfluencePreset};

    #[derive(Default)]
    pub struct CborPresetLoader;

    impl PresetLoaderBackend for CborPresetLoader {
        type Error = ciborium::de::Error<std::io::Error>;

        fn from_slice<'a>(v: &'a [u8]) -> core::result::Result<InfluencePreset, Self::Error> {
            ciborium::de::from_reader(v)
        }

        fn extensions() -> &'static [&'static str] {
            &["cbor"]
        }
    }
}


#[cfg(any(feature = "ron_support", test))]
pub mod ron_support {
    use super::{PresetLoaderBackend, InfluencePreset};

    #[derive(Default)]
    pub struct RonPresetLoader;

    impl PresetLoaderBackend for RonPresetLoader {
        type Error = ron::de::SpannedError;

        fn from_slice<'a>(v: &'a [u8]) -> core::result::Result<InfluencePreset, Self::Error> {
            ron::de::from_bytes(v)
        }

        fn extensions() -> &'static [&'static str] {
            &["ron"]
        }
    }
}


#[cfg(any(feature = "yaml_support", test))]
pub mod yaml_support {
    use super::{PresetLoaderBackend, InfluencePreset};

    #[derive(Default)]
    pub struct YamlPresetLoader;

    impl PresetLoaderBackend for YamlPresetLoader {
        type Error = serde_saphyr::Error;

        fn from_slice<'a>(v: &'a [u8]) -> core::result::Result<InfluencePreset, Self::Error> {
            serde_saphyr::from_slice(v)
        }

        fn extensions() -> &'static [&'static str] {
            &["yaml", "yml"]
        }
    }
}


#[cfg(feature = "postcard_support")]
pub mod postcard_support {
    use super::{PresetLoaderBackend, InfluencePreset};

    #[derive(Default)]
    pub struct PostcardPresetLoader;

    impl PresetLoaderBackend for PostcardPresetLoader {
        type Error = postcard::Error;

        fn from_slice<'a>(v: &'a [u8]) -> core::result::Result<InfluencePreset, Self::Error> {
            postcard::from_bytes(v)
        }

        fn extensions() -> &'static [&'static str] {
            &["postcard"]
        }
    }
}


// Asset loader
#[derive(Default)]
pub struct PresetLoader<B: PresetLoaderBackend>(PhantomData<B>);

impl<B: PresetLoaderBackend> PresetLoader<B> {
    fn from_slice<'a>(v: &'a [u8]) -> core::result::Result<InfluencePreset, B::Error> {
        B::from_slice(v)
    }
}

impl<B: PresetLoaderBackend> AssetLoader for PresetLoader<B> {
    type Asset = InfluencePreset;
    type Settings = ();
    type Error = Box<dyn core::error::Error + Send + Sync + 'static>;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _ctx: &mut LoadContext<'_>
    ) -> Result<Self::Asset, Self::Error> {
        #[cfg(feature = "logging")]
        bevy::log::debug!("PresetLoader running...");
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let read = Self::from_slice(&bytes);
        let res: Result<InfluencePreset, Self::Error> = read.map_err(|err| {
            #[cfg(feature = "logging")]
            bevy::log::error!("PresetLoader error: {:?}", err);
            err.into()
        });
        #[cfg(feature = "logging")]
        bevy::log::debug!("PresetLoader finished...");
        res
    }

    fn extensions(&self) -> &[&str] {
        B::extensions()
    }
}

#[derive(Resource, Default)]
struct PresetHandles(pub HashMap<String, Handle<InfluencePreset>>);


#[derive(Resource, Default)]
struct PresetLoadTimeouts(pub HashMap<String, Timer>);


/// How long a preset may take to load before `PresetLoadingTimeout` is raised for it.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PresetLoadTimeoutConfig(pub Duration);

impl Default for PresetLoadTimeoutConfig {
    fn default() -> Self {
        Self(Duration::from_secs(2))
    }
}


#[derive(Event, Debug)]
pub struct LoadPresetRequest {
    filename: String
}

impl LoadPresetRequest {
    pub fn new<IS: Into<String>>(filename: IS) -> Self {
        Self {
            filename: filename.into()
        }
    }
}

#[derive(Event, Debug)]
pub struct PresetLoaded {
    pub filename: String,
    pub asset_handle: Handle<InfluencePreset>,
}

#[derive(Event, Debug)]
pub struct PresetLoadingTimeout {
    pub filename: String,
    pub timeout_time: f32,
}

fn load_asset(
    event: On<LoadPresetRequest>,
    asset_server: Res<AssetServer>,
    timeout_config: Res<PresetLoadTimeoutConfig>,
    mut handles: ResMut<PresetHandles>,
    mut timer: ResMut<PresetLoadTimeouts>,
) {
    let asset_path = event.event().filename.to_owned();
    #[cfg(feature = "logging")]
    bevy::log::info!("Reading InfluencePreset from {}...", &asset_path);
    let handle: Handle<InfluencePreset> = asset_server.load(asset_path.to_owned());
    handles.0.entry(asset_path.to_owned()).or_insert(handle);
    timer.0.insert(asset_path, Timer::new(timeout_config.0, TimerMode::Once));
}

/// Reports every pending preset as loaded or timed out, and stops tracking it once reported.
fn countdown(
    time: Res<Time>,
    handles: Res<PresetHandles>,
    assets: Res<Assets<InfluencePreset>>,
    mut timers: ResMut<PresetLoadTimeouts>,
    mut commands: Commands,
) {
    timers.0.retain(|key, timer| {
        let loaded_handle = handles.0
            .get(key)
            .filter(|handle| assets.contains(*handle));

        if let Some(handle) = loaded_handle {
            #[cfg(feature = "logging")]
            bevy::log::info!("Successfully loaded InfluencePreset from file {:?}...", key);
            commands.trigger(PresetLoaded {
                filename: key.to_owned(),
                asset_handle: handle.to_owned(),
            });
            return false;
        }

        if timer.is_finished() {
            let elapsed_time = timer.elapsed_secs();
            #[cfg(feature = "logging")]
            bevy::log::warn!(
                "Loading InfluencePreset data from file {:?} timed out after {:?}s!",
                key, elapsed_time
            );
            commands.trigger(PresetLoadingTimeout {
                filename: key.to_owned(),
                timeout_time: elapsed_time,
            });
            return false;
        }

        timer.tick(time.delta());
        true
    });
}


#[derive(Default)]
pub struct PresetAssetPlugin<B: PresetLoaderBackend>(PhantomData<B>);


impl<B: PresetLoaderBackend + Default> bevy::app::Plugin for PresetAssetPlugin<B> {
    fn build(&self, app: &mut bevy::app::App) {
        if !app.is_plugin_added::<AssetPlugin>() {
            app.add_plugins(AssetPlugin::default());
        }

        app
        .init_resource::<PresetHandles>()
        .init_resource::<PresetLoadTimeouts>()
        .init_resource::<PresetLoadTimeoutConfig>()
        .init_asset::<InfluencePreset>()
        .init_asset_loader::<PresetLoader<B>>()
        .add_observer(load_asset)
        .add_systems(First, countdown)
        ;
    }
}
