/* 
This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. 
If a copy of the MPL was not distributed with this file, 
You can obtain one at https://mozilla.org/MPL/2.0/. 
*/

//! This crate extends the Aspiration decision engine with a solution for loading `InfluencePresets` 
//! from any available Bevy [`AssetSource`](https://docs.rs/bevy/latest/bevy/asset/io/struct.AssetSource.html). 
//! 
//! Each supported file format is a separate cargo feature (`json_support`, `yaml_support`, 
//! `toml_support`, `ron_support`, `cbor_support`, `msgpack_support`, `postcard_support`); 
//! pick a backend and add the matching `PresetAssetPlugin` to your App.
//! 
//! For stock Bevy, asset sources include in-memory, local filesystem, or web URLs, 
//! depending on the enabled features and the platform you are building for.

mod loader;

pub use loader::*;
