/* 
This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. 
If a copy of the MPL was not distributed with this file, 
You can obtain one at https://mozilla.org/MPL/2.0/. 
*/

//! This crate extends the Aspiration decision engine with a plugin that streamlines its
//! integration into an existing Bevy application.
//! 
//! The plugin handles the basic gruntwork - setting up the Resources, Observers and Systems 
//! that connect `AspirationDecisionRequested` events to each agent's engine and run the 
//! picked Actions afterwards.
//! 
//! What's left for you to do after adding it in is spawning `AspirationAgent`s and deciding 
//! when each of them should re-evaluate its strategy.

mod plugin;

pub use plugin::AspirationPlugin;
