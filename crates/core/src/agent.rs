/*
This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
If a copy of the MPL was not distributed with this file,
You can obtain one at https://mozilla.org/MPL/2.0/.
*/
use bevy::prelude::*;

use crate::engine::AspirationEngine;

// Agent Core
// The AspirationAgent is the 'something making Aspiration Adaptation decisions' component.
// Every agent owns its own engine; engines are never shared between Entities.
#[derive(Component, Debug)]
pub struct AspirationAgent {
    pub engine: AspirationEngine,
}

impl AspirationAgent {
    pub fn new(engine: AspirationEngine) -> Self {
        Self { engine }
    }
}

impl From<AspirationEngine> for AspirationAgent {
    fn from(engine: AspirationEngine) -> Self {
        Self::new(engine)
    }
}
