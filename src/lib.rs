#![doc = include_str!("../README.md")]

pub use aspiration_core::*;

pub mod prelude {
    pub use aspiration_core::prelude::*;
    pub use aspiration_core::types::*;
    pub use aspiration_core::actions::NoOpAction;
    pub use aspiration_core::decision_loop;
    pub use aspiration_core::events::AspirationActionDispatch;

    #[cfg(feature = "bevy_plugin")]
    pub use aspiration_bevy_plugin::AspirationPlugin;

    #[cfg(feature = "preset_loader")]
    pub use aspiration_preset_loader;
}
