//! Actions - what an agent can do to move its goals.
//!
//! From the engine's point of view an Action is completely opaque: it only ever
//! recommends one, and the caller is responsible for running it (see `Action::do_action`).
//! What the engine *does* know about an Action is its influence vector, which lives in
//! the `InfluenceScheme` rather than on the Action itself.
//!
//! Any `Fn() + Send + Sync` closure is an Action, so most users never need to implement
//! the trait by hand:
//!
//! ```
//! use aspiration_core::prelude::*;
//!
//! let price = GoalReading::new(10.);
//! let raise_price = {
//!     let price = price.clone();
//!     move || { price.add(0.5); }
//! };
//! raise_price.do_action();
//! assert_eq!(price.get(), 10.5);
//! ```

/// An operation with side effects the engine cannot see.
///
/// The engine assumes *exactly one* Action runs between two consecutive decisions
/// and that goal values reflect its effect by the time the next decision is requested;
/// it attributes the whole observed change in goal values to that one Action.
pub trait Action: Send + Sync {
    fn do_action(&self);
}

impl<F: Fn() + Send + Sync> Action for F {
    fn do_action(&self) {
        self()
    }
}


/// An Action that does nothing.
///
/// Useful as an explicit 'wait and see' option, letting the engine observe
/// how goals drift on their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpAction;

impl Action for NoOpAction {
    fn do_action(&self) {}
}
