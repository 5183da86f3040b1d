//! Identifiers for key types.
//!
//! These are simple newtype wrappers whose main purpose is to keep the
//! public API honest about what a bare number or string actually refers to.

use std::borrow::Borrow;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};


/// An opaque reference to an Action registered in one specific `AspirationEngine`.
///
/// Handles are assigned in registration order and are never reused, so two Actions
/// with identical influence vectors are still two distinct registrations.
///
/// A handle is only meaningful for the engine that issued it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActionHandle(usize);

impl ActionHandle {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The position of the Action in its engine's registry.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl core::fmt::Display for ActionHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}


/// A human-readable name for a registered Action, e.g. "RaisePrice".
///
/// Names are used for logging and for binding `InfluencePreset` entries
/// to Action implementations; the engine itself keys everything by `ActionHandle`.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActionName(String);

impl ActionName {
    pub fn from_string(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl<IS: Into<String>> From<IS> for ActionName {
    fn from(value: IS) -> Self {
        Self::from_string(value.into())
    }
}

impl Borrow<str> for ActionName {
    fn borrow(&self) -> &str {
        self.0.borrow()
    }
}

impl Borrow<String> for ActionName {
    fn borrow(&self) -> &String {
        &self.0
    }
}

impl core::fmt::Display for ActionName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_order_by_registration() {
        let first = ActionHandle::new(0);
        let second = ActionHandle::new(1);
        assert!(first < second);
        assert_eq!(second.index(), 1);
        assert_eq!(second.to_string(), "#1");
    }

    #[test]
    fn names_borrow_as_str() {
        let name = ActionName::from("RaisePrice");
        let as_str: &str = name.borrow();
        assert_eq!(as_str, "RaisePrice");
        assert_eq!(name.to_string(), "RaisePrice");
    }
}
