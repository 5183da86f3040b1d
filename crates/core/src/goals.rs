/*
This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
If a copy of the MPL was not distributed with this file,
You can obtain one at https://mozilla.org/MPL/2.0/.
*/
//! Goal variables - the dimensions of an agent's objective space.
//!
//! A goal is anything that can report a current value and has a fixed 'aspiration limit'.
//! Whenever the value drops to or below that limit, the goal is *urgent* and the engine
//! will prioritize Actions that push it back up.
//!
//! The engine never writes to goals; it only reads them at the start and end of each
//! decision cycle. The values are expected to change *in between* cycles, as a consequence
//! of the caller executing the picked Action (and whatever else goes on in the simulation).
//!
//! Most users will implement `GoalVariable` on top of their own simulation state
//! (e.g. a profitability figure computed from a firm's books). For simpler setups and for
//! tests, this module provides two ready-made implementations:
//! - `MeasuredGoal`, backed by a shared `GoalReading` cell the caller updates, and
//! - `FnGoal`, which samples a closure every time the engine asks for a value.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::{GoalValue, DEFAULT_STEPS_PER_LIMIT};


/// Something the engine can treat as a goal.
///
/// Goals are handed to the engine in descending order of importance;
/// their position in that list is their priority and never changes.
pub trait GoalVariable: Send + Sync {
    /// The current measurement.
    fn value(&self) -> GoalValue;

    /// The aspiration limit; at or below it, the goal counts as urgent.
    fn limit(&self) -> GoalValue;

    /// Discretization granularity for influence estimates.
    ///
    /// A change in value of one `step` counts as one unit of influence.
    /// Defaults to a hundredth of the limit; override it for goals whose
    /// limit is zero or whose natural granularity is different.
    fn step(&self) -> GoalValue {
        self.limit() / DEFAULT_STEPS_PER_LIMIT
    }

    fn is_urgent(&self) -> bool {
        self.value() <= self.limit()
    }
}

impl<G: GoalVariable + ?Sized> GoalVariable for Box<G> {
    fn value(&self) -> GoalValue {
        (**self).value()
    }

    fn limit(&self) -> GoalValue {
        (**self).limit()
    }

    fn step(&self) -> GoalValue {
        (**self).step()
    }

    fn is_urgent(&self) -> bool {
        (**self).is_urgent()
    }
}


/// A shared, thread-safe cell holding one goal measurement.
///
/// Clones point at the same value, so the simulation can keep one copy to write
/// to while a `MeasuredGoal` inside an engine reads from another.
#[derive(Debug, Clone, Default)]
pub struct GoalReading {
    bits: Arc<AtomicU64>,
}

impl GoalReading {
    pub fn new(value: GoalValue) -> Self {
        Self { bits: Arc::new(AtomicU64::new(value.to_bits())) }
    }

    pub fn get(&self) -> GoalValue {
        GoalValue::from_bits(self.bits.load(Ordering::Acquire))
    }

    pub fn set(&self, value: GoalValue) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    /// Adds `delta` to the current value and returns the new value.
    pub fn add(&self, delta: GoalValue) -> GoalValue {
        let mut current = self.bits.load(Ordering::Acquire);
        loop {
            let updated = (GoalValue::from_bits(current) + delta).to_bits();
            match self.bits.compare_exchange_weak(current, updated, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => return GoalValue::from_bits(updated),
                Err(actual) => current = actual,
            }
        }
    }
}


/// A goal whose value lives in a `GoalReading`.
#[derive(Debug, Clone)]
pub struct MeasuredGoal {
    reading: GoalReading,
    limit: GoalValue,
    step: Option<GoalValue>,
}

impl MeasuredGoal {
    pub fn new(reading: GoalReading, limit: GoalValue) -> Self {
        Self { reading, limit, step: None }
    }

    /// Overrides the default `limit / 100` discretization step.
    pub fn with_step(mut self, step: GoalValue) -> Self {
        self.step = Some(step);
        self
    }

    pub fn reading(&self) -> &GoalReading {
        &self.reading
    }
}

impl GoalVariable for MeasuredGoal {
    fn value(&self) -> GoalValue {
        self.reading.get()
    }

    fn limit(&self) -> GoalValue {
        self.limit
    }

    fn step(&self) -> GoalValue {
        self.step.unwrap_or(self.limit / DEFAULT_STEPS_PER_LIMIT)
    }
}


/// A goal that samples a closure for its current value.
///
/// Handy for goals derived from other state, e.g. `move || books.equity() / books.assets()`.
pub struct FnGoal {
    value_fn: Box<dyn Fn() -> GoalValue + Send + Sync>,
    limit: GoalValue,
    step: Option<GoalValue>,
}

impl FnGoal {
    pub fn new<F: Fn() -> GoalValue + Send + Sync + 'static>(value_fn: F, limit: GoalValue) -> Self {
        Self { value_fn: Box::new(value_fn), limit, step: None }
    }

    pub fn with_step(mut self, step: GoalValue) -> Self {
        self.step = Some(step);
        self
    }
}

impl GoalVariable for FnGoal {
    fn value(&self) -> GoalValue {
        (self.value_fn)()
    }

    fn limit(&self) -> GoalValue {
        self.limit
    }

    fn step(&self) -> GoalValue {
        self.step.unwrap_or(self.limit / DEFAULT_STEPS_PER_LIMIT)
    }
}

impl core::fmt::Debug for FnGoal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnGoal")
            .field("limit", &self.limit)
            .field("step", &self.step())
            .finish_non_exhaustive()
    }
}
