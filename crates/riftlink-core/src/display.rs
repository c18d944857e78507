//! Typed display bindings.
//!
//! A UI registers one callback per [`DisplaySlot`]; the store calls it
//! whenever the value behind that slot changes.

use crate::error::{CoreError, Result};
use crate::might::MightSlot;
use crate::role::Side;
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplaySlot {
    Score(Side),
    /// Whether a side's score is at or above the threshold.
    Winning(Side),
    Threshold,
    Might(MightSlot),
    Battlefield(Side),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayValue {
    Count(u16),
    Highlight(bool),
    Threshold(u16),
    Image(Option<String>),
}

pub type DisplayCallback = Box<dyn Fn(&DisplayValue) + Send + Sync>;

#[derive(Default)]
pub struct DisplayBindings {
    callbacks: HashMap<DisplaySlot, DisplayCallback>,
}

impl DisplayBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `slot` to `callback`. Each slot can be bound once.
    pub fn bind(&mut self, slot: DisplaySlot, callback: DisplayCallback) -> Result<()> {
        if self.callbacks.contains_key(&slot) {
            return Err(CoreError::AlreadyBound(format!("{:?}", slot)));
        }
        self.callbacks.insert(slot, callback);
        Ok(())
    }

    pub fn is_bound(&self, slot: DisplaySlot) -> bool {
        self.callbacks.contains_key(&slot)
    }

    pub fn notify(&self, slot: DisplaySlot, value: &DisplayValue) {
        if let Some(callback) = self.callbacks.get(&slot) {
            callback(value);
        }
    }
}

impl fmt::Debug for DisplayBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.callbacks.keys()).finish()
    }
}
