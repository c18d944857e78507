//! Battlefield image assignment.

use crate::error::{CoreError, Result};
use crate::role::Side;

/// Longest image reference accepted from either side.
pub const MAX_IMAGE_REF_LEN: usize = 2048;

/// Check that `image_ref` is a usable opaque locator.
pub fn validate_image_ref(image_ref: &str) -> Result<&str> {
    let trimmed = image_ref.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidImageRef("empty".to_string()));
    }
    if trimmed.len() > MAX_IMAGE_REF_LEN {
        return Err(CoreError::InvalidImageRef(format!(
            "{} bytes exceeds {}",
            trimmed.len(),
            MAX_IMAGE_REF_LEN
        )));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(CoreError::InvalidImageRef(
            "contains control characters".to_string(),
        ));
    }
    Ok(trimmed)
}

/// The image chosen for each side's battlefield. Both start unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Battlefield {
    slots: [Option<String>; 2],
}

impl Battlefield {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, side: Side) -> Option<&str> {
        self.slots[side.index()].as_deref()
    }

    pub fn is_set(&self, side: Side) -> bool {
        self.slots[side.index()].is_some()
    }

    /// Claim the local slot. Only succeeds once until [`Battlefield::clear`].
    pub fn claim_mine(&mut self, image_ref: &str) -> Result<()> {
        if self.is_set(Side::Mine) {
            return Err(CoreError::BattlefieldAlreadySet);
        }
        let image_ref = validate_image_ref(image_ref)?;
        self.slots[Side::Mine.index()] = Some(image_ref.to_string());
        Ok(())
    }

    /// Overwrite `side` unconditionally.
    pub fn assign(&mut self, side: Side, image_ref: &str) -> Result<()> {
        let image_ref = validate_image_ref(image_ref)?;
        self.slots[side.index()] = Some(image_ref.to_string());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}
