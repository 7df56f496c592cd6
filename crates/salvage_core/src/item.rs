use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};

/// A named, quantified piece of loot queued for reprocessing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SalvageItem {
    pub name: String,
    pub quantity: u32,
}

impl SalvageItem {
    /// The analysis service reads quantities as signed 32-bit integers.
    pub const MAX_QUANTITY: u32 = i32::MAX as u32;

    /// Validates manual entry: the trimmed name must be non-empty and the
    /// quantity at least one.
    pub fn new(name: impl AsRef<str>, quantity: u32) -> Result<Self, CoreError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(CoreError::new(
                CoreErrorCode::InvalidItem,
                "item name must not be empty",
            ));
        }
        if quantity == 0 {
            return Err(CoreError::new(
                CoreErrorCode::InvalidItem,
                format!("quantity for '{name}' must be at least 1"),
            ));
        }
        if quantity > Self::MAX_QUANTITY {
            return Err(CoreError::new(
                CoreErrorCode::InvalidItem,
                format!(
                    "quantity {quantity} for '{name}' exceeds {}",
                    Self::MAX_QUANTITY
                ),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            quantity,
        })
    }

    /// Parses a `Name=Quantity` pair as typed on the command line or in a form.
    pub fn from_pair(raw: &str) -> Result<Self, CoreError> {
        let Some((name, quantity)) = raw.rsplit_once('=') else {
            return Err(CoreError::new(
                CoreErrorCode::InvalidItem,
                format!("expected NAME=QUANTITY, got '{raw}'"),
            ));
        };
        let quantity = quantity.trim().parse::<u32>().map_err(|_| {
            CoreError::new(
                CoreErrorCode::InvalidItem,
                format!("invalid quantity '{}' for '{}'", quantity.trim(), name.trim()),
            )
        })?;
        Self::new(name, quantity)
    }
}

impl fmt::Display for SalvageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.name, self.quantity)
    }
}
