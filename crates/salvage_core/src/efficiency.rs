use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};

/// Fraction of an item's raw material content recovered on reprocessing.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReprocessingEfficiency(f64);

impl ReprocessingEfficiency {
    pub const MIN: f64 = 0.5;
    /// 0.5 × 1.15 × 1.10 × 1.10, every relevant skill at level 5.
    pub const MAX: f64 = 0.69575;
    pub const STEP: f64 = 0.001;
    pub const DEFAULT: f64 = Self::MIN;

    pub fn new(value: f64) -> Result<Self, CoreError> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(CoreError::new(
                CoreErrorCode::InvalidEfficiency,
                format!(
                    "reprocessing efficiency {value} is outside [{}, {}]",
                    Self::MIN,
                    Self::MAX
                ),
            ));
        }
        Ok(Self(value))
    }

    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn from_skills(skills: SkillLevels) -> Result<Self, CoreError> {
        skills.validate()?;
        let value = Self::MIN
            * (1.0 + 0.03 * f64::from(skills.reprocessing))
            * (1.0 + 0.02 * f64::from(skills.reprocessing_efficiency))
            * (1.0 + 0.02 * f64::from(skills.specific_processing));
        // Rounding can land a hair above MAX at all fives.
        Ok(Self(value.min(Self::MAX)))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn percent(&self) -> f64 {
        self.0 * 100.0
    }

    pub fn tier(&self) -> EfficiencyTier {
        EfficiencyTier::from_value(self.0)
    }

    pub fn label(&self) -> &'static str {
        self.tier().label()
    }
}

impl Default for ReprocessingEfficiency {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for ReprocessingEfficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.percent())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EfficiencyTier {
    Basic,
    Intermediate,
    Advanced,
    Perfect,
}

impl EfficiencyTier {
    pub fn from_value(value: f64) -> Self {
        if value >= 0.69 {
            Self::Perfect
        } else if value >= 0.6 {
            Self::Advanced
        } else if value >= 0.55 {
            Self::Intermediate
        } else {
            Self::Basic
        }
    }

    pub fn label(&self) -> &'static str {
        match *self {
            Self::Basic => "Basic Skills (50%)",
            Self::Intermediate => "Intermediate Skills",
            Self::Advanced => "Advanced Skills",
            Self::Perfect => "Perfect Skills (69.575%)",
        }
    }
}

/// Trained levels of the three skills that scale reprocessing yield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillLevels {
    pub reprocessing: u8,
    pub reprocessing_efficiency: u8,
    /// Scrapmetal Processing for salvage.
    pub specific_processing: u8,
}

impl SkillLevels {
    pub const MAX_LEVEL: u8 = 5;

    pub fn new(reprocessing: u8, reprocessing_efficiency: u8, specific_processing: u8) -> Self {
        Self {
            reprocessing,
            reprocessing_efficiency,
            specific_processing,
        }
    }

    pub fn maxed() -> Self {
        Self::new(Self::MAX_LEVEL, Self::MAX_LEVEL, Self::MAX_LEVEL)
    }

    /// Parses `R,E,S`, e.g. `5,4,3`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        let [r, e, s] = parts.as_slice() else {
            return Err(CoreError::new(
                CoreErrorCode::InvalidSkillLevel,
                format!("expected three comma-separated skill levels, got '{raw}'"),
            ));
        };
        let level = |value: &str| {
            value.parse::<u8>().map_err(|_| {
                CoreError::new(
                    CoreErrorCode::InvalidSkillLevel,
                    format!("invalid skill level '{value}'"),
                )
            })
        };
        let skills = Self::new(level(r)?, level(e)?, level(s)?);
        skills.validate()?;
        Ok(skills)
    }

    fn validate(&self) -> Result<(), CoreError> {
        let levels = [
            ("reprocessing", self.reprocessing),
            ("reprocessing efficiency", self.reprocessing_efficiency),
            ("specific processing", self.specific_processing),
        ];
        for (name, level) in levels {
            if level > Self::MAX_LEVEL {
                return Err(CoreError::new(
                    CoreErrorCode::InvalidSkillLevel,
                    format!("{name} level {level} exceeds {}", Self::MAX_LEVEL),
                ));
            }
        }
        Ok(())
    }
}
