//! Life stages and the age counter that drives them.
//!
//! [`LifeStage`] is a closed enumeration, so every lookup keyed on it (asset
//! bundles, age-up cues) is an exhaustive `match`. Raw integers only enter
//! through [`LifeStage::try_from`] (strict) or [`LifeStage::from_index`]
//! (lenient, logged fallback to [`LifeStage::Junior`]).

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete age category of the creature. Ordered: `Junior < Adult < Senior`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum LifeStage {
    #[default]
    Junior,
    Adult,
    Senior,
}

/// Returned by [`LifeStage::try_from`] for values outside `0..=2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid life stage index {0}")]
pub struct InvalidStage(pub u8);

impl LifeStage {
    pub const ALL: [LifeStage; 3] = [LifeStage::Junior, LifeStage::Adult, LifeStage::Senior];

    /// Map a raw stage index, falling back to `Junior` for unknown values.
    ///
    /// The fallback is reported at `warn` level so it never hides silently.
    pub fn from_index(index: u8) -> LifeStage {
        match LifeStage::try_from(index) {
            Ok(stage) => stage,
            Err(e) => {
                log::warn!("{e}, falling back to {:?}", LifeStage::Junior);
                LifeStage::Junior
            }
        }
    }

    pub fn index(self) -> u8 {
        match self {
            LifeStage::Junior => 0,
            LifeStage::Adult => 1,
            LifeStage::Senior => 2,
        }
    }

    /// The stage that follows this one, if any.
    pub fn next(self) -> Option<LifeStage> {
        match self {
            LifeStage::Junior => Some(LifeStage::Adult),
            LifeStage::Adult => Some(LifeStage::Senior),
            LifeStage::Senior => None,
        }
    }

    /// Lowercase key used in sprite file names and logs.
    pub fn key(self) -> &'static str {
        match self {
            LifeStage::Junior => "junior",
            LifeStage::Adult => "adult",
            LifeStage::Senior => "senior",
        }
    }
}

impl TryFrom<u8> for LifeStage {
    type Error = InvalidStage;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LifeStage::Junior),
            1 => Ok(LifeStage::Adult),
            2 => Ok(LifeStage::Senior),
            other => Err(InvalidStage(other)),
        }
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Ticks lived by the creature, counted only while it is "alive and out of
/// the egg" (see [`crate::systems::lifestage::aging_system`]).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Age {
    pub ticks: u64,
}

impl Age {
    /// Stage the creature should be in after `ticks`, given the length of the
    /// junior and adult periods.
    pub fn stage_for(&self, junior_ticks: u64, adult_ticks: u64) -> LifeStage {
        if self.ticks >= junior_ticks.saturating_add(adult_ticks) {
            LifeStage::Senior
        } else if self.ticks >= junior_ticks {
            LifeStage::Adult
        } else {
            LifeStage::Junior
        }
    }

    /// True once all three life periods are over.
    pub fn lifespan_over(&self, junior_ticks: u64, adult_ticks: u64, senior_ticks: u64) -> bool {
        self.ticks
            >= junior_ticks
                .saturating_add(adult_ticks)
                .saturating_add(senior_ticks)
    }
}
