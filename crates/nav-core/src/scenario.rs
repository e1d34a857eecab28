//! Dispatch scenario tags and their speed-multiplier profiles.
//!
//! A scenario scales the assumed travel speed over every edge of a route
//! (an emergency run moves faster than a routine transfer).  The multiplier
//! table is configuration, not a constant: applications load a
//! [`ScenarioProfiles`] from TOML/JSON and pass it to the route planner.

use crate::{CoreError, CoreResult};

// ── Scenario ──────────────────────────────────────────────────────────────────

/// The closed set of dispatch scenarios.
///
/// Unknown tags are rejected at the boundary by [`Scenario::from_tag`] —
/// there is deliberately no catch-all variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Scenario {
    #[default]
    Routine,
    Trauma,
    CardiacArrest,
}

impl Scenario {
    /// Parse a scenario tag.  Accepts the canonical snake_case tags;
    /// anything else is a [`CoreError::UnknownScenario`].
    pub fn from_tag(tag: &str) -> CoreResult<Scenario> {
        match tag {
            "routine" => Ok(Scenario::Routine),
            "trauma" => Ok(Scenario::Trauma),
            "cardiac_arrest" => Ok(Scenario::CardiacArrest),
            other => Err(CoreError::UnknownScenario(other.to_string())),
        }
    }

    /// The canonical wire tag for this scenario.
    pub fn tag(self) -> &'static str {
        match self {
            Scenario::Routine => "routine",
            Scenario::Trauma => "trauma",
            Scenario::CardiacArrest => "cardiac_arrest",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

// ── ScenarioProfiles ──────────────────────────────────────────────────────────

/// Per-scenario speed multipliers applied to edge speeds during route
/// synthesis.
///
/// Typically loaded from a config file by the application crate; the
/// defaults match the observed dispatch profiles.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScenarioProfiles {
    pub routine: f64,
    pub trauma: f64,
    pub cardiac_arrest: f64,
}

impl Default for ScenarioProfiles {
    fn default() -> Self {
        Self {
            routine: 1.00,
            trauma: 1.05,
            cardiac_arrest: 1.10,
        }
    }
}

impl ScenarioProfiles {
    /// The speed multiplier for `scenario`.
    #[inline]
    pub fn multiplier(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Routine => self.routine,
            Scenario::Trauma => self.trauma,
            Scenario::CardiacArrest => self.cardiac_arrest,
        }
    }

    /// Reject non-positive multipliers before they can zero out edge speeds.
    pub fn validate(&self) -> CoreResult<()> {
        for (tag, m) in [
            ("routine", self.routine),
            ("trauma", self.trauma),
            ("cardiac_arrest", self.cardiac_arrest),
        ] {
            if !(m.is_finite() && m > 0.0) {
                return Err(CoreError::Config(format!(
                    "scenario profile `{tag}` has non-positive multiplier {m}"
                )));
            }
        }
        Ok(())
    }
}
