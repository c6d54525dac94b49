use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the five phases a treatment cell passes through during a cycle.
///
/// The declaration order is the cycle order, and `index()` is the position used by
/// per-phase lookup tables such as [`WeekendPolicy`](super::schedule::WeekendPolicy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Soil is placed into the cell, paced by the loading equipment.
    Load,
    /// The placed soil is ripped to break up clods.
    Rip,
    /// Active remediation treatment.
    Treat,
    /// Drying before removal.
    Dry,
    /// Treated soil is removed, paced by the unloading equipment.
    Unload,
}

impl Phase {
    pub const COUNT: usize = 5;

    /// All phases in cycle order.
    pub const ALL: [Phase; Self::COUNT] = [
        Phase::Load,
        Phase::Rip,
        Phase::Treat,
        Phase::Dry,
        Phase::Unload,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Phase::Load => "load",
            Phase::Rip => "rip",
            Phase::Treat => "treat",
            Phase::Dry => "dry",
            Phase::Unload => "unload",
        }
    }

    /// Whether the phase's duration depends on the cell volume and an equipment rate.
    pub const fn is_equipment_paced(self) -> bool {
        matches!(self, Phase::Load | Phase::Unload)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown treatment phase: '{0}'. Expected one of load, rip, treat, dry, unload.")]
pub struct ParsePhaseError(pub String);

impl FromStr for Phase {
    type Err = ParsePhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "load" | "loading" => Ok(Phase::Load),
            "rip" | "ripping" => Ok(Phase::Rip),
            "treat" | "treatment" => Ok(Phase::Treat),
            "dry" | "drying" => Ok(Phase::Dry),
            "unload" | "unloading" => Ok(Phase::Unload),
            _ => Err(ParsePhaseError(s.to_string())),
        }
    }
}
