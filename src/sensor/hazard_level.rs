use std::{fmt, str::FromStr};

use anyhow::{Error, bail};
use serde::{Deserialize, Serialize};

/// Per-sensor severity shared by the fire and smoke channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HazardLevel {
    #[default]
    Safe,
    Low,
    Medium,
    High,
    // The firmware's flame sensor reports "FIRE DETECTED" at its top level.
    #[serde(alias = "FIRE DETECTED")]
    Critical,
}

impl HazardLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HazardLevel::Safe => "SAFE",
            HazardLevel::Low => "LOW",
            HazardLevel::Medium => "MEDIUM",
            HazardLevel::High => "HIGH",
            HazardLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for HazardLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HazardLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SAFE" => Ok(HazardLevel::Safe),
            "LOW" => Ok(HazardLevel::Low),
            "MEDIUM" => Ok(HazardLevel::Medium),
            "HIGH" => Ok(HazardLevel::High),
            "CRITICAL" | "FIRE DETECTED" => Ok(HazardLevel::Critical),
            _ => bail!("unknown hazard level: {}", s),
        }
    }
}
