use std::{fmt, str::FromStr};

use anyhow::{Error, bail};
use serde::{Deserialize, Serialize};

/// Overall verdict for a reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DangerLevel {
    #[default]
    Safe,
    Caution,
    Warning,
    Critical,
}

impl DangerLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DangerLevel::Safe => "SAFE",
            DangerLevel::Caution => "CAUTION",
            DangerLevel::Warning => "WARNING",
            DangerLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DangerLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SAFE" => Ok(DangerLevel::Safe),
            "CAUTION" => Ok(DangerLevel::Caution),
            "WARNING" => Ok(DangerLevel::Warning),
            "CRITICAL" => Ok(DangerLevel::Critical),
            _ => bail!("unknown danger level: {}", s),
        }
    }
}
