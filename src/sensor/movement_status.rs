use std::{fmt, str::FromStr};

use anyhow::{Error, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementStatus {
    #[default]
    Normal,
    Impact,
    Freefall,
}

impl MovementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementStatus::Normal => "NORMAL",
            MovementStatus::Impact => "IMPACT",
            MovementStatus::Freefall => "FREEFALL",
        }
    }
}

impl fmt::Display for MovementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NORMAL" => Ok(MovementStatus::Normal),
            "IMPACT" => Ok(MovementStatus::Impact),
            "FREEFALL" => Ok(MovementStatus::Freefall),
            _ => bail!("unknown movement status: {}", s),
        }
    }
}
