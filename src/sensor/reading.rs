use serde::{Deserialize, Serialize};

use crate::sensor::{DangerLevel, HazardLevel, MovementStatus};

/// One snapshot of the safety monitor, shaped like a `sensor_readings` row.
///
/// Every field has a default so that a partially reported block still yields
/// a complete row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reading {
    pub temperature: f64,

    /// Percentage above the calibrated clean-air baseline.
    pub smoke_level: f64,

    pub smoke_ppm: f64,

    pub smoke_status: HazardLevel,

    pub fire_detected: bool,

    pub fire_intensity: f64,

    pub fire_level: HazardLevel,

    pub accel_x: f64,

    pub accel_y: f64,

    pub accel_z: f64,

    pub accel_magnitude: f64,

    pub pitch: f64,

    pub roll: f64,

    pub movement_status: MovementStatus,

    pub danger_level: DangerLevel,
}
