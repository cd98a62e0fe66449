use crate::sensor::{DangerLevel, HazardLevel, MovementStatus};

/// Flame intensity (percent) above which a fire counts as detected.
pub const FIRE_DETECTED_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub fire_detected: bool,
    pub fire_level: HazardLevel,
    pub smoke_status: HazardLevel,
    pub danger_level: DangerLevel,
}

pub fn classify(
    fire_intensity: f64,
    smoke_level: f64,
    movement_status: MovementStatus,
) -> Classification {
    let fire_level = fire_level(fire_intensity);
    let smoke_status = smoke_status(smoke_level);

    Classification {
        fire_detected: fire_intensity > FIRE_DETECTED_THRESHOLD,
        fire_level,
        smoke_status,
        danger_level: danger_level(fire_level, smoke_status, movement_status),
    }
}

pub fn fire_level(fire_intensity: f64) -> HazardLevel {
    if fire_intensity > 70.0 {
        HazardLevel::Critical
    } else if fire_intensity > 50.0 {
        HazardLevel::High
    } else if fire_intensity > 30.0 {
        HazardLevel::Medium
    } else if fire_intensity > 10.0 {
        HazardLevel::Low
    } else {
        HazardLevel::Safe
    }
}

pub fn smoke_status(smoke_level: f64) -> HazardLevel {
    if smoke_level > 80.0 {
        HazardLevel::Critical
    } else if smoke_level > 60.0 {
        HazardLevel::High
    } else if smoke_level > 40.0 {
        HazardLevel::Medium
    } else if smoke_level > 20.0 {
        HazardLevel::Low
    } else {
        HazardLevel::Safe
    }
}

/// Only smoke contributes to CAUTION; a LOW or MEDIUM fire level alone stays SAFE.
pub fn danger_level(
    fire_level: HazardLevel,
    smoke_status: HazardLevel,
    movement_status: MovementStatus,
) -> DangerLevel {
    if fire_level == HazardLevel::Critical || smoke_status == HazardLevel::Critical {
        DangerLevel::Critical
    } else if fire_level == HazardLevel::High
        || smoke_status == HazardLevel::High
        || movement_status == MovementStatus::Impact
    {
        DangerLevel::Warning
    } else if matches!(smoke_status, HazardLevel::Medium | HazardLevel::Low) {
        DangerLevel::Caution
    } else {
        DangerLevel::Safe
    }
}
