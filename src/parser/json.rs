use log::{debug, info};
use serde_json::{Map, Value};

use crate::sensor::{MovementStatus, Reading, classify};

/// Raw values of the three-sensor frame emitted by the bridge firmware.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactFrame {
    pub fire_val: f64,
    pub smoke_val: f64,
    pub motion_val: MovementStatus,
    pub smoke_ppm: Option<f64>,
    pub temperature: f64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub accel_magnitude: f64,
    pub pitch: f64,
    pub roll: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// `fire_val`/`smoke_val`/`motion_val`; derived fields are computed here.
    Compact(CompactFrame),
    /// Every `Reading` field already computed on the device.
    Full(Reading),
}

impl Frame {
    pub fn into_reading(self) -> Reading {
        match self {
            Frame::Compact(frame) => frame.into(),
            Frame::Full(reading) => reading,
        }
    }
}

impl From<CompactFrame> for Reading {
    fn from(frame: CompactFrame) -> Self {
        let classification = classify(frame.fire_val, frame.smoke_val, frame.motion_val);

        Reading {
            temperature: frame.temperature,
            smoke_level: frame.smoke_val,
            smoke_ppm: frame.smoke_ppm.unwrap_or(frame.smoke_val * 10.0),
            smoke_status: classification.smoke_status,
            fire_detected: classification.fire_detected,
            fire_intensity: frame.fire_val,
            fire_level: classification.fire_level,
            accel_x: frame.accel_x,
            accel_y: frame.accel_y,
            accel_z: frame.accel_z,
            accel_magnitude: frame.accel_magnitude,
            pitch: frame.pitch,
            roll: frame.roll,
            movement_status: frame.motion_val,
            danger_level: classification.danger_level,
        }
    }
}

/// Returns `None` for anything that is not a recognized JSON frame; the caller
/// falls back to the text format.
pub fn decode(line: &str) -> Option<Frame> {
    if !line.starts_with('{') {
        return None;
    }

    let object = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return None,
        Err(err) => {
            debug!("malformed JSON line: {err}: {line}");
            return None;
        }
    };

    if let Some(status) = object.get("status").and_then(Value::as_str) {
        info!("device status: {status}");
    }

    decode_compact(&object)
        .map(Frame::Compact)
        .or_else(|| decode_full(object).map(Frame::Full))
}

fn decode_compact(object: &Map<String, Value>) -> Option<CompactFrame> {
    let fire_val = number(object.get("fire_val")?)?;
    let smoke_val = number(object.get("smoke_val")?)?;
    let motion_val = match object.get("motion_val")?.as_str()?.parse() {
        Ok(m) => m,
        Err(err) => {
            debug!("compact frame rejected: {err:#}");
            return None;
        }
    };

    let optional = |key: &str, default: f64| {
        object.get(key).and_then(number).unwrap_or(default)
    };

    Some(CompactFrame {
        fire_val,
        smoke_val,
        motion_val,
        smoke_ppm: object.get("smoke_ppm").and_then(number),
        temperature: optional("temperature", 0.0),
        accel_x: optional("accel_x", 0.0),
        accel_y: optional("accel_y", 0.0),
        accel_z: optional("accel_z", 1.0),
        accel_magnitude: optional("accel_magnitude", 1.0),
        pitch: optional("pitch", 0.0),
        roll: optional("roll", 0.0),
    })
}

fn decode_full(object: Map<String, Value>) -> Option<Reading> {
    if !object.contains_key("temperature") || !object.contains_key("danger_level") {
        return None;
    }

    match serde_json::from_value(Value::Object(object)) {
        Ok(reading) => Some(reading),
        Err(err) => {
            debug!("full frame rejected: {err}");
            None
        }
    }
}

fn number(value: &Value) -> Option<f64> {
    value.as_f64().or_else(|| value.as_str()?.trim().parse().ok())
}
