use std::str::FromStr;

use crate::sensor::{DangerLevel, HazardLevel, MovementStatus, Reading};

const TERMINAL_MARKER: &str = "overall status";

const HEADER_TITLES: [&str; 2] = ["safety monitor", "sensor readings"];

const NUMERIC_LABELS: [(&str, fn(f64) -> Field); 10] = [
    ("x", Field::AccelX),
    ("y", Field::AccelY),
    ("z", Field::AccelZ),
    ("magnitude", Field::AccelMagnitude),
    ("pitch", Field::Pitch),
    ("roll", Field::Roll),
    ("temperature", Field::Temperature),
    ("temp", Field::Temperature),
    ("intensity", Field::FireIntensity),
    ("ppm", Field::SmokePpm),
];

/// A single labeled value found in a text block line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    AccelX(f64),
    AccelY(f64),
    AccelZ(f64),
    AccelMagnitude(f64),
    Pitch(f64),
    Roll(f64),
    Temperature(f64),
    FireIntensity(f64),
    FireDetected(bool),
    FireLevel(HazardLevel),
    SmokeLevel(f64),
    SmokePpm(f64),
    SmokeStatus(HazardLevel),
    Movement(MovementStatus),
}

impl Field {
    pub fn apply_to(self, reading: &mut Reading) {
        match self {
            Field::AccelX(v) => reading.accel_x = v,
            Field::AccelY(v) => reading.accel_y = v,
            Field::AccelZ(v) => reading.accel_z = v,
            Field::AccelMagnitude(v) => reading.accel_magnitude = v,
            Field::Pitch(v) => reading.pitch = v,
            Field::Roll(v) => reading.roll = v,
            Field::Temperature(v) => reading.temperature = v,
            Field::FireIntensity(v) => reading.fire_intensity = v,
            Field::FireDetected(v) => reading.fire_detected = v,
            Field::FireLevel(v) => reading.fire_level = v,
            Field::SmokeLevel(v) => reading.smoke_level = v,
            Field::SmokePpm(v) => reading.smoke_ppm = v,
            Field::SmokeStatus(v) => reading.smoke_status = v,
            Field::Movement(v) => reading.movement_status = v,
        }
    }
}

/// What one line of the human-readable report means.
#[derive(Debug, Clone, PartialEq)]
pub enum TextLine {
    /// Banner or `=====` separator that opens a block.
    Header,
    /// `[OVERALL STATUS]: <LEVEL>`; `None` when the level is unreadable.
    Terminal(Option<DangerLevel>),
    Fields(Vec<Field>),
    Other,
}

pub fn parse_line(line: &str) -> TextLine {
    let line = line.trim();
    let lower = line.to_ascii_lowercase();

    if let Some(pos) = lower.find(TERMINAL_MARKER) {
        let value = line[pos + TERMINAL_MARKER.len()..]
            .trim_start_matches(|c: char| c == ']' || c == ':' || c.is_whitespace());
        return TextLine::Terminal(word(value));
    }

    if is_header(line, &lower) {
        return TextLine::Header;
    }

    let fields = fields(line, &lower);
    if fields.is_empty() {
        TextLine::Other
    } else {
        TextLine::Fields(fields)
    }
}

fn is_header(line: &str, lower: &str) -> bool {
    if line.len() >= 3 && line.chars().all(|c| c == '=') {
        return true;
    }

    !line.starts_with('{') && HEADER_TITLES.iter().any(|title| lower.contains(title))
}

fn fields(line: &str, lower: &str) -> Vec<Field> {
    let mut fields = Vec::new();

    for (label, field) in NUMERIC_LABELS {
        if let Some(v) = labeled(line, lower, label).and_then(number) {
            fields.push(field(v));
        }
    }

    if let Some(detected) = labeled(line, lower, "detected").and_then(flag) {
        fields.push(Field::FireDetected(detected));
    }

    if let Some(movement) = labeled(line, lower, "movement")
        .or_else(|| labeled(line, lower, "motion"))
        .and_then(word::<MovementStatus>)
    {
        fields.push(Field::Movement(movement));
    }

    let mentions_smoke = lower.contains("smoke");
    let mentions_fire = lower.contains("fire") || lower.contains("flame");

    if let Some(value) = labeled(line, lower, "level") {
        if let Some(v) = number(value) {
            fields.push(Field::SmokeLevel(v));
        } else if let Some(level) = word::<HazardLevel>(value) {
            fields.push(if mentions_smoke {
                Field::SmokeStatus(level)
            } else {
                Field::FireLevel(level)
            });
        }
    }

    if let Some(value) = labeled(line, lower, "status") {
        if let Some(movement) = word::<MovementStatus>(value) {
            fields.push(Field::Movement(movement));
        } else if let Some(level) = word::<HazardLevel>(value) {
            fields.push(if mentions_fire {
                Field::FireLevel(level)
            } else {
                Field::SmokeStatus(level)
            });
        }
    }

    fields
}

/// Finds `label:` (case-insensitive, not preceded by a letter or digit) and
/// returns the text after the colon.
fn labeled<'a>(line: &'a str, lower: &str, label: &str) -> Option<&'a str> {
    let mut from = 0;

    while let Some(pos) = lower[from..].find(label) {
        let start = from + pos;
        let end = start + label.len();

        let bounded = lower[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_ascii_alphanumeric());

        if bounded && let Some(value) = line[end..].trim_start().strip_prefix(':') {
            return Some(value.trim());
        }

        from = end;
    }

    None
}

fn number(value: &str) -> Option<f64> {
    let value = value.trim_start_matches(|c: char| c == '~' || c.is_whitespace());
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(value.len());

    value[..end].parse().ok()
}

fn word<T: FromStr>(value: &str) -> Option<T> {
    let value = value
        .trim()
        .trim_end_matches(|c: char| !c.is_ascii_alphanumeric());

    value.parse().ok().or_else(|| {
        value
            .split(|c: char| !c.is_ascii_alphabetic())
            .find(|w| !w.is_empty())?
            .parse()
            .ok()
    })
}

fn flag(value: &str) -> Option<bool> {
    let value = value.split_whitespace().next()?;

    match value.to_ascii_lowercase().trim_end_matches(|c: char| !c.is_ascii_alphanumeric()) {
        "yes" | "true" | "1" | "detected" => Some(true),
        "no" | "false" | "0" | "none" => Some(false),
        _ => None,
    }
}
