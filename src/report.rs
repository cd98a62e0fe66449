use chrono::{DateTime, Local};
use colored::{Color, Colorize as _};

use crate::{
    sensor::{DangerLevel, Reading},
    sink::SinkError,
};

/// Operator-facing output of the bridge loop.
pub trait Reporter {
    fn reading_sent(&mut self, count: u64, reading: &Reading);

    fn insert_failed(&mut self, reading: &Reading, err: &SinkError);
}

#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn reading_sent(&mut self, count: u64, reading: &Reading) {
        println!("{}", reading_line(Local::now(), count, reading));
    }

    fn insert_failed(&mut self, reading: &Reading, err: &SinkError) {
        eprintln!(
            "{} failed to insert {} reading: {err}",
            "✗".red(),
            reading.danger_level
        );
    }
}

pub fn level_color(level: DangerLevel) -> Color {
    match level {
        DangerLevel::Critical => Color::BrightRed,
        DangerLevel::Warning | DangerLevel::Caution => Color::BrightYellow,
        DangerLevel::Safe => Color::BrightGreen,
    }
}

pub fn reading_line(at: DateTime<Local>, count: u64, reading: &Reading) -> String {
    let level = format!("{:8}", reading.danger_level.as_str())
        .color(level_color(reading.danger_level));

    format!(
        "[{}] #{} | {} | Fire: {:5.1}% | Smoke: {:5.1}% | Motion: {}",
        at.format("%H:%M:%S"),
        count,
        level,
        reading.fire_intensity,
        reading.smoke_level,
        reading.movement_status,
    )
}
