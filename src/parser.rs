//! Turns the monitor's serial output into [`Reading`]s.
//!
//! Two wire formats are accepted and tried in order: single-line JSON frames
//! (see [`json`]) and the legacy human-readable report, where a reading spans
//! a block of labeled lines closed by `[OVERALL STATUS]: <LEVEL>` (see
//! [`text`]). Nothing in here fails; a line that cannot be understood is
//! simply not a reading.

pub mod json;
pub mod text;

use std::mem;

use log::{debug, trace};

use crate::{
    parser::text::{Field, TextLine},
    sensor::{DangerLevel, Reading, classify, danger_level},
};

/// A text block still being read, with the levels the device spelled out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub reading: Reading,
    pub fire_level_reported: bool,
    pub smoke_status_reported: bool,
}

impl Block {
    pub fn apply(&mut self, field: Field) {
        match field {
            Field::FireLevel(_) => self.fire_level_reported = true,
            Field::SmokeStatus(_) => self.smoke_status_reported = true,
            _ => {}
        }
        field.apply_to(&mut self.reading);
    }

    /// Levels the block did not spell out are classified from the raw values,
    /// and the overall level always follows the classifier rule.
    pub fn finish(self, reported: Option<DangerLevel>) -> Reading {
        let mut reading = self.reading;
        let classification = classify(
            reading.fire_intensity,
            reading.smoke_level,
            reading.movement_status,
        );

        if !self.fire_level_reported {
            reading.fire_level = classification.fire_level;
        }
        if !self.smoke_status_reported {
            reading.smoke_status = classification.smoke_status;
        }
        reading.fire_detected |= classification.fire_detected;
        reading.danger_level = danger_level(
            reading.fire_level,
            reading.smoke_status,
            reading.movement_status,
        );

        if let Some(reported) = reported
            && reported != reading.danger_level
        {
            debug!(
                "device reported {reported}, classified as {}",
                reading.danger_level
            );
        }

        reading
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ParserState {
    #[default]
    Idle,
    InBlock(Block),
}

impl ParserState {
    pub fn feed(self, line: &str) -> (ParserState, Option<Reading>) {
        let line = line.trim();

        if let Some(frame) = json::decode(line) {
            return (self, Some(frame.into_reading()));
        }

        match (self, text::parse_line(line)) {
            (ParserState::Idle, TextLine::Header) => (ParserState::InBlock(Block::default()), None),
            // A new header while a block with data is still open means the
            // terminal line was lost; close out what we have.
            (ParserState::InBlock(block), TextLine::Header)
                if block.reading.temperature != 0.0 =>
            {
                (ParserState::InBlock(Block::default()), Some(block.finish(None)))
            }
            (ParserState::InBlock(mut block), TextLine::Fields(fields)) => {
                for field in fields {
                    block.apply(field);
                }
                (ParserState::InBlock(block), None)
            }
            (ParserState::InBlock(block), TextLine::Terminal(reported)) => {
                (ParserState::Idle, Some(block.finish(reported)))
            }
            (state, unused) => {
                trace!("ignored line ({unused:?}): {line}");
                (state, None)
            }
        }
    }
}

/// Holds the [`ParserState`] of one serial session.
#[derive(Debug, Default)]
pub struct LineParser {
    state: ParserState,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) -> Option<Reading> {
        let (state, reading) = mem::take(&mut self.state).feed(line);
        self.state = state;
        reading
    }

    pub fn in_block(&self) -> bool {
        matches!(self.state, ParserState::InBlock(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{HazardLevel, MovementStatus};

    #[test]
    fn header_opens_a_block() {
        let (state, reading) = ParserState::Idle.feed("==========");
        assert_eq!(state, ParserState::InBlock(Block::default()));
        assert_eq!(reading, None);
    }

    #[test]
    fn fields_outside_a_block_are_ignored() {
        let (state, reading) = ParserState::Idle.feed("X: 0.5 g");
        assert_eq!(state, ParserState::Idle);
        assert_eq!(reading, None);
    }

    #[test]
    fn terminal_outside_a_block_is_ignored() {
        let (state, reading) = ParserState::Idle.feed("[OVERALL STATUS]: SAFE");
        assert_eq!(state, ParserState::Idle);
        assert_eq!(reading, None);
    }

    #[test]
    fn json_leaves_block_state_alone() {
        let mut block = Block::default();
        block.apply(Field::AccelX(0.3));

        let (state, reading) = ParserState::InBlock(block.clone())
            .feed(r#"{"fire_val": 0, "smoke_val": 0, "motion_val": "NORMAL"}"#);

        assert_eq!(state, ParserState::InBlock(block));
        assert!(reading.is_some());
    }

    #[test]
    fn repeated_banner_lines_keep_an_empty_block() {
        let mut parser = LineParser::new();
        assert_eq!(parser.feed("=========="), None);
        assert_eq!(parser.feed("SAFETY MONITOR READINGS"), None);
        assert_eq!(parser.feed("X: 0.25 g"), None);
        assert_eq!(parser.feed("=========="), None);
        assert!(parser.in_block());

        let reading = parser.feed("[OVERALL STATUS]: SAFE").unwrap();
        assert_eq!(reading.accel_x, 0.25);
        assert!(!parser.in_block());
    }

    #[test]
    fn header_after_temperature_closes_previous_block() {
        let mut parser = LineParser::new();
        parser.feed("==========");
        parser.feed("Temperature: 23.0°C");
        parser.feed("Intensity: 55.0%");
        parser.feed("Level: HIGH");

        let previous = parser.feed("==========").unwrap();
        assert_eq!(previous.temperature, 23.0);
        assert_eq!(previous.fire_level, HazardLevel::High);
        assert!(previous.fire_detected);
        assert_eq!(previous.danger_level, DangerLevel::Warning);

        assert!(parser.in_block());
        let next = parser.feed("[OVERALL STATUS]: SAFE").unwrap();
        assert_eq!(next.temperature, 0.0);
    }

    #[test]
    fn unreadable_terminal_level_is_derived() {
        let mut parser = LineParser::new();
        parser.feed("==========");
        parser.feed("Movement: IMPACT");

        let reading = parser.feed("[OVERALL STATUS]: ???").unwrap();
        assert_eq!(reading.movement_status, MovementStatus::Impact);
        assert_eq!(reading.danger_level, DangerLevel::Warning);
    }

    #[test]
    fn terminal_level_does_not_override_the_rule() {
        let mut parser = LineParser::new();
        parser.feed("==========");
        parser.feed("Intensity: 55.0%");
        parser.feed("Level: HIGH");

        let reading = parser.feed("[OVERALL STATUS]: SAFE").unwrap();
        assert_eq!(reading.fire_level, HazardLevel::High);
        assert_eq!(reading.danger_level, DangerLevel::Warning);

        parser.feed("==========");
        let empty = parser.feed("[OVERALL STATUS]: CRITICAL").unwrap();
        assert_eq!(empty.danger_level, DangerLevel::Safe);
    }

    #[test]
    fn numeric_only_block_is_classified() {
        let mut parser = LineParser::new();
        parser.feed("==========");
        parser.feed("Intensity: 80.0%");
        parser.feed("Level: 90.0% above baseline");

        let reading = parser.feed("[OVERALL STATUS]: ???").unwrap();
        assert_eq!(reading.fire_level, HazardLevel::Critical);
        assert_eq!(reading.smoke_status, HazardLevel::Critical);
        assert!(reading.fire_detected);
        assert_eq!(reading.danger_level, DangerLevel::Critical);
    }

    #[test]
    fn reported_levels_are_kept_and_missing_ones_classified() {
        let mut parser = LineParser::new();
        parser.feed("==========");
        parser.feed("Intensity: 60.0%");
        parser.feed("Level: LOW");
        parser.feed("Level: 45.0% above baseline");

        let reading = parser.feed("[OVERALL STATUS]: CAUTION").unwrap();
        assert_eq!(reading.fire_level, HazardLevel::Low);
        assert_eq!(reading.smoke_status, HazardLevel::Medium);
        assert_eq!(reading.danger_level, DangerLevel::Caution);
    }
}
