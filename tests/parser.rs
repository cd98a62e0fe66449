use safety_bridge::{
    parser::LineParser,
    sensor::{DangerLevel, HazardLevel, MovementStatus},
};

#[test]
fn compact_json_reading() {
    let mut parser = LineParser::new();

    let reading = parser
        .feed(r#"{"fire_val": 25.0, "smoke_val": 5.0, "motion_val": "NORMAL"}"#)
        .expect("compact frame should produce a reading");

    assert!(reading.fire_detected);
    assert_eq!(reading.fire_level, HazardLevel::Low);
    assert_eq!(reading.smoke_status, HazardLevel::Safe);
    assert_eq!(reading.danger_level, DangerLevel::Safe);
    assert_eq!(reading.fire_intensity, 25.0);
    assert_eq!(reading.smoke_level, 5.0);
    assert_eq!(reading.smoke_ppm, 50.0);
    assert_eq!(reading.accel_z, 1.0);
    assert_eq!(reading.temperature, 0.0);
}

#[test]
fn plain_text_outside_a_block_is_not_a_reading() {
    let mut parser = LineParser::new();

    for line in ["", "booting MicroPython v1.22", "X: 0.01 g", "Status: SAFE"] {
        assert_eq!(parser.feed(line), None, "{line}");
    }
    assert!(!parser.in_block());
}

#[test]
fn legacy_block_reading() {
    let mut parser = LineParser::new();
    let block = [
        "==================================================",
        "X: 0.01 g",
        "Y: 0.02 g",
        "Z: 0.99 g",
        "Magnitude: 1.00",
        "Intensity: 15.0%",
        "Level: SAFE",
        "Level: 10.0% above baseline",
        "Status: SAFE",
    ];

    for line in block {
        assert_eq!(parser.feed(line), None, "{line}");
    }

    let reading = parser
        .feed("[OVERALL STATUS]: SAFE")
        .expect("terminal line should complete the block");

    assert_eq!(reading.accel_x, 0.01);
    assert_eq!(reading.accel_y, 0.02);
    assert_eq!(reading.accel_z, 0.99);
    assert_eq!(reading.accel_magnitude, 1.0);
    assert_eq!(reading.fire_intensity, 15.0);
    assert_eq!(reading.fire_level, HazardLevel::Safe);
    assert_eq!(reading.smoke_level, 10.0);
    assert_eq!(reading.smoke_status, HazardLevel::Safe);
    assert_eq!(reading.danger_level, DangerLevel::Safe);
    assert!(!reading.fire_detected);

    assert!(!parser.in_block());
    assert_eq!(parser.feed("X: 0.5 g"), None);
}

#[test]
fn full_report_block() {
    let mut parser = LineParser::new();
    let block = [
        "==================================================",
        "SAFETY MONITOR READINGS",
        "==================================================",
        "[ACCELEROMETER]",
        "  Accel X: 0.12 g",
        "  Accel Y: -0.03 g",
        "  Accel Z: 1.85 g",
        "  Magnitude: 1.86 g",
        "  Tilt - Pitch: 3.7°, Roll: -1.0°",
        "  Movement: IMPACT",
        "  Temperature: 26.4°C",
        "[FIRE SENSOR]",
        "  Intensity: 35.0%",
        "  Level: MEDIUM",
        "[SMOKE SENSOR]",
        "  Level: 45.0% above baseline",
        "  PPM: ~450",
        "  Status: MEDIUM",
    ];

    for line in block {
        assert_eq!(parser.feed(line), None, "{line}");
    }

    let reading = parser.feed("[OVERALL STATUS]: WARNING").unwrap();

    assert_eq!(reading.temperature, 26.4);
    assert_eq!(reading.pitch, 3.7);
    assert_eq!(reading.roll, -1.0);
    assert_eq!(reading.movement_status, MovementStatus::Impact);
    assert_eq!(reading.fire_level, HazardLevel::Medium);
    assert!(reading.fire_detected);
    assert_eq!(reading.smoke_level, 45.0);
    assert_eq!(reading.smoke_ppm, 450.0);
    assert_eq!(reading.smoke_status, HazardLevel::Medium);
    assert_eq!(reading.danger_level, DangerLevel::Warning);
}

#[test]
fn same_json_line_twice_gives_equal_readings() {
    let mut parser = LineParser::new();
    let line = r#"{"fire_val": 55.0, "smoke_val": 30.0, "motion_val": "IMPACT", "accel_x": 0.4}"#;

    let first = parser.feed(line).unwrap();
    let second = parser.feed(line).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.danger_level, DangerLevel::Warning);
}

#[test]
fn malformed_json_is_skipped() {
    let mut parser = LineParser::new();

    assert_eq!(parser.feed(r#"{"fire_val": }"#), None);
    assert_eq!(parser.feed(r#"{"fire_val": 1.0, "smoke_val""#), None);

    let reading = parser
        .feed(r#"{"fire_val": 0.0, "smoke_val": 90.0, "motion_val": "NORMAL"}"#)
        .unwrap();
    assert_eq!(reading.danger_level, DangerLevel::Critical);
}

#[test]
fn json_interleaved_with_a_text_block() {
    let mut parser = LineParser::new();

    parser.feed("==========");
    parser.feed("X: 0.30 g");

    let json = parser
        .feed(r#"{"temperature": 22.0, "danger_level": "CAUTION", "smoke_level": 25.0}"#)
        .unwrap();
    assert_eq!(json.danger_level, DangerLevel::Caution);
    assert_eq!(json.accel_x, 0.0);

    let text = parser.feed("[OVERALL STATUS]: SAFE").unwrap();
    assert_eq!(text.accel_x, 0.3);
}

#[test]
fn device_status_line_does_not_open_a_block() {
    let mut parser = LineParser::new();

    assert_eq!(
        parser.feed(r#"{"status": "started", "message": "Safety Monitor JSON output started"}"#),
        None
    );
    assert!(!parser.in_block());
}
