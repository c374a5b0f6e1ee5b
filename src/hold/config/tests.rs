use std::io::Write as _;

use super::*;

const SHIPPED_CONFIG: &str = include_str!("../../../config/touch_hold.toml");

#[test]
fn shipped_config_matches_default_policy() {
    let policy = parse_timing_config(SHIPPED_CONFIG).expect("shipped config should parse");
    assert_eq!(policy, TimingPolicy::default());
}

#[test]
fn zero_min_hold_is_rejected() {
    let err = TimingPolicy::from_millis(0, 1_000).expect_err("zero min must fail");
    assert_eq!(err, ConfigurationError::MinHoldNotPositive);
}

#[test]
fn max_must_exceed_min() {
    let equal = TimingPolicy::from_millis(500, 500).expect_err("equal bounds must fail");
    assert_eq!(
        equal,
        ConfigurationError::MaxNotAboveMin {
            min_ms: 500,
            max_ms: 500
        }
    );

    let inverted = TimingPolicy::from_millis(800, 200).expect_err("inverted bounds must fail");
    assert!(matches!(
        inverted,
        ConfigurationError::MaxNotAboveMin { .. }
    ));
}

#[test]
fn negative_values_surface_as_validation_errors() {
    let err = parse_timing_config("[hold]\nmin_hold_ms = -5\nmax_hold_ms = 100\n")
        .expect_err("negative min must fail");
    match err {
        ConfigLoadError::Invalid(ConfigurationError::NegativeDuration { field }) => {
            assert_eq!(field, "min_hold_ms");
        }
        other => panic!("expected negative duration error, got {other}"),
    }
}

#[test]
fn missing_section_is_a_parse_error() {
    let err = parse_timing_config("min_hold_ms = 10\n").expect_err("schema mismatch");
    match err {
        ConfigLoadError::Parse(msg) => {
            assert!(msg.contains("hold"), "expected message naming `hold`, got `{msg}`");
        }
        other => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn normalize_clamps_to_unit_interval() {
    let policy = TimingPolicy::default();
    assert_eq!(policy.normalize(Duration::from_millis(0)), 0.0);
    assert_eq!(policy.normalize(Duration::from_millis(250)), 0.25);
    assert_eq!(policy.normalize(Duration::from_millis(1_000)), 1.0);
    assert_eq!(policy.normalize(Duration::from_millis(4_000)), 1.0);
}

#[test]
fn load_reads_policy_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[hold]\nmin_hold_ms = 40\nmax_hold_ms = 2500").expect("write config");

    let policy = load_timing_config(file.path()).expect("config should load");
    assert_eq!(policy.min_hold_duration(), Duration::from_millis(40));
    assert_eq!(policy.max_hold_duration(), Duration::from_millis(2_500));
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_timing_config(&dir.path().join("absent.toml")).expect_err("missing file");
    assert!(matches!(err, ConfigLoadError::Io { .. }));
}
