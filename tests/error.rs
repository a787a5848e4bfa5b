//! Tests for error module

use sailtrack::error::{OptionExt, TrackError};

#[test]
fn test_option_ext() {
    let some: Option<i32> = Some(42);
    assert_eq!(some.ok_or_insufficient_points(0, 10, 5).unwrap(), 42);

    let none: Option<i32> = None;
    let result = none.ok_or_insufficient_points(3, 2, 5);
    assert_eq!(
        result,
        Err(TrackError::InsufficientPoints {
            segment_index: 3,
            point_count: 2,
            minimum_required: 5
        })
    );
}

#[test]
fn test_error_messages() {
    let err = TrackError::InsufficientPoints {
        segment_index: 1,
        point_count: 0,
        minimum_required: 1,
    };
    assert_eq!(err.to_string(), "segment 1 has 0 points, at least 1 required");

    let err = TrackError::UnknownUnit("mi".to_string());
    assert!(err.to_string().contains("m, km, nm"));

    let err = TrackError::InvalidParameter {
        name: "look_around",
        value: -1.0,
    };
    assert_eq!(err.to_string(), "invalid value for look_around: -1");

    let err = TrackError::Read {
        source_name: "track.gpx".to_string(),
        message: "no such file".to_string(),
    };
    assert_eq!(err.to_string(), "failed to read track.gpx: no such file");
}

#[test]
fn test_error_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(TrackError::UnknownWindDirection("X".into()));
    assert!(err.to_string().starts_with("unknown wind direction: X"));
}
