//! Tests for config module

use sailtrack::{Activity, AnalysisParameters, TrackError, Unit};

#[test]
fn test_sailing_preset() {
    let params: AnalysisParameters = "sail".parse::<Activity>().unwrap().parameters();
    assert_eq!(params.distance_unit, Unit::Meter);
    assert_eq!(params.long_distance_unit, Unit::NauticalMile);
    assert_eq!(params.speed_unit, Unit::NauticalMile);
    assert_eq!(params.look_around, 50.0);
    assert_eq!(params.moving_speed, 1.0);
    assert_eq!(params.turning_change, 60);
    assert_eq!(params, AnalysisParameters::default());
}

#[test]
fn test_unknown_activity() {
    let err = "kite".parse::<Activity>().unwrap_err();
    assert!(matches!(err, TrackError::UnknownActivity { ref name, .. } if name == "kite"));
    assert_eq!(Activity::known(), vec!["sail".to_string()]);
}

#[test]
fn test_unit_names() {
    assert_eq!("m".parse::<Unit>().unwrap(), Unit::Meter);
    assert_eq!("meters".parse::<Unit>().unwrap(), Unit::Meter);
    assert_eq!("KM".parse::<Unit>().unwrap(), Unit::Kilometer);
    assert_eq!("nm".parse::<Unit>().unwrap(), Unit::NauticalMile);
    assert_eq!(
        "furlong".parse::<Unit>(),
        Err(TrackError::UnknownUnit("furlong".to_string()))
    );
}

#[test]
fn test_unit_labels() {
    assert_eq!(Unit::Meter.speed_label(), "m/s");
    assert_eq!(Unit::Kilometer.speed_label(), "km/h");
    assert_eq!(Unit::NauticalMile.speed_label(), "kts");
    assert_eq!(Unit::NauticalMile.to_string(), "nm");
}

#[test]
fn test_from_unit_names() {
    let params = AnalysisParameters::from_unit_names("km", "km", "km", 0.05, 2.0, 45).unwrap();
    assert_eq!(params.speed_unit, Unit::Kilometer);
    assert!(AnalysisParameters::from_unit_names("m", "mi", "nm", 50.0, 1.0, 60).is_err());
}

#[test]
fn test_invalid_parameters_rejected_up_front() {
    let cases = [
        (0.0, 1.0, 60, "look_around"),
        (f64::NAN, 1.0, 60, "look_around"),
        (50.0, -1.0, 60, "moving_speed"),
        (50.0, 1.0, 0, "turning_change"),
        (50.0, 1.0, 181, "turning_change"),
    ];
    for (look_around, moving_speed, turning_change, field) in cases {
        let result = AnalysisParameters::new(
            Unit::Meter,
            Unit::NauticalMile,
            Unit::NauticalMile,
            look_around,
            moving_speed,
            turning_change,
        );
        assert!(
            matches!(result, Err(TrackError::InvalidParameter { name, .. }) if name == field),
            "{} should be rejected",
            field
        );
    }
}

#[test]
fn test_long_distance_conversion() {
    let params = AnalysisParameters::default();
    let one_nm_in_meters = Unit::Meter.per_degree() / 60.0;
    assert!((params.as_long_distance(one_nm_in_meters) - 1.0).abs() < 1e-9);
}

#[test]
fn test_parameters_json() {
    let params = AnalysisParameters::default();
    let json = serde_json::to_string(&params).unwrap();
    assert!(json.contains("\"distance_unit\":\"meter\""));
    assert!(json.contains("\"speed_unit\":\"nm\""));
    let back: AnalysisParameters = serde_json::from_str(&json).unwrap();
    assert_eq!(back, params);
}
