//! Tests for track analysis: GPX fixtures and synthetic outings end to end

use chrono::{Duration, TimeZone, Utc};
use sailtrack::synthetic::SyntheticScenario;
use sailtrack::{
    AnalysisParameters, Fix, Mode, PointOfSail, SegmentType, Track, TrackError, Turn, Unit,
    WindDirection, gpx_io,
};
use std::path::Path;

const TURN1: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/turn1.gpx");
const TURN2: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/turn2.gpx");
const TURN3: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/turn3.gpx");

fn analyze_fixture(path: &str) -> Track {
    let segments = gpx_io::read_file(Path::new(path)).unwrap();
    Track::analyze(segments[0].source.clone(), &segments, &AnalysisParameters::default()).unwrap()
}

fn summary(track: &Track) -> Vec<(usize, Mode)> {
    track.segments.iter().map(|s| (s.len(), s.mode)).collect()
}

fn turns(track: &Track) -> Vec<Turn> {
    track
        .segments
        .iter()
        .filter_map(|s| match s.segment_type {
            Some(SegmentType::Turn { turn, .. }) => Some(turn),
            _ => None,
        })
        .collect()
}

fn points_of_sail(track: &Track) -> Vec<PointOfSail> {
    track
        .segments
        .iter()
        .filter_map(|s| match s.segment_type {
            Some(SegmentType::PointOfSail { point_of_sail, .. }) => Some(point_of_sail),
            _ => None,
        })
        .collect()
}

// ============================================================================
// GPX fixtures
// ============================================================================

#[test]
fn test_fixture_turn1() {
    let track = analyze_fixture(TURN1);
    assert_eq!(track.name, "turn1.gpx");
    assert_eq!(track.points.len(), 23);
    assert_eq!(summary(&track), vec![(15, Mode::Turning), (8, Mode::Moving)]);
    assert_eq!(track.file_name(), "240824-0h01-00.2nm");
}

#[test]
fn test_fixture_turn2() {
    let track = analyze_fixture(TURN2);
    assert_eq!(track.points.len(), 20);
    // the stop in the middle is too short to stand on its own
    assert_eq!(summary(&track), vec![(9, Mode::Moving), (11, Mode::Moving)]);
    assert!(!track.segments[1].is_pure());
    assert_eq!(track.file_name(), "240824-0h01-00.1nm");
}

#[test]
fn test_fixture_turn3() {
    let track = analyze_fixture(TURN3);
    assert_eq!(track.points.len(), 23);
    assert_eq!(
        summary(&track),
        vec![(5, Mode::Moving), (7, Mode::Turning), (11, Mode::Moving)]
    );
    assert_eq!(track.file_name(), "240824-0h01-00.1nm");
}

#[test]
fn test_fixture_elevation_and_time() {
    let segments = gpx_io::read_file(Path::new(TURN3)).unwrap();
    assert_eq!(segments.len(), 1);
    let first = &segments[0].fixes[0];
    assert_eq!(first.elevation, Some(84.0));
    assert_eq!(first.time, Utc.with_ymd_and_hms(2024, 8, 24, 19, 17, 0).unwrap());
}

#[test]
fn test_missing_file_is_read_error() {
    let result = gpx_io::read_file(Path::new("/nonexistent/track.gpx"));
    assert!(matches!(result, Err(TrackError::Read { .. })));
}

#[test]
fn test_malformed_document_is_read_error() {
    let result = gpx_io::read_segments("not a gpx document".as_bytes(), "broken.gpx");
    assert!(matches!(
        result,
        Err(TrackError::Read { ref source_name, .. }) if source_name == "broken.gpx"
    ));
}

// ============================================================================
// Track structure
// ============================================================================

#[test]
fn test_segments_partition_points() {
    let track = analyze_fixture(TURN3);
    let mut expected_start = 0;
    for (i, segment) in track.segments.iter().enumerate() {
        assert_eq!(segment.points.start, expected_start);
        assert!(!segment.is_empty());
        assert_eq!(track.segment_points(i).len(), segment.len());
        expected_start = segment.points.end;
    }
    assert_eq!(expected_start, track.points.len());
    assert_eq!(track.each_pair().count(), track.points.len() - 1);
}

#[test]
fn test_fix_segments_stay_separate() {
    let start = Utc.with_ymd_and_hms(2024, 8, 24, 19, 0, 0).unwrap();
    let leg = |offset: i64, lng: f64| -> Vec<Fix> {
        (0..12)
            .map(|i| {
                Fix::new(
                    44.0 + i as f64 * 0.0001,
                    lng,
                    start + Duration::seconds(offset + i * 10),
                )
            })
            .collect()
    };
    let fix_segments = vec![leg(0, -76.9), leg(600, -76.8)];
    let track = Track::analyze("two", &fix_segments, &AnalysisParameters::default()).unwrap();

    assert_eq!(track.points.len(), 24);
    assert_eq!(track.points[11].next, None);
    assert_eq!(track.points[12].previous, None);
    assert_eq!(track.points[13].previous, Some(12));

    assert_eq!(track.segments.len(), 2);
    assert_eq!(track.segments[1].points, 12..24);
    assert!(track.previous_segment(1).is_none());
    assert!(track.next_segment(0).is_none());
    assert_eq!(track.duration, Duration::seconds(710));
}

#[test]
fn test_empty_fix_segment_rejected() {
    let segments: Vec<Vec<Fix>> = vec![vec![]];
    let result = Track::analyze("empty", &segments, &AnalysisParameters::default());
    assert!(matches!(result, Err(TrackError::InsufficientPoints { .. })));
}

#[test]
fn test_invalid_parameters_rejected() {
    let mut params = AnalysisParameters::default();
    params.look_around = -5.0;
    let fixes = SyntheticScenario::round_the_buoys(0.0, 1).generate().fixes;
    let result = Track::analyze("bad", &[fixes], &params);
    assert!(matches!(result, Err(TrackError::InvalidParameter { name: "look_around", .. })));
}

#[test]
fn test_kilometer_parameters() {
    let km = Unit::Kilometer;
    let params = AnalysisParameters::new(km, km, km, 0.05, 1.852, 60).unwrap();
    let fixes = SyntheticScenario::round_the_buoys(0.0, 1).generate().fixes;
    let track = Track::analyze("km", &[fixes.clone()], &params).unwrap();
    let nm_track = Track::analyze("nm", &[fixes], &AnalysisParameters::default()).unwrap();
    // same thresholds expressed in other units give the same segmentation
    assert_eq!(summary(&track), summary(&nm_track));
    assert!(track.file_name().ends_with("km"));
}

// ============================================================================
// Synthetic outing
// ============================================================================

#[test]
fn test_round_the_buoys_segments() {
    let fixes = SyntheticScenario::round_the_buoys(0.0, 1).generate().fixes;
    let track = Track::analyze("buoys", &[fixes], &AnalysisParameters::default()).unwrap();
    use Mode::*;
    let modes: Vec<Mode> = track.segments.iter().map(|s| s.mode).collect();
    assert_eq!(
        modes,
        vec![Moving, Turning, Moving, Turning, Moving, Turning, Moving, Turning, Moving, Static]
    );
    for segment in track.segments.iter().filter(|s| s.mode == Moving) {
        assert!(segment.is_pure());
        assert!(segment.heading.variation <= 2);
        assert!((segment.speed.avg - 5.0).abs() < 0.1);
    }
}

#[test]
fn test_round_the_buoys_classification() {
    let fixes = SyntheticScenario::round_the_buoys(0.0, 1).generate().fixes;
    let mut track = Track::analyze("buoys", &[fixes], &AnalysisParameters::default()).unwrap();
    track.classify(WindDirection::new(0));

    assert_eq!(
        points_of_sail(&track),
        vec![
            PointOfSail::ClosePort,
            PointOfSail::CloseStarboard,
            PointOfSail::BroadStarboard,
            PointOfSail::BroadPort,
            PointOfSail::ClosePort,
        ]
    );
    assert_eq!(
        turns(&track),
        vec![
            Turn::TackPortToStarboard,
            Turn::BearAwayStarboard,
            Turn::GybeStarboardToPort,
            Turn::RoundUpPort,
            Turn::Drifting,
        ]
    );
    assert!(track.segments.iter().all(|s| s.segment_type.is_some()));
    assert_eq!(track.segments[1].type_label(), "tack port to starboard N");
}

#[test]
fn test_classification_rotates_with_wind() {
    let fixes = SyntheticScenario::round_the_buoys(200.0, 1).generate().fixes;
    let mut track = Track::analyze("buoys", &[fixes], &AnalysisParameters::default()).unwrap();
    track.classify(WindDirection::new(200));
    assert_eq!(
        turns(&track),
        vec![
            Turn::TackPortToStarboard,
            Turn::BearAwayStarboard,
            Turn::GybeStarboardToPort,
            Turn::RoundUpPort,
            Turn::Drifting,
        ]
    );
}

#[test]
fn test_reclassify_replaces_types() {
    let fixes = SyntheticScenario::round_the_buoys(0.0, 1).generate().fixes;
    let mut track = Track::analyze("buoys", &[fixes], &AnalysisParameters::default()).unwrap();
    track.classify(WindDirection::new(0));
    track.classify(WindDirection::new(180));
    assert!(
        track
            .segments
            .iter()
            .all(|s| s.segment_type.map(|t| t.wind()) == Some(WindDirection::new(180)))
    );
    assert_eq!(points_of_sail(&track)[0], PointOfSail::BroadStarboard);
}

#[test]
fn test_track_summary() {
    let fixes = SyntheticScenario::round_the_buoys(0.0, 1).generate().fixes;
    let track = Track::analyze("buoys", &[fixes], &AnalysisParameters::default()).unwrap();
    assert_eq!(track.duration, Duration::seconds(710));
    let nm = track.params.as_long_distance(track.distance);
    assert_eq!(track.file_name(), format!("240824-0h11-{:04.1}nm", nm));
    let counts = track.mode_counts();
    assert_eq!(counts.moving + counts.turning + counts.stationary, track.points.len());
    assert!(track.to_string().starts_with("24-08-24 18:00:00 "));
    assert!(track.to_string().ends_with("(11m50s) [10 segments]"));
}

#[test]
fn test_track_json() {
    let fixes = SyntheticScenario::round_the_buoys(0.0, 1).generate().fixes;
    let mut track = Track::analyze("buoys", &[fixes], &AnalysisParameters::default()).unwrap();
    track.classify(WindDirection::new(0));
    let json = serde_json::to_value(&track).unwrap();
    assert_eq!(json["name"], "buoys");
    assert_eq!(json["duration"], 710.0);
    assert_eq!(json["segments"][0]["mode"], "moving");
    assert_eq!(json["segments"][1]["segment_type"]["turn"], "tack_port_to_starboard");
    assert_eq!(json["segments"].as_array().map(Vec::len), Some(10));
}

#[test]
fn test_analyze_tracks_in_batch() {
    use sailtrack::{FixSegment, TrackSource, analyze_tracks};
    let sources: Vec<TrackSource> = [0.0, 200.0]
        .iter()
        .map(|&wind| TrackSource {
            name: format!("wind-{}", wind),
            segments: vec![FixSegment::new(
                "synthetic",
                SyntheticScenario::round_the_buoys(wind, 1).generate().fixes,
            )],
        })
        .collect();
    let tracks = analyze_tracks(&sources, &AnalysisParameters::default()).unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[1].name, "wind-200");
    assert!(tracks.iter().all(|t| t.segments.len() == 10));
}
