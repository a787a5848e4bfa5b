//! Track analysis driver.
//!
//! A [`Track`] owns one contiguous arena of [`Point`]s and the
//! [`Segment`]s cut from it. Each fix segment of the input is analyzed on
//! its own (points never link across fix segments) using one projection
//! derived from the bounds of the whole track.

use crate::config::{AnalysisParameters, Unit};
use crate::error::{OptionExt, Result, TrackError};
use crate::geo_utils::{Bounds, Projection};
use crate::motion::{self, Mode, Point};
use crate::preprocess::TrackSource;
use crate::sailing::{SegmentType, Turn, WindDirection};
use crate::segments::{self, Segment};
use crate::wind;
use crate::Fix;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

/// Analysis result for one track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub name: String,
    pub params: AnalysisParameters,
    pub points: Vec<Point>,
    pub segments: Vec<Segment>,
    pub bounds: Bounds,
    /// Total distance in `params.distance_unit`
    pub distance: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(serialize_with = "segments::serialize_seconds")]
    pub duration: Duration,
}

impl Track {
    /// Analyze the fix segments of one track.
    ///
    /// Fails if the parameters are invalid, there are no fix segments, or
    /// any fix segment is empty.
    pub fn analyze<S: AsRef<[Fix]>>(
        name: impl Into<String>,
        fix_segments: &[S],
        params: &AnalysisParameters,
    ) -> Result<Track> {
        params.validate()?;
        let name = name.into();
        if let Some(index) = fix_segments.iter().position(|s| s.as_ref().is_empty()) {
            return Err(TrackError::InsufficientPoints {
                segment_index: index,
                point_count: 0,
                minimum_required: 1,
            });
        }
        let bounds = Bounds::from_fixes(fix_segments.iter().flat_map(|s| s.as_ref()))
            .ok_or_insufficient_points(0, 0, 1)?;
        let projection = Projection::new(&bounds);

        let fix_count: usize = fix_segments.iter().map(|s| s.as_ref().len()).sum();
        let mut points: Vec<Point> = Vec::with_capacity(fix_count);
        let mut all_segments: Vec<Segment> = Vec::new();
        for fixes in fix_segments {
            let local_points = motion::analyze_fixes(fixes.as_ref(), &projection, params);
            let local_segments = segments::build_segments(&local_points);
            let (point_base, segment_base) = (points.len(), all_segments.len());
            points.extend(local_points.into_iter().map(|mut p| {
                p.offset(point_base);
                p
            }));
            all_segments.extend(local_segments.into_iter().map(|mut s| {
                s.offset(point_base, segment_base);
                s
            }));
        }

        let start = all_segments
            .first()
            .map(|s| s.start)
            .ok_or_insufficient_points(0, fix_count, 1)?;
        let end = all_segments
            .last()
            .map(|s| s.end)
            .ok_or_insufficient_points(0, fix_count, 1)?;
        let distance = all_segments.iter().map(|s| s.distance).sum();

        log::info!(
            "[Analysis] {}: {} fixes in {} fix segments -> {} segments",
            name,
            fix_count,
            fix_segments.len(),
            all_segments.len()
        );

        Ok(Track {
            name,
            params: params.clone(),
            points,
            segments: all_segments,
            bounds,
            distance,
            start,
            end,
            duration: end - start,
        })
    }

    /// Analyze a preprocessed track source.
    pub fn from_source(source: &TrackSource, params: &AnalysisParameters) -> Result<Track> {
        Track::analyze(source.name.clone(), &source.segments, params)
    }

    /// Points of the `index`-th segment.
    pub fn segment_points(&self, index: usize) -> &[Point] {
        &self.points[self.segments[index].points.clone()]
    }

    pub fn previous_segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)?.previous.map(|i| &self.segments[i])
    }

    pub fn next_segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)?.next.map(|i| &self.segments[i])
    }

    /// Consecutive point pairs across all segments.
    pub fn each_pair(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Assign a sailing classification to every segment.
    ///
    /// Moving segments get the point of sail of their mid heading, turning
    /// segments the turn between the points of sail at either end, and
    /// static segments are drifting.
    pub fn classify(&mut self, wind: WindDirection) {
        for segment in &mut self.segments {
            let points = &self.points[segment.points.clone()];
            let kind = match segment.mode {
                Mode::Moving => SegmentType::PointOfSail {
                    point_of_sail: wind.point_of_sail(segment.heading.mid),
                    wind,
                },
                Mode::Turning => {
                    let from = points.first().map(|p| wind.point_of_sail(p.heading));
                    let to = points.last().map(|p| wind.point_of_sail(p.heading));
                    let turn = match (from, to) {
                        (Some(from), Some(to)) => wind.turn(from, to),
                        _ => Turn::Unknown,
                    };
                    SegmentType::Turn { turn, wind }
                }
                Mode::Static => SegmentType::Turn {
                    turn: Turn::Drifting,
                    wind,
                },
            };
            segment.segment_type = Some(kind);
        }
        log::debug!("[Analysis] {}: classified for wind {}", self.name, wind);
    }

    /// Infer the wind direction from this track's segments.
    pub fn infer_wind(&self, default: Option<WindDirection>) -> Option<WindDirection> {
        wind::infer_wind_direction(&self.segments, &self.params, default)
    }

    /// `YYMMDD-HhMM-DD.Dunit` from the start (UTC), duration and distance.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}h{:02}-{:04.1}{}",
            self.start.format("%y%m%d"),
            self.duration.num_hours(),
            self.duration.num_minutes() % 60,
            self.params.as_long_distance(self.distance),
            self.params.long_distance_unit.distance_label()
        )
    }

    /// Width and height of the track's bounding box in `unit`.
    pub fn extent(&self, unit: Unit) -> (f64, f64) {
        self.bounds.extent(unit)
    }

    pub fn mode_counts(&self) -> segments::ModeCounts {
        segments::ModeCounts::from_points(&self.points)
    }
}

/// Compact duration text, e.g. `1h2m3s`, `1m30s`, `45s`.
pub fn format_duration(d: Duration) -> String {
    let total = d.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    let (h, m, s) = (total / 3600, (total / 60) % 60, total % 60);
    if h > 0 {
        format!("{sign}{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{sign}{m}m{s}s")
    } else {
        format!("{sign}{s}s")
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.params.long_distance_unit;
        let (width, height) = self.extent(unit);
        write!(
            f,
            "{} {:05.2}{} {:05.2}{} x {:05.2}{} ({}) [{} segments]",
            self.start.format("%y-%m-%d %H:%M:%S"),
            self.params.as_long_distance(self.distance),
            unit,
            width,
            unit,
            height,
            unit,
            format_duration(self.duration),
            self.segments.len()
        )
    }
}

/// Analyze independent tracks one after another.
pub fn analyze_tracks(sources: &[TrackSource], params: &AnalysisParameters) -> Result<Vec<Track>> {
    sources
        .iter()
        .map(|source| Track::from_source(source, params))
        .collect()
}

/// Analyze independent tracks concurrently.
#[cfg(feature = "parallel")]
pub fn analyze_tracks_parallel(
    sources: &[TrackSource],
    params: &AnalysisParameters,
) -> Result<Vec<Track>> {
    use rayon::prelude::*;

    sources
        .par_iter()
        .map(|source| Track::from_source(source, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(45)), "45s");
        assert_eq!(format_duration(Duration::seconds(90)), "1m30s");
        assert_eq!(format_duration(Duration::seconds(3723)), "1h2m3s");
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let params = AnalysisParameters::default();
        let none: [Vec<Fix>; 0] = [];
        assert!(matches!(
            Track::analyze("empty", &none, &params),
            Err(TrackError::InsufficientPoints { .. })
        ));
        let hole: [Vec<Fix>; 1] = [vec![]];
        assert_eq!(
            Track::analyze("hole", &hole, &params).unwrap_err(),
            TrackError::InsufficientPoints {
                segment_index: 0,
                point_count: 0,
                minimum_required: 1
            }
        );
    }
}
