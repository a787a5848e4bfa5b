//! Segment building: group classified points into runs of one [`Mode`].
//!
//! Runs are found with two absorption rules so GPS noise at mode boundaries
//! doesn't produce one point segments:
//! - a single point run swallows the run that follows it, and a single
//!   trailing point is folded into the run before it
//! - runs shorter than [`MIN_SEGMENT_POINTS`] are stashed and prepended to
//!   the next run; a stash left over at the end joins the last segment

use crate::config::AnalysisParameters;
use crate::config::Unit;
use crate::heading::{self, HeadingRange};
use crate::motion::{Mode, Point};
use crate::sailing::SegmentType;
use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Range;

/// Runs with fewer points are merged into their neighbours.
pub const MIN_SEGMENT_POINTS: usize = 5;

/// Speed statistics of a segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SpeedRange {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl SpeedRange {
    /// `avg/min/max unit`
    pub fn describe(&self, unit: Unit) -> String {
        format!(
            "{:.1}/{:.1}/{:.1} {}",
            self.avg,
            self.min,
            self.max,
            unit.speed_label()
        )
    }
}

/// Number of points in each mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModeCounts {
    pub moving: usize,
    pub turning: usize,
    #[serde(rename = "static")]
    pub stationary: usize,
}

impl ModeCounts {
    pub fn from_points(points: &[Point]) -> Self {
        points.iter().fold(Self::default(), |mut counts, p| {
            match p.mode {
                Mode::Moving => counts.moving += 1,
                Mode::Turning => counts.turning += 1,
                Mode::Static => counts.stationary += 1,
            }
            counts
        })
    }
}

/// A maximal run of points sharing one mode after short-run absorption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Indices of the segment's points in the owning point arena
    pub points: Range<usize>,
    pub mode: Mode,
    /// Heading range over the points matching `mode`
    pub heading: HeadingRange,
    /// Speed statistics over the points matching `mode`
    pub speed: SpeedRange,
    /// Sum of point distances
    pub distance: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(serialize_with = "serialize_seconds")]
    pub duration: Duration,
    pub counts: ModeCounts,
    /// Index of the previous segment cut from the same fix segment
    pub previous: Option<usize>,
    /// Index of the next segment cut from the same fix segment
    pub next: Option<usize>,
    /// Sailing classification, filled in by [`crate::Track::classify`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_type: Option<SegmentType>,
}

pub(crate) fn serialize_seconds<S: Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.num_milliseconds() as f64 / 1000.0)
}

impl Segment {
    /// Build a segment from `points[range]`. The range must not be empty.
    pub fn from_points(points: &[Point], range: Range<usize>, mode: Mode) -> Self {
        let run = &points[range.clone()];
        let start = run[0].fix.time;
        let end = run[run.len() - 1].fix.time;
        Self {
            points: range,
            mode,
            heading: heading_range(run, mode),
            speed: speed_range(run, mode),
            distance: run.iter().map(|p| p.distance).sum(),
            start,
            end,
            duration: end - start,
            counts: ModeCounts::from_points(run),
            previous: None,
            next: None,
            segment_type: None,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn mode_counts(&self) -> ModeCounts {
        self.counts
    }

    /// True if every point of the segment is moving.
    pub fn is_pure(&self) -> bool {
        self.counts.turning + self.counts.stationary == 0
    }

    /// Shift point and segment indices when moving into a larger arena.
    pub(crate) fn offset(&mut self, point_base: usize, segment_base: usize) {
        self.points = self.points.start + point_base..self.points.end + point_base;
        self.previous = self.previous.map(|i| i + segment_base);
        self.next = self.next.map(|i| i + segment_base);
    }

    /// e.g. `120m/30s @ 3.0/4.0/5.0 kts ↑ 40°/50° < 10° moving (M:10/T:0/S:0)`
    pub fn describe(&self, params: &AnalysisParameters) -> String {
        format!(
            "{:.0}{}/{:.0}s @ {:.1}/{:.1}/{:.1} {} \u{2191} {}\u{b0}/{}\u{b0} < {}\u{b0} {} (M:{}/T:{}/S:{})",
            self.distance,
            params.distance_unit.distance_label(),
            self.duration.num_milliseconds() as f64 / 1000.0,
            self.speed.min,
            self.speed.avg,
            self.speed.max,
            params.speed_unit.speed_label(),
            self.heading.min,
            self.heading.max,
            self.heading.variation,
            self.mode,
            self.counts.moving,
            self.counts.turning,
            self.counts.stationary
        )
    }

    pub fn describe_short(&self, params: &AnalysisParameters) -> String {
        format!(
            "{:.0}{}/{:.0}s @ {:.1}/{:.1}/{:.1} {} \u{2191} {}\u{b0}/{}\u{b0} {}",
            self.distance,
            params.distance_unit.distance_label(),
            self.duration.num_milliseconds() as f64 / 1000.0,
            self.speed.min,
            self.speed.avg,
            self.speed.max,
            params.speed_unit.speed_label(),
            self.heading.min,
            self.heading.max,
            self.mode
        )
    }

    /// Sailing classification label, or the mode when unclassified.
    pub fn type_label(&self) -> String {
        match &self.segment_type {
            Some(t) => t.describe(),
            None => self.mode.to_string(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} pts {}",
            self.start.format("%H:%M:%S"),
            self.len(),
            self.type_label()
        )
    }
}

/// Heading range of the points matching `mode`, widened clockwise or
/// counter-clockwise as consecutive headings drift outward.
fn heading_range(points: &[Point], mode: Mode) -> HeadingRange {
    let mut matching = points.iter().filter(|p| p.mode == mode);
    let Some(first) = matching.next().or(points.first()) else {
        return HeadingRange::new(0, 0);
    };
    let (mut prev, mut min, mut max) = (first.heading, first.heading, first.heading);
    for p in matching {
        let d = heading::diff(prev, p.heading);
        if d < 0 && heading::diff(p.heading, min) > 0 {
            min = p.heading;
        } else if d > 0 && heading::diff(p.heading, max) < 0 {
            max = p.heading;
        }
        prev = p.heading;
    }
    HeadingRange::new(min, max)
}

fn speed_range(points: &[Point], mode: Mode) -> SpeedRange {
    let speeds: Vec<f64> = points
        .iter()
        .filter(|p| p.mode == mode)
        .map(|p| p.speed)
        .collect();
    if speeds.is_empty() {
        return SpeedRange::default();
    }
    let min = speeds.iter().copied().fold(f64::INFINITY, f64::min);
    let max = speeds.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // stray points count towards the average as standing still
    let avg = speeds.iter().sum::<f64>() / points.len() as f64;
    SpeedRange { min, avg, max }
}

/// Most frequent mode, ties going to the mode seen first.
pub fn majority_mode(points: &[Point]) -> Option<Mode> {
    let mut counts: Vec<(Mode, usize)> = Vec::with_capacity(3);
    for p in points {
        match counts.iter_mut().find(|(m, _)| *m == p.mode) {
            Some((_, n)) => *n += 1,
            None => counts.push((p.mode, 1)),
        }
    }
    counts
        .into_iter()
        .fold(None, |best: Option<(Mode, usize)>, (mode, n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((mode, n)),
        })
        .map(|(mode, _)| mode)
}

/// Split points into runs by mode.
///
/// A run of a single point is extended through the following run, keeping
/// the single point's mode, and a lone point left at the end is absorbed
/// into the last run.
pub fn runs(points: &[Point]) -> Vec<(Range<usize>, Mode)> {
    let mut result = Vec::new();
    let mut start = 0;
    while start < points.len() {
        let rest = &points[start..];
        let mode = rest[0].mode;
        let run_end = |from: usize, m: Mode| {
            (from..rest.len())
                .find(|&i| rest[i].mode != m)
                .unwrap_or(rest.len())
        };
        let mut i = run_end(1, mode);
        if i == 1 && rest.len() > 1 {
            i = run_end(2, rest[1].mode);
        }
        if i + 1 == rest.len() {
            i += 1;
        }
        result.push((start..start + i, mode));
        start += i;
    }
    result
}

/// Cut classified points of one fix segment into segments.
///
/// Returned segments index `points` directly and are linked to each other.
pub fn build_segments(points: &[Point]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut short: Option<Range<usize>> = None;

    for (run, mut mode) in runs(points) {
        let carried = short.take();
        let carried_len = carried.as_ref().map_or(0, |s| s.len());
        let run = carried.map_or(run.start, |s| s.start)..run.end;
        if run.len() / 2 < carried_len {
            if let Some(m) = majority_mode(&points[run.clone()]) {
                mode = m;
            }
        }
        if run.len() < MIN_SEGMENT_POINTS {
            short = Some(run);
            continue;
        }
        segments.push(Segment::from_points(points, run, mode));
    }

    if let Some(stash) = short {
        match segments.pop() {
            Some(last) => {
                let range = last.points.start..stash.end;
                segments.push(Segment::from_points(points, range, last.mode));
            }
            None => {
                // the whole fix segment is shorter than one segment
                if let Some(mode) = majority_mode(&points[stash.clone()]) {
                    segments.push(Segment::from_points(points, stash, mode));
                }
            }
        }
    }

    let count = segments.len();
    for (i, s) in segments.iter_mut().enumerate() {
        s.previous = i.checked_sub(1);
        s.next = (i + 1 < count).then_some(i + 1);
    }
    segments
}
