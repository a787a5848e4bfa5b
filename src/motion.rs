//! Point motion model.
//!
//! Each fix becomes a [`Point`] carrying the instantaneous speed, heading and
//! distance from its predecessor. Points are stored in a contiguous arena and
//! linked to their neighbours by index, so "previous" and "next" are plain
//! index lookups.
//!
//! Classification looks at the accumulated heading change within
//! `look_around` distance on both sides of a point:
//! 1. speed below `moving_speed` => [`Mode::Static`]
//! 2. |heading change| below `turning_change` => [`Mode::Moving`]
//! 3. otherwise => [`Mode::Turning`]
//!
//! Stillness always wins over apparent heading noise.

use crate::config::AnalysisParameters;
use crate::geo_utils::Projection;
use crate::heading;
use crate::sailing::CompassPoint;
use crate::Fix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Motion classification of a point or segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Static,
    Moving,
    Turning,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Static => "static",
            Mode::Moving => "moving",
            Mode::Turning => "turning",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fix with derived kinematics and its motion classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub fix: Fix,
    /// Arena index of the previous point on the same fix segment
    pub previous: Option<usize>,
    /// Arena index of the next point on the same fix segment
    pub next: Option<usize>,
    /// Speed from the previous fix
    pub speed: f64,
    /// Heading from the previous fix
    pub heading: i32,
    /// Distance from the previous fix
    pub distance: f64,
    /// Heading change accumulated within the look-around window
    pub heading_change: i32,
    pub mode: Mode,
}

impl Point {
    fn unlinked(fix: Fix) -> Self {
        Self {
            fix,
            previous: None,
            next: None,
            speed: 0.0,
            heading: 0,
            distance: 0.0,
            heading_change: 0,
            mode: Mode::Static,
        }
    }

    /// Shift neighbour links when the point is moved into a larger arena.
    pub(crate) fn offset(&mut self, base: usize) {
        self.previous = self.previous.map(|i| i + base);
        self.next = self.next.map(|i| i + base);
    }

    /// One line description, e.g. `12.3m @ 4.5 kts ↑ 45° NE < 3 (moving)`.
    pub fn describe(&self, params: &AnalysisParameters) -> String {
        format!(
            "{} < {} ({})",
            self.describe_short(params),
            self.heading_change,
            self.mode
        )
    }

    pub fn describe_short(&self, params: &AnalysisParameters) -> String {
        format!(
            "{:.1}{} @ {:.1} {} \u{2191} {}\u{b0} {}",
            self.distance,
            params.distance_unit.distance_label(),
            self.speed,
            params.speed_unit.speed_label(),
            self.heading,
            CompassPoint::from_heading(self.heading)
        )
    }
}

/// Build linked points for one fix segment with speed, heading and distance
/// from the previous fix.
///
/// The first point has no predecessor; its speed and heading are copied from
/// its successor so that the start of a segment isn't spuriously static.
pub fn build_points(fixes: &[Fix], projection: &Projection, params: &AnalysisParameters) -> Vec<Point> {
    let n = fixes.len();
    let mut points: Vec<Point> = fixes
        .iter()
        .enumerate()
        .map(|(i, fix)| {
            let mut p = Point::unlinked(*fix);
            p.previous = i.checked_sub(1);
            p.next = (i + 1 < n).then_some(i + 1);
            p
        })
        .collect();

    for (i, pair) in fixes.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        let p = &mut points[i + 1];
        p.heading = projection.heading(prev, next);
        p.distance = projection.distance(prev, next, params.distance_unit);
        p.speed = projection.speed(prev, next, params.speed_unit);
    }

    if n > 1 {
        points[0].speed = points[1].speed;
        points[0].heading = points[1].heading;
    }
    points
}

/// Accumulate signed heading deltas walking away from `start` until the
/// remaining `distance` is used up, the sequence ends, or a neighbour is
/// slower than `moving_speed`.
pub fn heading_change(
    points: &[Point],
    start: usize,
    mut change: i32,
    mut distance: f64,
    forward: bool,
    moving_speed: f64,
) -> i32 {
    let mut current = start;
    loop {
        let neighbour = if forward {
            points[current].next
        } else {
            points[current].previous
        };
        let Some(n) = neighbour else {
            return change;
        };
        let next = &points[n];
        if next.speed < moving_speed {
            return change;
        }
        change += heading::diff(points[current].heading, next.heading);
        distance -= next.distance;
        if distance <= 0.0 {
            return change;
        }
        current = n;
    }
}

/// Determine heading change and mode of every point.
pub fn classify_points(points: &mut [Point], params: &AnalysisParameters) {
    let results: Vec<(i32, Mode)> = (0..points.len())
        .map(|i| classify_point(points, i, params))
        .collect();
    for (p, (change, mode)) in points.iter_mut().zip(results) {
        p.heading_change = change;
        p.mode = mode;
    }
}

fn classify_point(points: &[Point], i: usize, params: &AnalysisParameters) -> (i32, Mode) {
    let p = &points[i];
    let (change, speed) = match (p.previous, p.next) {
        (None, Some(n)) => (
            heading_change(
                points,
                n,
                0,
                params.look_around - points[n].distance,
                true,
                params.moving_speed,
            ),
            points[n].speed,
        ),
        (None, None) => (0, p.speed),
        (Some(_), _) => (
            heading_change(points, i, 0, params.look_around, true, params.moving_speed)
                - heading_change(points, i, 0, params.look_around, false, params.moving_speed),
            p.speed,
        ),
    };

    let mode = if speed < params.moving_speed {
        Mode::Static
    } else if change.abs() < params.turning_change {
        Mode::Moving
    } else {
        Mode::Turning
    };
    (change, mode)
}

/// Build and classify the points of one fix segment.
pub fn analyze_fixes(fixes: &[Fix], projection: &Projection, params: &AnalysisParameters) -> Vec<Point> {
    let mut points = build_points(fixes, projection, params);
    classify_points(&mut points, params);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn straight(n: usize, step_deg: f64) -> Vec<Fix> {
        let start = Utc.with_ymd_and_hms(2024, 8, 24, 19, 0, 0).unwrap();
        (0..n)
            .map(|i| Fix::new(44.0 + i as f64 * step_deg, -76.9, start + Duration::seconds(i as i64 * 10)))
            .collect()
    }

    fn analyze(fixes: &[Fix]) -> Vec<Point> {
        let params = AnalysisParameters::default();
        let bounds = crate::geo_utils::Bounds::from_fixes(fixes).unwrap();
        analyze_fixes(fixes, &Projection::new(&bounds), &params)
    }

    #[test]
    fn test_first_point_copies_successor() {
        let points = analyze(&straight(5, 0.0001));
        assert_eq!(points[0].distance, 0.0);
        assert_eq!(points[0].speed, points[1].speed);
        assert_eq!(points[0].heading, points[1].heading);
        assert!(points.iter().all(|p| p.mode == Mode::Moving));
    }

    #[test]
    fn test_links_are_local() {
        let points = analyze(&straight(3, 0.0001));
        assert_eq!(points[0].previous, None);
        assert_eq!(points[1].previous, Some(0));
        assert_eq!(points[1].next, Some(2));
        assert_eq!(points[2].next, None);
    }

    #[test]
    fn test_stationary_points_are_static() {
        let points = analyze(&straight(4, 0.0));
        assert!(points.iter().all(|p| p.mode == Mode::Static));
        assert!(points.iter().all(|p| p.heading_change == 0));
    }
}
