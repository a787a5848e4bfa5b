//! Wind direction inference.
//!
//! A sailboat can't hold headings close to the wind, so on a track with
//! enough straight sailing the widest gap in the observed headings points
//! into the wind.

use crate::config::AnalysisParameters;
use crate::heading::{HeadingRange, HeadingSet};
use crate::motion::Mode;
use crate::sailing::WindDirection;
use crate::segments::Segment;

/// Gaps narrower than this are not considered no-go zones.
pub const MIN_NO_GO_WIDTH: i32 = 60;

/// Headings covered by steady, reasonably fast straight segments.
pub fn sailed_headings(segments: &[Segment], params: &AnalysisParameters) -> HeadingSet {
    segments
        .iter()
        .filter(|s| s.mode == Mode::Moving && s.is_pure())
        .filter(|s| s.speed.min >= 2.0 * params.moving_speed)
        .map(|s| s.heading)
        .collect()
}

/// Candidate no-go zones, widest first.
pub fn no_go_zones(headings: &HeadingSet) -> Vec<HeadingRange> {
    let mut gaps: Vec<HeadingRange> = headings
        .inverse()
        .iter()
        .filter(|g| g.variation > MIN_NO_GO_WIDTH)
        .copied()
        .collect();
    gaps.sort_by(|a, b| b.variation.cmp(&a.variation));
    gaps
}

/// Infer the wind direction from the gaps in sailed headings.
///
/// Prefers the widest gap containing `default`, otherwise the widest gap.
/// Falls back to `default` when no gap qualifies; `None` means unknown.
pub fn infer_wind_direction(
    segments: &[Segment],
    params: &AnalysisParameters,
    default: Option<WindDirection>,
) -> Option<WindDirection> {
    let headings = sailed_headings(segments, params);
    if headings.is_empty() {
        log::debug!("[Wind] No steady segments to infer wind from");
        return default;
    }
    let candidates = no_go_zones(&headings);
    log::debug!(
        "[Wind] Sailed headings {} leave {} candidate gaps",
        headings,
        candidates.len()
    );

    let chosen = default
        .and_then(|d| candidates.iter().find(|c| c.includes(d.degrees())))
        .or_else(|| candidates.first());

    match chosen {
        Some(gap) => {
            let wind = WindDirection::new(gap.mid);
            log::info!("[Wind] Inferred wind from {} ({}\u{b0}) gap {}", wind, gap.mid, gap);
            Some(wind)
        }
        None => default,
    }
}
