//! Preparing raw fix segments for analysis.
//!
//! GPS loggers often record the same segment twice, write tiny segments
//! when switched on and off, and leave long pauses inside a segment. The
//! helpers here clean that up and regroup what's left into tracks:
//!
//! 1. [`sort_segments`] by start time
//! 2. [`dedupe_segments`] drops repeated and short segments
//! 3. [`split_segments`] splits at long pauses
//! 4. [`build_tracks`] groups segments that follow closely into tracks

use crate::Fix;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Consecutive fixes from one source segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixSegment {
    /// Name of the file or device the fixes came from
    pub source: String,
    pub fixes: Vec<Fix>,
}

impl FixSegment {
    pub fn new(source: impl Into<String>, fixes: Vec<Fix>) -> Self {
        Self {
            source: source.into(),
            fixes,
        }
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.fixes.first().map(|f| f.time)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.fixes.last().map(|f| f.time)
    }

    pub fn time_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start()?, self.end()?))
    }
}

impl AsRef<[Fix]> for FixSegment {
    fn as_ref(&self) -> &[Fix] {
        &self.fixes
    }
}

/// Fix segments that make up one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSource {
    /// Source name of the first segment
    pub name: String,
    pub segments: Vec<FixSegment>,
}

impl TrackSource {
    pub fn fix_count(&self) -> usize {
        self.segments.iter().map(FixSegment::len).sum()
    }
}

/// Sort segments by start time, empty segments last.
pub fn sort_segments(segments: &mut [FixSegment]) {
    segments.sort_by_key(|s| (s.start().is_none(), s.start()));
}

/// Drop segments with the same time bounds and fix count as their
/// predecessor, and segments with no more than `min_points` fixes.
///
/// The first segment is always kept. A short segment still serves as the
/// reference for the duplicate check of the one after it.
pub fn dedupe_segments(segments: Vec<FixSegment>, min_points: usize) -> Vec<FixSegment> {
    let total = segments.len();
    let mut iter = segments.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };
    let mut reference = (first.time_bounds(), first.len());
    let mut kept = vec![first];
    for segment in iter {
        let key = (segment.time_bounds(), segment.len());
        if key == reference {
            continue;
        }
        reference = key;
        if segment.len() > min_points {
            kept.push(segment);
        }
    }
    log::debug!("[Preprocess] Kept {} of {} segments", kept.len(), total);
    kept
}

/// Split segments wherever consecutive fixes are more than `limit` apart.
pub fn split_segments(segments: Vec<FixSegment>, limit: Duration) -> Vec<FixSegment> {
    let mut result = Vec::with_capacity(segments.len());
    for segment in segments {
        let FixSegment { source, fixes } = segment;
        let mut current: Vec<Fix> = Vec::new();
        for fix in fixes {
            if let Some(last) = current.last() {
                if (fix.time - last.time).abs() > limit {
                    result.push(FixSegment::new(source.clone(), std::mem::take(&mut current)));
                }
            }
            current.push(fix);
        }
        result.push(FixSegment::new(source, current));
    }
    result
}

/// Group time sorted segments into tracks. A new track starts when a
/// segment begins more than `limit` after the previous one ended.
///
/// Empty segments are ignored.
pub fn build_tracks(segments: Vec<FixSegment>, limit: Duration) -> Vec<TrackSource> {
    let mut tracks: Vec<TrackSource> = Vec::new();
    let mut previous_end: Option<DateTime<Utc>> = None;
    for segment in segments {
        let Some((start, end)) = segment.time_bounds() else {
            continue;
        };
        match (tracks.last_mut(), previous_end) {
            (Some(track), Some(prev)) if start - prev <= limit => track.segments.push(segment),
            _ => tracks.push(TrackSource {
                name: segment.source.clone(),
                segments: vec![segment],
            }),
        }
        previous_end = Some(end);
    }
    log::debug!("[Preprocess] Assembled {} tracks", tracks.len());
    tracks
}
