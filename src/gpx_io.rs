//! GPX input.
//!
//! Every track segment of a GPX document becomes one [`FixSegment`] tagged
//! with the source name. Waypoints without a timestamp can't contribute
//! speed and are skipped.

use crate::error::{Result, TrackError};
use crate::preprocess::FixSegment;
use crate::Fix;
use chrono::{DateTime, Utc};
use gpx::{Gpx, Waypoint};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Convert a GPX waypoint into a fix. `None` without a usable timestamp.
pub fn waypoint_to_fix(waypoint: &Waypoint) -> Option<Fix> {
    let iso = waypoint.time.as_ref()?.format().ok()?;
    let time = DateTime::parse_from_rfc3339(&iso).ok()?.with_timezone(&Utc);
    let point = waypoint.point();
    Some(Fix {
        latitude: point.y(),
        longitude: point.x(),
        elevation: waypoint.elevation,
        time,
    })
}

/// All track segments of a parsed document, in document order.
pub fn fix_segments(gpx: &Gpx, source: &str) -> Vec<FixSegment> {
    gpx.tracks
        .iter()
        .flat_map(|track| &track.segments)
        .map(|segment| {
            let fixes = segment.points.iter().filter_map(waypoint_to_fix).collect();
            FixSegment::new(source, fixes)
        })
        .collect()
}

/// Parse a GPX document from `reader`.
pub fn read_segments<R: Read>(reader: R, source: &str) -> Result<Vec<FixSegment>> {
    let gpx = gpx::read(reader).map_err(|e| TrackError::Read {
        source_name: source.to_string(),
        message: e.to_string(),
    })?;
    Ok(fix_segments(&gpx, source))
}

/// Parse a GPX file. Segments are named after the file name.
pub fn read_file(path: &Path) -> Result<Vec<FixSegment>> {
    let source = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();
    let file = File::open(path).map_err(|e| TrackError::Read {
        source_name: path.display().to_string(),
        message: e.to_string(),
    })?;
    let segments = read_segments(BufReader::new(file), &source)?;
    log::debug!("[Preprocess] Read {} segments from {}", segments.len(), source);
    Ok(segments)
}
