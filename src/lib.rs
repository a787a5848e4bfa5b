//! # Sail Track
//!
//! GPS track segmentation and sailing maneuver classification.
//!
//! This library provides:
//! - Circular heading arithmetic, heading ranges and heading sets
//! - Per-fix kinematics and windowed Static / Moving / Turning classification
//! - Run-length segmentation with short-run absorption
//! - Point-of-sail and turn (tack, gybe, bear away, round up) classification
//! - Wind direction inference from the headings a boat could not hold
//!
//! ## Features
//!
//! - **`parallel`** - Analyze independent tracks concurrently with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use sailtrack::{AnalysisParameters, Fix, Track};
//!
//! let start = Utc.with_ymd_and_hms(2024, 8, 24, 19, 0, 0).unwrap();
//! // ~2.4 knots due north, one fix every 10 seconds
//! let fixes: Vec<Fix> = (0..20)
//!     .map(|i| Fix::new(44.0 + i as f64 * 0.0001, -76.9, start + Duration::seconds(i * 10)))
//!     .collect();
//!
//! let track = Track::analyze("demo", &[fixes], &AnalysisParameters::default()).unwrap();
//! assert_eq!(track.segments.len(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OptionExt, Result, TrackError};

// Units, tuning parameters and activity presets
pub mod config;
pub use config::{Activity, AnalysisParameters, Unit};

// Circular heading arithmetic, ranges and sets
pub mod heading;
pub use heading::{HeadingRange, HeadingSet};

// Planar projection of fixes, bounds
pub mod geo_utils;
pub use geo_utils::{Bounds, Projection};

// Per-point kinematics and motion classification
pub mod motion;
pub use motion::{Mode, Point};

// Runs of points sharing one mode
pub mod segments;
pub use segments::{Segment, SpeedRange};

// Points of sail and turns relative to the wind
pub mod sailing;
pub use sailing::{CompassPoint, PointOfSail, SegmentType, Tack, Turn, WindAttitude, WindDirection};

// Wind direction inference from heading coverage
pub mod wind;
pub use wind::infer_wind_direction;

// Track-level analysis driver
pub mod track;
#[cfg(feature = "parallel")]
pub use track::analyze_tracks_parallel;
pub use track::{Track, analyze_tracks};

// Dedupe, gap splitting and track assembly of raw fix segments
pub mod preprocess;
pub use preprocess::{FixSegment, TrackSource, build_tracks, dedupe_segments, sort_segments, split_segments};

// GPX documents to fix segments
pub mod gpx_io;

// Deterministic synthetic tracks for tests and benchmarks
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// One raw timestamped GPS position.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use sailtrack::Fix;
/// let fix = Fix::new(44.0893, -76.9064, Utc::now());
/// assert!(fix.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    pub time: DateTime<Utc>,
}

impl Fix {
    /// Create a new fix without elevation.
    pub fn new(latitude: f64, longitude: f64, time: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            time,
        }
    }

    /// Create a new fix with elevation.
    pub fn with_elevation(latitude: f64, longitude: f64, elevation: f64, time: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            elevation: Some(elevation),
            time,
        }
    }

    /// Check if the fix has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}
