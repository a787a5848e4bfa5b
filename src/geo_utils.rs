//! Geographic utilities: planar projection of fixes, bounds and extents.
//!
//! Distances use an equirectangular approximation with a single longitude
//! scaling factor derived from the mid-latitude of the whole track. This is
//! not a great-circle distance but is accurate enough at track scale.

use crate::Fix;
use crate::config::Unit;
use geo::{BoundingRect, Coord, LineString};
use serde::{Deserialize, Serialize};

/// Bounding box of a set of fixes, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Bounds of the fixes, `None` for an empty slice.
    pub fn from_fixes<'a, I>(fixes: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Fix>,
    {
        let line: LineString<f64> = fixes
            .into_iter()
            .map(|f| Coord {
                x: f.longitude,
                y: f.latitude,
            })
            .collect();
        let rect = line.bounding_rect()?;
        Some(Self {
            min_lat: rect.min().y,
            max_lat: rect.max().y,
            min_lng: rect.min().x,
            max_lng: rect.max().x,
        })
    }

    /// Longitude scaling factor at the mid-latitude of the bounds.
    pub fn longitude_coefficient(&self) -> f64 {
        ((self.max_lat + self.min_lat) / 2.0).to_radians().cos()
    }

    /// Width and height of the bounds in `unit`. Width is the north-south
    /// span and height the east-west span.
    pub fn extent(&self, unit: Unit) -> (f64, f64) {
        let coef = self.longitude_coefficient();
        let width = (self.max_lat - self.min_lat) * unit.per_degree();
        let height = (self.max_lng - self.min_lng) * coef * unit.per_degree();
        (width, height)
    }
}

/// Planar projection used to derive per-fix kinematics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    coef: f64,
}

impl Projection {
    pub fn new(bounds: &Bounds) -> Self {
        Self {
            coef: bounds.longitude_coefficient(),
        }
    }

    fn deltas(&self, p1: &Fix, p2: &Fix) -> (f64, f64) {
        let lat = p2.latitude - p1.latitude;
        let lng = (p2.longitude - p1.longitude) * self.coef;
        (lat, lng)
    }

    /// Distance between two fixes in `unit`.
    pub fn distance(&self, p1: &Fix, p2: &Fix, unit: Unit) -> f64 {
        let (x, y) = self.deltas(p1, p2);
        unit.per_degree() * (x * x + y * y).sqrt()
    }

    /// Average speed between two fixes, with the time base implied by
    /// `unit` (m/s, km/h, kts). Zero when no time elapsed.
    pub fn speed(&self, p1: &Fix, p2: &Fix, unit: Unit) -> f64 {
        let elapsed = (p2.time - p1.time)
            .num_nanoseconds()
            .map(|ns| ns as f64 / 1e9)
            .unwrap_or_else(|| (p2.time - p1.time).num_seconds() as f64);
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.distance(p1, p2, unit) / (elapsed / unit.seconds_per_time_unit())
    }

    /// Compass heading from `p1` to `p2`, rounded to whole degrees.
    pub fn heading(&self, p1: &Fix, p2: &Fix) -> i32 {
        let (lat, lng) = self.deltas(p1, p2);
        let deg = lng.atan2(lat).to_degrees().round() as i32;
        if deg < 0 { 360 + deg } else { deg }
    }
}
