//! Analysis configuration: measurement units, tuning parameters and
//! activity presets.
//!
//! All distance values produced by the analysis are in
//! [`AnalysisParameters::distance_unit`]; speeds are in
//! [`AnalysisParameters::speed_unit`] with the time base implied by the unit
//! (m/s, km/h, knots).

use crate::error::{Result, TrackError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Equatorial radius used to derive unit lengths, in kilometers.
pub const EQUATORIAL_RADIUS_KM: f64 = 6378.0;

/// Distance unit. Each unit is expressed as the length of one degree of
/// longitude at the equator, so that `degrees * unit.per_degree()` yields a
/// distance in that unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[serde(alias = "m")]
    Meter,
    #[serde(rename = "km")]
    Kilometer,
    #[serde(rename = "nm")]
    NauticalMile,
}

impl Unit {
    /// Length of one degree of longitude at the equator in this unit.
    pub fn per_degree(&self) -> f64 {
        match self {
            Unit::Kilometer => 2.0 * PI * EQUATORIAL_RADIUS_KM / 360.0,
            Unit::Meter => 1000.0 * 2.0 * PI * EQUATORIAL_RADIUS_KM / 360.0,
            Unit::NauticalMile => 60.0,
        }
    }

    pub fn distance_label(&self) -> &'static str {
        match self {
            Unit::Meter => "m",
            Unit::Kilometer => "km",
            Unit::NauticalMile => "nm",
        }
    }

    pub fn speed_label(&self) -> &'static str {
        match self {
            Unit::Meter => "m/s",
            Unit::Kilometer => "km/h",
            Unit::NauticalMile => "kts",
        }
    }

    /// Seconds in the time base implied by the unit's speed (m/s vs km/h, kts).
    pub fn seconds_per_time_unit(&self) -> f64 {
        match self {
            Unit::Meter => 1.0,
            Unit::Kilometer | Unit::NauticalMile => 3600.0,
        }
    }

    /// Convert distance `d` expressed in `from` units into this unit.
    pub fn convert_distance(&self, d: f64, from: Unit) -> f64 {
        d * self.per_degree() / from.per_degree()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.distance_label())
    }
}

impl FromStr for Unit {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" => Ok(Unit::Meter),
            "km" => Ok(Unit::Kilometer),
            "nm" => Ok(Unit::NauticalMile),
            _ => Err(TrackError::UnknownUnit(s.to_string())),
        }
    }
}

/// Parameters that drive point classification and segment building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParameters {
    /// Unit of point distances and of `look_around`.
    pub distance_unit: Unit,
    /// Unit for longer distances such as the total track length.
    pub long_distance_unit: Unit,
    /// Unit of point speeds and of `moving_speed`.
    pub speed_unit: Unit,
    /// How far back and ahead to look when estimating a point's heading
    /// change (in `distance_unit`).
    pub look_around: f64,
    /// Minimum speed to be considered moving rather than static
    /// (in `speed_unit`).
    pub moving_speed: f64,
    /// Minimum accumulated heading change (degrees) for a point to be
    /// considered part of a turn.
    pub turning_change: i32,
}

impl AnalysisParameters {
    /// Build a validated parameter set.
    pub fn new(
        distance_unit: Unit,
        long_distance_unit: Unit,
        speed_unit: Unit,
        look_around: f64,
        moving_speed: f64,
        turning_change: i32,
    ) -> Result<Self> {
        let params = Self {
            distance_unit,
            long_distance_unit,
            speed_unit,
            look_around,
            moving_speed,
            turning_change,
        };
        params.validate()?;
        Ok(params)
    }

    /// Build a parameter set from unit names, e.g. `("m", "nm", "nm", ...)`.
    pub fn from_unit_names(
        distance_unit: &str,
        long_distance_unit: &str,
        speed_unit: &str,
        look_around: f64,
        moving_speed: f64,
        turning_change: i32,
    ) -> Result<Self> {
        Self::new(
            distance_unit.parse()?,
            long_distance_unit.parse()?,
            speed_unit.parse()?,
            look_around,
            moving_speed,
            turning_change,
        )
    }

    /// Check numeric fields. Deserialized parameters should be validated
    /// before use.
    pub fn validate(&self) -> Result<()> {
        if !self.look_around.is_finite() || self.look_around <= 0.0 {
            return Err(TrackError::InvalidParameter {
                name: "look_around",
                value: self.look_around,
            });
        }
        if !self.moving_speed.is_finite() || self.moving_speed < 0.0 {
            return Err(TrackError::InvalidParameter {
                name: "moving_speed",
                value: self.moving_speed,
            });
        }
        if !(1..=180).contains(&self.turning_change) {
            return Err(TrackError::InvalidParameter {
                name: "turning_change",
                value: self.turning_change as f64,
            });
        }
        Ok(())
    }

    /// Convert a distance in `distance_unit` into `long_distance_unit`.
    pub fn as_long_distance(&self, d: f64) -> f64 {
        self.long_distance_unit
            .convert_distance(d, self.distance_unit)
    }
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Activity::Sailing.parameters()
    }
}

/// Known activity presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Sailing,
}

const ACTIVITIES: [Activity; 1] = [Activity::Sailing];

impl Activity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Sailing => "sail",
        }
    }

    pub fn parameters(&self) -> AnalysisParameters {
        match self {
            Activity::Sailing => AnalysisParameters {
                distance_unit: Unit::Meter,
                long_distance_unit: Unit::NauticalMile,
                speed_unit: Unit::NauticalMile,
                look_around: 50.0,
                moving_speed: 1.0,
                turning_change: 60,
            },
        }
    }

    /// Names of all known activities, sorted.
    pub fn known() -> Vec<String> {
        let mut names: Vec<String> = ACTIVITIES.iter().map(|a| a.as_str().to_string()).collect();
        names.sort();
        names
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activity {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        ACTIVITIES
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| TrackError::UnknownActivity {
                name: s.to_string(),
                known: Activity::known(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_round_trip_names() {
        for unit in [Unit::Meter, Unit::Kilometer, Unit::NauticalMile] {
            assert_eq!(unit.distance_label().parse::<Unit>().unwrap(), unit);
        }
    }

    #[test]
    fn test_unit_conversion() {
        let km = Unit::Kilometer.convert_distance(1852.0, Unit::Meter);
        assert!((km - 1.852).abs() < 1e-9);
        // a nautical mile is a minute of arc
        let nm = Unit::NauticalMile.convert_distance(Unit::Meter.per_degree() / 60.0, Unit::Meter);
        assert!((nm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sailing_defaults_are_valid() {
        let params = AnalysisParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.speed_unit.speed_label(), "kts");
    }
}
