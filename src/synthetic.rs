//! Synthetic sailing tracks for testing and benchmarking.
//!
//! A scenario is a list of legs (straight sailing, turns, stops) sampled at a
//! fixed interval, with optional Gaussian GPS noise. Generation is seeded so
//! the same scenario always yields the same fixes.
//!
//! # Example
//!
//! ```rust
//! use sailtrack::synthetic::SyntheticScenario;
//!
//! let scenario = SyntheticScenario::round_the_buoys(0.0, 7);
//! let track = scenario.generate();
//! assert_eq!(track.legs.len(), scenario.legs.len());
//! assert!(track.fixes.len() > 300);
//! ```

use crate::Fix;
use crate::heading;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::ops::Range;

// ============================================================================
// Types
// ============================================================================

/// One piece of a synthetic outing. Headings are compass degrees and speeds
/// are knots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Leg {
    /// Hold a heading.
    Straight { heading: f64, speed: f64, seconds: f64 },
    /// Turn at a constant rate onto a heading, the shorter way round.
    Turn { heading: f64, speed: f64, seconds: f64 },
    /// Stay put.
    Stop { seconds: f64 },
}

impl Leg {
    pub fn seconds(&self) -> f64 {
        match self {
            Leg::Straight { seconds, .. } | Leg::Turn { seconds, .. } | Leg::Stop { seconds } => {
                *seconds
            }
        }
    }
}

/// Scenario configuration for generating a synthetic track.
#[derive(Debug, Clone)]
pub struct SyntheticScenario {
    /// Starting position (latitude, longitude).
    pub origin: (f64, f64),
    /// Time of the first fix.
    pub start: DateTime<Utc>,
    /// Seconds between fixes.
    pub fix_interval: f64,
    /// Heading before the first leg, used by a leading turn.
    pub initial_heading: f64,
    pub legs: Vec<Leg>,
    /// GPS noise standard deviation in meters.
    pub gps_noise_sigma_meters: f64,
    /// RNG seed for deterministic reproduction.
    pub seed: u64,
}

/// Generated fixes with the fix range produced by each leg.
#[derive(Debug, Clone)]
pub struct SyntheticTrack {
    pub fixes: Vec<Fix>,
    pub legs: Vec<Range<usize>>,
}

// ============================================================================
// Coordinate Helpers
// ============================================================================

/// Meters per degree of latitude (approximately constant).
const METERS_PER_DEG_LAT: f64 = 111_320.0;

const METERS_PER_SECOND_PER_KNOT: f64 = 1852.0 / 3600.0;

fn meters_to_deg_lat(meters: f64) -> f64 {
    meters / METERS_PER_DEG_LAT
}

fn meters_to_deg_lng(meters: f64, latitude: f64) -> f64 {
    let meters_per_deg_lng = METERS_PER_DEG_LAT * latitude.to_radians().cos();
    if meters_per_deg_lng.abs() < 1e-10 {
        return 0.0;
    }
    meters / meters_per_deg_lng
}

/// Gaussian offset (north, east) in meters, Box-Muller.
fn gps_noise(sigma_meters: f64, rng: &mut StdRng) -> (f64, f64) {
    if sigma_meters <= 0.0 {
        return (0.0, 0.0);
    }
    let u1: f64 = rng.gen_range(0.0001..1.0);
    let u2: f64 = rng.r#gen();
    let r = (-2.0 * u1.ln()).sqrt() * sigma_meters;
    (r * (2.0 * PI * u2).cos(), r * (2.0 * PI * u2).sin())
}

// ============================================================================
// Generation
// ============================================================================

struct Cursor {
    latitude: f64,
    longitude: f64,
    heading: f64,
    time: DateTime<Utc>,
}

impl SyntheticScenario {
    /// Generate the fixes of this scenario.
    pub fn generate(&self) -> SyntheticTrack {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let step = Duration::milliseconds((self.fix_interval * 1000.0).round() as i64);
        let mut cursor = Cursor {
            latitude: self.origin.0,
            longitude: self.origin.1,
            heading: self.initial_heading,
            time: self.start,
        };
        let mut fixes = vec![self.fix(&cursor, &mut rng)];
        let mut legs = Vec::with_capacity(self.legs.len());

        for leg in &self.legs {
            let first = fixes.len();
            let steps = (leg.seconds() / self.fix_interval).round().max(1.0) as usize;
            let (speed, turn_per_step) = match *leg {
                Leg::Straight { heading, speed, .. } => {
                    cursor.heading = heading;
                    (speed, 0.0)
                }
                Leg::Turn { heading, speed, .. } => {
                    let delta = heading::diff(cursor.heading.round() as i32, heading.round() as i32);
                    (speed, delta as f64 / steps as f64)
                }
                Leg::Stop { .. } => (0.0, 0.0),
            };
            let meters = speed * METERS_PER_SECOND_PER_KNOT * self.fix_interval;
            for _ in 0..steps {
                cursor.heading = (cursor.heading + turn_per_step).rem_euclid(360.0);
                let h = cursor.heading.to_radians();
                cursor.latitude += meters_to_deg_lat(meters * h.cos());
                cursor.longitude += meters_to_deg_lng(meters * h.sin(), cursor.latitude);
                cursor.time += step;
                fixes.push(self.fix(&cursor, &mut rng));
            }
            legs.push(first..fixes.len());
        }

        SyntheticTrack { fixes, legs }
    }

    fn fix(&self, cursor: &Cursor, rng: &mut StdRng) -> Fix {
        let (north, east) = gps_noise(self.gps_noise_sigma_meters, rng);
        Fix::new(
            cursor.latitude + meters_to_deg_lat(north),
            cursor.longitude + meters_to_deg_lng(east, cursor.latitude),
            cursor.time,
        )
    }
}

// ============================================================================
// Predefined Scenarios
// ============================================================================

/// Kingston harbour, Lake Ontario.
const KINGSTON: (f64, f64) = (44.2253, -76.4951);

/// 2024-08-24 18:00:00 UTC
const START_SECONDS: i64 = 1_724_522_400;

impl SyntheticScenario {
    fn base(legs: Vec<Leg>, seed: u64) -> Self {
        Self {
            origin: KINGSTON,
            start: DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(START_SECONDS),
            fix_interval: 2.0,
            initial_heading: 0.0,
            legs,
            gps_noise_sigma_meters: 0.0,
            seed,
        }
    }

    /// A lap around the wind from `wind` degrees: beat on port, tack, bear
    /// away to a starboard broad reach, gybe, round up to close hauled on
    /// port and stop. Straight legs last two minutes, turns twenty seconds.
    pub fn round_the_buoys(wind: f64, seed: u64) -> Self {
        let at = |offset: f64| (wind + offset).rem_euclid(360.0);
        let straight = |offset: f64| Leg::Straight {
            heading: at(offset),
            speed: 5.0,
            seconds: 120.0,
        };
        let turn = |offset: f64| Leg::Turn {
            heading: at(offset),
            speed: 4.0,
            seconds: 20.0,
        };
        let legs = vec![
            straight(50.0),
            turn(-50.0),
            straight(-50.0),
            turn(-135.0),
            straight(-135.0),
            turn(135.0),
            straight(135.0),
            turn(50.0),
            straight(50.0),
            Leg::Stop { seconds: 30.0 },
        ];
        let mut scenario = Self::base(legs, seed);
        scenario.initial_heading = at(50.0);
        scenario
    }

    /// Repeated tacks upwind, for benchmarks.
    pub fn long_beat(wind: f64, tacks: usize, seed: u64) -> Self {
        let mut legs = Vec::with_capacity(tacks * 2 + 1);
        let mut side = 50.0;
        legs.push(Leg::Straight {
            heading: (wind + side).rem_euclid(360.0),
            speed: 5.5,
            seconds: 90.0,
        });
        for _ in 0..tacks {
            side = -side;
            legs.push(Leg::Turn {
                heading: (wind + side).rem_euclid(360.0),
                speed: 4.0,
                seconds: 20.0,
            });
            legs.push(Leg::Straight {
                heading: (wind + side).rem_euclid(360.0),
                speed: 5.5,
                seconds: 90.0,
            });
        }
        let mut scenario = Self::base(legs, seed);
        scenario.initial_heading = (wind + 50.0).rem_euclid(360.0);
        scenario.gps_noise_sigma_meters = 1.5;
        scenario
    }
}

// ============================================================================
// Tests
// ============================================================================
