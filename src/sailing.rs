//! Sailing semantics: compass points, wind direction, points of sail and
//! turns.
//!
//! A point of sail is the boat heading relative to the direction the wind
//! blows from, bucketed into eight 45° sectors. A turn between two points of
//! sail is encoded in four bits:
//!
//! | bit | meaning              |
//! |-----|----------------------|
//! | 0   | from upwind          |
//! | 1   | from starboard tack  |
//! | 2   | to upwind            |
//! | 3   | to starboard tack    |
//!
//! Beam attitude and unknown tack are ambiguous, so both values of the
//! corresponding bit are tried. Candidates are evaluated in generation
//! order and the first code found in the turn table wins.

use crate::error::{Result, TrackError};
use crate::heading;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Compass
// ============================================================================

/// 16-point compass rose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

const COMPASS: [CompassPoint; 16] = [
    CompassPoint::N,
    CompassPoint::NNE,
    CompassPoint::NE,
    CompassPoint::ENE,
    CompassPoint::E,
    CompassPoint::ESE,
    CompassPoint::SE,
    CompassPoint::SSE,
    CompassPoint::S,
    CompassPoint::SSW,
    CompassPoint::SW,
    CompassPoint::WSW,
    CompassPoint::W,
    CompassPoint::WNW,
    CompassPoint::NW,
    CompassPoint::NNW,
];

impl CompassPoint {
    /// All points clockwise from north.
    pub fn all() -> &'static [CompassPoint; 16] {
        &COMPASS
    }

    /// Nearest compass point to `heading`.
    pub fn from_heading(heading: i32) -> Self {
        let h = heading.rem_euclid(360);
        // floor((h + 11.25) / 22.5)
        COMPASS[((4 * h + 45) / 90) as usize % 16]
    }

    /// Heading of the point in whole degrees.
    pub fn degrees(&self) -> i32 {
        match self {
            CompassPoint::N => 0,
            CompassPoint::NNE => 23,
            CompassPoint::NE => 45,
            CompassPoint::ENE => 68,
            CompassPoint::E => 90,
            CompassPoint::ESE => 113,
            CompassPoint::SE => 135,
            CompassPoint::SSE => 158,
            CompassPoint::S => 180,
            CompassPoint::SSW => 203,
            CompassPoint::SW => 225,
            CompassPoint::WSW => 248,
            CompassPoint::W => 270,
            CompassPoint::WNW => 293,
            CompassPoint::NW => 315,
            CompassPoint::NNW => 338,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "NNE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "ENE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "ESE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "SSE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "SSW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "WSW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "WNW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "NNW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompassPoint {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        COMPASS
            .iter()
            .copied()
            .find(|c| c.as_str() == upper)
            .ok_or_else(|| TrackError::UnknownWindDirection(s.to_string()))
    }
}

// ============================================================================
// Wind
// ============================================================================

/// Direction the wind blows from, in whole degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindDirection(i32);

/// Accepted in place of a wind direction to request inference.
pub const UNKNOWN_WIND: &str = "UNK";

impl WindDirection {
    /// Wind from `degrees`, normalized into `[0, 360)`.
    pub fn new(degrees: i32) -> Self {
        Self(degrees.rem_euclid(360))
    }

    pub fn degrees(&self) -> i32 {
        self.0
    }

    pub fn compass(&self) -> CompassPoint {
        CompassPoint::from_heading(self.0)
    }

    /// Parse a wind setting where [`UNKNOWN_WIND`] yields `None`.
    pub fn parse_or_unknown(s: &str) -> Result<Option<Self>> {
        if s.trim().eq_ignore_ascii_case(UNKNOWN_WIND) {
            return Ok(None);
        }
        s.parse().map(Some)
    }

    /// Point of sail of a boat holding `heading` in this wind.
    pub fn point_of_sail(&self, heading: i32) -> PointOfSail {
        PointOfSail::from_relative_heading(heading::add(heading, -self.0))
    }

    /// Classify the transition between two points of sail.
    pub fn turn(&self, from: PointOfSail, to: PointOfSail) -> Turn {
        Turn::between(from, to)
    }
}

impl From<CompassPoint> for WindDirection {
    fn from(c: CompassPoint) -> Self {
        Self(c.degrees())
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.compass())
    }
}

impl FromStr for WindDirection {
    type Err = TrackError;

    /// Accepts compass names (`NNE`) or whole degrees `0..=359`.
    fn from_str(s: &str) -> Result<Self> {
        if let Ok(c) = s.parse::<CompassPoint>() {
            return Ok(c.into());
        }
        match s.trim().parse::<i32>() {
            Ok(d) if (0..360).contains(&d) => Ok(Self(d)),
            _ => Err(TrackError::UnknownWindDirection(s.to_string())),
        }
    }
}

// ============================================================================
// Points of sail
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tack {
    Port,
    Starboard,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindAttitude {
    Upwind,
    Beam,
    Downwind,
}

/// Boat heading relative to the wind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointOfSail {
    Irons,
    ClosePort,
    BeamPort,
    BroadPort,
    Run,
    BroadStarboard,
    BeamStarboard,
    CloseStarboard,
}

/// Sectors clockwise from head to wind.
const POINTS_OF_SAIL: [PointOfSail; 8] = [
    PointOfSail::Irons,
    PointOfSail::ClosePort,
    PointOfSail::BeamPort,
    PointOfSail::BroadPort,
    PointOfSail::Run,
    PointOfSail::BroadStarboard,
    PointOfSail::BeamStarboard,
    PointOfSail::CloseStarboard,
];

impl PointOfSail {
    /// Sector containing `relative`, a heading measured from the wind.
    pub fn from_relative_heading(relative: i32) -> Self {
        let h = relative.rem_euclid(360);
        // floor((h + 22.5) / 45)
        POINTS_OF_SAIL[((2 * h + 45) / 90) as usize % 8]
    }

    /// Sector center assuming wind from north.
    pub fn nominal_heading(&self) -> i32 {
        match self {
            PointOfSail::Irons => 0,
            PointOfSail::ClosePort => 45,
            PointOfSail::BeamPort => 90,
            PointOfSail::BroadPort => 135,
            PointOfSail::Run => 180,
            PointOfSail::BroadStarboard => 225,
            PointOfSail::BeamStarboard => 270,
            PointOfSail::CloseStarboard => 315,
        }
    }

    pub fn tack(&self) -> Tack {
        match self {
            PointOfSail::Irons | PointOfSail::Run => Tack::Unknown,
            PointOfSail::ClosePort | PointOfSail::BeamPort | PointOfSail::BroadPort => Tack::Port,
            PointOfSail::BroadStarboard
            | PointOfSail::BeamStarboard
            | PointOfSail::CloseStarboard => Tack::Starboard,
        }
    }

    pub fn attitude(&self) -> WindAttitude {
        match self {
            PointOfSail::Irons | PointOfSail::ClosePort | PointOfSail::CloseStarboard => {
                WindAttitude::Upwind
            }
            PointOfSail::BeamPort | PointOfSail::BeamStarboard => WindAttitude::Beam,
            PointOfSail::BroadPort
            | PointOfSail::Run
            | PointOfSail::BroadStarboard => WindAttitude::Downwind,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PointOfSail::Irons => "parked",
            PointOfSail::ClosePort => "close reach port",
            PointOfSail::BeamPort => "beam reach port",
            PointOfSail::BroadPort => "broad reach port",
            PointOfSail::Run => "downwind run",
            PointOfSail::BroadStarboard => "broad reach starboard",
            PointOfSail::BeamStarboard => "beam reach starboard",
            PointOfSail::CloseStarboard => "close reach starboard",
        }
    }
}

impl fmt::Display for PointOfSail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Turns
// ============================================================================

/// A maneuver between two points of sail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    BearAwayPort,
    BearAwayStarboard,
    RoundUpPort,
    RoundUpStarboard,
    TackPortToStarboard,
    TackStarboardToPort,
    GybePortToStarboard,
    GybeStarboardToPort,
    /// No maneuver: the point of sail didn't change or the boat is stopped
    Drifting,
    /// No candidate code matched a known turn
    Unknown,
}

const FROM_UPWIND: u8 = 1;
const FROM_STARBOARD: u8 = 2;
const TO_UPWIND: u8 = 4;
const TO_STARBOARD: u8 = 8;

/// Known turns indexed by their 4-bit code.
const TURN_TABLE: [Option<Turn>; 16] = [
    None,                            // 0
    Some(Turn::BearAwayPort),        // 1
    Some(Turn::GybeStarboardToPort), // 2
    None,                            // 3
    Some(Turn::RoundUpPort),         // 4
    None,                            // 5
    None,                            // 6
    Some(Turn::TackStarboardToPort), // 7
    Some(Turn::GybePortToStarboard), // 8
    None,                            // 9
    None,                            // 10
    Some(Turn::BearAwayStarboard),   // 11
    None,                            // 12
    Some(Turn::TackPortToStarboard), // 13
    Some(Turn::RoundUpStarboard),    // 14
    None,                            // 15
];

impl Turn {
    /// Turn table code, `None` for drifting and unknown.
    pub fn code(&self) -> Option<u8> {
        TURN_TABLE
            .iter()
            .position(|t| *t == Some(*self))
            .map(|i| i as u8)
    }

    pub fn from_code(code: u8) -> Option<Turn> {
        TURN_TABLE.get(code as usize).copied().flatten()
    }

    /// Classify the turn from one point of sail to another.
    pub fn between(from: PointOfSail, to: PointOfSail) -> Turn {
        if from == to {
            return Turn::Drifting;
        }
        candidate_codes(from, to)
            .into_iter()
            .find_map(Turn::from_code)
            .unwrap_or(Turn::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Turn::BearAwayPort => "bear away port",
            Turn::BearAwayStarboard => "bear away starboard",
            Turn::RoundUpPort => "round up port",
            Turn::RoundUpStarboard => "round up starboard",
            Turn::TackPortToStarboard => "tack port to starboard",
            Turn::TackStarboardToPort => "tack starboard to port",
            Turn::GybePortToStarboard => "gybe port to starboard",
            Turn::GybeStarboardToPort => "gybe starboard to port",
            Turn::Drifting => "drifting",
            Turn::Unknown => "unknown turn",
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_upwind(attitude: WindAttitude) -> Option<bool> {
    match attitude {
        WindAttitude::Upwind => Some(true),
        WindAttitude::Downwind => Some(false),
        WindAttitude::Beam => None,
    }
}

fn is_starboard(tack: Tack) -> Option<bool> {
    match tack {
        Tack::Starboard => Some(true),
        Tack::Port => Some(false),
        Tack::Unknown => None,
    }
}

/// Candidate turn codes in evaluation order.
///
/// Bits are applied from bit 0 upward. An ambiguous bit splits every
/// candidate `c` into `c` followed by `c | bit`.
pub fn candidate_codes(from: PointOfSail, to: PointOfSail) -> Vec<u8> {
    let bits = [
        (FROM_UPWIND, is_upwind(from.attitude())),
        (FROM_STARBOARD, is_starboard(from.tack())),
        (TO_UPWIND, is_upwind(to.attitude())),
        (TO_STARBOARD, is_starboard(to.tack())),
    ];
    let mut codes = vec![0u8];
    for (bit, value) in bits {
        match value {
            Some(true) => codes.iter_mut().for_each(|c| *c |= bit),
            Some(false) => {}
            None => codes = codes.into_iter().flat_map(|c| [c, c | bit]).collect(),
        }
    }
    codes
}

// ============================================================================
// Segment type
// ============================================================================

/// Sailing classification of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentType {
    PointOfSail {
        point_of_sail: PointOfSail,
        wind: WindDirection,
    },
    Turn {
        turn: Turn,
        wind: WindDirection,
    },
}

impl SegmentType {
    pub fn wind(&self) -> WindDirection {
        match self {
            SegmentType::PointOfSail { wind, .. } | SegmentType::Turn { wind, .. } => *wind,
        }
    }

    /// e.g. `tack starboard to port N` or `beam reach port NE`
    pub fn describe(&self) -> String {
        match self {
            SegmentType::PointOfSail {
                point_of_sail,
                wind,
            } => format!("{} {}", point_of_sail, wind),
            SegmentType::Turn { turn, wind } => format!("{} {}", turn, wind),
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
