//! Error types for track analysis.
//!
//! Configuration problems are reported when parameters are built or parsed,
//! never from inside the analysis pass. Ambiguous sailing classifications are
//! not errors; they surface as [`crate::Turn::Unknown`].

use thiserror::Error;

/// Errors produced by the analysis crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("unknown unit: {0} (expected one of m, km, nm)")]
    UnknownUnit(String),

    #[error("unknown wind direction: {0} (expected a compass point such as N or SSW, UNK, or degrees 0-359)")]
    UnknownWindDirection(String),

    #[error("{name} is not a recognized activity type, known activities are: {}", known.join(", "))]
    UnknownActivity { name: String, known: Vec<String> },

    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("failed to read {source_name}: {message}")]
    Read { source_name: String, message: String },

    #[error("segment {segment_index} has {point_count} points, at least {minimum_required} required")]
    InsufficientPoints {
        segment_index: usize,
        point_count: usize,
        minimum_required: usize,
    },
}

pub type Result<T> = std::result::Result<T, TrackError>;

/// Convert an `Option` into an [`TrackError::InsufficientPoints`] error.
pub trait OptionExt<T> {
    fn ok_or_insufficient_points(
        self,
        segment_index: usize,
        point_count: usize,
        minimum_required: usize,
    ) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_insufficient_points(
        self,
        segment_index: usize,
        point_count: usize,
        minimum_required: usize,
    ) -> Result<T> {
        self.ok_or(TrackError::InsufficientPoints {
            segment_index,
            point_count,
            minimum_required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_activity_lists_known() {
        let err = TrackError::UnknownActivity {
            name: "kite".to_string(),
            known: vec!["sail".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "kite is not a recognized activity type, known activities are: sail"
        );
    }
}
