//! Field construction errors.

use std::error::Error;
use std::fmt;

use slime_core::ConfigError;

/// Errors from building grids and guide maps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// Resolution is zero.
    ZeroResolution,
    /// `resolution^2` exceeds `u32::MAX` cells.
    TooLarge {
        /// The requested resolution.
        resolution: u32,
    },
    /// Supplied data does not have `resolution^2` elements.
    LengthMismatch {
        /// Required element count.
        expected: usize,
        /// Supplied element count.
        actual: usize,
    },
    /// A guide map entry is NaN or infinite.
    NonFiniteGuide {
        /// Which guide map.
        guide: &'static str,
        /// Flat index of the first bad entry.
        index: usize,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroResolution => write!(f, "resolution must be at least 1"),
            Self::TooLarge { resolution } => {
                write!(f, "resolution {resolution} squared exceeds u32::MAX cells")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} elements, got {actual}")
            }
            Self::NonFiniteGuide { guide, index } => {
                write!(f, "{guide} map entry {index} is not finite")
            }
        }
    }
}

impl Error for FieldError {}

impl From<FieldError> for ConfigError {
    fn from(e: FieldError) -> Self {
        match e {
            FieldError::ZeroResolution => ConfigError::ZeroResolution,
            FieldError::TooLarge { resolution } => ConfigError::ResolutionOverflow { resolution },
            FieldError::LengthMismatch { .. } | FieldError::NonFiniteGuide { .. } => {
                ConfigError::InvalidParameter {
                    reason: e.to_string(),
                }
            }
        }
    }
}
