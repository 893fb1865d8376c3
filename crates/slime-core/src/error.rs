//! Error types for the slime-mold simulation.
//!
//! Only [`ConfigError`] is fatal to the caller: it is returned when a
//! simulation is constructed from, or asked to adopt, an invalid
//! configuration. [`KernelError`] and [`StepError`] describe a failed tick,
//! which is rolled back before the error is returned. Conditions the
//! simulation recovers from on its own are reported as [`RemapWarning`]
//! values rather than errors.

use std::error::Error;
use std::fmt;

use crate::attribute::Attribute;

/// Invalid configuration detected at construction or on a settings edit.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The species count is zero.
    ZeroSpecies,
    /// The agent count is zero.
    ZeroAgents,
    /// The field resolution is zero.
    ZeroResolution,
    /// `resolution * resolution` does not fit in the cell index type.
    ResolutionOverflow {
        /// The configured resolution.
        resolution: u32,
    },
    /// A range has `max < min`.
    InvertedRange {
        /// The attribute the range belongs to.
        attribute: Attribute,
        /// Configured lower bound.
        min: f32,
        /// Configured upper bound.
        max: f32,
    },
    /// A range bound is NaN or infinite.
    NonFiniteRange {
        /// The attribute the range belongs to.
        attribute: Attribute,
    },
    /// A guide map does not cover the field.
    GuideDimensions {
        /// Which guide map.
        guide: &'static str,
        /// Field resolution.
        expected: u32,
        /// Resolution of the guide map.
        actual: u32,
    },
    /// Any other out-of-range scalar parameter.
    InvalidParameter {
        /// Description of the violated constraint.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSpecies => write!(f, "num_species must be at least 1"),
            Self::ZeroAgents => write!(f, "num_agents must be at least 1"),
            Self::ZeroResolution => write!(f, "resolution must be at least 1"),
            Self::ResolutionOverflow { resolution } => {
                write!(f, "resolution {resolution} squared exceeds u32::MAX cells")
            }
            Self::InvertedRange {
                attribute,
                min,
                max,
            } => write!(f, "{attribute} range is inverted: min {min} > max {max}"),
            Self::NonFiniteRange { attribute } => {
                write!(f, "{attribute} range has a non-finite bound")
            }
            Self::GuideDimensions {
                guide,
                expected,
                actual,
            } => write!(
                f,
                "{guide} map resolution {actual} does not match field resolution {expected}"
            ),
            Self::InvalidParameter { reason } => write!(f, "invalid parameter: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Errors from an individual kernel dispatch.
///
/// Returned by a kernel's `dispatch()` and wrapped in
/// [`StepError::KernelFailed`] by the stepper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KernelError {
    /// The kernel could not run with the buffers it was given.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A buffer holds a NaN or infinite value after the kernel ran.
    NonFinite {
        /// Name of the offending buffer.
        buffer: &'static str,
        /// Index of the first non-finite element.
        index: usize,
    },
    /// Two buffers that must agree in length do not.
    BufferMismatch {
        /// Expected element count.
        expected: usize,
        /// Actual element count.
        actual: usize,
    },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::NonFinite { buffer, index } => {
                write!(f, "non-finite value in {buffer} at index {index}")
            }
            Self::BufferMismatch { expected, actual } => {
                write!(f, "buffer length mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

impl Error for KernelError {}

/// Errors from the stepper during `step()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// A kernel failed; the tick was rolled back.
    KernelFailed {
        /// Name of the failing kernel.
        name: String,
        /// The underlying kernel error.
        reason: KernelError,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KernelFailed { name, reason } => {
                write!(f, "kernel '{name}' failed, tick rolled back: {reason}")
            }
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::KernelFailed { reason, .. } => Some(reason),
        }
    }
}

/// A recovered condition reported by the remapper.
#[derive(Clone, Debug, PartialEq)]
pub enum RemapWarning {
    /// The outgoing range had zero width, so every value was treated as
    /// sitting at its lower bound.
    DegenerateRange {
        /// The attribute whose outgoing range was degenerate.
        attribute: Attribute,
    },
    /// No baseline settings existed yet. The edit was adopted as the
    /// baseline and no species were touched.
    StaleRemap,
}

impl fmt::Display for RemapWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateRange { attribute } => {
                write!(f, "{attribute} range was degenerate; values mapped to new minimum")
            }
            Self::StaleRemap => write!(f, "no baseline settings; edit adopted without remapping"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_error_chains_kernel_error() {
        let err = StepError::KernelFailed {
            name: "diffuse".into(),
            reason: KernelError::NonFinite {
                buffer: "trail",
                index: 7,
            },
        };
        assert!(err.to_string().contains("diffuse"));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("non-finite value in trail at index 7"));
    }

    #[test]
    fn config_error_messages_name_the_attribute() {
        let err = ConfigError::InvertedRange {
            attribute: Attribute::MoveSpeed,
            min: 5.0,
            max: 1.0,
        };
        assert_eq!(err.to_string(), "move_speed range is inverted: min 5 > max 1");
    }
}
