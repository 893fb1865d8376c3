//! Remappable species attributes and their configured ranges.

use std::fmt;

use crate::error::ConfigError;
use crate::species::MAX_SENSOR_SIZE;

/// A per-species attribute whose value is drawn from a configured range.
///
/// Every attribute listed here is sampled at species generation and
/// rescaled by the remapper when its range changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    /// Sensor window radius in cells. Stored as an integer.
    SensorSize,
    /// Angular offset of the side sensors, in radians.
    SensorAngle,
    /// Distance from the agent to each sensor, in cells.
    SensorDistance,
    /// Forward speed, in cells per second.
    MoveSpeed,
    /// Multiplier on the flow guide vector, in cells per second.
    FlowSpeed,
    /// Maximum steering rate, in radians per second.
    TurnSpeed,
    /// Scale applied to the sensed steering turn.
    IntentionalTurnWeight,
    /// Scale applied to the random heading perturbation.
    RandomTurnWeight,
}

impl Attribute {
    /// All attributes, in storage order.
    pub const ALL: [Attribute; 8] = [
        Attribute::SensorSize,
        Attribute::SensorAngle,
        Attribute::SensorDistance,
        Attribute::MoveSpeed,
        Attribute::FlowSpeed,
        Attribute::TurnSpeed,
        Attribute::IntentionalTurnWeight,
        Attribute::RandomTurnWeight,
    ];

    /// Stable snake_case name, used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::SensorSize => "sensor_size",
            Self::SensorAngle => "sensor_angle",
            Self::SensorDistance => "sensor_distance",
            Self::MoveSpeed => "move_speed",
            Self::FlowSpeed => "flow_speed",
            Self::TurnSpeed => "turn_speed",
            Self::IntentionalTurnWeight => "intentional_turn_weight",
            Self::RandomTurnWeight => "random_turn_weight",
        }
    }

    /// Whether the stored value is floored to a whole number.
    pub fn is_integral(self) -> bool {
        matches!(self, Self::SensorSize)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed interval `[min, max]` an attribute is sampled from.
///
/// `min == max` is allowed and called *degenerate*: sampling always yields
/// `min`, and remapping out of it cannot recover a relative position.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound, `>= min`.
    pub max: f32,
}

impl AttributeRange {
    /// A range from `min` to `max`. Not validated; see [`validate`](Self::validate).
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A degenerate range containing exactly `value`.
    pub const fn point(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// `max - min`.
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// True when the range has zero width.
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }

    /// The value at relative position `t` (0 at `min`, 1 at `max`).
    ///
    /// `t` outside `[0, 1]` extrapolates.
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + t * self.span()
    }

    /// Relative position of `value` within the range, or `None` if the
    /// range is degenerate.
    pub fn relative(&self, value: f32) -> Option<f32> {
        if self.is_degenerate() {
            None
        } else {
            Some((value - self.min) / self.span())
        }
    }

    /// Check that both bounds are finite and `min <= max`.
    pub fn validate(&self, attribute: Attribute) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::NonFiniteRange { attribute });
        }
        if self.max < self.min {
            return Err(ConfigError::InvertedRange {
                attribute,
                min: self.min,
                max: self.max,
            });
        }
        if attribute.is_integral() && self.min < 0.0 {
            return Err(ConfigError::InvalidParameter {
                reason: format!("{attribute} range must be non-negative, got min {}", self.min),
            });
        }
        if attribute == Attribute::SensorSize && self.max > MAX_SENSOR_SIZE as f32 {
            return Err(ConfigError::InvalidParameter {
                reason: format!(
                    "{attribute} range max {} exceeds {MAX_SENSOR_SIZE}",
                    self.max
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints() {
        let r = AttributeRange::new(2.0, 6.0);
        assert_eq!(r.lerp(0.0), 2.0);
        assert_eq!(r.lerp(1.0), 6.0);
        assert_eq!(r.lerp(0.5), 4.0);
        assert_eq!(r.lerp(1.5), 8.0);
    }

    #[test]
    fn relative_inverts_lerp() {
        let r = AttributeRange::new(-1.0, 3.0);
        assert_eq!(r.relative(1.0), Some(0.5));
        assert_eq!(AttributeRange::point(4.0).relative(4.0), None);
    }

    #[test]
    fn validate_rejects_inverted_and_non_finite() {
        assert!(AttributeRange::new(1.0, 1.0)
            .validate(Attribute::MoveSpeed)
            .is_ok());
        assert_eq!(
            AttributeRange::new(3.0, 1.0).validate(Attribute::TurnSpeed),
            Err(ConfigError::InvertedRange {
                attribute: Attribute::TurnSpeed,
                min: 3.0,
                max: 1.0,
            })
        );
        assert_eq!(
            AttributeRange::new(f32::NAN, 1.0).validate(Attribute::SensorAngle),
            Err(ConfigError::NonFiniteRange {
                attribute: Attribute::SensorAngle,
            })
        );
        assert!(AttributeRange::new(-1.0, 1.0)
            .validate(Attribute::SensorSize)
            .is_err());
        assert!(AttributeRange::point(1.0e9)
            .validate(Attribute::SensorSize)
            .is_err());
        assert!(AttributeRange::point(1.0e9)
            .validate(Attribute::MoveSpeed)
            .is_ok());
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Attribute::ALL.iter().map(|a| a.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Attribute::ALL.len());
    }
}
