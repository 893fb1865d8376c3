//! Live-editable simulation settings.

use crate::attribute::{Attribute, AttributeRange};
use crate::error::ConfigError;

/// The current range of every remappable attribute, plus global weights.
///
/// Settings are replaced wholesale on change. The outgoing value is kept
/// by the remapper so existing species can be rescaled into the new ranges.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    /// Range for [`Attribute::SensorSize`].
    pub sensor_size: AttributeRange,
    /// Range for [`Attribute::SensorAngle`].
    pub sensor_angle: AttributeRange,
    /// Range for [`Attribute::SensorDistance`].
    pub sensor_distance: AttributeRange,
    /// Range for [`Attribute::MoveSpeed`].
    pub move_speed: AttributeRange,
    /// Range for [`Attribute::FlowSpeed`].
    pub flow_speed: AttributeRange,
    /// Range for [`Attribute::TurnSpeed`].
    pub turn_speed: AttributeRange,
    /// Range for [`Attribute::IntentionalTurnWeight`].
    pub intentional_turn_weight: AttributeRange,
    /// Range for [`Attribute::RandomTurnWeight`].
    pub random_turn_weight: AttributeRange,
    /// How strongly the angle guide pulls headings toward its target,
    /// per second. Zero disables the pull. Not remapped.
    pub angle_adjustment_weight: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensor_size: AttributeRange::new(1.0, 2.0),
            sensor_angle: AttributeRange::new(0.3, 0.8),
            sensor_distance: AttributeRange::new(6.0, 20.0),
            move_speed: AttributeRange::new(20.0, 60.0),
            flow_speed: AttributeRange::point(0.0),
            turn_speed: AttributeRange::new(2.0, 6.0),
            intentional_turn_weight: AttributeRange::new(0.5, 1.0),
            random_turn_weight: AttributeRange::new(0.0, 0.3),
            angle_adjustment_weight: 0.0,
        }
    }
}

impl Settings {
    /// The configured range of `attribute`.
    pub fn range(&self, attribute: Attribute) -> AttributeRange {
        match attribute {
            Attribute::SensorSize => self.sensor_size,
            Attribute::SensorAngle => self.sensor_angle,
            Attribute::SensorDistance => self.sensor_distance,
            Attribute::MoveSpeed => self.move_speed,
            Attribute::FlowSpeed => self.flow_speed,
            Attribute::TurnSpeed => self.turn_speed,
            Attribute::IntentionalTurnWeight => self.intentional_turn_weight,
            Attribute::RandomTurnWeight => self.random_turn_weight,
        }
    }

    /// Mutable access to the range of `attribute`.
    pub fn range_mut(&mut self, attribute: Attribute) -> &mut AttributeRange {
        match attribute {
            Attribute::SensorSize => &mut self.sensor_size,
            Attribute::SensorAngle => &mut self.sensor_angle,
            Attribute::SensorDistance => &mut self.sensor_distance,
            Attribute::MoveSpeed => &mut self.move_speed,
            Attribute::FlowSpeed => &mut self.flow_speed,
            Attribute::TurnSpeed => &mut self.turn_speed,
            Attribute::IntentionalTurnWeight => &mut self.intentional_turn_weight,
            Attribute::RandomTurnWeight => &mut self.random_turn_weight,
        }
    }

    /// Return a copy with `attribute` set to `range`.
    pub fn with_range(mut self, attribute: Attribute, range: AttributeRange) -> Self {
        *self.range_mut(attribute) = range;
        self
    }

    /// Attributes whose range differs between `self` and `other`.
    pub fn changed_attributes<'a>(
        &'a self,
        other: &'a Settings,
    ) -> impl Iterator<Item = Attribute> + 'a {
        Attribute::ALL
            .into_iter()
            .filter(move |&a| self.range(a) != other.range(a))
    }

    /// Check every range and the global weights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for attribute in Attribute::ALL {
            self.range(attribute).validate(attribute)?;
        }
        if !self.angle_adjustment_weight.is_finite() || self.angle_adjustment_weight < 0.0 {
            return Err(ConfigError::InvalidParameter {
                reason: format!(
                    "angle_adjustment_weight must be finite and >= 0, got {}",
                    self.angle_adjustment_weight
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
    fn default_settings_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn range_and_range_mut_agree() {
        let mut s = Settings::default();
        for (i, a) in Attribute::ALL.into_iter().enumerate() {
            *s.range_mut(a) = AttributeRange::new(i as f32, i as f32 + 1.0);
        }
        for (i, a) in Attribute::ALL.into_iter().enumerate() {
            assert_eq!(s.range(a), AttributeRange::new(i as f32, i as f32 + 1.0));
        }
    }

    #[test]
    fn changed_attributes_lists_only_edits() {
        let a = Settings::default();
        let b = a
            .clone()
            .with_range(Attribute::MoveSpeed, AttributeRange::new(1.0, 2.0));
        let changed: Vec<_> = a.changed_attributes(&b).collect();
        assert_eq!(changed, vec![Attribute::MoveSpeed]);
        assert_eq!(a.changed_attributes(&a).count(), 0);
    }

    #[test]
    fn negative_angle_weight_rejected() {
        let s = Settings {
            angle_adjustment_weight: -0.5,
            ..Settings::default()
        };
        assert!(matches!(
            s.validate(),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn settings_json_round_trip() {
        let s = Settings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
