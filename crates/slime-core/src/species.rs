//! Per-species sensing and movement parameters.

use bytemuck::{Pod, Zeroable};

use crate::attribute::Attribute;
use crate::color::{self, Rgba};
use crate::id::SpeciesId;

/// Tolerance applied before flooring `sensor_size`, so a value that lands
/// a rounding error below a whole number is not pushed down a cell.
pub const SENSOR_SIZE_EPSILON: f32 = 1e-3;

/// Hard upper bound on `sensor_size`, independent of field resolution.
pub const MAX_SENSOR_SIZE: u32 = 1024;

/// One row of the species table.
///
/// The layout is two `u32` followed by fifteen `f32` (68 bytes, no
/// padding), matching the buffer a compute device expects.
///
/// `color` and `inverse_color` are derived from `index` once at
/// generation and never change afterwards.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Species {
    /// Position of this row in the table.
    pub index: u32,
    /// Sensor window radius in cells; each reading sums a
    /// `(2r+1) x (2r+1)` square.
    pub sensor_size: u32,
    /// Side sensor offset from the heading, in radians.
    pub sensor_angle: f32,
    /// Sensor distance ahead of the agent, in cells.
    pub sensor_distance: f32,
    /// Forward speed, in cells per second.
    pub move_speed: f32,
    /// Flow guide multiplier.
    pub flow_speed: f32,
    /// Maximum turn rate, in radians per second.
    pub turn_speed: f32,
    /// Scale on the sensed steering turn.
    pub intentional_turn_weight: f32,
    /// Scale on the random heading perturbation.
    pub random_turn_weight: f32,
    /// Display color.
    pub color: Rgba,
    /// `1 - color`, component-wise.
    pub inverse_color: Rgba,
}

impl Species {
    /// A species row with every attribute zeroed and the colors for
    /// slot `index` of `count` filled in.
    pub fn with_colors(index: u32, count: u32) -> Self {
        let color = color::species_color(index, count);
        Self {
            index,
            color,
            inverse_color: color::inverse(color),
            ..Self::zeroed()
        }
    }

    /// This row's id.
    pub fn id(&self) -> SpeciesId {
        SpeciesId(self.index)
    }

    /// Read `attribute` as a float.
    pub fn get(&self, attribute: Attribute) -> f32 {
        match attribute {
            Attribute::SensorSize => self.sensor_size as f32,
            Attribute::SensorAngle => self.sensor_angle,
            Attribute::SensorDistance => self.sensor_distance,
            Attribute::MoveSpeed => self.move_speed,
            Attribute::FlowSpeed => self.flow_speed,
            Attribute::TurnSpeed => self.turn_speed,
            Attribute::IntentionalTurnWeight => self.intentional_turn_weight,
            Attribute::RandomTurnWeight => self.random_turn_weight,
        }
    }

    /// Write `attribute`. `sensor_size` is floored and clamped to
    /// `0..=MAX_SENSOR_SIZE`.
    pub fn set(&mut self, attribute: Attribute, value: f32) {
        match attribute {
            Attribute::SensorSize => self.sensor_size = floor_cells(value),
            Attribute::SensorAngle => self.sensor_angle = value,
            Attribute::SensorDistance => self.sensor_distance = value,
            Attribute::MoveSpeed => self.move_speed = value,
            Attribute::FlowSpeed => self.flow_speed = value,
            Attribute::TurnSpeed => self.turn_speed = value,
            Attribute::IntentionalTurnWeight => self.intentional_turn_weight = value,
            Attribute::RandomTurnWeight => self.random_turn_weight = value,
        }
    }

    /// The first attribute holding a non-finite value, if any.
    pub fn first_non_finite(&self) -> Option<Attribute> {
        Attribute::ALL
            .into_iter()
            .find(|&a| !self.get(a).is_finite())
    }
}

fn floor_cells(value: f32) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // `as` saturates at u32::MAX.
    ((value + SENSOR_SIZE_EPSILON).floor() as u32).min(MAX_SENSOR_SIZE)
}
