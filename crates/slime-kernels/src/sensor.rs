//! Trail sensing and the steering decision.

use glam::Vec2;
use slime_core::{Agent, Species};
use slime_field::{EdgePolicy, TrailGrid};

/// Which way an agent turns after sensing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Steer {
    /// Counter-clockwise (heading increases).
    Left,
    /// Keep heading.
    Straight,
    /// Clockwise (heading decreases).
    Right,
}

impl Steer {
    /// `+1` for left, `-1` for right, `0` for straight.
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => 1.0,
            Self::Straight => 0.0,
            Self::Right => -1.0,
        }
    }
}

/// Summed intensities at the three sensors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Readings {
    /// Sensor straight ahead.
    pub forward: f32,
    /// Sensor at `heading + sensor_angle`.
    pub left: f32,
    /// Sensor at `heading - sensor_angle`.
    pub right: f32,
}

impl Readings {
    /// Turn toward a side only when it is strictly the strongest reading.
    ///
    /// Any tie for the maximum, including `left == right > forward`,
    /// goes straight.
    pub fn steer(&self) -> Steer {
        if self.left > self.forward && self.left > self.right {
            Steer::Left
        } else if self.right > self.forward && self.right > self.left {
            Steer::Right
        } else {
            Steer::Straight
        }
    }
}

/// Sum of the sensor window centred on `point`.
///
/// `point` is first folded into the field by `edge`, so a sensor that
/// reaches past an edge reads the cells an agent would arrive at.
pub fn sense_at(grid: &TrailGrid, point: Vec2, radius: u32, edge: EdgePolicy) -> f32 {
    let extent = grid.extent();
    let (x, _) = edge.resolve_axis(point.x, extent);
    let (y, _) = edge.resolve_axis(point.y, extent);
    grid.sum_square(x.floor() as i64, y.floor() as i64, radius, edge)
}

/// Read all three sensors for `agent`.
pub fn read_sensors(
    grid: &TrailGrid,
    agent: &Agent,
    species: &Species,
    edge: EdgePolicy,
) -> Readings {
    let probe = |offset: f32| {
        let point =
            agent.position + Vec2::from_angle(agent.heading + offset) * species.sensor_distance;
        sense_at(grid, point, species.sensor_size, edge)
    };
    Readings {
        forward: probe(0.0),
        left: probe(species.sensor_angle),
        right: probe(-species.sensor_angle),
    }
}
