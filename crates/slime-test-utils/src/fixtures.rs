//! Reusable fixtures.
//!
//! - [`species_moving`]: a species that senses nothing, never turns, and
//!   moves at a fixed speed.
//! - [`point_settings`]: settings whose every range is a single value.
//! - [`species_table`]: `n` colored rows built from [`species_moving`].
//! - [`grid_with`]: a grid with a few cells set.

use slime_core::{Attribute, AttributeRange, Settings, Species};
use slime_field::TrailGrid;

/// A species that goes straight at `move_speed` and never turns.
///
/// Sensor radius 0, sensor distance 4, sensor angle 0.5 rad. Turn speed,
/// flow speed, and random turn weight are zero; intentional turn weight is
/// one, so tests only need to set `turn_speed` to enable steering.
pub fn species_moving(index: u32, count: u32, move_speed: f32) -> Species {
    Species {
        sensor_size: 0,
        sensor_angle: 0.5,
        sensor_distance: 4.0,
        move_speed,
        flow_speed: 0.0,
        turn_speed: 0.0,
        intentional_turn_weight: 1.0,
        random_turn_weight: 0.0,
        ..Species::with_colors(index, count)
    }
}

/// `count` rows of [`species_moving`] with speed `move_speed`.
pub fn species_table(count: u32, move_speed: f32) -> Vec<Species> {
    (0..count)
        .map(|i| species_moving(i, count, move_speed))
        .collect()
}

/// Settings with every range collapsed onto the matching attribute of
/// `species`, and no angle guide weight.
pub fn point_settings(species: &Species) -> Settings {
    let mut s = Settings {
        angle_adjustment_weight: 0.0,
        ..Settings::default()
    };
    for a in Attribute::ALL {
        *s.range_mut(a) = AttributeRange::point(species.get(a));
    }
    s
}

/// A zeroed grid of `resolution` with the listed `(x, y, value)` cells set.
///
/// # Panics
///
/// Panics on a zero resolution or a cell outside the grid.
pub fn grid_with(resolution: u32, cells: &[(u32, u32, f32)]) -> TrailGrid {
    let mut g = TrailGrid::new(resolution).expect("fixture resolution must be non-zero");
    for &(x, y, v) in cells {
        assert!(g.set(x, y, v), "fixture cell ({x}, {y}) outside grid");
    }
    g
}
