//! Agent state.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::id::SpeciesId;

/// A single moving agent.
///
/// 16 bytes: a `u32` species id followed by three `f32`. Agents are
/// created in bulk at spawn and never destroyed; the stepper rewrites
/// position and heading every tick.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    /// Index into the species table.
    pub species: u32,
    /// Position in field cells, inside `[0, resolution)` on both axes.
    pub position: Vec2,
    /// Heading in radians, counter-clockwise from +x.
    pub heading: f32,
}

impl Agent {
    /// Create an agent of `species` at `position` facing `heading`.
    pub fn new(species: SpeciesId, position: Vec2, heading: f32) -> Self {
        Self {
            species: species.0,
            position,
            heading,
        }
    }

    /// The agent's species id.
    pub fn species_id(&self) -> SpeciesId {
        SpeciesId(self.species)
    }

    /// Unit vector along the heading.
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }

    /// True when position and heading are finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.heading.is_finite()
    }
}
