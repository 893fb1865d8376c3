//! Static guide maps that bias agent movement.
//!
//! A [`FlowMap`] pushes agents along a per-cell vector, scaled by each
//! species' `flow_speed`. An [`AngleMap`] pulls agent headings toward a
//! per-cell target angle with a global weight. Both are optional and never
//! change during a run.

use glam::Vec2;

use crate::error::FieldError;

fn expected_len(resolution: u32, actual: usize) -> Result<(), FieldError> {
    if resolution == 0 {
        return Err(FieldError::ZeroResolution);
    }
    let expected = resolution as usize * resolution as usize;
    if actual != expected {
        return Err(FieldError::LengthMismatch { expected, actual });
    }
    Ok(())
}

/// Per-cell drift vectors, in cells per second per unit `flow_speed`.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowMap {
    resolution: u32,
    vectors: Vec<Vec2>,
}

impl FlowMap {
    /// Wrap row-major vectors. Every vector must be finite.
    pub fn new(resolution: u32, vectors: Vec<Vec2>) -> Result<Self, FieldError> {
        expected_len(resolution, vectors.len())?;
        if let Some(index) = vectors.iter().position(|v| !v.is_finite()) {
            return Err(FieldError::NonFiniteGuide {
                guide: "flow",
                index,
            });
        }
        Ok(Self {
            resolution,
            vectors,
        })
    }

    /// Build from a function of cell coordinates.
    pub fn from_fn(
        resolution: u32,
        f: impl Fn(u32, u32) -> Vec2,
    ) -> Result<Self, FieldError> {
        let vectors = (0..resolution)
            .flat_map(|y| (0..resolution).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self::new(resolution, vectors)
    }

    /// Side length in cells.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Flow at flat cell `index`, zero outside the map.
    pub fn at(&self, index: usize) -> Vec2 {
        self.vectors.get(index).copied().unwrap_or(Vec2::ZERO)
    }
}

/// Per-cell target headings, in radians.
#[derive(Clone, Debug, PartialEq)]
pub struct AngleMap {
    resolution: u32,
    angles: Vec<f32>,
}

impl AngleMap {
    /// Wrap row-major angles. Every angle must be finite.
    pub fn new(resolution: u32, angles: Vec<f32>) -> Result<Self, FieldError> {
        expected_len(resolution, angles.len())?;
        if let Some(index) = angles.iter().position(|a| !a.is_finite()) {
            return Err(FieldError::NonFiniteGuide {
                guide: "angle",
                index,
            });
        }
        Ok(Self { resolution, angles })
    }

    /// Build from a function of cell coordinates.
    pub fn from_fn(resolution: u32, f: impl Fn(u32, u32) -> f32) -> Result<Self, FieldError> {
        let angles = (0..resolution)
            .flat_map(|y| (0..resolution).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self::new(resolution, angles)
    }

    /// Side length in cells.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Target heading at flat cell `index`.
    pub fn at(&self, index: usize) -> Option<f32> {
        self.angles.get(index).copied()
    }
}

/// The guide maps in effect for a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Guides {
    /// Optional drift field.
    pub flow: Option<FlowMap>,
    /// Optional heading field.
    pub angle: Option<AngleMap>,
}

impl Guides {
    /// No guides.
    pub fn none() -> Self {
        Self::default()
    }

    /// Drift at `index`, zero without a flow map.
    pub fn flow_at(&self, index: usize) -> Vec2 {
        self.flow.as_ref().map_or(Vec2::ZERO, |m| m.at(index))
    }

    /// Target heading at `index`, if an angle map is set.
    pub fn angle_at(&self, index: usize) -> Option<f32> {
        self.angle.as_ref().and_then(|m| m.at(index))
    }
}
