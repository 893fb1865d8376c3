//! Boundary handling for agent positions and sample cells.
//!
//! The same policy governs both where an agent ends up when it steps off
//! the field and which cell a sensor reads when its window hangs over the
//! edge, so an agent never senses a neighbourhood it could not move into.

use glam::Vec2;
use std::f32::consts::PI;

/// How the field's edges are connected.
///
/// # Examples
///
/// ```
/// use slime_field::EdgePolicy;
///
/// // Wrap: the field is a torus.
/// assert_eq!(EdgePolicy::Wrap.resolve_cell(-1, 8), 7);
/// assert_eq!(EdgePolicy::Wrap.resolve_cell(8, 8), 0);
///
/// // Mirror: the field is reflected at each edge.
/// assert_eq!(EdgePolicy::Mirror.resolve_cell(-1, 8), 0);
/// assert_eq!(EdgePolicy::Mirror.resolve_cell(8, 8), 7);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgePolicy {
    /// Leaving one edge re-enters at the opposite edge. Heading is kept.
    #[default]
    Wrap,
    /// Leaving an edge reflects back into the field; the heading component
    /// normal to that edge is reversed.
    Mirror,
}

/// What happened to one coordinate axis during resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AxisFold {
    /// The raw coordinate was outside `[0, len)`.
    pub crossed: bool,
    /// The coordinate was reflected an odd number of times.
    pub flipped: bool,
}

impl EdgePolicy {
    /// Map an integer cell coordinate into `[0, len)`.
    ///
    /// `len` must be positive.
    pub fn resolve_cell(self, v: i64, len: i64) -> usize {
        if (0..len).contains(&v) {
            return v as usize;
        }
        match self {
            Self::Wrap => v.rem_euclid(len) as usize,
            Self::Mirror => {
                let m = v.rem_euclid(2 * len);
                if m < len {
                    m as usize
                } else {
                    (2 * len - 1 - m) as usize
                }
            }
        }
    }

    /// Map a continuous coordinate into `[0, len)`.
    pub fn resolve_axis(self, p: f32, len: f32) -> (f32, AxisFold) {
        if (0.0..len).contains(&p) {
            return (p, AxisFold::default());
        }
        let crossed = true;
        match self {
            Self::Wrap => (
                below(p.rem_euclid(len), len),
                AxisFold {
                    crossed,
                    flipped: false,
                },
            ),
            Self::Mirror => {
                let m = p.rem_euclid(2.0 * len);
                if m < len {
                    (
                        m,
                        AxisFold {
                            crossed,
                            flipped: false,
                        },
                    )
                } else {
                    (
                        below(2.0 * len - m, len),
                        AxisFold {
                            crossed,
                            flipped: true,
                        },
                    )
                }
            }
        }
    }

    /// Resolve an agent's position on both axes, reflecting its heading
    /// where an axis flipped. Returns the new position, the new heading, and
    /// whether any axis crossed an edge.
    pub fn resolve_agent(self, position: Vec2, heading: f32, extent: f32) -> (Vec2, f32, bool) {
        let (x, fx) = self.resolve_axis(position.x, extent);
        let (y, fy) = self.resolve_axis(position.y, extent);
        let mut heading = heading;
        if fx.flipped {
            heading = PI - heading;
        }
        if fy.flipped {
            heading = -heading;
        }
        (Vec2::new(x, y), heading, fx.crossed || fy.crossed)
    }
}

/// Keep a value that rounded up to `len` strictly inside the range.
fn below(v: f32, len: f32) -> f32 {
    if v >= len {
        len.next_down().max(0.0)
    } else if v < 0.0 {
        0.0
    } else {
        v
    }
}
