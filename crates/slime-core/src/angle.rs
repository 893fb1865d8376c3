//! Circular angle arithmetic.

use std::f32::consts::{PI, TAU};

/// Wrap an angle into `[0, TAU)`.
pub fn wrap_angle(a: f32) -> f32 {
    let w = a.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if w >= TAU {
        0.0
    } else {
        w
    }
}

/// Signed shortest rotation from `from` to `to`, in `[-PI, PI]`.
pub fn shortest_arc(from: f32, to: f32) -> f32 {
    let d = (to - from).rem_euclid(TAU);
    if d > PI {
        d - TAU
    } else {
        d
    }
}

/// Rotate `from` toward `to` by fraction `t` of the shortest arc.
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    from + shortest_arc(from, to) * t
}
