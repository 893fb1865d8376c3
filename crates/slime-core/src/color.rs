//! Species display colors.
//!
//! Each species gets a fully saturated hue spaced evenly around the color
//! wheel, so `n` species produce hues `0, 1/n, 2/n, ...`.

/// RGBA color with components in `[0, 1]`.
pub type Rgba = [f32; 4];

/// Convert HSV (all components in `[0, 1]`) to RGB.
///
/// Hue wraps: `1.0` is the same as `0.0`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = (h6.floor() as i32).rem_euclid(6);
    let frac = h6 - h6.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * frac);
    let t = v * (1.0 - s * (1.0 - frac));
    match sector {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// Hue of an RGB color in `[0, 1)`. Grey returns 0.
pub fn hue_of(rgb: [f32; 3]) -> f32 {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta <= 0.0 {
        return 0.0;
    }
    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    (sector / 6.0).rem_euclid(1.0)
}

/// Display color of species `index` out of `count`.
pub fn species_color(index: u32, count: u32) -> Rgba {
    let h = if count == 0 {
        0.0
    } else {
        index as f32 / count as f32
    };
    let [r, g, b] = hsv_to_rgb(h, 1.0, 1.0);
    [r, g, b, 1.0]
}

/// Component-wise `1 - c`, alpha included.
pub fn inverse(c: Rgba) -> Rgba {
    [1.0 - c[0], 1.0 - c[1], 1.0 - c[2], 1.0 - c[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [1.0, 0.0, 0.0]);
        let g = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0);
        assert!(close(g[0], 0.0) && close(g[1], 1.0) && close(g[2], 0.0));
        let b = hsv_to_rgb(2.0 / 3.0, 1.0, 1.0);
        assert!(close(b[0], 0.0) && close(b[1], 0.0) && close(b[2], 1.0));
    }

    #[test]
    fn hue_round_trips_through_rgb() {
        for i in 0..12 {
            let h = i as f32 / 12.0;
            assert!(close(hue_of(hsv_to_rgb(h, 1.0, 1.0)), h), "hue {h}");
        }
    }

    #[test]
    fn inverse_of_red_is_cyan_with_zero_alpha() {
        assert_eq!(
            inverse(species_color(0, 3)),
            [0.0, 1.0, 1.0, 0.0]
        );
    }
}
