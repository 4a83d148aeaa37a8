//! Per-pixel RGB <-> HSV conversion.
//!
//! Hue is expressed as a fraction of a full turn in [0, 1), saturation as
//! `(max - min) / max` and value as `max(r, g, b)`. Values are not clamped,
//! so a value channel larger than 1.0 scales the reconstructed RGB linearly.

/// Convert one RGB pixel to `(hue, saturation, value)`.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let saturation = if max > 0.0 { delta / max } else { 0.0 };

    let hue = if delta <= 0.0 {
        0.0
    } else if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    (hue / 6.0, saturation, max)
}

/// Convert one HSV pixel back to `(red, green, blue)`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32, f32), b: (f32, f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5 && (a.2 - b.2).abs() < 1e-5
    }

    #[test]
    fn test_primary_hues() {
        assert!(close(rgb_to_hsv(1.0, 0.0, 0.0), (0.0, 1.0, 1.0)));
        assert!(close(rgb_to_hsv(0.0, 1.0, 0.0), (1.0 / 3.0, 1.0, 1.0)));
        assert!(close(rgb_to_hsv(0.0, 0.0, 1.0), (2.0 / 3.0, 1.0, 1.0)));
    }

    #[test]
    fn test_gray_has_no_saturation() {
        let (h, s, v) = rgb_to_hsv(0.4, 0.4, 0.4);
        assert_eq!((h, s), (0.0, 0.0));
        assert!((v - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_black_pixel() {
        assert_eq!(rgb_to_hsv(0.0, 0.0, 0.0), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_mixed_pixels_invert() {
        for &(r, g, b) in &[(0.2, 0.5, 0.9), (0.8, 0.1, 0.3), (0.6, 0.6, 0.1), (0.05, 0.7, 0.7)] {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            assert!(close(hsv_to_rgb(h, s, v), (r, g, b)), "pixel ({r}, {g}, {b})");
        }
    }

    #[test]
    fn test_value_scales_rgb() {
        let (h, s, _) = rgb_to_hsv(0.2, 0.4, 0.8);
        let (r, g, b) = hsv_to_rgb(h, s, 0.4);
        assert!(close((r, g, b), (0.1, 0.2, 0.4)));
    }
}
