// Small shared helpers: easing, color blending, formatting, console logging.

use wasm_bindgen::JsValue;

/// Ease-in-out curve `3t^2 - 2t^3` on `t` clamped to `[0, 1]`.
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Blend two `#rrggbb` colors. Falls back to `a` on a malformed input.
pub fn lerp_color(a: &str, b: &str, t: f64) -> String {
    fn hex_rgb(s: &str) -> Option<(u8, u8, u8)> {
        let s = s.strip_prefix('#')?;
        if s.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some((r, g, b))
    }
    let (Some(ca), Some(cb)) = (hex_rgb(a), hex_rgb(b)) else {
        return a.to_string();
    };
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        mix(ca.0, cb.0),
        mix(ca.1, cb.1),
        mix(ca.2, cb.2)
    )
}

/// "0.35" -> "35%".
pub fn format_percent(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round() as i64)
}

pub fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_hits_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
        // clamps outside the unit interval
        assert_eq!(smoothstep(-3.0), 0.0);
        assert_eq!(smoothstep(7.0), 1.0);
    }

    #[test]
    fn lerp_color_blends_channels() {
        assert_eq!(lerp_color("#000000", "#ffffff", 0.0), "#000000");
        assert_eq!(lerp_color("#000000", "#ffffff", 1.0), "#ffffff");
        assert_eq!(lerp_color("#102030", "#304050", 0.5), "#203040");
        // malformed input falls back to the first color
        assert_eq!(lerp_color("oops", "#ffffff", 0.5), "oops");
    }

    #[test]
    fn format_percent_rounds() {
        assert_eq!(format_percent(0.35), "35%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(0.499), "50%");
    }
}
