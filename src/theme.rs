//! Accent-color plumbing: the company's "#rrggbb" brand color feeds the
//! Typst templates directly and the HTML exports as an HSL custom property.

const FALLBACK_HEX: &str = "#1f6f54";

/// Parse "#rrggbb" (case-insensitive, leading '#' optional) into RGB.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Convert a hex color to HSL: hue in degrees, saturation and lightness
/// in percent.
pub fn hex_to_hsl(hex: &str) -> Option<(f64, f64, f64)> {
    let (r, g, b) = parse_hex(hex)?;
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let lightness = (max + min) / 2.0;

    if delta == 0.0 {
        return Some((0.0, 0.0, lightness * 100.0));
    }

    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let hue = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    } * 60.0;

    Some((hue, saturation * 100.0, lightness * 100.0))
}

/// CSS value for the accent custom property, e.g. "hsl(160, 56%, 28%)".
/// Malformed hex falls back to the neutral brand green.
pub fn accent_css(hex: &str) -> String {
    let (h, s, l) = hex_to_hsl(hex)
        .or_else(|| hex_to_hsl(FALLBACK_HEX))
        .unwrap_or((0.0, 0.0, 0.0));
    format!("hsl({}, {}%, {}%)", h.round(), s.round(), l.round())
}

/// The accent hex to hand to the Typst templates, validated with the same
/// fallback as the CSS path.
pub fn accent_hex(hex: &str) -> String {
    if parse_hex(hex).is_some() {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        format!("#{}", digits.to_ascii_lowercase())
    } else {
        FALLBACK_HEX.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(parse_hex("#1f6f54"), Some((0x1f, 0x6f, 0x54)));
        assert_eq!(parse_hex("FF0000"), Some((255, 0, 0)));
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#gggggg"), None);
    }

    #[test]
    fn primary_colors_convert() {
        assert_eq!(hex_to_hsl("#ff0000"), Some((0.0, 100.0, 50.0)));
        assert_eq!(hex_to_hsl("#00ff00"), Some((120.0, 100.0, 50.0)));
        assert_eq!(hex_to_hsl("#ffffff"), Some((0.0, 0.0, 100.0)));
        assert_eq!(hex_to_hsl("#000000"), Some((0.0, 0.0, 0.0)));
    }

    #[test]
    fn malformed_hex_falls_back() {
        assert_eq!(accent_css("not-a-color"), accent_css(FALLBACK_HEX));
        assert_eq!(accent_hex("not-a-color"), FALLBACK_HEX);
        assert_eq!(accent_hex("1F6F54"), "#1f6f54");
    }
}
