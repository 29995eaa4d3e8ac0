//! Conversion between computed color strings and editor control values.
//!
//! [CSS Color 4 § 15 Serializing colors](https://www.w3.org/TR/css-color-4/#serializing-color-values)
//!
//! "the serialized form ... is rgb() if the alpha is exactly 1, or rgba()
//! otherwise". Color inputs only take `#rrggbb`.

/// Named colors recognised when computing a color value.
///
/// [CSS Color 4 § 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("silver", (192, 192, 192)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("white", (255, 255, 255)),
    ("maroon", (128, 0, 0)),
    ("red", (255, 0, 0)),
    ("purple", (128, 0, 128)),
    ("fuchsia", (255, 0, 255)),
    ("magenta", (255, 0, 255)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("olive", (128, 128, 0)),
    ("yellow", (255, 255, 0)),
    ("navy", (0, 0, 128)),
    ("blue", (0, 0, 255)),
    ("teal", (0, 128, 128)),
    ("aqua", (0, 255, 255)),
    ("cyan", (0, 255, 255)),
    ("orange", (255, 165, 0)),
    ("pink", (255, 192, 203)),
    ("brown", (165, 42, 42)),
    ("gold", (255, 215, 0)),
    ("indigo", (75, 0, 130)),
    ("violet", (238, 130, 238)),
    ("coral", (255, 127, 80)),
    ("salmon", (250, 128, 114)),
    ("tomato", (255, 99, 71)),
    ("crimson", (220, 20, 60)),
    ("darkblue", (0, 0, 139)),
    ("darkgreen", (0, 100, 0)),
    ("darkred", (139, 0, 0)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
    ("lightblue", (173, 216, 230)),
    ("whitesmoke", (245, 245, 245)),
    ("rebeccapurple", (102, 51, 153)),
];

/// An sRGB color with alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity.
    pub a: f32,
}

impl Rgba {
    /// Parse a hex, `rgb()`/`rgba()` or named color.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_args(args);
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|&(_, (r, g, b))| Self { r, g, b, a: 1.0 })
    }

    /// Computed-value serialization: `rgb(r, g, b)` or `rgba(r, g, b, a)`.
    #[must_use]
    pub fn to_computed(self) -> String {
        if (self.a - 1.0).abs() < f32::EPSILON {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }

    /// `#rrggbb`, ignoring alpha.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(hex.get(i..=i)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Rgba {
            r: digit(0)? * 17,
            g: digit(1)? * 17,
            b: digit(2)? * 17,
            a: 1.0,
        }),
        6 => Some(Rgba {
            r: pair(0)?,
            g: pair(2)?,
            b: pair(4)?,
            a: 1.0,
        }),
        8 => Some(Rgba {
            r: pair(0)?,
            g: pair(2)?,
            b: pair(4)?,
            a: f32::from(pair(6)?) / 255.0,
        }),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_rgb_args(args: &str) -> Option<Rgba> {
    let parts: Vec<&str> = args
        .split([',', ' ', '/'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if !(3..=4).contains(&parts.len()) {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v: f32 = s.parse().ok()?;
        Some(v.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = match parts.get(3) {
        Some(a) => match a.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? / 100.0,
            None => a.parse::<f32>().ok()?,
        }
        .clamp(0.0, 1.0),
        None => 1.0,
    };
    Some(Rgba {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: alpha,
    })
}

/// Normalise an authored color to its computed form.
///
/// Keywords the editor cannot resolve (`currentcolor`, `inherit`, ...) and
/// `transparent` are returned unchanged.
#[must_use]
pub fn to_computed(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("transparent") {
        return trimmed.to_string();
    }
    Rgba::parse(trimmed).map_or_else(|| trimmed.to_string(), Rgba::to_computed)
}

/// Convert a computed color for a hex color control.
///
/// Opaque colors become `#rrggbb`. Anything translucent, `transparent` and
/// unrecognised values pass through unconverted.
#[must_use]
pub fn to_hex(value: &str) -> String {
    let trimmed = value.trim();
    match Rgba::parse(trimmed) {
        Some(color) if (color.a - 1.0).abs() < f32::EPSILON => color.to_hex(),
        _ => trimmed.to_string(),
    }
}
