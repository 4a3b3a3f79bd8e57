//! Rgb and Hsl — the public color value types for floem-chroma.
//!
//! The canonical serialized form everywhere in the crate is a `#rrggbb`
//! string: lowercase, 6 hex digits, `#`-prefixed. Parsing accepts an
//! optional leading `#` and is case-insensitive, but rejects every other
//! shape so that callers can treat `None` as "ignore, keep previous state".

use crate::math;

/// An sRGB color with integer channels in 0–255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse a strict 6-hex-digit string, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if !math::is_strict_hex(hex) {
            return None;
        }
        let stripped = hex.strip_prefix('#').unwrap_or(hex);
        let r = u8::from_str_radix(&stripped[0..2], 16).ok()?;
        let g = u8::from_str_radix(&stripped[2..4], 16).ok()?;
        let b = u8::from_str_radix(&stripped[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Create from arbitrary integers, clamping each channel to 0–255.
    pub fn from_clamped(r: i64, g: i64, b: i64) -> Self {
        Self {
            r: r.clamp(0, 255) as u8,
            g: g.clamp(0, 255) as u8,
            b: b.clamp(0, 255) as u8,
        }
    }

    /// Create from normalized 0.0–1.0 channels, rounding to nearest integer.
    pub(crate) fn from_normalized(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: (r * 255.0).round() as u8,
            g: (g * 255.0).round() as u8,
            b: (b * 255.0).round() as u8,
        }
    }

    /// Format as `#rrggbb`, always lowercase.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_hsl(&self) -> Hsl {
        let (h, s, l) = math::rgb_to_hsl(
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        );
        Hsl {
            h: h * 360.0,
            s: s * 100.0,
            l: l * 100.0,
        }
    }
}

/// A color in cylindrical HSL form: hue in degrees 0–360 (exclusive),
/// saturation and lightness as percentages 0–100.
///
/// Converting hex → HSL → hex may move each channel by at most 1 due to
/// rounding in the HSL domain; `hex → Rgb → hex` is exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Parse a strict 6-hex-digit string, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        Rgb::from_hex(hex).map(|rgb| rgb.to_hsl())
    }

    pub fn to_rgb(&self) -> Rgb {
        let (r, g, b) = math::hsl_to_rgb(self.h / 360.0, self.s / 100.0, self.l / 100.0);
        Rgb::from_normalized(r, g, b)
    }

    /// Format as `#rrggbb`, always lowercase.
    pub fn to_hex(&self) -> String {
        self.to_rgb().to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_hex_parsing() {
        assert_eq!(
            Rgb::from_hex("#3b82f6"),
            Some(Rgb {
                r: 0x3b,
                g: 0x82,
                b: 0xf6
            })
        );
        assert_eq!(Rgb::from_hex("3b82f6"), Rgb::from_hex("#3b82f6"));
        assert_eq!(Rgb::from_hex("#3B82F6"), Rgb::from_hex("#3b82f6"));

        for bad in ["", "#", "#fff", "fff", "#ff00zz", "#ff00000", "ff000", " #ff0000", "#ff0000 "] {
            assert_eq!(Rgb::from_hex(bad), None, "accepted {bad:?}");
        }
    }

    #[test]
    fn hex_output_is_lowercase_and_prefixed() {
        let rgb = Rgb {
            r: 0xab,
            g: 0xcd,
            b: 0xef,
        };
        assert_eq!(rgb.to_hex(), "#abcdef");
        assert_eq!(Rgb { r: 0, g: 0, b: 0 }.to_hex(), "#000000");
        assert_eq!(
            Rgb {
                r: 255,
                g: 255,
                b: 255
            }
            .to_hex(),
            "#ffffff"
        );
    }

    #[test]
    fn rgb_hex_round_trip_is_exact() {
        for r in [0u8, 1, 17, 127, 128, 254, 255] {
            for g in [0u8, 63, 128, 255] {
                for b in [0u8, 64, 200, 255] {
                    let rgb = Rgb { r, g, b };
                    assert_eq!(Rgb::from_hex(&rgb.to_hex()), Some(rgb));
                }
            }
        }
        // Case-normalizing direction.
        assert_eq!(Rgb::from_hex("#AbCdEf").unwrap().to_hex(), "#abcdef");
    }

    #[test]
    fn from_clamped_clamps_channels() {
        assert_eq!(
            Rgb::from_clamped(-5, 300, 128),
            Rgb {
                r: 0,
                g: 255,
                b: 128
            }
        );
    }

    #[test]
    fn primary_hues() {
        let red = Rgb::from_hex("#ff0000").unwrap().to_hsl();
        assert_eq!(red.h.round(), 0.0);
        assert_eq!(red.s.round(), 100.0);
        assert_eq!(red.l.round(), 50.0);

        let green = Rgb::from_hex("#00ff00").unwrap().to_hsl();
        assert_eq!(green.h.round(), 120.0);

        let blue = Rgb::from_hex("#0000ff").unwrap().to_hsl();
        assert_eq!(blue.h.round(), 240.0);

        assert_eq!(
            Hsl {
                h: 0.0,
                s: 100.0,
                l: 50.0
            }
            .to_hex(),
            "#ff0000"
        );
        assert_eq!(
            Hsl {
                h: 120.0,
                s: 100.0,
                l: 50.0
            }
            .to_hex(),
            "#00ff00"
        );
    }

    #[test]
    fn achromatic_has_zero_saturation() {
        let gray = Rgb::from_hex("#808080").unwrap().to_hsl();
        assert_eq!(gray.s, 0.0);
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.to_hex(), "#808080");
    }

    /// Hex → HSL → hex moves each channel by at most 1.
    #[test]
    fn hsl_round_trip_within_one_unit() {
        for r in (0u16..=255).step_by(17) {
            for g in (0u16..=255).step_by(17) {
                for b in (0u16..=255).step_by(17) {
                    let rgb = Rgb {
                        r: r as u8,
                        g: g as u8,
                        b: b as u8,
                    };
                    let back = rgb.to_hsl().to_rgb();
                    assert!(
                        (back.r as i16 - rgb.r as i16).abs() <= 1
                            && (back.g as i16 - rgb.g as i16).abs() <= 1
                            && (back.b as i16 - rgb.b as i16).abs() <= 1,
                        "{} came back as {}",
                        rgb.to_hex(),
                        back.to_hex()
                    );
                }
            }
        }
    }

    #[test]
    fn hsl_round_trip_on_the_default_background() {
        let hsl = Hsl::from_hex("#7ba5b8").unwrap();
        let back = hsl.to_rgb();
        let rgb = Rgb::from_hex("#7ba5b8").unwrap();
        assert!((back.r as i16 - rgb.r as i16).abs() <= 1);
        assert!((back.g as i16 - rgb.g as i16).abs() <= 1);
        assert!((back.b as i16 - rgb.b as i16).abs() <= 1);
    }
}
