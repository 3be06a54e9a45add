//! Badge styling

use image::Rgb;

use crate::config::BadgeSettings;
use crate::overlay::AnnotateError;

/// Resolved badge style
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeStyle {
    /// Badge width in pixels
    pub width: u32,
    /// Badge height in pixels
    pub height: u32,
    /// Gradient color at the top row
    pub fill_start: Rgb<u8>,
    /// Gradient color at the bottom row
    pub fill_end: Rgb<u8>,
    /// Outline color
    pub outline: Rgb<u8>,
    /// Label text color
    pub text_color: Rgb<u8>,
    /// Outline corner radius
    pub corner_radius: u32,
    /// Outline stroke width
    pub stroke_width: u32,
    /// Label font size in pixels
    pub font_size: f32,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            width: 48,
            height: 24,
            fill_start: Rgb([0xEF, 0xDD, 0x88]),
            fill_end: Rgb([0xEB, 0xD8, 0x72]),
            outline: Rgb([0xEB, 0xD8, 0x72]),
            text_color: Rgb([0, 0, 0]),
            corner_radius: 5,
            stroke_width: 2,
            font_size: 22.0,
        }
    }
}

impl TryFrom<&BadgeSettings> for BadgeStyle {
    type Error = AnnotateError;

    fn try_from(settings: &BadgeSettings) -> Result<Self, Self::Error> {
        Ok(Self {
            width: settings.width,
            height: settings.height,
            fill_start: parse_hex_color(&settings.fill_start)?,
            fill_end: parse_hex_color(&settings.fill_end)?,
            outline: parse_hex_color(&settings.outline)?,
            text_color: parse_hex_color(&settings.text_color)?,
            corner_radius: settings.corner_radius,
            stroke_width: settings.stroke_width,
            font_size: settings.font_size,
        })
    }
}

/// Parse a `#RRGGBB` color
pub fn parse_hex_color(value: &str) -> Result<Rgb<u8>, AnnotateError> {
    let invalid = || AnnotateError::InvalidColor {
        value: value.to_string(),
    };

    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#EFDD88").unwrap(), Rgb([239, 221, 136]));
        assert_eq!(parse_hex_color("#ebd872").unwrap(), Rgb([235, 216, 114]));
        assert_eq!(parse_hex_color("#000000").unwrap(), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_parse_hex_color_rejects_malformed() {
        for bad in ["EFDD88", "#EFD", "#EFDD8", "#GGDD88", "#EFDD8800", "#ÉFDD8"] {
            assert!(
                matches!(parse_hex_color(bad), Err(AnnotateError::InvalidColor { .. })),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_style_from_default_settings_matches_default() {
        let style = BadgeStyle::try_from(&BadgeSettings::default()).unwrap();
        assert_eq!(style, BadgeStyle::default());
    }

    #[test]
    fn test_style_from_invalid_settings() {
        let settings = BadgeSettings {
            outline: "yellow".to_string(),
            ..Default::default()
        };
        assert!(BadgeStyle::try_from(&settings).is_err());
    }
}
