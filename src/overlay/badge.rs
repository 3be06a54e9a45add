//! Badge rendering
//!
//! A badge is a vertical gradient box with a rounded outline and a centered
//! label. Its bottom-right corner sits on the anchor.

use ab_glyph::{FontVec, PxScale};
use image::{imageops, ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::BadgeSettings;
use crate::overlay::widgets::BadgeStyle;
use crate::overlay::AnnotateError;
use crate::vision::Anchor;

/// Bold font used for badge labels
pub struct BadgeFont {
    font: FontVec,
}

impl BadgeFont {
    /// Load a font file
    pub fn load(path: &Path) -> Result<Self, AnnotateError> {
        let data = std::fs::read(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => AnnotateError::FontNotFound {
                searched: vec![path.to_path_buf()],
            },
            _ => AnnotateError::FontUnreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let font = FontVec::try_from_vec(data).map_err(|_| AnnotateError::InvalidFont {
            path: path.to_path_buf(),
        })?;

        Ok(Self { font })
    }

    /// Load the first candidate that exists on this host
    pub fn resolve(candidates: &[PathBuf]) -> Result<Self, AnnotateError> {
        for path in candidates {
            if !path.is_file() {
                debug!("Font candidate {:?} not found", path);
                continue;
            }

            let font = Self::load(path)?;
            info!("Using badge font {:?}", path);
            return Ok(font);
        }

        Err(AnnotateError::FontNotFound {
            searched: candidates.to_vec(),
        })
    }
}

/// Single-column vertical gradient, `height` rows tall
///
/// Row `i` is `start + (end - start) * i / height` per channel, truncated.
pub fn gradient_column(start: Rgb<u8>, end: Rgb<u8>, height: u32) -> RgbImage {
    ImageBuffer::from_fn(1, height, |_, row| {
        let t = row as f64 / height as f64;
        Rgb(std::array::from_fn(|c| {
            let from = i32::from(start[c]);
            let to = i32::from(end[c]);
            (from + (f64::from(to - from) * t) as i32) as u8
        }))
    })
}

/// Tile the gradient across `width` columns starting at `(left, top)`
///
/// Columns outside the image are skipped.
pub fn fill_gradient(image: &mut RgbImage, left: i64, top: i64, width: u32, gradient: &RgbImage) {
    let first = left.max(0);
    let last = (left + i64::from(width)).min(i64::from(image.width()));
    for x in first..last {
        imageops::replace(image, gradient, x, top);
    }
}

/// Rectangle with rounded corners, bounds inclusive
#[derive(Debug, Clone, Copy)]
struct RoundedBox {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
    radius: i64,
}

impl RoundedBox {
    fn contains(&self, x: i64, y: i64) -> bool {
        if x < self.left || x > self.right || y < self.top || y > self.bottom {
            return false;
        }

        let r = self
            .radius
            .min((self.right - self.left) / 2)
            .min((self.bottom - self.top) / 2);
        let cx = x.clamp(self.left + r, self.right - r);
        let cy = y.clamp(self.top + r, self.bottom - r);
        let (dx, dy) = (x - cx, y - cy);

        dx * dx + dy * dy <= r * r
    }

    fn inset(&self, by: i64) -> Self {
        Self {
            left: self.left + by,
            top: self.top + by,
            right: self.right - by,
            bottom: self.bottom - by,
            radius: (self.radius - by).max(0),
        }
    }
}

/// Stroke a rounded rectangle outline over the inclusive box `[left, top]..=[right, bottom]`
pub fn draw_rounded_outline(
    image: &mut RgbImage,
    (left, top): (i64, i64),
    (right, bottom): (i64, i64),
    radius: u32,
    stroke: u32,
    color: Rgb<u8>,
) {
    let outer = RoundedBox {
        left,
        top,
        right,
        bottom,
        radius: i64::from(radius),
    };
    let inner = outer.inset(i64::from(stroke));
    let (w, h) = image.dimensions();

    for y in top.max(0)..=bottom.min(i64::from(h) - 1) {
        for x in left.max(0)..=right.min(i64::from(w) - 1) {
            if outer.contains(x, y) && !inner.contains(x, y) {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Draws labeled badges onto screenshots
pub struct BadgeRenderer {
    style: BadgeStyle,
    font: BadgeFont,
    gradient: RgbImage,
}

impl BadgeRenderer {
    /// Create a renderer from a resolved style and font
    pub fn new(style: BadgeStyle, font: BadgeFont) -> Self {
        let gradient = gradient_column(style.fill_start, style.fill_end, style.height);
        Self {
            style,
            font,
            gradient,
        }
    }

    /// Create a renderer from settings, resolving colors and the font
    pub fn from_settings(settings: &BadgeSettings) -> Result<Self, AnnotateError> {
        let style = BadgeStyle::try_from(settings)?;
        let font = BadgeFont::resolve(&settings.font_paths)?;
        Ok(Self::new(style, font))
    }

    pub fn style(&self) -> &BadgeStyle {
        &self.style
    }

    /// Draw `label` in a badge whose bottom-right corner is `anchor`
    ///
    /// Geometry is computed in `i64` so detector coordinates near the `i32`
    /// limits cannot overflow. A badge entirely outside the image draws nothing.
    pub fn draw(&self, image: &mut RgbImage, anchor: Anchor, label: &str) {
        let style = &self.style;
        let (width, height) = (i64::from(style.width), i64::from(style.height));
        let (right, bottom) = (i64::from(anchor.x), i64::from(anchor.y));
        let (left, top) = (right - width, bottom - height);

        let (img_w, img_h) = image.dimensions();
        if right < 0 || bottom < 0 || left >= i64::from(img_w) || top >= i64::from(img_h) {
            debug!("Badge {} at ({}, {}) is off the image", label, anchor.x, anchor.y);
            return;
        }

        fill_gradient(image, left, top, style.width, &self.gradient);
        draw_rounded_outline(
            image,
            (left, top),
            (right, bottom),
            style.corner_radius,
            style.stroke_width,
            style.outline,
        );

        let scale = PxScale::from(style.font_size);
        let (text_w, text_h) = text_size(scale, &self.font.font, label);
        let text_x = left + (width - i64::from(text_w)) / 2;
        let text_y = top - 1 + (height - i64::from(text_h)) / 2;

        if let (Ok(x), Ok(y)) = (i32::try_from(text_x), i32::try_from(text_y)) {
            draw_text_mut(image, style.text_color, x, y, scale, &self.font.font, label);
        }
        debug!("Drew badge {} at ({}, {})", label, anchor.x, anchor.y);
    }
}

/// Host font for rendering tests, if one is installed
#[cfg(test)]
pub(crate) fn test_font() -> Option<BadgeFont> {
    BadgeFont::resolve(&BadgeSettings::default().font_paths).ok()
}
