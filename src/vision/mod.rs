//! Vision Layer
//!
//! Text regions detected on a screenshot, and the OCR backend that produces them.
//! The detector is an external service; everything downstream only sees
//! [`RawRegion`] values.

pub mod ocr;

use serde::Serialize;

pub use ocr::{BaiduOcrClient, TextDetector};

/// Pixel position used both for proximity tests and badge placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "(i32, i32)")]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
}

impl Anchor {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Anchor {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Anchor> for (i32, i32) {
    fn from(anchor: Anchor) -> Self {
        (anchor.x, anchor.y)
    }
}

/// One OCR detection: recognized text plus its bounding polygon
#[derive(Debug, Clone, PartialEq)]
pub struct RawRegion {
    /// Recognized text
    pub text: String,
    /// Polygon vertices, starting with the anchor corner
    pub vertices: Vec<Anchor>,
}

impl RawRegion {
    /// Create a region from text and `(x, y)` vertices
    #[cfg(test)]
    pub fn new(text: impl Into<String>, vertices: impl IntoIterator<Item = (i32, i32)>) -> Self {
        Self {
            text: text.into(),
            vertices: vertices.into_iter().map(Anchor::from).collect(),
        }
    }

    /// The first vertex, if the detector reported any
    pub fn anchor(&self) -> Option<Anchor> {
        self.vertices.first().copied()
    }

    /// Length of the recognized text in characters
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_is_first_vertex() {
        let region = RawRegion::new("Hello", [(10, 12), (40, 12), (40, 30), (10, 30)]);
        assert_eq!(region.anchor(), Some(Anchor::new(10, 12)));
    }

    #[test]
    fn test_region_without_vertices_has_no_anchor() {
        let region = RawRegion::new("Hello", []);
        assert!(region.anchor().is_none());
    }

    #[test]
    fn test_text_len_counts_characters() {
        assert_eq!(RawRegion::new("设置", [(0, 0)]).text_len(), 2);
        assert_eq!(RawRegion::new("X", [(0, 0)]).text_len(), 1);
    }

    #[test]
    fn test_anchor_serializes_as_pair() {
        let json = serde_json::to_string(&Anchor::new(300, 305)).unwrap();
        assert_eq!(json, "[300,305]");
    }
}
