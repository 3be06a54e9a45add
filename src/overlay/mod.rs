//! Annotation Layer
//!
//! Places labeled badges over detected text regions. A pass walks the
//! regions in detector order, keeps the ones that pass [`RegionFilter`],
//! gives each the next label from a fresh [`LabelSequencer`] and draws it
//! with [`BadgeRenderer`].

pub mod badge;
pub mod filter;
pub mod labels;
pub mod widgets;

use image::RgbImage;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use crate::config::BadgeSettings;
use crate::vision::{Anchor, RawRegion};

pub use badge::BadgeRenderer;
pub use filter::RegionFilter;
pub use labels::LabelSequencer;

/// Annotation configuration failures
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("no bold font found, searched: {searched:?}")]
    FontNotFound { searched: Vec<PathBuf> },
    #[error("font file {path:?} could not be read: {source}")]
    FontUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("font file {path:?} could not be parsed")]
    InvalidFont { path: PathBuf },
    #[error("invalid color {value:?}, expected #RRGGBB")]
    InvalidColor { value: String },
}

/// One labeled region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationEntry {
    /// Assigned label
    pub label: String,
    /// Recognized text
    pub text: String,
    /// Anchor the badge was drawn at
    pub position: Anchor,
}

#[derive(Serialize)]
struct EntryBody<'a> {
    text: &'a str,
    position: Anchor,
}

/// Labels in assignment order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    entries: Vec<AnnotationEntry>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, entry: AnnotationEntry) {
        self.entries.push(entry);
    }

    /// Look up an entry by label
    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<&AnnotationEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order labels were assigned
    pub fn iter(&self) -> impl Iterator<Item = &AnnotationEntry> {
        self.entries.iter()
    }

    /// Assigned labels in order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }
}

impl Serialize for LabelMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(
                &entry.label,
                &EntryBody {
                    text: &entry.text,
                    position: entry.position,
                },
            )?;
        }
        map.end()
    }
}

/// Result of an annotation pass
#[derive(Debug)]
pub struct Annotation {
    /// Label assignments
    pub labels: LabelMap,
    /// Screenshot with badges drawn
    pub image: RgbImage,
}

/// Runs annotation passes
pub struct AnnotationEngine {
    filter: RegionFilter,
    renderer: BadgeRenderer,
}

impl AnnotationEngine {
    /// Create an engine around a renderer; the exclusion box follows the badge size
    pub fn new(renderer: BadgeRenderer) -> Self {
        let style = renderer.style();
        let filter = RegionFilter::for_badge(style.width, style.height);
        Self { filter, renderer }
    }

    /// Create an engine from settings
    ///
    /// Fails before any image is touched when the font or a color cannot be resolved.
    pub fn from_settings(settings: &BadgeSettings) -> Result<Self, AnnotateError> {
        Ok(Self::new(BadgeRenderer::from_settings(settings)?))
    }

    #[cfg(test)]
    pub fn filter(&self) -> &RegionFilter {
        &self.filter
    }

    /// Decide which regions get which labels, without drawing
    pub fn assign_labels(&self, regions: &[RawRegion]) -> LabelMap {
        assign_labels(&self.filter, regions)
    }

    /// Label and draw every accepted region, handing the image back
    pub fn annotate(&self, mut image: RgbImage, regions: &[RawRegion]) -> Annotation {
        let labels = self.assign_labels(regions);

        for entry in labels.iter() {
            self.renderer.draw(&mut image, entry.position, &entry.label);
        }

        info!(
            "Labeled {} of {} detected regions",
            labels.len(),
            regions.len()
        );

        Annotation { labels, image }
    }
}

/// Filter regions in order and pair each accepted one with the next label
pub fn assign_labels(filter: &RegionFilter, regions: &[RawRegion]) -> LabelMap {
    let mut sequencer = LabelSequencer::new();
    let mut map = LabelMap::new();

    for (region, anchor) in filter.select(regions) {
        map.push(AnnotationEntry {
            label: sequencer.next_label(),
            text: region.text.clone(),
            position: anchor,
        });
    }

    map
}
