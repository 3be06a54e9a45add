//! Region selection
//!
//! Decides which detected regions receive a badge. Regions are visited in
//! detector order and the first one to claim an area wins it.

use tracing::debug;

use crate::vision::{Anchor, RawRegion};

/// Shortest text worth labeling, in characters
pub const MIN_TEXT_LEN: usize = 2;

/// Why a region was not labeled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Text shorter than [`MIN_TEXT_LEN`]
    TooShort,
    /// Detector reported no vertices
    NoAnchor,
    /// Inside the exclusion box of an earlier anchor
    TooClose(Anchor),
}

/// Proximity filter over accepted anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionFilter {
    /// Horizontal exclusion distance (exclusive)
    pub min_dx: i32,
    /// Vertical exclusion distance (exclusive)
    pub min_dy: i32,
}

impl RegionFilter {
    /// Exclusion box of twice the badge footprint
    pub fn for_badge(width: u32, height: u32) -> Self {
        Self {
            min_dx: width as i32 * 2,
            min_dy: height as i32 * 2,
        }
    }

    /// Whether `region` should be labeled given the anchors accepted so far
    #[cfg(test)]
    pub fn accept(&self, region: &RawRegion, accepted: &[Anchor]) -> bool {
        self.check(region, accepted).is_ok()
    }

    /// Like [`accept`](Self::accept), returning the anchor or the reason for rejection
    pub fn check(&self, region: &RawRegion, accepted: &[Anchor]) -> Result<Anchor, Rejection> {
        if region.text_len() < MIN_TEXT_LEN {
            return Err(Rejection::TooShort);
        }

        let anchor = region.anchor().ok_or(Rejection::NoAnchor)?;

        if let Some(&other) = accepted.iter().find(|other| self.too_close(anchor, **other)) {
            return Err(Rejection::TooClose(other));
        }

        Ok(anchor)
    }

    fn too_close(&self, a: Anchor, b: Anchor) -> bool {
        i64::from(a.x.abs_diff(b.x)) < i64::from(self.min_dx)
            && i64::from(a.y.abs_diff(b.y)) < i64::from(self.min_dy)
    }

    /// Select regions in order, returning each accepted region with its anchor
    pub fn select<'a>(&self, regions: &'a [RawRegion]) -> Vec<(&'a RawRegion, Anchor)> {
        let mut accepted: Vec<Anchor> = Vec::new();
        let mut selected = Vec::new();

        for region in regions {
            match self.check(region, &accepted) {
                Ok(anchor) => {
                    accepted.push(anchor);
                    selected.push((region, anchor));
                }
                Err(Rejection::TooClose(other)) => {
                    debug!(
                        "Skipping region {:?}: too close to ({}, {})",
                        region.text, other.x, other.y
                    );
                }
                Err(reason) => {
                    debug!("Skipping region {:?}: {:?}", region.text, reason);
                }
            }
        }

        selected
    }
}
