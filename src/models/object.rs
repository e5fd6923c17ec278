// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! A single annotated object.
//!
//! An object is a labeled region of one image: a bounding box, a free-text
//! label, and optionally the full-size pixel mask the region was painted
//! with. Masks live on disk as PNG files and are loaded lazily; the
//! rendered preview region is derived state and never persisted.

use crate::io::masks;
use crate::util::geometry::{self, BoundingBox};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An annotated region with position, size, mask, and text label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectAnnotation {
    /// Object id, unique within its image.
    pub id: u32,
    /// Position and size of the region in image pixel coordinates.
    pub bbox: BoundingBox,
    /// Free-text label. May contain spaces.
    pub text: String,
    /// Full-size pixel mask, lazily loaded from disk.
    #[serde(skip)]
    pub mask: Option<RgbaImage>,
    /// Rendered preview of the masked region. Derived, never saved.
    #[serde(skip)]
    pub region: Option<RgbaImage>,
    /// The in-memory mask has not been written to disk yet.
    #[serde(skip)]
    mask_dirty: bool,
}

impl ObjectAnnotation {
    /// Create an object without a mask (e.g. when read from a label file).
    pub fn new(id: u32, bbox: BoundingBox, text: impl Into<String>) -> Self {
        Self {
            id,
            bbox,
            text: text.into(),
            mask: None,
            region: None,
            mask_dirty: false,
        }
    }

    /// Create an object from a freshly painted mask.
    ///
    /// The bounding box is the minimum bounding rectangle of the mask's
    /// foreground. Returns `None` when the mask contains no foreground
    /// pixel, in which case there is nothing to annotate.
    pub fn from_mask(id: u32, mask: RgbaImage, text: impl Into<String>) -> Option<Self> {
        let bbox = geometry::mask_mbr(&mask)?;
        Some(Self {
            id,
            bbox,
            text: text.into(),
            mask: Some(mask),
            region: None,
            mask_dirty: true,
        })
    }

    /// Replace the mask, marking it as needing a save.
    pub fn set_mask(&mut self, mask: RgbaImage) {
        self.mask = Some(mask);
        self.mask_dirty = true;
    }

    /// Release the in-memory mask. It can be reloaded from disk later.
    pub fn drop_mask(&mut self) {
        self.mask = None;
    }

    /// Whether the mask needs writing to disk.
    pub fn mask_dirty(&self) -> bool {
        self.mask_dirty
    }

    /// Load the mask from `path` unless one is already present.
    ///
    /// A missing or unreadable file is logged and leaves the mask absent;
    /// it is not an error.
    pub fn load_mask(&mut self, path: &Path, force: bool) {
        if self.mask.is_some() && !force {
            return;
        }
        match masks::read_mask(path) {
            Ok(mask) => {
                self.mask = Some(mask);
                self.mask_dirty = true;
            }
            Err(e) => {
                self.mask = None;
                log::error!("object mask {} could not be read: {e:#}", path.display());
            }
        }
    }

    /// Write the mask to `path` when present and dirty.
    pub fn save_mask(&mut self, path: &Path) -> Result<()> {
        let Some(mask) = &self.mask else {
            return Ok(());
        };
        if !self.mask_dirty {
            return Ok(());
        }
        masks::write_mask(path, mask)
            .with_context(|| format!("saving mask of object {}", self.id))?;
        self.mask_dirty = false;
        log::info!("object mask saved to {}", path.display());
        Ok(())
    }

    /// Render the preview region: the mask cropped to the bounding box and
    /// color-burned over the brush color. Without a mask the preview is
    /// cleared.
    pub fn render_region(&mut self, brush: Rgba<u8>) {
        let Some(mask) = &self.mask else {
            self.region = None;
            return;
        };
        if self.bbox.is_empty() {
            self.region = None;
            return;
        }

        let (w, h) = (self.bbox.w as u32, self.bbox.h as u32);
        let mut out = RgbaImage::from_pixel(w, h, brush);
        for dy in 0..h {
            for dx in 0..w {
                let sx = self.bbox.x1 + dx as i32;
                let sy = self.bbox.y1 + dy as i32;
                if sx < 0 || sy < 0 || sx as u32 >= mask.width() || sy as u32 >= mask.height() {
                    continue;
                }
                let src = *mask.get_pixel(sx as u32, sy as u32);
                out.put_pixel(dx, dy, geometry::color_burn(brush, src));
            }
        }
        self.region = Some(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRUSH: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn painted_mask() -> RgbaImage {
        let mut mask = RgbaImage::from_pixel(12, 8, Rgba([0, 0, 0, 0]));
        for x in 3..6 {
            for y in 2..4 {
                mask.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        mask
    }

    #[test]
    fn test_from_mask_takes_mbr() {
        let obj = ObjectAnnotation::from_mask(0, painted_mask(), "cup").unwrap();
        assert_eq!(obj.bbox, BoundingBox::new(3, 2, 3, 2));
        assert!(obj.mask_dirty());
    }

    #[test]
    fn test_from_mask_rejects_empty_mask() {
        let empty = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        assert!(ObjectAnnotation::from_mask(0, empty, "nothing").is_none());
    }

    #[test]
    fn test_render_region_matches_bbox_size() {
        let mut obj = ObjectAnnotation::from_mask(1, painted_mask(), "cup").unwrap();
        obj.render_region(BRUSH);
        let region = obj.region.as_ref().unwrap();
        assert_eq!((region.width(), region.height()), (3, 2));
        // painted (white) mask pixels keep the brush color under color burn
        assert_eq!(*region.get_pixel(0, 0), BRUSH);
    }

    #[test]
    fn test_render_region_without_mask_clears_preview() {
        let mut obj = ObjectAnnotation::new(2, BoundingBox::new(0, 0, 4, 4), "ghost");
        obj.region = Some(RgbaImage::new(4, 4));
        obj.render_region(BRUSH);
        assert!(obj.region.is_none());
    }
}
