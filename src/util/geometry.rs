// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the bounding-box type shared by the object model
//! and the pixel-level operations over painted masks: minimum bounding
//! rectangle extraction and the blend used for object preview regions.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixel coordinates.
///
/// `(x1, y1)` is the top-left corner; `w` and `h` are the extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub w: i32,
    pub h: i32,
}

impl BoundingBox {
    /// Create a bounding box from its top-left corner and size.
    pub fn new(x1: i32, y1: i32, w: i32, h: i32) -> Self {
        Self { x1, y1, w, h }
    }

    /// Exclusive right edge.
    pub fn x2(&self) -> i32 {
        self.x1 + self.w
    }

    /// Exclusive bottom edge.
    pub fn y2(&self) -> i32 {
        self.y1 + self.h
    }

    /// A box with zero or negative extent covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// Compute the minimum bounding rectangle of the foreground of a mask.
///
/// A pixel counts as foreground when any of its red, green, or blue
/// channels is nonzero; the alpha channel is not consulted. Returns `None`
/// when the mask contains no foreground pixel. A single foreground pixel
/// at `(x, y)` yields a 1x1 box at `(x, y)`.
pub fn mask_mbr(mask: &RgbaImage) -> Option<BoundingBox> {
    let (mut x1, mut y1) = (i32::MAX, i32::MAX);
    let (mut x2, mut y2) = (i32::MIN, i32::MIN);
    let mut found = false;

    for (x, y, pixel) in mask.enumerate_pixels() {
        let Rgba([r, g, b, _]) = *pixel;
        if r > 0 || g > 0 || b > 0 {
            found = true;
            x1 = x1.min(x as i32);
            y1 = y1.min(y as i32);
            x2 = x2.max(x as i32);
            y2 = y2.max(y as i32);
        }
    }

    if found {
        Some(BoundingBox::new(x1, y1, x2 - x1 + 1, y2 - y1 + 1))
    } else {
        None
    }
}

/// Color-burn blend of a mask pixel over a brush-colored backdrop.
///
/// Channel formula: `255 - min(255, (255 - backdrop) * 255 / source)`,
/// with a zero source channel burning to black. Alpha is composed with
/// the usual source-over rule.
pub fn color_burn(backdrop: Rgba<u8>, source: Rgba<u8>) -> Rgba<u8> {
    fn burn(b: u8, s: u8) -> u8 {
        if s == 0 {
            return 0;
        }
        let inverted = (255 - b as u32) * 255 / s as u32;
        255 - inverted.min(255) as u8
    }

    let Rgba([br, bg, bb, ba]) = backdrop;
    let Rgba([sr, sg, sb, sa]) = source;
    let alpha = sa as u32 + ba as u32 * (255 - sa as u32) / 255;
    Rgba([burn(br, sr), burn(bg, sg), burn(bb, sb), alpha.min(255) as u8])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 0]))
    }

    #[test]
    fn test_mbr_all_background() {
        let mask = blank(8, 8);
        assert_eq!(mask_mbr(&mask), None);
    }

    #[test]
    fn test_mbr_single_pixel() {
        let mut mask = blank(10, 6);
        mask.put_pixel(4, 2, Rgba([255, 0, 0, 255]));
        assert_eq!(mask_mbr(&mask), Some(BoundingBox::new(4, 2, 1, 1)));
    }

    #[test]
    fn test_mbr_scattered_pixels() {
        let mut mask = blank(20, 20);
        mask.put_pixel(3, 7, Rgba([0, 128, 0, 255]));
        mask.put_pixel(15, 4, Rgba([0, 0, 1, 255]));
        mask.put_pixel(9, 18, Rgba([10, 10, 10, 255]));
        assert_eq!(mask_mbr(&mask), Some(BoundingBox::new(3, 4, 13, 15)));
    }

    #[test]
    fn test_mbr_ignores_alpha_only_pixels() {
        let mut mask = blank(5, 5);
        // alpha without color is background for MBR purposes
        mask.put_pixel(2, 2, Rgba([0, 0, 0, 255]));
        assert_eq!(mask_mbr(&mask), None);
    }

    #[test]
    fn test_bounding_box_edges() {
        let bbox = BoundingBox::new(4, 2, 3, 5);
        assert_eq!(bbox.x2(), 7);
        assert_eq!(bbox.y2(), 7);
        assert!(!bbox.is_empty());
        assert!(BoundingBox::new(0, 0, 0, 3).is_empty());
    }

    #[test]
    fn test_color_burn_extremes() {
        let brush = Rgba([200, 100, 50, 255]);
        // white source leaves the backdrop untouched
        assert_eq!(
            color_burn(brush, Rgba([255, 255, 255, 255])),
            Rgba([200, 100, 50, 255])
        );
        // black source burns to black
        assert_eq!(
            color_burn(brush, Rgba([0, 0, 0, 255])),
            Rgba([0, 0, 0, 255])
        );
    }
}
