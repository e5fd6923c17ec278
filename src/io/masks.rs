// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-object mask files.
//!
//! Each object's pixel mask is stored as `<stem>.<id>.png` inside the
//! annotation directory, where `<stem>` is the image file name without its
//! extension. The PNG's alpha channel carries the selected region.

use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Mask file for object `id` of image `file_name`: `cat.png` + id 3 ->
/// `cat.3.png`.
pub fn mask_path(ann_dir: &Path, file_name: &str, id: u32) -> PathBuf {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    ann_dir.join(format!("{stem}.{id}.png"))
}

/// Decode a mask file to RGBA.
pub fn read_mask(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).with_context(|| format!("reading mask {}", path.display()))?;
    Ok(img.to_rgba8())
}

/// Encode a mask as an RGBA PNG.
pub fn write_mask(path: &Path, mask: &RgbaImage) -> Result<()> {
    mask.save(path)
        .with_context(|| format!("writing mask {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_mask_path_drops_the_image_extension() {
        let ann_dir = Path::new("/data/ann");
        assert_eq!(
            mask_path(ann_dir, "cat.png", 3),
            PathBuf::from("/data/ann/cat.3.png")
        );
        assert_eq!(
            mask_path(ann_dir, "archive.tar.jpg", 0),
            PathBuf::from("/data/ann/archive.tar.0.png")
        );
    }

    #[test]
    fn test_round_trip_preserves_alpha() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.0.png");

        let mut mask = RgbaImage::from_pixel(6, 4, Rgba([0, 0, 0, 0]));
        mask.put_pixel(2, 1, Rgba([255, 0, 0, 128]));
        write_mask(&path, &mask).unwrap();

        let loaded = read_mask(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (6, 4));
        assert_eq!(*loaded.get_pixel(2, 1), Rgba([255, 0, 0, 128]));
        assert_eq!(*loaded.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_read_missing_mask_fails() {
        let dir = tempdir().unwrap();
        assert!(read_mask(&dir.path().join("absent.0.png")).is_err());
    }
}
