// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image bounding-box files.
//!
//! `<fileName>.box.txt` lists an image's object boxes the way a text
//! detector would report them: the image path on the first line, the image
//! dimensions on the second, then one `x1 y1 w h` line per object. These
//! files are export-only; nothing reads them back.

use crate::io::media;
use crate::models::image::ImageAnnotations;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Box file for `file_name` inside the annotation directory.
pub fn box_path(ann_dir: &Path, file_name: &str) -> PathBuf {
    ann_dir.join(format!("{file_name}.box.txt"))
}

/// Write the bounding-box file for one image.
///
/// The dimensions on the second line are read from the image file itself,
/// so the image must exist under `image_dir`.
pub fn write_boxes(ann_dir: &Path, image_dir: &Path, image: &ImageAnnotations) -> Result<()> {
    let image_path = image_dir.join(&image.file_name);
    let (width, height) = media::image_dimensions(&image_path)?;

    let mut out = image_path.display().to_string();
    out.push_str(&format!("\n{width} {height}"));
    for obj in &image.objects {
        out.push_str(&format!(
            "\n{} {} {} {}",
            obj.bbox.x1, obj.bbox.y1, obj.bbox.w, obj.bbox.h
        ));
    }

    let path = box_path(ann_dir, &image.file_name);
    fs::write(&path, out).with_context(|| format!("writing box file {}", path.display()))?;
    log::info!("saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::object::ObjectAnnotation;
    use crate::util::geometry::BoundingBox;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_box_file_uses_on_disk_dimensions() {
        let dir = tempdir().unwrap();
        let image_dir = dir.path();
        let img_path = image_dir.join("shelf.png");
        RgbaImage::from_pixel(7, 5, Rgba([9, 9, 9, 255]))
            .save(&img_path)
            .unwrap();

        let mut image = ImageAnnotations::new("shelf.png");
        image.add_object(ObjectAnnotation::new(0, BoundingBox::new(1, 2, 3, 2), "jar"));
        image.add_object(ObjectAnnotation::new(1, BoundingBox::new(4, 0, 2, 5), "tin"));

        write_boxes(image_dir, image_dir, &image).unwrap();

        let content = fs::read_to_string(box_path(image_dir, "shelf.png")).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(img_path.display().to_string().as_str()));
        assert_eq!(lines.next(), Some("7 5"));
        assert_eq!(lines.next(), Some("1 2 3 2"));
        assert_eq!(lines.next(), Some("4 0 2 5"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let dir = tempdir().unwrap();
        let mut image = ImageAnnotations::new("gone.png");
        image.add_object(ObjectAnnotation::new(0, BoundingBox::new(0, 0, 1, 1), "x"));
        assert!(write_boxes(dir.path(), dir.path(), &image).is_err());
    }
}
