// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image directory access.
//!
//! Listing the image files of a directory and probing image dimensions
//! without decoding pixel data.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions scanned for when the caller does not supply a filter.
pub const DEFAULT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Width and height of the image at `path`.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path)
        .with_context(|| format!("reading dimensions of {}", path.display()))
}

/// File names of the images directly inside `dir`.
///
/// The extension match is case-insensitive and the result is sorted
/// case-insensitively, so `Apple.PNG` lists before `banana.png`.
pub fn list_images(dir: &Path, extensions: &[&str]) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }

    names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
    Ok(names)
}

/// Full path of an image by name.
pub fn image_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn touch_image(dir: &Path, name: &str) {
        image::RgbImage::from_pixel(2, 2, image::Rgb([1, 1, 1]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_list_images_filters_and_sorts() {
        let dir = tempdir().unwrap();
        touch_image(dir.path(), "banana.png");
        touch_image(dir.path(), "Apple.png");
        touch_image(dir.path(), "cherry.jpg");
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let pngs = list_images(dir.path(), &["png"]).unwrap();
        assert_eq!(pngs, vec!["Apple.png", "banana.png"]);

        let all = list_images(dir.path(), DEFAULT_EXTENSIONS).unwrap();
        assert_eq!(all, vec!["Apple.png", "banana.png", "cherry.jpg"]);
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let dir = tempdir().unwrap();
        touch_image(dir.path(), "shout.PNG");
        assert_eq!(list_images(dir.path(), &["png"]).unwrap(), vec!["shout.PNG"]);
    }

    #[test]
    fn test_image_dimensions() {
        let dir = tempdir().unwrap();
        RgbaImage::from_pixel(9, 4, Rgba([0, 0, 0, 255]))
            .save(dir.path().join("wide.png"))
            .unwrap();
        assert_eq!(
            image_dimensions(&dir.path().join("wide.png")).unwrap(),
            (9, 4)
        );
    }
}
