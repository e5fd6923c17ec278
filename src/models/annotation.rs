// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The directory-level annotation collection.
//!
//! An [`AnnotationSet`] is everything the tool knows about one image
//! directory: the ordered list of per-image annotation records, the index
//! of the image currently being worked on, and the directories the images
//! and annotation files live in.

use crate::io::media;
use crate::models::image::{ImageAnnotations, ImageLabel};
use crate::models::object::ObjectAnnotation;
use anyhow::{Context, Result};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Annotations for a whole directory of images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationSet {
    /// Per-image records, ordered case-insensitively by file name.
    pub images: Vec<ImageAnnotations>,
    /// Index of the current image.
    pub index: usize,
    /// Directory the source images live in.
    pub image_dir: PathBuf,
    /// Directory label files and masks are written to.
    pub annotation_dir: PathBuf,
}

impl AnnotationSet {
    /// An empty set rooted at `image_dir`. Annotations default to the
    /// `ann` subdirectory.
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        let image_dir = image_dir.into();
        let annotation_dir = image_dir.join("ann");
        Self {
            images: Vec::new(),
            index: 0,
            image_dir,
            annotation_dir,
        }
    }

    /// Scan `image_dir` for images and load their label files.
    ///
    /// Every matching file gets a record; files without a label file
    /// simply start with no objects.
    pub fn scan_dir(image_dir: impl Into<PathBuf>, extensions: &[&str]) -> Result<Self> {
        let mut set = Self::new(image_dir);
        set.scan(extensions)?;
        Ok(set)
    }

    /// (Re)populate from the image directory, replacing any loaded state.
    pub fn scan(&mut self, extensions: &[&str]) -> Result<()> {
        let names = media::list_images(&self.image_dir, extensions)?;
        self.images.clear();
        self.index = 0;
        for name in names {
            let mut image = ImageAnnotations::new(name);
            image.load_labels(&self.annotation_dir);
            self.images.push(image);
        }
        log::info!(
            "loaded {} images from {}",
            self.images.len(),
            self.image_dir.display()
        );
        Ok(())
    }

    pub fn num_images(&self) -> usize {
        self.images.len()
    }

    /// Index of the previous image, clamped at the first.
    pub fn prev(&self) -> usize {
        self.index.saturating_sub(1)
    }

    /// Index of the next image, clamped at the last.
    pub fn next(&self) -> usize {
        if self.index + 1 >= self.images.len() {
            self.index
        } else {
            self.index + 1
        }
    }

    /// Move to `index` if it exists; out-of-range requests are ignored.
    /// Returns the current index either way.
    pub fn goto(&mut self, index: usize) -> usize {
        if index < self.images.len() {
            self.index = index;
        }
        self.index
    }

    pub fn image(&self, index: usize) -> Option<&ImageAnnotations> {
        self.images.get(index)
    }

    pub fn image_mut(&mut self, index: usize) -> Option<&mut ImageAnnotations> {
        self.images.get_mut(index)
    }

    pub fn current(&self) -> Option<&ImageAnnotations> {
        self.image(self.index)
    }

    pub fn current_mut(&mut self) -> Option<&mut ImageAnnotations> {
        self.images.get_mut(self.index)
    }

    pub fn image_name(&self, index: usize) -> Option<&str> {
        self.image(index).map(|img| img.file_name.as_str())
    }

    /// Full path of the image at `index`.
    pub fn image_path(&self, index: usize) -> Option<PathBuf> {
        self.image(index)
            .map(|img| media::image_path(&self.image_dir, &img.file_name))
    }

    pub fn current_image_path(&self) -> Option<PathBuf> {
        self.image_path(self.index)
    }

    pub fn num_objects(&self, index: usize) -> usize {
        self.image(index).map_or(0, |img| img.num_objects())
    }

    /// Id for the next object added to the current image.
    pub fn next_object_id(&self) -> u32 {
        self.current().map_or(0, |img| img.next_id())
    }

    /// Point annotation output at `dir`, creating it when missing.
    pub fn set_annotation_dir(&mut self, dir: impl Into<PathBuf>) -> Result<()> {
        let dir = dir.into();
        if !dir.is_dir() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("creating annotation directory {}", dir.display()))?;
            log::info!("created annotation directory {}", dir.display());
        }
        self.annotation_dir = dir;
        Ok(())
    }

    /// Label the current image.
    pub fn set_label(&mut self, label: ImageLabel) {
        if let Some(image) = self.current_mut() {
            image.label = label;
            image.mark_dirty();
        }
    }

    /// Label every image at once.
    pub fn set_all_labels(&mut self, label: ImageLabel) {
        for image in &mut self.images {
            image.label = label;
            image.mark_dirty();
        }
    }

    /// Add an object to the current image.
    pub fn add_object(&mut self, obj: ObjectAnnotation) {
        let index = self.index;
        self.add_object_to(index, obj);
    }

    /// Add an object to the image at `index`.
    pub fn add_object_to(&mut self, index: usize, obj: ObjectAnnotation) {
        if let Some(image) = self.image_mut(index) {
            image.add_object(obj);
        }
    }

    /// Delete objects by id from the current image.
    ///
    /// Masks are loaded first so a later save sees the surviving objects'
    /// masks rather than stale files.
    pub fn delete_objects(&mut self, ids: &[u32]) {
        if ids.is_empty() {
            return;
        }
        let ann_dir = self.annotation_dir.clone();
        if let Some(image) = self.current_mut() {
            image.load_masks(&ann_dir, false);
            for &id in ids {
                image.delete_object(id);
            }
        }
    }

    /// Delete every object of the current image.
    pub fn delete_all_objects(&mut self) {
        if let Some(image) = self.current_mut() {
            image.delete_all_objects();
        }
    }

    /// Release the in-memory masks of the current image.
    pub fn drop_masks(&mut self) {
        if let Some(image) = self.current_mut() {
            image.drop_masks();
        }
    }

    /// Save the current image's masks and label file, then clear its dirty
    /// flag. Without `force`, a clean image is left alone.
    pub fn save_current(&mut self, force: bool) -> Result<()> {
        let ann_dir = self.annotation_dir.clone();
        let index = self.index;
        let Some(image) = self.current_mut() else {
            return Ok(());
        };
        if !image.is_dirty() && !force {
            log::debug!("no change to save for image {index}");
            return Ok(());
        }
        if image.num_objects() > 0 && !ann_dir.is_dir() {
            fs::create_dir_all(&ann_dir)
                .with_context(|| format!("creating annotation directory {}", ann_dir.display()))?;
        }
        image.save_masks(&ann_dir);
        image.save_labels(&ann_dir)?;
        image.mark_clean();
        Ok(())
    }

    /// Write a bounding-box file for every annotated image.
    ///
    /// An image whose file cannot be read is logged and skipped so the
    /// rest of the directory still exports.
    pub fn save_all_boxes(&self) -> Result<()> {
        if !self.annotation_dir.is_dir() && self.images.iter().any(|img| img.num_objects() > 0) {
            fs::create_dir_all(&self.annotation_dir).with_context(|| {
                format!(
                    "creating annotation directory {}",
                    self.annotation_dir.display()
                )
            })?;
        }
        for image in &self.images {
            if let Err(e) = image.save_boxes(&self.image_dir, &self.annotation_dir) {
                log::error!("box export of {} failed: {e:#}", image.file_name);
            }
        }
        Ok(())
    }

    /// Re-read the current image's label file (no-op when it already has
    /// objects).
    pub fn load_current_labels(&mut self) {
        let ann_dir = self.annotation_dir.clone();
        if let Some(image) = self.current_mut() {
            image.load_labels(&ann_dir);
        }
    }

    /// Load the masks of the image at `index` from disk.
    pub fn load_masks(&mut self, index: usize, force: bool) {
        let ann_dir = self.annotation_dir.clone();
        if let Some(image) = self.image_mut(index) {
            image.load_masks(&ann_dir, force);
        }
    }

    /// Render preview regions for the image at `index`, loading masks on
    /// demand.
    pub fn render_regions(&mut self, index: usize, brush: Rgba<u8>, force: bool) {
        let ann_dir = self.annotation_dir.clone();
        if let Some(image) = self.image_mut(index) {
            image.render_regions(&ann_dir, brush, force);
        }
    }
}
