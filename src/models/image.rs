// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image annotation state.
//!
//! One [`ImageAnnotations`] holds everything known about a single source
//! image: its whole-image label, the ordered list of annotated objects,
//! and a dirty flag tracking unsaved edits. It also orchestrates the
//! per-image persistence (label file, box file, object mask files).

use crate::io::{boxes, labels, masks};
use crate::models::object::ObjectAnnotation;
use anyhow::Result;
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Whole-image classification label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageLabel {
    Positive,
    Negative,
    #[default]
    Skip,
}

impl fmt::Display for ImageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageLabel::Positive => "positive",
            ImageLabel::Negative => "negative",
            ImageLabel::Skip => "skip",
        };
        f.write_str(name)
    }
}

/// One source image's annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnnotations {
    /// Image file name, relative to the image directory.
    pub file_name: String,
    /// Whole-image label.
    #[serde(default)]
    pub label: ImageLabel,
    /// Annotated objects, in creation order.
    pub objects: Vec<ObjectAnnotation>,
    /// Unsaved edits exist.
    #[serde(skip)]
    dirty: bool,
}

impl ImageAnnotations {
    /// Create an empty annotation record for `file_name`.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            label: ImageLabel::default(),
            objects: Vec::new(),
            dirty: false,
        }
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    /// Whether any object uses `id`.
    pub fn has_id(&self, id: u32) -> bool {
        self.objects.iter().any(|obj| obj.id == id)
    }

    /// The lowest id not in use, filling gaps left by deletions.
    pub fn next_id(&self) -> u32 {
        let count = self.objects.len() as u32;
        (0..count).find(|id| !self.has_id(*id)).unwrap_or(count)
    }

    pub fn object(&self, id: u32) -> Option<&ObjectAnnotation> {
        self.objects.iter().find(|obj| obj.id == id)
    }

    pub fn object_mut(&mut self, id: u32) -> Option<&mut ObjectAnnotation> {
        self.objects.iter_mut().find(|obj| obj.id == id)
    }

    /// Append an object and mark the image as modified.
    pub fn add_object(&mut self, obj: ObjectAnnotation) {
        self.objects.push(obj);
        self.dirty = true;
    }

    /// Delete the object with `id`, if present.
    pub fn delete_object(&mut self, id: u32) {
        let before = self.objects.len();
        self.objects.retain(|obj| obj.id != id);
        if self.objects.len() != before {
            self.dirty = true;
        }
    }

    /// Delete every object.
    pub fn delete_all_objects(&mut self) {
        if !self.objects.is_empty() {
            self.objects.clear();
            self.dirty = true;
        }
    }

    /// Release every in-memory mask. The files on disk stay untouched.
    pub fn drop_masks(&mut self) {
        for obj in &mut self.objects {
            obj.drop_mask();
        }
    }

    pub fn object_text(&self, id: u32) -> Option<&str> {
        self.object(id).map(|obj| obj.text.as_str())
    }

    /// Set the text label of the object with `id`.
    pub fn set_object_text(&mut self, id: u32, text: impl Into<String>) {
        if let Some(obj) = self.object_mut(id) {
            obj.text = text.into();
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Load object masks from the annotation directory.
    ///
    /// Only masks whose file exists are loaded; anything else is left as
    /// it is. With `force` set, already-loaded masks are re-read.
    pub fn load_masks(&mut self, ann_dir: &Path, force: bool) {
        for obj in &mut self.objects {
            let path = masks::mask_path(ann_dir, &self.file_name, obj.id);
            if path.exists() {
                obj.load_mask(&path, force);
            }
        }
    }

    /// Write every dirty object mask to the annotation directory.
    ///
    /// A mask that fails to save is logged and skipped so the remaining
    /// masks still get written.
    pub fn save_masks(&mut self, ann_dir: &Path) {
        for obj in &mut self.objects {
            let path = masks::mask_path(ann_dir, &self.file_name, obj.id);
            if let Err(e) = obj.save_mask(&path) {
                log::error!("could not save mask {}: {e:#}", path.display());
            }
        }
    }

    /// Render the preview region of every object, loading masks on demand.
    pub fn render_regions(&mut self, ann_dir: &Path, brush: Rgba<u8>, force: bool) {
        for obj in &mut self.objects {
            if obj.region.is_some() && !force {
                continue;
            }
            if obj.mask.is_none() {
                let path = masks::mask_path(ann_dir, &self.file_name, obj.id);
                if path.exists() {
                    obj.load_mask(&path, false);
                }
            }
            if obj.mask.is_some() {
                obj.render_region(brush);
            }
        }
    }

    /// Read objects from this image's label file, unless objects are
    /// already present.
    pub fn load_labels(&mut self, ann_dir: &Path) {
        if !self.objects.is_empty() {
            log::debug!("{}: objects already present, label file not loaded", self.file_name);
            return;
        }
        let path = labels::labels_path(ann_dir, &self.file_name);
        self.objects = labels::read_labels(&path);
    }

    /// Write this image's label file. Images without objects get no file.
    pub fn save_labels(&self, ann_dir: &Path) -> Result<()> {
        if self.objects.is_empty() {
            return Ok(());
        }
        let path = labels::labels_path(ann_dir, &self.file_name);
        labels::write_labels(&path, &self.file_name, &self.objects)
    }

    /// Write this image's bounding-box file. Images without objects get no
    /// file.
    pub fn save_boxes(&self, image_dir: &Path, ann_dir: &Path) -> Result<()> {
        if self.objects.is_empty() {
            return Ok(());
        }
        boxes::write_boxes(ann_dir, image_dir, self)
    }
}
