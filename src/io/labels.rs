// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image label files.
//!
//! `<fileName>.labels.txt` holds one image's objects in a plain text
//! format: the first line is the image file name, every further line is
//! `id x1 y1 w h label-text`. The label text is free UTF-8 and may itself
//! contain spaces.

use crate::models::object::ObjectAnnotation;
use crate::util::geometry::BoundingBox;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Label file for `file_name` inside the annotation directory.
///
/// The image file name keeps its extension: `cat.png` -> `cat.png.labels.txt`.
pub fn labels_path(ann_dir: &Path, file_name: &str) -> PathBuf {
    ann_dir.join(format!("{file_name}.labels.txt"))
}

/// Read the objects stored in a label file.
///
/// A missing file means no annotations and yields an empty list. A line
/// that does not match the format (fewer than six tokens, non-integer
/// numeric fields, or a duplicate id) aborts parsing of the file with a
/// warning; objects parsed before the bad line are kept.
pub fn read_labels(path: &Path) -> Vec<ObjectAnnotation> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::debug!("no label file {}: {e}", path.display());
            return Vec::new();
        }
    };

    let mut objects = Vec::new();
    for line in content.lines().skip(1) {
        let Some(obj) = parse_line(line) else {
            log::warn!("label file {} not in the expected format, stopping", path.display());
            break;
        };
        if objects.iter().any(|o: &ObjectAnnotation| o.id == obj.id) {
            log::warn!("label file {} repeats object id {}, stopping", path.display(), obj.id);
            break;
        }
        objects.push(obj);
    }

    if !objects.is_empty() {
        log::info!("loaded {} objects from {}", objects.len(), path.display());
    }
    objects
}

/// Parse one `id x1 y1 w h label-text` line.
fn parse_line(line: &str) -> Option<ObjectAnnotation> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 6 {
        return None;
    }
    let id = tokens[0].parse().ok()?;
    let x1 = tokens[1].parse().ok()?;
    let y1 = tokens[2].parse().ok()?;
    let w = tokens[3].parse().ok()?;
    let h = tokens[4].parse().ok()?;
    let text = tokens[5..].join(" ");
    Some(ObjectAnnotation::new(id, BoundingBox::new(x1, y1, w, h), text))
}

/// Write a label file for `file_name` holding `objects`.
pub fn write_labels(path: &Path, file_name: &str, objects: &[ObjectAnnotation]) -> Result<()> {
    let mut out = String::from(file_name);
    for obj in objects {
        out.push('\n');
        out.push_str(&format!(
            "{} {} {} {} {} {}",
            obj.id, obj.bbox.x1, obj.bbox.y1, obj.bbox.w, obj.bbox.h, obj.text
        ));
    }
    fs::write(path, out).with_context(|| format!("writing label file {}", path.display()))?;
    log::info!("saved {}", path.display());
    Ok(())
}
