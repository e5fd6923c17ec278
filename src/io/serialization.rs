// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation set serialization and deserialization.
//!
//! This module handles exporting and importing a whole annotation set as
//! a single snapshot file in YAML or JSON format. Snapshots carry the
//! structural state (file names, labels, object boxes and texts) but no
//! pixel data; masks stay in their own PNG files.

use crate::models::annotation::AnnotationSet;
use anyhow::{bail, Result};
use std::path::Path;

/// Export an annotation set to YAML format.
pub fn export_yaml(data: &AnnotationSet, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export an annotation set to JSON format.
pub fn export_json(data: &AnnotationSet, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import an annotation set from YAML format.
pub fn import_yaml(path: &Path) -> Result<AnnotationSet> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Import an annotation set from JSON format.
pub fn import_json(path: &Path) -> Result<AnnotationSet> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Export to the format matching the file extension (`.json`, `.yaml`,
/// `.yml`).
pub fn export(data: &AnnotationSet, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(data, path),
        Some("json") => export_json(data, path),
        other => bail!("unsupported annotation file extension: {other:?}"),
    }
}

/// Import from the format matching the file extension.
pub fn import(path: &Path) -> Result<AnnotationSet> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        other => bail!("unsupported annotation file extension: {other:?}"),
    }
}
