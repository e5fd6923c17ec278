// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! maskann - mask annotation toolkit
//!
//! Command line front end for the annotation model: directory summaries,
//! bounding-box exports, snapshot exports, and mask inspection.

use anyhow::Result;
use clap::Parser;
use maskann::io::{masks, media, serialization};
use maskann::util::geometry;
use maskann::AnnotationSet;
use prettytable::{cell, row, Table};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[clap(name = "maskann", about = "Object mask annotation toolkit")]
enum Opts {
    /// Summarize the annotations of an image directory
    Info {
        /// image directory
        image_dir: PathBuf,
        /// image file extensions to scan for
        #[clap(long = "ext")]
        extensions: Vec<String>,
        /// annotation directory (defaults to <image_dir>/ann)
        #[clap(long)]
        ann_dir: Option<PathBuf>,
    },
    /// Write a .box.txt bounding-box file for every annotated image
    ExportBoxes {
        /// image directory
        image_dir: PathBuf,
        /// image file extensions to scan for
        #[clap(long = "ext")]
        extensions: Vec<String>,
        /// annotation directory (defaults to <image_dir>/ann)
        #[clap(long)]
        ann_dir: Option<PathBuf>,
    },
    /// Export the whole annotation set as JSON or YAML
    Export {
        /// image directory
        image_dir: PathBuf,
        /// output file; the extension picks the format (.json, .yaml)
        #[clap(short, long)]
        output: PathBuf,
        /// image file extensions to scan for
        #[clap(long = "ext")]
        extensions: Vec<String>,
        /// annotation directory (defaults to <image_dir>/ann)
        #[clap(long)]
        ann_dir: Option<PathBuf>,
    },
    /// Print the minimum bounding rectangle of a mask file
    Mbr {
        /// mask PNG file
        mask_file: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Opts::parse() {
        Opts::Info {
            image_dir,
            extensions,
            ann_dir,
        } => {
            let set = load_set(image_dir, &extensions, ann_dir, false)?;
            info(&set);
        }
        Opts::ExportBoxes {
            image_dir,
            extensions,
            ann_dir,
        } => {
            let set = load_set(image_dir, &extensions, ann_dir, true)?;
            set.save_all_boxes()?;
        }
        Opts::Export {
            image_dir,
            output,
            extensions,
            ann_dir,
        } => {
            let set = load_set(image_dir, &extensions, ann_dir, false)?;
            serialization::export(&set, &output)?;
            println!("exported {} images to {}", set.num_images(), output.display());
        }
        Opts::Mbr { mask_file } => {
            let mask = masks::read_mask(&mask_file)?;
            match geometry::mask_mbr(&mask) {
                Some(bbox) => println!("{} {} {} {}", bbox.x1, bbox.y1, bbox.w, bbox.h),
                None => println!("no foreground pixels in {}", mask_file.display()),
            }
        }
    }

    Ok(())
}

/// Scan an image directory, honoring the extension and annotation
/// directory overrides. `create_ann_dir` controls whether a missing
/// annotation directory is created (exports) or merely referenced
/// (read-only commands).
fn load_set(
    image_dir: PathBuf,
    extensions: &[String],
    ann_dir: Option<PathBuf>,
    create_ann_dir: bool,
) -> Result<AnnotationSet> {
    let extensions: Vec<&str> = if extensions.is_empty() {
        media::DEFAULT_EXTENSIONS.to_vec()
    } else {
        extensions.iter().map(String::as_str).collect()
    };

    let mut set = AnnotationSet::new(image_dir);
    if let Some(dir) = ann_dir {
        if create_ann_dir {
            set.set_annotation_dir(dir)?;
        } else {
            set.annotation_dir = dir;
        }
    }
    set.scan(&extensions)?;
    Ok(set)
}

/// Print a per-image summary table plus totals.
fn info(set: &AnnotationSet) {
    let mut table = Table::new();
    table.add_row(row!["image", "label", "objects", "object labels"]);

    for image in &set.images {
        let texts: Vec<&str> = image.objects.iter().map(|obj| obj.text.as_str()).collect();
        table.add_row(row![
            image.file_name,
            image.label,
            image.num_objects(),
            texts.join(", ")
        ]);
    }
    table.printstd();

    let total: usize = set.images.iter().map(|img| img.num_objects()).sum();
    println!("{} images, {} objects", set.num_images(), total);
}
