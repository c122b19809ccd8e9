use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

use super::converter::Conversion;
use super::error::CursorResult;
use super::fs_ops::ensure_dir;
use crate::model::report::CursorReport;

#[derive(Debug, Clone)]
pub struct SpriteOutputs {
    pub image_path: PathBuf,
    pub info_path: PathBuf,
}

pub fn write_png(image: &RgbaImage, path: &Path) -> CursorResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

pub fn format_info(report: &CursorReport) -> String {
    format!(
        "Source: {}\n\
         ---------------------------\n\
         Type: {}\n\
         Frames: {}\n\
         Frame Duration: {:.4}\n\
         Hot Spot: {{{}, {}}}\n\
         Size: {{{}, {}}}\n",
        report.source,
        report.type_label,
        report.frames,
        report.frame_duration,
        report.hotspot.0,
        report.hotspot.1,
        report.frame_size.0,
        report.frame_size.1
    )
}

pub fn write_info_file(path: &Path, report: &CursorReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    fs::write(path, format_info(report))?;
    Ok(())
}

/// Writes `<stem>.png` and `<stem>_info.txt` into `output_dir`.
pub fn write_outputs(conversion: &Conversion, output_dir: &Path) -> Result<SpriteOutputs> {
    let stem = Path::new(&conversion.report.source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("cursor");

    let image_path = output_dir.join(format!("{}.png", stem));
    let info_path = output_dir.join(format!("{}_info.txt", stem));

    write_png(&conversion.sheet.canvas, &image_path)
        .with_context(|| format!("Failed to write {}", image_path.display()))?;
    write_info_file(&info_path, &conversion.report)
        .with_context(|| format!("Failed to write {}", info_path.display()))?;

    Ok(SpriteOutputs {
        image_path,
        info_path,
    })
}
