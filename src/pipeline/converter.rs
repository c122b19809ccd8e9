// High-level conversion API: cursor file -> sprite sheet + report

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use super::{
    CursorFormat,
    ani::{AniParser, TICK_SECONDS},
    cur::{CurParser, DecodedFrame},
    error::{CursorError, CursorResult},
    fs_ops::ensure_dir,
    sprite::{CompositeResult, composite},
    sprite_writer::{SpriteOutputs, write_outputs},
    timing::{TimingSchedule, normalize},
};
use crate::model::report::CursorReport;

#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    /// Side length of the square every frame is resized to.
    pub target_size: Option<u32>,
}

impl ConversionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// A size of 0 disables resizing.
    pub fn with_target_size(mut self, size: u32) -> Self {
        self.target_size = (size > 0).then_some(size);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Conversion {
    pub report: CursorReport,
    pub sheet: CompositeResult,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub result: Result<SpriteOutputs>,
}

/// Runs the full decode pipeline over an in-memory file.
pub fn convert_bytes(
    data: &[u8],
    format: CursorFormat,
    options: &ConversionOptions,
) -> CursorResult<CompositeResult> {
    match format {
        CursorFormat::Ani => {
            let ani = AniParser::parse(data)?;
            let frames = decode_frames(&ani.frames)?;
            let schedule = normalize(&ani.frame_rates(), TICK_SECONDS)?;
            composite(frames, &schedule, options.target_size)
        }
        CursorFormat::Cur => {
            let frame = CurParser::decode(data)?;
            composite(vec![frame], &TimingSchedule::still(), options.target_size)
        }
    }
}

fn decode_frames(blobs: &[Vec<u8>]) -> CursorResult<Vec<DecodedFrame>> {
    blobs
        .iter()
        .enumerate()
        .map(|(idx, blob)| {
            CurParser::decode(blob).map_err(|e| match e {
                CursorError::InvalidFrameBlob(msg) => {
                    CursorError::InvalidFrameBlob(format!("frame {}: {}", idx, msg))
                }
                other => other,
            })
        })
        .collect()
}

pub fn convert_file<C>(path: &Path, options: &ConversionOptions, classify: C) -> Result<Conversion>
where
    C: Fn(&str) -> String,
{
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let format = CursorFormat::resolve(path, &data)?;
    let sheet = convert_bytes(&data, format, options)
        .with_context(|| format!("Failed to convert {}", path.display()))?;

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cursor".to_string());
    let type_label = classify(&source);
    let report = CursorReport::new(source, type_label, &sheet);
    log::info!("Converted {}", report.info());

    Ok(Conversion { report, sheet })
}

/// Converts every file on a worker pool and writes its outputs. One file
/// failing never stops the others; outcomes keep input order.
pub fn batch_convert<C>(
    files: &[PathBuf],
    output_dir: &Path,
    options: &ConversionOptions,
    classify: C,
    thread_count: usize,
) -> Result<Vec<BatchOutcome>>
where
    C: Fn(&str) -> String + Sync,
{
    ensure_dir(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("Failed to build worker pool")?;

    let outcomes: Vec<BatchOutcome> = pool.install(|| {
        files
            .par_iter()
            .map(|input| {
                let result = convert_file(input, options, &classify)
                    .and_then(|conversion| write_outputs(&conversion, output_dir));
                match &result {
                    Ok(outputs) => log::info!("  ✓ Wrote {}", outputs.image_path.display()),
                    Err(e) => log::error!("  ✗ {:#}", e),
                }
                BatchOutcome {
                    input: input.clone(),
                    result,
                }
            })
            .collect()
    });

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    log::info!(
        "Completed with {} successes and {} failures",
        outcomes.len() - failed,
        failed
    );

    Ok(outcomes)
}
