// Vertical sprite sheet composition

use image::RgbaImage;
use image::error::{ImageError, LimitError, LimitErrorKind};
use image::imageops::{self, FilterType};

use super::cur::DecodedFrame;
use super::error::{CursorError, CursorResult};
use super::timing::TimingSchedule;

/// Matches the allocation ceiling the image crate applies to its decoders.
const MAX_CANVAS_BYTES: u64 = 512 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct CompositeResult {
    /// Hotspot of the first frame, rescaled when frames were resized.
    pub hotspot: (u32, u32),
    /// Dimensions of the first frame after resizing.
    pub frame_size: (u32, u32),
    pub total_frames: u32,
    pub unit_duration_secs: f64,
    pub canvas: RgbaImage,
}

/// Scales a hotspot by the factor that maps `original_width` onto `target_size`,
/// truncating toward zero.
pub fn scale_hotspot(hotspot: (u16, u16), original_width: u32, target_size: u32) -> (u32, u32) {
    let scale = if original_width > 0 {
        target_size as f64 / original_width as f64
    } else {
        1.0
    };
    (
        (hotspot.0 as f64 * scale) as u32,
        (hotspot.1 as f64 * scale) as u32,
    )
}

/// Nearest-neighbor resize to a `size`×`size` square, keeping hard pixel edges.
pub fn resize_square(image: &RgbaImage, size: u32) -> RgbaImage {
    imageops::resize(image, size, size, FilterType::Nearest)
}

/// Stacks frames top to bottom, each repeated per the schedule and centered
/// horizontally on a transparent canvas as wide as the widest frame.
///
/// An empty frame list yields a 0×0 canvas. Frames without a multiplier are
/// shown once. A sheet whose height or frame count overflows `u32`, or whose
/// pixel buffer exceeds `MAX_CANVAS_BYTES`, fails before anything is allocated.
pub fn composite(
    frames: Vec<DecodedFrame>,
    schedule: &TimingSchedule,
    target_size: Option<u32>,
) -> CursorResult<CompositeResult> {
    let target_size = target_size.filter(|&size| size > 0);

    let mut hotspot = (0, 0);
    let mut images = Vec::with_capacity(frames.len());
    for (idx, frame) in frames.into_iter().enumerate() {
        let image = match target_size {
            Some(size) => {
                if idx == 0 {
                    hotspot = scale_hotspot(frame.hotspot, frame.width(), size);
                }
                resize_square(&frame.image, size)
            }
            None => {
                if idx == 0 {
                    hotspot = (frame.hotspot.0 as u32, frame.hotspot.1 as u32);
                }
                frame.image
            }
        };
        images.push(image);
    }

    if !images.is_empty() && schedule.multipliers.len() != images.len() {
        log::warn!(
            "{} multipliers for {} frames, unmatched frames are shown once",
            schedule.multipliers.len(),
            images.len()
        );
    }
    let repeats: Vec<u32> = (0..images.len())
        .map(|idx| schedule.multipliers.get(idx).copied().unwrap_or(1).max(1))
        .collect();

    let frame_size = images.first().map_or((0, 0), |img| img.dimensions());
    let width = images.iter().map(|img| img.width()).max().unwrap_or(0);
    let height = images
        .iter()
        .zip(&repeats)
        .try_fold(0u32, |acc, (img, &count)| {
            img.height()
                .checked_mul(count)
                .and_then(|rows| acc.checked_add(rows))
        })
        .ok_or_else(sheet_too_large)?;
    let total_frames = repeats
        .iter()
        .try_fold(0u32, |acc, &count| acc.checked_add(count))
        .ok_or_else(sheet_too_large)?;
    if width as u64 * height as u64 * 4 > MAX_CANVAS_BYTES {
        return Err(sheet_too_large());
    }

    let mut canvas = RgbaImage::new(width, height);
    let mut y = 0i64;
    for (img, &count) in images.iter().zip(&repeats) {
        let x = ((width - img.width()) / 2) as i64;
        for _ in 0..count {
            imageops::replace(&mut canvas, img, x, y);
            y += img.height() as i64;
        }
    }

    log::debug!(
        "Composited {} frames ({} expanded) into {}x{}",
        images.len(),
        total_frames,
        width,
        height
    );

    Ok(CompositeResult {
        hotspot,
        frame_size,
        total_frames,
        unit_duration_secs: schedule.unit_duration_secs,
        canvas,
    })
}

fn sheet_too_large() -> CursorError {
    CursorError::CodecFailure(ImageError::Limits(LimitError::from_kind(
        LimitErrorKind::DimensionError,
    )))
}
