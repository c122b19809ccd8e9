// Frame-rate normalization into a sprite-sheet repeat schedule

use super::error::{CursorError, CursorResult};

/// Constant display interval plus how many times each source frame repeats.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSchedule {
    pub unit_duration_secs: f64,
    pub multipliers: Vec<u32>,
}

impl TimingSchedule {
    /// Schedule for a still image: one frame shown for one second.
    pub fn still() -> Self {
        Self {
            unit_duration_secs: 1.0,
            multipliers: vec![1],
        }
    }

    pub fn total_frames(&self) -> u64 {
        self.multipliers.iter().map(|&m| m as u64).sum()
    }
}

/// Converts per-frame tick counts into a minimal-unit multiplier schedule.
///
/// The unit is the smallest positive rate; every frame repeats
/// `max(1, round(rate / unit))` times. Ratios are taken on the integer tick
/// counts so the result does not depend on the tick factor's float
/// representation. Halves round away from zero.
pub fn normalize(rates_ticks: &[u32], tick_seconds: f64) -> CursorResult<TimingSchedule> {
    let min_ticks = rates_ticks
        .iter()
        .copied()
        .filter(|&r| r > 0)
        .min()
        .ok_or(CursorError::NoPositiveRate)?;

    let multipliers = rates_ticks
        .iter()
        .map(|&ticks| {
            let ratio = ticks as f64 / min_ticks as f64;
            (ratio.round() as u32).max(1)
        })
        .collect();

    Ok(TimingSchedule {
        unit_duration_secs: min_ticks as f64 * tick_seconds,
        multipliers,
    })
}
