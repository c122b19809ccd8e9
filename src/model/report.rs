use crate::pipeline::sprite::CompositeResult;

/// Derived metadata for one converted cursor file.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorReport {
    pub source: String,
    pub type_label: String,
    pub frames: u32,
    pub frame_duration: f64,
    pub hotspot: (u32, u32),
    pub frame_size: (u32, u32),
}

impl CursorReport {
    pub fn new(
        source: impl Into<String>,
        type_label: impl Into<String>,
        sheet: &CompositeResult,
    ) -> Self {
        Self {
            source: source.into(),
            type_label: type_label.into(),
            frames: sheet.total_frames,
            frame_duration: sheet.unit_duration_secs,
            hotspot: sheet.hotspot,
            frame_size: sheet.frame_size,
        }
    }

    pub fn info(&self) -> String {
        format!(
            "{} ({}) - {} frames @ {:.4}s, hotspot {:?}, size {:?}",
            self.source,
            self.type_label,
            self.frames,
            self.frame_duration,
            self.hotspot,
            self.frame_size
        )
    }
}
