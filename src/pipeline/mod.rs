pub mod ani;
pub mod converter;
pub mod cur;
pub mod error;
pub mod fs_ops;
pub mod sprite;
pub mod sprite_writer;
pub mod timing;

#[cfg(test)]
pub(crate) mod fixtures;

pub use ani::AniParser;
pub use cur::CurParser;
pub use error::{CursorError, CursorResult};

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorFormat {
    Cur,
    Ani,
}

impl CursorFormat {
    pub fn detect(data: &[u8]) -> Option<Self> {
        if AniParser::can_parse(data) {
            Some(CursorFormat::Ani)
        } else if CurParser::can_parse(data) {
            Some(CursorFormat::Cur)
        } else {
            None
        }
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "ani" => Some(CursorFormat::Ani),
            "cur" | "ico" => Some(CursorFormat::Cur),
            _ => None,
        }
    }

    /// Signature first, then extension. A file that claims a kind by extension
    /// but fails its signature is left for that kind's parser to reject.
    pub fn resolve(path: &Path, data: &[u8]) -> CursorResult<Self> {
        Self::detect(data)
            .or_else(|| Self::from_extension(path))
            .ok_or_else(|| CursorError::UnsupportedInputKind(path.display().to_string()))
    }
}
