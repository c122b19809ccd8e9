use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::type_map::TypeMap;
use crate::pipeline::converter::ConversionOptions;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: PathBuf,
    /// Square frame size in pixels, 0 keeps native sizes.
    pub target_size: u32,
    /// Worker threads for batch conversion, 0 uses every available CPU.
    pub thread_count: usize,
    pub type_map: TypeMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./out"),
            target_size: 0,
            thread_count: 0,
            type_map: TypeMap::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ani2sprite").join("config.toml"))
    }

    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()));
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                log::debug!("Loading config from {}", path.display());
                Self::load_from_file(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions::new().with_target_size(self.target_size)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let content = self.to_toml_string().map_err(std::io::Error::other)?;
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
