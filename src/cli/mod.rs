pub mod command;
pub mod convert;
pub mod info;

use anyhow::{Context, Result, bail};

use ani2sprite::config::Config;
use command::ConfigArgs;

pub fn cmd_config(args: &ConfigArgs) -> Result<()> {
    let path = match &args.path {
        Some(path) => path.clone(),
        None => Config::default_path().context("No user config directory on this platform")?,
    };

    if path.exists() && !args.force {
        bail!("{} already exists (use --force to replace it)", path.display());
    }

    Config::default()
        .save_to_file(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote default config to {}", path.display());
    Ok(())
}
