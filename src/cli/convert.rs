use anyhow::{Result, bail};

use ani2sprite::config::Config;
use ani2sprite::pipeline::converter::{ConversionOptions, batch_convert};
use ani2sprite::pipeline::fs_ops::collect_cursor_files;

use super::command::ConvertArgs;

pub fn cmd_convert(args: &ConvertArgs, config: &Config) -> Result<()> {
    let files = collect_cursor_files(&args.inputs)?;
    if files.is_empty() {
        bail!("No .ani or .cur files found");
    }

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    let options = match args.size {
        Some(size) => ConversionOptions::new().with_target_size(size),
        None => config.conversion_options(),
    };
    let threads = args.threads.unwrap_or(config.thread_count);

    log::info!(
        "Found {} cursor files to process, writing to {}",
        files.len(),
        output_dir.display()
    );

    let type_map = &config.type_map;
    let outcomes = batch_convert(
        &files,
        &output_dir,
        &options,
        |name: &str| type_map.classify(name).to_string(),
        threads,
    )?;

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        bail!("{} of {} files failed to convert", failed, outcomes.len());
    }
    Ok(())
}
