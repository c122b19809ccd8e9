use anyhow::Result;
use clap::Parser as ClapParser;

use ani2sprite::config::Config;
use cli::command::{Cli, Commands};
use cli::convert::cmd_convert;
use cli::info::cmd_info;

mod cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut env_builder = env_logger::Builder::new();
    env_builder
        .filter_level(cli.loglevel.to_level_filter())
        .format_timestamp(None)
        .parse_default_env();
    env_builder.try_init()?;

    match cli.command {
        Commands::Convert(ref args) => {
            let config = Config::load(cli.config.as_deref())?;
            cmd_convert(args, &config)?
        }
        Commands::Info(ref args) => cmd_info(args)?,
        Commands::Config(ref args) => cli::cmd_config(args)?,
    }

    Ok(())
}
