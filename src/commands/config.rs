use crate::core::Config;
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::PathBuf;

/// Effective configuration for a command: file and environment layers from
/// [`Config::load`], then every `--set KEY=VALUE` in the order given.
pub fn load(matches: &ArgMatches) -> Result<Config> {
    let path = matches.get_one::<PathBuf>("config");
    let mut config = Config::load(path.map(PathBuf::as_path))
        .context("Failed to load configuration")?;

    if let Some(assignments) = matches.get_many::<String>("set") {
        for assignment in assignments {
            config
                .apply_override(assignment)
                .with_context(|| format!("Invalid --set {}", assignment))?;
        }
        config.validate().context("Invalid configuration")?;
    }

    Ok(config)
}
