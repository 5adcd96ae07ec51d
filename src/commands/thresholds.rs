use anyhow::Result;
use clap::ArgMatches;

use super::config;

/// Print the effective thresholds and collector settings as `key=value`
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = config::load(matches)?;

    for (key, value) in config.thresholds.entries() {
        println!("{}={}", key, value);
    }
    println!("timeout_ms={}", config.collector.timeout_ms);
    println!("parallel={}", config.collector.parallel);

    Ok(())
}
