use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;

use sysdash::commands;
use sysdash::error::EXIT_INTERNAL;
use sysdash::ui::OutputFormat;

fn build_cli() -> Command {
    Command::new("sysdash")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Point-in-time health report for the local host")
        .long_about(
            "Takes one snapshot of CPU, memory, disk and network usage, classifies each \
             metric against configurable thresholds and prints a report.\n\n\
             Exit codes: 0 OK, 1 WARNING, 2 CRITICAL, 3 error.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Configuration file (default: $SYSDASH_CONFIG or <config dir>/sysdash/config.toml)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .value_name("KEY=VALUE")
                .help("Override a configuration key, e.g. --set cpu_warning=60")
                .action(ArgAction::Append)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log more to stderr (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help(format!("Output format: {}", OutputFormat::NAMES.join(", "))),
        )
        .arg(
            Arg::new("only")
                .long("only")
                .value_name("CATEGORIES")
                .help("Comma-separated categories to report: identity, cpu, memory, disk, network"),
        )
        .arg(
            Arg::new("timeout-ms")
                .long("timeout-ms")
                .value_name("MS")
                .help("Per-query timeout in milliseconds")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .help("Run category queries concurrently")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("thresholds").about("Print the effective thresholds and collector settings"),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Shell: bash, zsh, fish, powershell, elvish")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("version").about("Shows version information"))
}

fn dispatch(matches: &ArgMatches) -> anyhow::Result<i32> {
    match matches.subcommand() {
        Some(("thresholds", sub_matches)) => {
            commands::thresholds(sub_matches)?;
            Ok(0)
        }
        Some(("completions", sub_matches)) => {
            commands::completions(sub_matches, &mut build_cli())?;
            Ok(0)
        }
        Some(("version", _)) => {
            commands::version()?;
            Ok(0)
        }
        _ => commands::report(matches),
    }
}

fn main() -> ExitCode {
    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            // --help and --version are reported as errors that go to stdout
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_INTERNAL as u8)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    sysdash::init_logging(matches.get_count("verbose"));

    match dispatch(&matches) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(commands::exit_code(&e) as u8)
        }
    }
}
