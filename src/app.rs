// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod scanner;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use self::cli::Cli;
use self::config::{load_config_file, resolve_config};
use self::formatter::format_summary;
use self::scanner::Scanner;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();
    init_logging(args.verbose);

    // 2. Resolve Configuration
    let file_config = load_config_file(args.config.as_deref())?;
    let config = resolve_config(args, file_config);
    log::debug!("Resolved configuration: {:?}", config);

    // 3. Validate the root before anything touches the disk
    let scanner = Scanner::new(&config)?;

    // 4. Scan and write the manifest
    let result = scanner.scan()?;

    if result.files_written == 0 {
        log::warn!(
            "⚠️ No files listed under {}",
            scanner.root().display()
        );
    }

    // 5. Summary to stdout
    if !config.quiet {
        println!("{}", format_summary(&config, &result, scanner.output_path()));
    }

    Ok(())
}

/// `RUST_LOG` tunes dependencies only; this crate always logs at least warnings.
fn init_logging(verbose: bool) {
    let own_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .filter_module(env!("CARGO_CRATE_NAME"), own_level)
        .format_timestamp(None)
        .init();
}
