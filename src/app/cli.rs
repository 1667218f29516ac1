use crate::app::models::SizeUnit;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Write a manifest of file paths and sizes under a directory"
)]
pub struct Cli {
    /// Directory to scan
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// Unit for file sizes [default: MB]
    #[arg(short, long, value_enum, ignore_case = true)]
    pub unit: Option<SizeUnit>,

    /// Manifest file name, created inside the scanned directory [default: output.txt]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Extra substrings to exclude; added to the built-in list (e.g., '/target/')
    #[arg(short, long, num_args = 1..)]
    pub exclude: Vec<String>,

    /// Suppress the summary (warnings are still shown, whatever RUST_LOG says)
    #[arg(short, long)]
    pub quiet: bool,

    /// Show debug logging (RUST_LOG does not change this crate's level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Read settings from this file instead of ~/.config/fileinfo/config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}
