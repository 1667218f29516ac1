use crate::app::cli::Cli;
use crate::app::models::{ScanConfig, SizeUnit};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Substrings that are always excluded. User patterns are appended to these.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "/.git/",
    "/node_modules/",
    "/__pycache__/",
    ".DS_Store",
    "Thumbs.db",
];

pub const DEFAULT_OUTPUT: &str = "output.txt";

/// Optional settings read from `config.toml`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub unit: Option<SizeUnit>,
    pub output: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub quiet: Option<bool>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("fileinfo").join("config.toml"))
}

/// Loads the config file: an explicit path must exist, the default one is optional.
pub fn load_config_file(explicit: Option<&Path>) -> Result<FileConfig> {
    let config_path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(FileConfig::default()),
        },
    };

    log::debug!("Loading config from {}", config_path.display());
    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;

    toml::from_str(&content).context(format!("Failed to parse {:?}", config_path))
}

/// Defaults, then config file, then CLI, in that order. Duplicates are kept.
fn merge_excludes(file_vec: Option<Vec<String>>, cli_vec: Vec<String>) -> Vec<String> {
    DEFAULT_EXCLUDES
        .iter()
        .map(|p| p.to_string())
        .chain(file_vec.unwrap_or_default())
        .chain(cli_vec)
        .collect()
}

pub fn resolve_config(cli: Cli, file: FileConfig) -> ScanConfig {
    ScanConfig {
        root_directory: cli.directory,
        size_unit: cli.unit.or(file.unit).unwrap_or_default(),
        output_filename: cli
            .output
            .or(file.output)
            .unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
        exclude_patterns: merge_excludes(file.exclude, cli.exclude),
        quiet: cli.quiet || file.quiet.unwrap_or(false),
    }
}
