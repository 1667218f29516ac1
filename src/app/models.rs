use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Unit used when printing file sizes in the manifest.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
pub enum SizeUnit {
    #[value(name = "Byte")]
    Byte,
    #[value(name = "KB")]
    KB,
    #[default]
    #[value(name = "MB")]
    MB,
    #[value(name = "GB")]
    GB,
    #[value(name = "TB")]
    TB,
}

impl SizeUnit {
    pub fn divisor(self) -> u64 {
        match self {
            SizeUnit::Byte => 1,
            SizeUnit::KB => 1 << 10,
            SizeUnit::MB => 1 << 20,
            SizeUnit::GB => 1 << 30,
            SizeUnit::TB => 1 << 40,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeUnit::Byte => "Byte",
            SizeUnit::KB => "KB",
            SizeUnit::MB => "MB",
            SizeUnit::GB => "GB",
            SizeUnit::TB => "TB",
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the final configuration after merging the config file and CLI args.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root_directory: PathBuf,
    pub size_unit: SizeUnit,
    pub output_filename: String,
    /// Built-in defaults first, then user additions. Duplicates are kept.
    pub exclude_patterns: Vec<String>,
    pub quiet: bool,
}

/// Represents a single file accepted during the scan.
#[derive(Debug)]
pub struct FileEntry {
    pub relative_path: String,
    pub absolute_path: PathBuf, // Only used for size lookup, never written out
    pub size_bytes: u64,
}

/// Counts and warnings handed back to the caller after a completed scan.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files_examined: usize,
    pub files_written: usize,
    pub files_skipped_excluded: usize,
    pub files_skipped_error: usize,
    pub dirs_skipped_excluded: usize,
    pub warnings: Vec<String>,
}

impl ScanResult {
    pub(crate) fn record_written(&mut self) {
        self.files_examined += 1;
        self.files_written += 1;
    }

    pub(crate) fn record_excluded(&mut self) {
        self.files_examined += 1;
        self.files_skipped_excluded += 1;
    }

    pub(crate) fn record_error(&mut self, message: String) {
        self.files_examined += 1;
        self.files_skipped_error += 1;
        self.warnings.push(message);
    }
}
