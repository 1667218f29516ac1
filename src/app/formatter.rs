use crate::app::error::ScanError;
use crate::app::models::{FileEntry, ScanConfig, ScanResult, SizeUnit};
use pathdiff::diff_paths;
use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

/// Converts a byte count to `unit`, rounded half-up to two decimals.
pub fn format_size(bytes: u64, unit: SizeUnit) -> String {
    let divisor = u128::from(unit.divisor());
    let hundredths = (u128::from(bytes) * 100 + divisor / 2) / divisor;
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

/// Path of `path` below `root`, `/`-separated with a single leading `/`.
pub fn relative_manifest_path(path: &Path, root: &Path) -> Option<String> {
    let relative = diff_paths(path, root)?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(format!("/{}", parts.join("/")))
}

/// Streams manifest lines to the output as they are accepted.
///
/// Lines are flushed on every newline so an interrupted run keeps what it
/// already wrote.
pub struct ManifestWriter<W: Write> {
    path: PathBuf,
    inner: LineWriter<W>,
}

impl ManifestWriter<File> {
    /// Creates (or truncates) the manifest file at `path`.
    pub fn create(path: &Path) -> Result<Self, ScanError> {
        let file = File::create(path).map_err(|source| ScanError::OutputCreate {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path.to_path_buf(), file))
    }
}

impl<W: Write> ManifestWriter<W> {
    pub fn new(path: PathBuf, writer: W) -> Self {
        Self {
            path,
            inner: LineWriter::new(writer),
        }
    }

    pub fn write_entry(&mut self, entry: &FileEntry, unit: SizeUnit) -> Result<(), ScanError> {
        writeln!(
            self.inner,
            "{}, {} {}",
            entry.relative_path,
            format_size(entry.size_bytes, unit),
            unit
        )
        .map_err(|source| self.write_error(source))
    }

    /// Flushes and hands back the underlying writer.
    pub fn finish(self) -> Result<W, ScanError> {
        let path = self.path;
        self.inner
            .into_inner()
            .map_err(|err| ScanError::OutputWrite {
                path,
                source: err.into_error(),
            })
    }

    fn write_error(&self, source: std::io::Error) -> ScanError {
        ScanError::OutputWrite {
            path: self.path.clone(),
            source,
        }
    }
}

pub fn format_summary(config: &ScanConfig, result: &ScanResult, output_path: &Path) -> String {
    let mut out = format!(
        "✅ Wrote {} entries to {}\n",
        result.files_written,
        output_path.display()
    );
    out.push_str(&format!(
        "   directory: {}\n",
        config.root_directory.display()
    ));
    out.push_str(&format!("   unit:      {}\n", config.size_unit));
    out.push_str(&format!(
        "   excludes:  {}\n",
        config.exclude_patterns.join(", ")
    ));
    out.push_str(&format!("   examined:  {} files\n", result.files_examined));
    out.push_str(&format!(
        "   skipped:   {} excluded, {} errors",
        result.files_skipped_excluded, result.files_skipped_error
    ));
    if result.dirs_skipped_excluded > 0 {
        out.push_str(&format!(
            " ({} directories pruned)",
            result.dirs_skipped_excluded
        ));
    }
    if !result.warnings.is_empty() {
        out.push_str(&format!("\n   warnings:  {}", result.warnings.len()));
    }
    out
}
