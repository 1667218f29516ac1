use crate::app::error::ScanError;
use crate::app::formatter::{relative_manifest_path, ManifestWriter};
use crate::app::models::{FileEntry, ScanConfig, ScanResult, SizeUnit};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use walkdir::{DirEntry, WalkDir};

pub struct Scanner {
    root: PathBuf,
    output_path: PathBuf,
    exclude_patterns: Vec<String>,
    unit: SizeUnit,
}

impl Scanner {
    /// Validates the root directory. Nothing is written if this fails.
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        let requested = &config.root_directory;
        let metadata = match fs::metadata(requested) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ScanError::DirectoryNotFound(requested.clone()))
            }
            Err(source) => {
                return Err(ScanError::RootAccess {
                    path: requested.clone(),
                    source,
                })
            }
        };
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(requested.clone()));
        }

        // Canonical root so every walked entry carries an absolute path
        let root = fs::canonicalize(requested).map_err(|source| ScanError::RootAccess {
            path: requested.clone(),
            source,
        })?;
        let output_path = output_path_under(&root, &config.output_filename);

        Ok(Self {
            root,
            output_path,
            exclude_patterns: config.exclude_patterns.clone(),
            unit: config.size_unit,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Creates the manifest before walking, then streams every accepted file into it.
    pub fn scan(&self) -> Result<ScanResult, ScanError> {
        let mut writer = ManifestWriter::create(&self.output_path)?;
        let result = self.scan_into(&mut writer)?;
        writer.finish()?;
        Ok(result)
    }

    /// Walks the tree and writes accepted entries to `writer`.
    ///
    /// Only write failures abort the walk. Unreadable entries become warnings.
    pub fn scan_into<W: Write>(
        &self,
        writer: &mut ManifestWriter<W>,
    ) -> Result<ScanResult, ScanError> {
        let mut result = ScanResult::default();

        // Symlinks are followed; walkdir refuses to re-enter an ancestor
        let mut walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = walker.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(err) => {
                    self.handle_walk_error(err, &mut result);
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let path = entry.path();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if self.is_excluded_dir(path) {
                    log::debug!("Skipping excluded directory {}", path.display());
                    result.dirs_skipped_excluded += 1;
                    walker.skip_current_dir();
                }
                continue;
            }

            // Sockets, fifos and devices are not part of the manifest
            if !file_type.is_file() {
                continue;
            }

            if path == self.output_path || self.is_excluded(path) {
                log::debug!("Skipping excluded file {}", path.display());
                result.record_excluded();
                continue;
            }

            match self.process_entry(&entry) {
                Ok(file) => {
                    log::debug!("Listing {}", file.absolute_path.display());
                    writer.write_entry(&file, self.unit)?;
                    result.record_written();
                }
                Err(message) => {
                    log::warn!("⚠️ {}", message);
                    result.record_error(message);
                }
            }
        }

        Ok(result)
    }

    fn process_entry(&self, entry: &DirEntry) -> Result<FileEntry, String> {
        let path = entry.path();
        let metadata = entry
            .metadata()
            .map_err(|err| format!("Failed to read metadata for {}: {}", path.display(), err))?;
        let relative_path = relative_manifest_path(path, &self.root)
            .ok_or_else(|| format!("{} is outside of {}", path.display(), self.root.display()))?;

        Ok(FileEntry {
            relative_path,
            absolute_path: path.to_path_buf(),
            size_bytes: metadata.len(),
        })
    }

    fn handle_walk_error(&self, err: walkdir::Error, result: &mut ScanResult) {
        if let Some(ancestor) = err.loop_ancestor() {
            let message = format!(
                "Filesystem loop at {} (links back to {}), not descending",
                err.path().unwrap_or(ancestor).display(),
                ancestor.display()
            );
            log::warn!("⚠️ {}", message);
            result.warnings.push(message);
            return;
        }

        if let Some(path) = err.path() {
            if self.is_excluded(path) || self.is_excluded_dir(path) {
                result.record_excluded();
                return;
            }
        }

        let message = format!("Error walking entry: {}", err);
        log::warn!("⚠️ {}", message);
        result.record_error(message);
    }

    /// Plain, case-sensitive substring test against the absolute path.
    fn is_excluded(&self, path: &Path) -> bool {
        let target = match_target(path);
        self.exclude_patterns
            .iter()
            .any(|pattern| target.contains(pattern.as_str()))
    }

    /// A directory matches if its path with a trailing `/` does, which is
    /// exactly when every possible descendant would match.
    fn is_excluded_dir(&self, path: &Path) -> bool {
        let mut target = match_target(path);
        target.push('/');
        self.exclude_patterns
            .iter()
            .any(|pattern| target.contains(pattern.as_str()))
    }
}

/// Joins `name` onto `root`, resolving `.` and `..` lexically so the walked
/// path of the manifest compares equal to it.
fn output_path_under(root: &Path, name: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for component in Path::new(name).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                path.pop();
            }
            other => path.push(other),
        }
    }
    path
}

/// Absolute path as matched against exclude patterns, always `/`-separated.
fn match_target(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        raw.into_owned()
    } else {
        raw.replace(MAIN_SEPARATOR, "/")
    }
}
