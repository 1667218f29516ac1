use std::path::PathBuf;
use thiserror::Error;

/// Fatal scan errors. Per-file problems are warnings and never show up here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Failed to resolve directory {}", .path.display())]
    RootAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create output file {}", .path.display())]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write output file {}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
