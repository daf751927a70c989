use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal: without a subtitle source there is nothing to pair.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("subtitle source does not exist: {0}")]
    NotFound(PathBuf),
    #[error("no zip archive in {root} matches \"{series}\" and \"{season}\"")]
    NoArchiveFound {
        root: PathBuf,
        series: String,
        season: String,
    },
    #[error("failed to search {root} for zip archives: {source}")]
    Search {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("failed to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create scratch directory in {base}: {source}")]
    Scratch {
        base: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Degrades to an empty episode map for the affected pass.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("root directory not found: {0}")]
    RootNotFound(PathBuf),
    #[error("episode #{key} matched by both {first} and {second}")]
    Collision {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },
}

#[derive(Debug, Error)]
#[error("failed to copy {source_path} -> {target}: {cause}")]
pub struct CopyError {
    pub source_path: PathBuf,
    pub target: PathBuf,
    #[source]
    pub cause: io::Error,
}

#[derive(Debug, Error)]
#[error("failed to remove scratch directory {path}: {cause}")]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub cause: io::Error,
}
