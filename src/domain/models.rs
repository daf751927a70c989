use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Two-digit episode number as it appears in a file name, e.g. `"03"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpisodeKey(String);

impl EpisodeKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty key means no episode number was found in the name.
    pub fn is_unmatched(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EpisodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub lowercase: String,
}

impl FileEntry {
    pub fn new(path: PathBuf) -> Self {
        let lowercase = path.to_string_lossy().to_lowercase();
        Self { path, lowercase }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub type EpisodeMap = BTreeMap<EpisodeKey, FileEntry>;

/// What the collector does when two files yield the same episode key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// The later file replaces the earlier one (with a warning).
    #[default]
    Overwrite,
    /// Fail the collection pass.
    Reject,
}

/// A subtitle paired with the video it will be copied next to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub key: EpisodeKey,
    pub subtitle: PathBuf,
    pub video: PathBuf,
    pub target: PathBuf,
}
