use std::fs::{self, File};
use std::io;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{CleanupError, SourceError};

pub const SCRATCH_PREFIX: &str = ".subtitle-pairer-zip-";

/// Extraction target owned by this run. Only directories created here can be
/// removed by [`ScratchDir::cleanup`]; dropping the guard removes it as well.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn create_in(base: &Path) -> Result<Self, SourceError> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(base)
            .map_err(|source| SourceError::Scratch {
                base: base.to_path_buf(),
                source,
            })?;
        debug!(path = %dir.path().display(), "Created scratch directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the directory tree, files before the directories holding them.
    pub fn cleanup(self) -> Result<(), CleanupError> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|cause| CleanupError { path, cause })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    pub extracted: usize,
    pub skipped: usize,
}

/// Extracts every entry of `archive_path` below `dest`, keeping the entry names
/// as relative paths and overwriting existing files.
///
/// Failing to open the archive or read its central directory is fatal. A single
/// entry that cannot be written is reported and skipped.
pub fn extract_all(archive_path: &Path, dest: &Path) -> Result<ExtractSummary, SourceError> {
    let file = File::open(archive_path).map_err(|source| SourceError::Open {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|source| SourceError::Archive {
        path: archive_path.to_path_buf(),
        source,
    })?;

    let mut summary = ExtractSummary::default();
    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(archive = %archive_path.display(), index, error = %e, "Failed to read archive entry");
                summary.skipped += 1;
                continue;
            }
        };

        let Some(relative) = entry.enclosed_name() else {
            warn!(archive = %archive_path.display(), entry = entry.name(), "Skipping archive entry with unsafe path");
            summary.skipped += 1;
            continue;
        };
        let target = dest.join(relative);

        let written = if entry.is_dir() {
            fs::create_dir_all(&target)
        } else {
            write_entry(&mut entry, &target)
        };

        match written {
            Ok(()) => {
                if !entry.is_dir() {
                    debug!(entry = entry.name(), target = %target.display(), "Extracted");
                    summary.extracted += 1;
                }
            }
            Err(e) => {
                warn!(entry = entry.name(), target = %target.display(), error = %e, "Failed to extract subtitle file from zip");
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

fn write_entry(entry: &mut impl io::Read, target: &Path) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = File::create(target)?;
    io::copy(entry, &mut out)?;
    Ok(())
}
