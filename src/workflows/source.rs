use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::SourceError;
use crate::infra::archive::{self, ScratchDir};
use crate::infra::paths;

/// Where subtitles come from, as chosen on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleSource {
    /// A folder, or a `.zip` file which is extracted first.
    Path(PathBuf),
    /// Search this folder for a zip whose name matches the series and season.
    LocateZip(PathBuf),
}

/// The subtitle root for this run. Holds the scratch directory, if any, until
/// cleanup.
#[derive(Debug)]
pub struct ResolvedSource {
    pub root: PathBuf,
    pub origin: SourceOrigin,
    pub scratch: Option<ScratchDir>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    Folder(PathBuf),
    Archive(PathBuf),
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOrigin::Folder(path) => write!(f, "{}", display_dir(path).display()),
            SourceOrigin::Archive(path) => write!(f, "zip {}", path.display()),
        }
    }
}

/// Expands `.` to the working directory for reports.
pub fn display_dir(path: &Path) -> PathBuf {
    if path == Path::new(".") {
        std::env::current_dir().unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    }
}

/// Resolves `source` to a directory of subtitles, extracting archives into a
/// scratch directory created under `scratch_base`.
pub fn resolve(
    source: &SubtitleSource,
    series: &str,
    season: &str,
    scratch_base: &Path,
) -> Result<ResolvedSource, SourceError> {
    match source {
        SubtitleSource::Path(path) if paths::is_archive(path) => unpack(path, scratch_base),
        SubtitleSource::Path(path) => {
            if !path.exists() {
                return Err(SourceError::NotFound(path.clone()));
            }
            Ok(ResolvedSource {
                root: path.clone(),
                origin: SourceOrigin::Folder(path.clone()),
                scratch: None,
            })
        }
        SubtitleSource::LocateZip(root) => {
            let candidates = find_archives(root, series, season)?;
            let Some(chosen) = candidates.first() else {
                return Err(SourceError::NoArchiveFound {
                    root: display_dir(root),
                    series: series.to_string(),
                    season: season.to_string(),
                });
            };
            if let Some(message) = ambiguity_warning(&candidates) {
                warn!("{message}");
            }
            let chosen = chosen.clone();
            println!(
                "\nZip file to be searched for subtitles: {}",
                absolute(&chosen).display()
            );
            unpack(&chosen, scratch_base)
        }
    }
}

/// Zip files directly inside `root` whose path contains both patterns, in
/// file-name order.
pub fn find_archives(root: &Path, series: &str, season: &str) -> Result<Vec<PathBuf>, SourceError> {
    let series = series.to_lowercase();
    let season = season.to_lowercase();

    let mut found = Vec::new();
    for entry in WalkDir::new(root).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| SourceError::Search {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || !paths::is_archive(entry.path()) {
            continue;
        }
        let lowercase = entry.path().to_string_lossy().to_lowercase();
        if paths::contains_lowercase(&lowercase, &series)
            && paths::contains_lowercase(&lowercase, &season)
        {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

fn ambiguity_warning(candidates: &[PathBuf]) -> Option<String> {
    if candidates.len() < 2 {
        return None;
    }
    let all = candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "More than one zip file matches, the first will be used. See all matches: [{all}]"
    ))
}

fn unpack(archive_path: &Path, scratch_base: &Path) -> Result<ResolvedSource, SourceError> {
    if !archive_path.is_file() {
        return Err(SourceError::NotFound(archive_path.to_path_buf()));
    }
    let scratch = ScratchDir::create_in(scratch_base)?;
    let summary = archive::extract_all(archive_path, scratch.path())?;
    info!(
        archive = %archive_path.display(),
        extracted = summary.extracted,
        skipped = summary.skipped,
        "Extracted subtitle archive"
    );

    Ok(ResolvedSource {
        root: scratch.path().to_path_buf(),
        origin: SourceOrigin::Archive(archive_path.to_path_buf()),
        scratch: Some(scratch),
    })
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
