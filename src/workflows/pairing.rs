use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::domain::models::{EpisodeMap, Pairing};
use crate::error::CopyError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Where a subtitle goes: next to the video, named like the video, keeping the
/// subtitle's extension.
pub fn target_path(subtitle: &Path, video: &Path) -> PathBuf {
    video.with_extension(subtitle.extension().unwrap_or_default())
}

/// Joins both maps on the episode key, in episode order. Subtitles without a
/// video are left out.
pub fn pair(subtitles: &EpisodeMap, videos: &EpisodeMap) -> Vec<Pairing> {
    subtitles
        .iter()
        .filter_map(|(key, subtitle)| {
            let Some(video) = videos.get(key) else {
                info!(episode = %key, subtitle = %subtitle.path().display(), "No video for subtitle");
                return None;
            };
            Some(Pairing {
                key: key.clone(),
                subtitle: subtitle.path.clone(),
                video: video.path.clone(),
                target: target_path(subtitle.path(), video.path()),
            })
        })
        .collect()
}

/// Copies every pairing, reporting each one. A failed copy does not stop the
/// remaining ones.
pub fn copy_all(pairings: &[Pairing], dry_run: bool) -> CopyReport {
    let mut report = CopyReport::default();

    for pairing in pairings {
        if is_same_file(&pairing.subtitle, &pairing.target) {
            println!(
                "  episode #{}: {} is already in place",
                pairing.key,
                pairing.target.display()
            );
            report.skipped += 1;
            continue;
        }

        if dry_run {
            println!(
                "  episode #{}: {} -> {} (dry run)",
                pairing.key,
                pairing.subtitle.display(),
                pairing.target.display()
            );
            report.skipped += 1;
            continue;
        }

        match copy_subtitle(pairing) {
            Ok(()) => {
                println!(
                    "  episode #{}: {} -> {}",
                    pairing.key,
                    pairing.subtitle.display(),
                    pairing.target.display()
                );
                debug!(video = %pairing.video.display(), "Paired");
                report.copied += 1;
            }
            Err(e) => {
                error!(episode = %pairing.key, "{e}");
                report.failed += 1;
            }
        }
    }

    report
}

pub fn copy_subtitle(pairing: &Pairing) -> Result<(), CopyError> {
    fs::copy(&pairing.subtitle, &pairing.target)
        .map(|_| ())
        .map_err(|cause| CopyError {
            source_path: pairing.subtitle.clone(),
            target: pairing.target.clone(),
            cause,
        })
}

// Copying a file onto itself would truncate it.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
