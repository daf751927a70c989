use std::path::Path;
use tracing::{error, warn};

use crate::cli::Request;
use crate::config::Settings;
use crate::domain::models::EpisodeMap;
use crate::error::SourceError;
use crate::infra::archive::ScratchDir;
use crate::workflows::collector::{self, CollectOptions};
use crate::workflows::pairing::{self, CopyReport};
use crate::workflows::source::{self, display_dir};

#[derive(Debug)]
pub struct RunSummary {
    pub subtitles: EpisodeMap,
    pub videos: EpisodeMap,
    pub copies: CopyReport,
    pub cleaned_up: bool,
}

/// Resolves the subtitle source, collects both sides, copies the pairs and
/// removes any scratch directory. Only a failure to resolve the source aborts.
pub fn run(
    request: &Request,
    settings: &Settings,
    scratch_base: &Path,
) -> Result<RunSummary, SourceError> {
    let resolved = source::resolve(
        &request.subtitles,
        &request.series,
        &request.season,
        scratch_base,
    )?;

    let subtitles = collect_or_empty(
        &resolved.root,
        &CollectOptions {
            max_depth: settings.subtitle_depth,
            extension: settings.subtitle_extension.clone(),
            series: request.series.clone(),
            season: request.season.clone(),
            exclude: settings.exclude.clone(),
            on_collision: settings.on_collision,
            match_below_root: resolved.scratch.is_some(),
        },
    );
    println!(
        "\nSubtitle files found in {} with series name \"{}\", season {}:",
        resolved.origin, request.series, request.season
    );
    print_episodes(&subtitles);

    let videos = collect_or_empty(
        &request.videos,
        &CollectOptions {
            max_depth: settings.video_depth,
            extension: settings.video_extension.clone(),
            series: request.series.clone(),
            season: request.season.clone(),
            exclude: settings.exclude.clone(),
            on_collision: settings.on_collision,
            match_below_root: false,
        },
    );
    println!(
        "\nVideo files found in {} with series name \"{}\", season {}:",
        display_dir(&request.videos).display(),
        request.series,
        request.season
    );
    print_episodes(&videos);

    println!("\nCopying:");
    let pairings = pairing::pair(&subtitles, &videos);
    let copies = pairing::copy_all(&pairings, settings.dry_run);
    println!(
        "\n{} copied, {} skipped, {} failed",
        copies.copied, copies.skipped, copies.failed
    );

    let cleaned_up = remove_scratch(resolved.scratch);

    Ok(RunSummary {
        subtitles,
        videos,
        copies,
        cleaned_up,
    })
}

/// A failed removal is reported, never fatal.
fn remove_scratch(scratch: Option<ScratchDir>) -> bool {
    let Some(scratch) = scratch else {
        return true;
    };
    match scratch.cleanup() {
        Ok(()) => true,
        Err(e) => {
            error!("{e}");
            false
        }
    }
}

fn collect_or_empty(root: &Path, options: &CollectOptions) -> EpisodeMap {
    collector::collect(root, options).unwrap_or_else(|e| {
        warn!(root = %root.display(), "Exception while collecting files: {e}");
        EpisodeMap::new()
    })
}

fn print_episodes(episodes: &EpisodeMap) {
    if episodes.is_empty() {
        println!("  (none)");
    }
    for (key, file) in episodes {
        println!("  episode #{key} -> {}", file.path().display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CollisionPolicy, EpisodeKey};
    use crate::infra::archive::tests::write_zip;
    use crate::infra::archive::SCRATCH_PREFIX;
    use crate::workflows::source::SubtitleSource;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn request(subtitles: SubtitleSource, videos: &Path) -> Request {
        Request {
            subtitles,
            videos: videos.to_path_buf(),
            series: "show".to_string(),
            season: "S01".to_string(),
        }
    }

    fn scratch_dirs(base: &Path) -> Vec<PathBuf> {
        fs::read_dir(base)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(SCRATCH_PREFIX))
            .map(|e| e.path())
            .collect()
    }

    #[test]
    fn test_folder_run_pairs_subtitle_with_video() {
        let temp_dir = TempDir::new().unwrap();
        let subs = temp_dir.path().join("subs");
        let season = temp_dir.path().join("tv/Show/Season 1");
        fs::create_dir_all(&subs).unwrap();
        fs::create_dir_all(&season).unwrap();
        fs::write(subs.join("Show.S01E03.srt"), b"episode three").unwrap();
        fs::write(subs.join("Show.S01E04.srt"), b"no video for me").unwrap();
        fs::write(subs.join("sample.S01E01.srt"), b"sample").unwrap();
        fs::write(season.join("Show.S01.E03.1080p.mkv"), b"video").unwrap();
        fs::write(season.join("Show.S01.E01.1080p.mkv"), b"video").unwrap();

        let summary = run(
            &request(
                SubtitleSource::Path(subs.clone()),
                &temp_dir.path().join("tv"),
            ),
            &Settings::default(),
            temp_dir.path(),
        )
        .unwrap();

        assert_eq!(
            summary.subtitles.keys().cloned().collect::<Vec<_>>(),
            vec![EpisodeKey::new("03"), EpisodeKey::new("04")]
        );
        assert_eq!(summary.videos.len(), 2);
        assert_eq!(summary.copies, CopyReport { copied: 1, skipped: 0, failed: 0 });
        assert_eq!(
            fs::read(season.join("Show.S01.E03.1080p.srt")).unwrap(),
            b"episode three"
        );
        assert!(!season.join("Show.S01.E01.1080p.srt").exists());
    }

    #[test]
    fn test_zip_run_removes_scratch_directory() {
        let temp_dir = TempDir::new().unwrap();
        let videos = temp_dir.path().join("tv");
        fs::create_dir_all(&videos).unwrap();
        fs::write(videos.join("Show.S01E01.mkv"), b"video").unwrap();
        fs::write(videos.join("Show.S01E02.mkv"), b"video").unwrap();
        let zip_path = temp_dir.path().join("Show.S01.zip");
        write_zip(
            &zip_path,
            &[
                ("Show.S01E01.srt", b"one"),
                ("Show.S01E02.srt", b"two"),
            ],
        );

        let summary = run(
            &request(SubtitleSource::Path(zip_path), &videos),
            &Settings::default(),
            temp_dir.path(),
        )
        .unwrap();

        assert!(summary.cleaned_up);
        assert_eq!(summary.copies.copied, 2);
        assert_eq!(fs::read(videos.join("Show.S01E01.srt")).unwrap(), b"one");
        assert_eq!(fs::read(videos.join("Show.S01E02.srt")).unwrap(), b"two");
        assert!(scratch_dirs(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_zip_run_ignores_scratch_directory_name() {
        let temp_dir = TempDir::new().unwrap();
        let videos = temp_dir.path().join("tv");
        fs::create_dir_all(&videos).unwrap();
        fs::write(videos.join("Show.S01E01.mkv"), b"video").unwrap();
        let zip_path = temp_dir.path().join("Show.S01.zip");
        write_zip(&zip_path, &[("Show.S01E01.srt", b"one")]);

        for term in ["sub", "zip", "pair", "title"] {
            let settings = Settings {
                exclude: Some(term.to_string()),
                ..Settings::default()
            };
            let summary = run(
                &request(SubtitleSource::Path(zip_path.clone()), &videos),
                &settings,
                temp_dir.path(),
            )
            .unwrap();

            assert_eq!(summary.subtitles.len(), 1, "exclude = {term}");
            assert_eq!(summary.copies.copied, 1, "exclude = {term}");
        }
    }

    #[test]
    fn test_zip_scratch_name_does_not_satisfy_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let videos = temp_dir.path().join("tv");
        fs::create_dir_all(&videos).unwrap();
        let zip_path = temp_dir.path().join("archive.zip");
        write_zip(&zip_path, &[("Episode.S01E01.srt", b"one")]);

        let mut req = request(SubtitleSource::Path(zip_path), &videos);
        req.series = "pairer".to_string();
        let summary = run(&req, &Settings::default(), temp_dir.path()).unwrap();

        assert!(summary.subtitles.is_empty());
    }

    #[test]
    fn test_zip_run_removes_scratch_after_failed_copy() {
        let temp_dir = TempDir::new().unwrap();
        let videos = temp_dir.path().join("tv");
        fs::create_dir_all(&videos).unwrap();
        fs::write(videos.join("Show.S01E01.mkv"), b"video").unwrap();
        fs::write(videos.join("Show.S01E02.mkv"), b"video").unwrap();
        // A directory in the way makes the first copy fail.
        fs::create_dir(videos.join("Show.S01E01.srt")).unwrap();
        let zip_path = temp_dir.path().join("Show.S01.zip");
        write_zip(
            &zip_path,
            &[("Show.S01E01.srt", b"one"), ("Show.S01E02.srt", b"two")],
        );

        let summary = run(
            &request(SubtitleSource::Path(zip_path), &videos),
            &Settings::default(),
            temp_dir.path(),
        )
        .unwrap();

        assert_eq!(summary.copies, CopyReport { copied: 1, skipped: 0, failed: 1 });
        assert_eq!(fs::read(videos.join("Show.S01E02.srt")).unwrap(), b"two");
        assert!(summary.cleaned_up);
        assert!(scratch_dirs(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_located_zip_run() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("Show")).unwrap();
        fs::write(root.join("Show/Show.S01E05.mkv"), b"video").unwrap();
        write_zip(&root.join("show.s01.subs.zip"), &[("Show.S01E05.srt", b"five")]);

        let summary = run(
            &request(SubtitleSource::LocateZip(root.to_path_buf()), root),
            &Settings::default(),
            root,
        )
        .unwrap();

        assert_eq!(summary.copies.copied, 1);
        assert_eq!(fs::read(root.join("Show/Show.S01E05.srt")).unwrap(), b"five");
        assert!(scratch_dirs(root).is_empty());
    }

    #[test]
    fn test_missing_video_root_still_reports() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Show.S01E01.srt"), b"x").unwrap();

        let summary = run(
            &request(
                SubtitleSource::Path(temp_dir.path().to_path_buf()),
                &temp_dir.path().join("missing"),
            ),
            &Settings::default(),
            temp_dir.path(),
        )
        .unwrap();

        assert_eq!(summary.subtitles.len(), 1);
        assert!(summary.videos.is_empty());
        assert_eq!(summary.copies, CopyReport::default());
    }

    #[test]
    fn test_rejected_collision_empties_that_side_only() {
        let temp_dir = TempDir::new().unwrap();
        let videos = temp_dir.path().join("tv");
        fs::create_dir_all(videos.join("a")).unwrap();
        fs::create_dir_all(videos.join("b")).unwrap();
        fs::write(videos.join("a/Show.S01E01.mkv"), b"v").unwrap();
        fs::write(videos.join("b/Show.S01E01.mkv"), b"v").unwrap();
        let subs = temp_dir.path().join("subs");
        fs::create_dir(&subs).unwrap();
        fs::write(subs.join("Show.S01E01.srt"), b"x").unwrap();

        let settings = Settings {
            on_collision: CollisionPolicy::Reject,
            ..Settings::default()
        };
        let summary = run(
            &request(SubtitleSource::Path(subs), &videos),
            &settings,
            temp_dir.path(),
        )
        .unwrap();

        assert_eq!(summary.subtitles.len(), 1);
        assert!(summary.videos.is_empty());
        assert_eq!(summary.copies.copied, 0);
    }

    #[test]
    fn test_remove_scratch_reports_failure_without_aborting() {
        let temp_dir = TempDir::new().unwrap();
        let scratch = ScratchDir::create_in(temp_dir.path()).unwrap();
        fs::remove_dir_all(scratch.path()).unwrap();

        assert!(!remove_scratch(Some(scratch)));
        assert!(remove_scratch(None));
    }

    #[test]
    fn test_locate_without_match_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let err = run(
            &request(
                SubtitleSource::LocateZip(temp_dir.path().to_path_buf()),
                temp_dir.path(),
            ),
            &Settings::default(),
            temp_dir.path(),
        )
        .unwrap_err();

        assert!(matches!(err, SourceError::NoArchiveFound { .. }));
    }
}
