use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::episode::extract_key;
use crate::domain::models::{CollisionPolicy, EpisodeMap, FileEntry};
use crate::error::CollectError;
use crate::infra::paths;

/// Filters for one collection pass. Patterns are compared case-insensitively
/// against the whole path, or against the part below `root` when
/// `match_below_root` is set (used for the tool's own scratch directory, whose
/// name must not take part in matching).
#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub max_depth: usize,
    pub extension: String,
    pub series: String,
    pub season: String,
    pub exclude: Option<String>,
    pub on_collision: CollisionPolicy,
    pub match_below_root: bool,
}

/// Walks `root` and keys every matching file by its episode number.
pub fn collect(root: &Path, options: &CollectOptions) -> Result<EpisodeMap, CollectError> {
    if !root.is_dir() {
        return Err(CollectError::RootNotFound(root.to_path_buf()));
    }

    let series = options.series.to_lowercase();
    let season = options.season.to_lowercase();
    let exclude = options.exclude.as_deref().and_then(paths::needle);

    let mut episodes = EpisodeMap::new();

    for entry in WalkDir::new(root)
        .max_depth(options.max_depth)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        // Links are not followed during the walk, but linked files still count.
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let file = FileEntry::new(entry.into_path());
        let haystack = if options.match_below_root {
            paths::lowercase_below(file.path(), root)
        } else {
            file.lowercase.clone()
        };
        if !paths::has_extension(file.path(), &options.extension)
            || !paths::contains_lowercase(&haystack, &series)
            || !paths::contains_lowercase(&haystack, &season)
        {
            continue;
        }
        if let Some(exclude) = &exclude {
            if paths::contains_lowercase(&haystack, exclude) {
                debug!(path = %file.path().display(), "Excluded");
                continue;
            }
        }

        let key = extract_key(file.path(), &options.season);
        if key.is_unmatched() {
            debug!(path = %file.path().display(), "No episode number in file name");
            continue;
        }

        if let Some(previous) = episodes.get(&key) {
            match options.on_collision {
                CollisionPolicy::Overwrite => {
                    warn!(
                        episode = %key,
                        dropped = %previous.path().display(),
                        kept = %file.path().display(),
                        "Two files share an episode number, keeping the later one"
                    );
                }
                CollisionPolicy::Reject => {
                    return Err(CollectError::Collision {
                        key: key.to_string(),
                        first: previous.path.clone(),
                        second: file.path,
                    });
                }
            }
        }
        episodes.insert(key, file);
    }

    Ok(episodes)
}
