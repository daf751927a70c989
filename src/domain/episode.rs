use regex::{Regex, RegexBuilder};
use std::path::Path;
use std::sync::OnceLock;

use super::models::EpisodeKey;

fn two_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{2}").expect("static regex"))
}

/// Derives the episode key from the file name of `path`.
///
/// Occurrences of `season_pattern` are stripped first (case-insensitive, matched
/// literally) so a marker like `s01` glued to the episode number is not read as
/// the episode. The first two consecutive digits that remain form the key; a
/// longer run of digits contributes its first two. Directory names never take
/// part.
pub fn extract_key(path: &Path, season_pattern: &str) -> EpisodeKey {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return EpisodeKey::new("");
    };

    let stripped = strip_season(&name, season_pattern);

    two_digits()
        .find(&stripped)
        .map(|m| EpisodeKey::new(m.as_str()))
        .unwrap_or_else(|| EpisodeKey::new(""))
}

fn strip_season(name: &str, season_pattern: &str) -> String {
    if season_pattern.is_empty() {
        return name.to_string();
    }
    match RegexBuilder::new(&regex::escape(season_pattern))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(name, "").into_owned(),
        Err(_) => name.to_string(),
    }
}
