//! String heuristics over paths, kept in one place so call sites never
//! compare path text directly.

use std::path::Path;

pub const ARCHIVE_EXTENSION: &str = "zip";

/// Case-insensitive extension check; `ext` may be given with or without the dot.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    let ext = ext.trim_start_matches('.');
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// `needle` is expected to be lowercase already; empty needles always match.
pub fn contains_lowercase(lowercase_path: &str, needle: &str) -> bool {
    lowercase_path.contains(needle)
}

/// Lowercase text of `path` without its `root` prefix; the whole path when it
/// does not lie below `root`.
pub fn lowercase_below(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_lowercase()
}

pub fn is_archive(path: &Path) -> bool {
    has_extension(path, ARCHIVE_EXTENSION)
}

/// Lowercase needle for [`contains_lowercase`]; `None` for an empty term.
pub fn needle(term: &str) -> Option<String> {
    (!term.is_empty()).then(|| term.to_lowercase())
}
