use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::models::CollisionPolicy;

pub const CONFIG_ENV: &str = "SUBTITLE_PAIRER_CONFIG";

const DEFAULT_SUBTITLE_EXTENSION: &str = "srt";
const DEFAULT_VIDEO_EXTENSION: &str = "mkv";
const DEFAULT_EXCLUDE: &str = "sample";
// Subtitle folders are flat; video libraries nest per series and season.
const DEFAULT_SUBTITLE_DEPTH: usize = 1;
const DEFAULT_VIDEO_DEPTH: usize = 9;

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub subtitle_extension: Option<String>,
    pub video_extension: Option<String>,
    pub exclude: Option<String>,
    pub subtitle_depth: Option<usize>,
    pub video_depth: Option<usize>,
    pub on_collision: Option<CollisionPolicy>,
}

/// Values given on the command line; these win over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub subtitle_extension: Option<String>,
    pub video_extension: Option<String>,
    pub exclude: Option<String>,
    pub subtitle_depth: Option<usize>,
    pub video_depth: Option<usize>,
    pub on_collision: Option<CollisionPolicy>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub subtitle_extension: String,
    pub video_extension: String,
    pub exclude: Option<String>,
    pub subtitle_depth: usize,
    pub video_depth: usize,
    pub on_collision: CollisionPolicy,
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::merge(ConfigFile::default(), Overrides::default())
    }
}

impl Settings {
    pub fn merge(file: ConfigFile, overrides: Overrides) -> Self {
        let exclude = overrides
            .exclude
            .or(file.exclude)
            .unwrap_or_else(|| DEFAULT_EXCLUDE.to_string());

        Settings {
            subtitle_extension: overrides
                .subtitle_extension
                .or(file.subtitle_extension)
                .unwrap_or_else(|| DEFAULT_SUBTITLE_EXTENSION.to_string()),
            video_extension: overrides
                .video_extension
                .or(file.video_extension)
                .unwrap_or_else(|| DEFAULT_VIDEO_EXTENSION.to_string()),
            exclude: (!exclude.is_empty()).then_some(exclude),
            subtitle_depth: overrides
                .subtitle_depth
                .or(file.subtitle_depth)
                .unwrap_or(DEFAULT_SUBTITLE_DEPTH),
            video_depth: overrides
                .video_depth
                .or(file.video_depth)
                .unwrap_or(DEFAULT_VIDEO_DEPTH),
            on_collision: overrides
                .on_collision
                .or(file.on_collision)
                .unwrap_or_default(),
            dry_run: overrides.dry_run,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.subtitle_depth == 0 || self.video_depth == 0 {
            bail!("Search depth must be at least 1");
        }
        if self.subtitle_extension.trim_start_matches('.').is_empty()
            || self.video_extension.trim_start_matches('.').is_empty()
        {
            bail!("File extensions must not be empty");
        }
        Ok(())
    }
}

/// Reads the config file if there is one. A missing file yields the defaults.
pub fn load_config() -> Result<ConfigFile> {
    let config_path = match env::var_os(CONFIG_ENV) {
        Some(path) => PathBuf::from(path),
        None => get_config_path(),
    };
    load_config_from(&config_path)
}

pub fn load_config_from(config_path: &Path) -> Result<ConfigFile> {
    if !config_path.exists() {
        return Ok(ConfigFile::default());
    }
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
    let config: ConfigFile = toml::from_str(&config_content)
        .with_context(|| format!("Invalid config file {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), "Loaded config file");
    Ok(config)
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("subtitle-pairer"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}
