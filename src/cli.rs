use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use crate::config::Overrides;
use crate::domain::models::CollisionPolicy;
use crate::workflows::source::SubtitleSource;

const ZIP_SWITCH: &str = "zip";

#[derive(Parser, Debug)]
#[command(name = "subtitle-pairer")]
#[command(
    about = "Finds subtitles for the episodes of a series season and copies each one next to its video file under the video's name"
)]
pub struct Cli {
    /// [SUBTITLES VIDEOS] SERIES SEASON [zip]
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Subtitle file extension
    #[arg(long = "subtitle-ext")]
    pub subtitle_ext: Option<String>,

    /// Video file extension
    #[arg(long = "video-ext")]
    pub video_ext: Option<String>,

    /// Skip paths containing this term (empty to disable)
    #[arg(long)]
    pub exclude: Option<String>,

    /// How many levels below the subtitle root to search
    #[arg(long = "subtitle-depth")]
    pub subtitle_depth: Option<usize>,

    /// How many levels below the video root to search
    #[arg(long = "video-depth")]
    pub video_depth: Option<usize>,

    /// What to do when two files share an episode number
    #[arg(long = "on-collision")]
    pub on_collision: Option<CollisionPolicy>,

    /// Report pairings without copying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Show debug output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// One run of the pipeline, decoded from the positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub subtitles: SubtitleSource,
    pub videos: PathBuf,
    pub series: String,
    pub season: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(Request),
    Usage,
}

impl Cli {
    pub fn invocation(&self) -> Invocation {
        let current = || PathBuf::from(".");
        match self.args.as_slice() {
            [series, season] => Invocation::Run(Request {
                subtitles: SubtitleSource::Path(current()),
                videos: current(),
                series: series.clone(),
                season: season.clone(),
            }),
            [series, season, switch] if switch.eq_ignore_ascii_case(ZIP_SWITCH) => {
                Invocation::Run(Request {
                    subtitles: SubtitleSource::LocateZip(current()),
                    videos: current(),
                    series: series.clone(),
                    season: season.clone(),
                })
            }
            [subtitles, videos, series, season] => Invocation::Run(Request {
                subtitles: SubtitleSource::Path(PathBuf::from(subtitles)),
                videos: PathBuf::from(videos),
                series: series.clone(),
                season: season.clone(),
            }),
            _ => Invocation::Usage,
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            subtitle_extension: self.subtitle_ext.clone(),
            video_extension: self.video_ext.clone(),
            exclude: self.exclude.clone(),
            subtitle_depth: self.subtitle_depth,
            video_depth: self.video_depth,
            on_collision: self.on_collision,
            dry_run: self.dry_run,
        }
    }
}

pub fn usage() -> String {
    let help = Cli::command().render_help();
    format!(
        "{help}
Pairs subtitles with series video files whose paths match the series and
season patterns (not case sensitive). Subtitles may come from a folder, a
given .zip file, or a .zip found by series and season when the \"zip\" switch
is used.

Examples:
  subtitle-pairer wire s01
  subtitle-pairer wire s01 zip
  subtitle-pairer ~/subtitles . wire s01
  subtitle-pairer subtitles.zip ~/series wire s01
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("subtitle-pairer").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_two_args_use_current_directory() {
        assert_eq!(
            parse(&["wire", "s01"]).invocation(),
            Invocation::Run(Request {
                subtitles: SubtitleSource::Path(PathBuf::from(".")),
                videos: PathBuf::from("."),
                series: "wire".to_string(),
                season: "s01".to_string(),
            })
        );
    }

    #[test]
    fn test_zip_switch_locates_archive() {
        let Invocation::Run(request) = parse(&["wire", "s01", "zip"]).invocation() else {
            panic!("expected a run");
        };
        assert_eq!(request.subtitles, SubtitleSource::LocateZip(PathBuf::from(".")));
    }

    #[test]
    fn test_explicit_roots() {
        let Invocation::Run(request) =
            parse(&["subs.zip", "/tv", "wire", "s01"]).invocation()
        else {
            panic!("expected a run");
        };
        assert_eq!(request.subtitles, SubtitleSource::Path(PathBuf::from("subs.zip")));
        assert_eq!(request.videos, PathBuf::from("/tv"));
        assert_eq!(request.series, "wire");
        assert_eq!(request.season, "s01");
    }

    #[test]
    fn test_other_shapes_print_usage() {
        assert_eq!(parse(&[]).invocation(), Invocation::Usage);
        assert_eq!(parse(&["wire"]).invocation(), Invocation::Usage);
        assert_eq!(parse(&["wire", "s01", "rar"]).invocation(), Invocation::Usage);
        assert_eq!(parse(&["a", "b", "c", "d", "e"]).invocation(), Invocation::Usage);
    }

    #[test]
    fn test_options_become_overrides() {
        let cli = parse(&[
            "wire",
            "s01",
            "--exclude",
            "",
            "--video-depth",
            "3",
            "--on-collision",
            "reject",
            "--dry-run",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.exclude.as_deref(), Some(""));
        assert_eq!(overrides.video_depth, Some(3));
        assert_eq!(overrides.on_collision, Some(CollisionPolicy::Reject));
        assert!(overrides.dry_run);
    }

    #[test]
    fn test_usage_lists_examples() {
        assert!(usage().contains("subtitle-pairer wire s01 zip"));
    }
}
