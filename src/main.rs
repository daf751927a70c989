mod cli;
mod config;
mod domain;
mod error;
mod infra;
mod workflows;

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Invocation};
use config::Settings;
use workflows::pipeline;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        println!("{}", fatal_message(&e));
        std::process::exit(1);
    }
}

fn fatal_message(e: &anyhow::Error) -> String {
    format!("Error: {e:#}")
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let request = match cli.invocation() {
        Invocation::Run(request) => request,
        Invocation::Usage => {
            println!("{}", cli::usage());
            return Ok(());
        }
    };

    let settings = Settings::merge(config::load_config()?, cli.overrides());
    settings.validate()?;

    // Scratch directories live in the working directory.
    let summary = pipeline::run(&request, &settings, Path::new("."))?;

    tracing::debug!(
        subtitles = summary.subtitles.len(),
        videos = summary.videos.len(),
        "Run finished"
    );
    if !summary.cleaned_up {
        tracing::warn!("Temporary subtitle files were left behind");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_fatal_message_includes_cause_chain() {
        let e = anyhow::Error::new(error::SourceError::NotFound(PathBuf::from("subs")))
            .context("Failed to resolve subtitles");
        assert_eq!(
            fatal_message(&e),
            "Error: Failed to resolve subtitles: subtitle source does not exist: subs"
        );
    }
}
