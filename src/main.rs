// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};

use podmirror::{
    NoopReporter, ProgressEvent, ProgressReporter, ReqwestClient, SharedProgressReporter,
    load_config, mirror_feeds,
};

// Emoji with fallback for terminals without Unicode support
static ANTENNA: Emoji<'_, '_> = Emoji("📡 ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static SAVED: Emoji<'_, '_> = Emoji("💾 ", "[+] ");
static SAME: Emoji<'_, '_> = Emoji("💤 ", "[=] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[?] ");
static BROOM: Emoji<'_, '_> = Emoji("🧹 ", "[-] ");
static PAGE: Emoji<'_, '_> = Emoji("📄 ", "[i] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Mirror podcast RSS feeds to local files and render a static index
#[derive(Parser, Debug)]
#[command(name = "podmirror")]
#[command(about = "Mirror podcast RSS feeds to local files and render a static index")]
#[command(version)]
struct Args {
    /// Path to the TOML config file listing the feeds
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Output directory for mirrored feeds (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Prints one line per event, keeping a spinner alive on interactive terminals
///
/// Lines go through `suspend` so they are printed even when stdout is not a
/// terminal, which is the normal case for scheduled runs.
struct LineReporter {
    spinner: ProgressBar,
}

impl LineReporter {
    fn new() -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(100));

        Self { spinner }
    }

    fn line(&self, message: String) {
        self.spinner.suspend(|| println!("{message}"));
    }
}

impl ProgressReporter for LineReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::PartialFilesCleanedUp { count } => {
                self.line(format!(
                    "{BROOM}Removed {} unfinished file(s) from an earlier run",
                    count.to_string().yellow()
                ));
            }

            ProgressEvent::FetchingFeed {
                url,
                feed_index,
                total_feeds,
            } => {
                self.spinner.set_message(format!(
                    "[{}/{}] {}",
                    (feed_index + 1).to_string().cyan(),
                    total_feeds.to_string().cyan(),
                    url
                ));
                self.line(format!("{SEARCH}Fetching {}", url.cyan()));
            }

            ProgressEvent::FeedCreated {
                path,
                bytes,
                content_hash,
            } => {
                self.line(format!(
                    "{SAVED}Creating {} ({} bytes, {})",
                    path.display().to_string().green(),
                    bytes,
                    content_hash.dimmed()
                ));
            }

            ProgressEvent::FeedUpdated {
                path,
                bytes,
                content_hash,
            } => {
                self.line(format!(
                    "{SAVED}Updating {} ({} bytes, {})",
                    path.display().to_string().green().bold(),
                    bytes,
                    content_hash.dimmed()
                ));
            }

            ProgressEvent::FeedUnchanged { path } => {
                self.line(format!(
                    "{SAME}No changes for {}",
                    path.display().to_string().dimmed()
                ));
            }

            ProgressEvent::FeedFailed { url, error } => {
                self.line(format!(
                    "{FAILURE}Error processing {}: {}",
                    url.yellow(),
                    error.red()
                ));
            }

            ProgressEvent::IndexEntrySkipped { path, error } => {
                self.line(format!(
                    "{WARNING}Error processing {}: {}",
                    path.display().to_string().yellow(),
                    error.red()
                ));
            }

            ProgressEvent::IndexWritten { path, entries } => {
                self.line(format!(
                    "{PAGE}Wrote {} with {} feed(s)",
                    path.display().to_string().cyan(),
                    entries.to_string().cyan()
                ));
            }

            ProgressEvent::MirrorCompleted {
                created_count,
                updated_count,
                unchanged_count,
                failed_count,
            } => {
                self.spinner.finish_and_clear();
                println!(
                    "\n{PARTY}{} {} new, {} updated, {} unchanged, {} failed",
                    "Mirror complete:".bold().green(),
                    created_count.to_string().green().bold(),
                    updated_count.to_string().green(),
                    unchanged_count.to_string().yellow(),
                    if failed_count > 0 {
                        failed_count.to_string().red().bold()
                    } else {
                        failed_count.to_string().green()
                    }
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            ANTENNA,
            "podmirror".bold().magenta(),
            "- Podcast Feed Mirror".dimmed()
        );
    }

    let client = ReqwestClient::new().context("Failed to create HTTP client")?;

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(LineReporter::new())
    };

    let report = mirror_feeds(&client, &config, reporter)
        .await
        .context("Failed to mirror feeds")?;

    if !args.quiet && !report.failed_feeds.is_empty() {
        println!("\n{}", "Failed feeds:".red().bold());
        for (url, error) in &report.failed_feeds {
            println!("  {}{} - {}", CROSS, url.yellow(), error.dimmed());
        }
    }

    if !args.quiet {
        println!(
            "\n{PAGE}Index: {}\n",
            report.index_path.display().to_string().cyan()
        );
    }

    Ok(())
}
