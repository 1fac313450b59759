// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::{FeedDescriptor, MirrorConfig};
use crate::error::{FeedError, SyncError};
use crate::feed::fetch_feed;
use crate::http::HttpClient;
use crate::index::{build_index, render_index, write_index};
use crate::mirror::{MirrorOutcome, mirror_feed, mirror_path};
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::store::scan_output_dir;

/// Result of a mirror run
#[derive(Debug, Clone)]
pub struct MirrorReport {
    /// Number of feeds stored for the first time
    pub created: usize,
    /// Number of feeds whose stored copy was replaced
    pub updated: usize,
    /// Number of feeds identical to their stored copy
    pub unchanged: usize,
    /// Number of feeds that could not be fetched or stored
    pub failed: usize,
    /// Details of failed feeds (url, error message)
    pub failed_feeds: Vec<(String, String)>,
    /// Path of the generated index page
    pub index_path: PathBuf,
    /// Number of feeds listed on the index page
    pub index_entries: usize,
    /// Number of stored feeds left off the index page
    pub index_skipped: usize,
}

/// Fetch one feed and store it if it changed
pub async fn mirror_one<C: HttpClient>(
    client: &C,
    feed: &FeedDescriptor,
    output_dir: &Path,
) -> Result<MirrorOutcome, FeedError> {
    let content = fetch_feed(client, feed.url.as_str()).await?;
    let path = mirror_path(output_dir, &feed.mirror_id);
    Ok(mirror_feed(&content, &path).await?)
}

/// Mirror every configured feed and regenerate the index page
///
/// Feeds are processed one after another. A feed that fails to fetch or
/// store is reported and skipped; the run only fails when the output
/// directory cannot be used or the index page cannot be written.
pub async fn mirror_feeds<C: HttpClient>(
    client: &C,
    config: &MirrorConfig,
    reporter: SharedProgressReporter,
) -> Result<MirrorReport, SyncError> {
    let output_dir = config.output_dir.as_path();

    let state = scan_output_dir(output_dir)?;
    if state.partial_files_cleaned > 0 {
        reporter.report(ProgressEvent::PartialFilesCleanedUp {
            count: state.partial_files_cleaned,
        });
    }

    let mut created = 0;
    let mut updated = 0;
    let mut unchanged = 0;
    let mut failed_feeds = Vec::new();

    let total_feeds = config.feeds.len();
    for (feed_index, feed) in config.feeds.iter().enumerate() {
        reporter.report(ProgressEvent::FetchingFeed {
            url: feed.url.to_string(),
            feed_index,
            total_feeds,
        });

        let path = mirror_path(output_dir, &feed.mirror_id);

        match mirror_one(client, feed, output_dir).await {
            Ok(MirrorOutcome::Created {
                bytes,
                content_hash,
            }) => {
                created += 1;
                reporter.report(ProgressEvent::FeedCreated {
                    path,
                    bytes,
                    content_hash,
                });
            }
            Ok(MirrorOutcome::Updated {
                bytes,
                content_hash,
            }) => {
                updated += 1;
                reporter.report(ProgressEvent::FeedUpdated {
                    path,
                    bytes,
                    content_hash,
                });
            }
            Ok(MirrorOutcome::Unchanged) => {
                unchanged += 1;
                reporter.report(ProgressEvent::FeedUnchanged { path });
            }
            Err(e) => {
                reporter.report(ProgressEvent::FeedFailed {
                    url: feed.url.to_string(),
                    error: e.to_string(),
                });
                failed_feeds.push((feed.url.to_string(), e.to_string()));
            }
        }
    }

    // Rescan so the index reflects what is on disk now, including files
    // from feeds that are no longer configured
    let state = scan_output_dir(output_dir)?;
    let page = build_index(&state.files, config, &reporter);
    let html = render_index(&page, Utc::now());
    let index_path = write_index(output_dir, &html)?;

    reporter.report(ProgressEvent::IndexWritten {
        path: index_path.clone(),
        entries: page.entries.len(),
    });

    let failed = failed_feeds.len();
    reporter.report(ProgressEvent::MirrorCompleted {
        created_count: created,
        updated_count: updated,
        unchanged_count: unchanged,
        failed_count: failed,
    });

    Ok(MirrorReport {
        created,
        updated,
        unchanged,
        failed,
        failed_feeds,
        index_path,
        index_entries: page.entries.len(),
        index_skipped: page.skipped,
    })
}
