// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::MirrorConfig;
use crate::error::IndexError;
use crate::feed::extract_title;
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::store::MirroredFile;

/// One mirrored feed as listed on the index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Display title taken from the feed itself
    pub title: String,
    /// Filename of the mirrored copy, relative to the index page
    pub mirror_filename: String,
    /// Original feed URL, when the file belongs to a configured feed
    pub source_url: Option<String>,
    /// Description from the config, when present
    pub description: Option<String>,
}

/// Everything needed to render the index page
#[derive(Debug, Clone)]
pub struct IndexPage {
    pub title: String,
    pub entries: Vec<IndexEntry>,
    /// Number of feed files left out because they could not be read or parsed
    pub skipped: usize,
}

/// Build the entry for a single mirrored file
pub fn build_entry(file: &MirroredFile, config: &MirrorConfig) -> Result<IndexEntry, IndexError> {
    let content = std::fs::read(&file.path).map_err(|e| IndexError::ReadFailed {
        path: file.path.clone(),
        source: e,
    })?;

    let title = extract_title(&content).map_err(|e| IndexError::TitleFailed {
        path: file.path.clone(),
        source: e,
    })?;

    let feed = config.find_feed(&file.stem);

    Ok(IndexEntry {
        title: if title.is_empty() {
            file.stem.clone()
        } else {
            title
        },
        mirror_filename: file.filename.clone(),
        source_url: feed.map(|f| f.url.to_string()),
        description: feed.and_then(|f| f.description.clone()),
    })
}

/// Collect index entries for all mirrored files
///
/// Files that fail to read or parse are reported and left out; they never
/// fail the run. Entries keep the order of `files`.
pub fn build_index(
    files: &[MirroredFile],
    config: &MirrorConfig,
    reporter: &SharedProgressReporter,
) -> IndexPage {
    let mut entries = Vec::with_capacity(files.len());
    let mut skipped = 0;

    for file in files {
        match build_entry(file, config) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                reporter.report(ProgressEvent::IndexEntrySkipped {
                    path: file.path.clone(),
                    error: e.to_string(),
                });
                skipped += 1;
            }
        }
    }

    IndexPage {
        title: config.title.clone(),
        entries,
        skipped,
    }
}
