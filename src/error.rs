// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating the feed configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Config must contain a 'feeds' section")]
    MissingFeeds,

    #[error("Config 'feeds' section is empty")]
    EmptyFeeds,

    #[error("Missing mirror_id for feeds: {}", .urls.join(", "))]
    MissingMirrorIds { urls: Vec<String> },

    #[error("Invalid feed URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid mirror_id '{id}': {reason}")]
    InvalidMirrorId { id: String, reason: &'static str },

    #[error("Duplicate mirror_ids found: {}", .ids.join(", "))]
    DuplicateMirrorIds { ids: Vec<String> },
}

/// Errors that can occur when fetching a feed
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuildFailed(#[source] reqwest::Error),

    #[error("Failed to fetch feed from {url}: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },
}

/// Errors that can occur while comparing or writing a mirrored feed file
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Failed to read mirrored feed {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write mirrored feed {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur when scanning the output directory
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output path {0} exists but is not a directory")]
    NotADirectory(PathBuf),
}

/// Errors that can occur when extracting the display title of a stored feed
#[derive(Error, Debug)]
pub enum TitleError {
    #[error("Malformed XML at position {position}: {source}")]
    Malformed {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Document has no root element")]
    NoRootElement,

    #[error("Document has more than one root element")]
    MultipleRoots,

    #[error("Document has text outside the root element")]
    TextOutsideRoot,

    #[error("Unclosed element <{0}> at end of document")]
    UnclosedElement(String),

    #[error("Document has no <title> element")]
    MissingTitle,
}

/// Errors that can occur while building or writing the index page
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read feed file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse feed file {path}: {source}")]
    TitleFailed {
        path: PathBuf,
        #[source]
        source: TitleError,
    },

    #[error("Failed to write index {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that affect a single feed; the run continues past them
#[derive(Error, Debug)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Mirror(#[from] MirrorError),
}

/// Top-level errors for a mirror run
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}
