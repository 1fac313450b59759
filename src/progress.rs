// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

/// Events emitted during a mirror run for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Stale partial files were removed from the output directory
    PartialFilesCleanedUp { count: usize },

    /// A feed is being fetched
    FetchingFeed {
        url: String,
        /// Index of this feed in the configured list
        feed_index: usize,
        total_feeds: usize,
    },

    /// A feed was stored for the first time
    FeedCreated {
        path: PathBuf,
        bytes: u64,
        content_hash: String,
    },

    /// A feed changed and its stored copy was replaced
    FeedUpdated {
        path: PathBuf,
        bytes: u64,
        content_hash: String,
    },

    /// A feed was identical to its stored copy
    FeedUnchanged { path: PathBuf },

    /// Fetching or storing a feed failed; the run continues
    FeedFailed { url: String, error: String },

    /// A stored feed could not be parsed and was left out of the index
    IndexEntrySkipped { path: PathBuf, error: String },

    /// The index page was written
    IndexWritten { path: PathBuf, entries: usize },

    /// The mirror run completed
    MirrorCompleted {
        created_count: usize,
        updated_count: usize,
        unchanged_count: usize,
        failed_count: usize,
    },
}

/// Trait for reporting progress events during a mirror run.
///
/// Implementations can use this to print log lines, drive a spinner,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Reporter that keeps every event for later assertions
    #[derive(Default)]
    pub struct RecordingReporter {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl RecordingReporter {
        pub fn events(&self) -> Vec<ProgressEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ProgressReporter for RecordingReporter {
        fn report(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }
}
