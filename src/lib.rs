pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod index;
pub mod mirror;
pub mod progress;
pub mod store;
pub mod sync;

// Re-export main types for convenience
pub use config::{FeedDescriptor, MirrorConfig, load_config, parse_config};
pub use error::{
    ConfigError, FeedError, FetchError, IndexError, MirrorError, StoreError, SyncError, TitleError,
};
pub use feed::{extract_title, fetch_feed};
pub use http::{HttpClient, HttpResponse, ReqwestClient, USER_AGENT};
pub use index::{IndexEntry, IndexPage, build_index, render_index, write_index};
pub use mirror::{MirrorId, MirrorOutcome, has_changed, mirror_feed, mirror_filename, mirror_path};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use store::{MirroredFile, OutputState, scan_output_dir};
pub use sync::{MirrorReport, mirror_feeds, mirror_one};
