// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::mirror::MirrorId;

/// Output directory used when neither the config nor the CLI names one
pub const DEFAULT_OUTPUT_DIR: &str = "feeds";

/// Heading of the generated index page
pub const DEFAULT_TITLE: &str = "Podcast Feed Mirror";

/// A single feed to mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDescriptor {
    pub url: Url,
    pub mirror_id: MirrorId,
    pub description: Option<String>,
}

/// Validated configuration for one mirror run
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub output_dir: PathBuf,
    pub title: String,
    pub feeds: Vec<FeedDescriptor>,
}

impl MirrorConfig {
    /// Look up the feed that is stored under the given file stem
    pub fn find_feed(&self, stem: &str) -> Option<&FeedDescriptor> {
        self.feeds.iter().find(|feed| feed.mirror_id.as_str() == stem)
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    output_dir: Option<PathBuf>,
    title: Option<String>,
    feeds: Option<Vec<RawFeed>>,
}

#[derive(Debug, Deserialize)]
struct RawFeed {
    url: String,
    #[serde(alias = "mirrorId")]
    mirror_id: Option<String>,
    description: Option<String>,
}

/// Load and validate the feed configuration from a TOML file
pub fn load_config(path: &Path) -> Result<MirrorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config(&content)
}

/// Parse and validate the feed configuration from TOML text
pub fn parse_config(content: &str) -> Result<MirrorConfig, ConfigError> {
    let raw: RawConfig = toml::from_str(content)?;
    validate(raw)
}

fn validate(raw: RawConfig) -> Result<MirrorConfig, ConfigError> {
    let raw_feeds = raw.feeds.ok_or(ConfigError::MissingFeeds)?;
    if raw_feeds.is_empty() {
        return Err(ConfigError::EmptyFeeds);
    }

    let missing: Vec<String> = raw_feeds
        .iter()
        .filter(|feed| feed.mirror_id.is_none())
        .map(|feed| feed.url.clone())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingMirrorIds { urls: missing });
    }

    let mut feeds = Vec::with_capacity(raw_feeds.len());
    for raw_feed in raw_feeds {
        let url = parse_feed_url(&raw_feed.url)?;
        let mirror_id = MirrorId::parse(raw_feed.mirror_id.as_deref().unwrap_or_default())?;
        let description = raw_feed
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        feeds.push(FeedDescriptor {
            url,
            mirror_id,
            description,
        });
    }

    check_duplicates(&feeds)?;

    Ok(MirrorConfig {
        output_dir: raw
            .output_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        title: raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        feeds,
    })
}

fn parse_feed_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{scheme}'"),
        }),
    }
}

/// Reject identifiers that would map to the same file
///
/// Ids are compared case-insensitively because `podA.xml` and `PODA.xml`
/// are the same file on case-insensitive filesystems.
fn check_duplicates(feeds: &[FeedDescriptor]) -> Result<(), ConfigError> {
    let mut groups: HashMap<String, Vec<&str>> = HashMap::new();
    for feed in feeds {
        let id = feed.mirror_id.as_str();
        groups.entry(id.to_lowercase()).or_default().push(id);
    }

    let duplicates: BTreeSet<&str> = groups
        .into_values()
        .filter(|ids| ids.len() > 1)
        .flatten()
        .collect();

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::DuplicateMirrorIds {
            ids: duplicates.into_iter().map(String::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE_CONFIG: &str = r#"
title = "My Mirror"
output_dir = "public"

[[feeds]]
url = "https://example.com/rss"
mirror_id = "example"
description = "An example feed"

[[feeds]]
url = "http://a.test/rss"
mirrorId = "podA"
"#;

    #[test]
    fn parses_feeds_and_settings() {
        let config = parse_config(SAMPLE_CONFIG).unwrap();

        assert_eq!(config.title, "My Mirror");
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.feeds.len(), 2);

        let first = &config.feeds[0];
        assert_eq!(first.url.as_str(), "https://example.com/rss");
        assert_eq!(first.mirror_id.as_str(), "example");
        assert_eq!(first.description.as_deref(), Some("An example feed"));

        let second = &config.feeds[1];
        assert_eq!(second.mirror_id.as_str(), "podA");
        assert!(second.description.is_none());
    }

    #[test]
    fn applies_defaults() {
        let config = parse_config(
            r#"
[[feeds]]
url = "http://a.test/rss"
mirror_id = "podA"
"#,
        )
        .unwrap();

        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn rejects_missing_feeds_section() {
        let result = parse_config(r#"title = "Nothing here""#);
        assert!(matches!(result, Err(ConfigError::MissingFeeds)));
    }

    #[test]
    fn rejects_empty_feeds_list() {
        let result = parse_config("feeds = []");
        assert!(matches!(result, Err(ConfigError::EmptyFeeds)));
    }

    #[test]
    fn rejects_entries_without_url() {
        let result = parse_config(
            r#"
[[feeds]]
mirror_id = "podA"
"#,
        );
        assert!(matches!(result, Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn reports_all_feeds_missing_mirror_id() {
        let result = parse_config(
            r#"
[[feeds]]
url = "http://a.test/rss"

[[feeds]]
url = "http://b.test/rss"
mirror_id = "podB"

[[feeds]]
url = "http://c.test/rss"
"#,
        );

        match result {
            Err(ConfigError::MissingMirrorIds { urls }) => {
                assert_eq!(urls, vec!["http://a.test/rss", "http://c.test/rss"]);
            }
            other => panic!("Expected MissingMirrorIds, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_mirror_ids() {
        let result = parse_config(
            r#"
[[feeds]]
url = "http://a.test/rss"
mirror_id = "same"

[[feeds]]
url = "http://b.test/rss"
mirror_id = "other"

[[feeds]]
url = "http://c.test/rss"
mirror_id = "same"
"#,
        );

        match result {
            Err(ConfigError::DuplicateMirrorIds { ids }) => assert_eq!(ids, vec!["same"]),
            other => panic!("Expected DuplicateMirrorIds, got {other:?}"),
        }
    }

    #[test]
    fn rejects_mirror_ids_differing_only_in_case() {
        let result = parse_config(
            r#"
[[feeds]]
url = "http://a.test/rss"
mirror_id = "podA"

[[feeds]]
url = "http://b.test/rss"
mirror_id = "PODA"
"#,
        );

        match result {
            Err(ConfigError::DuplicateMirrorIds { ids }) => assert_eq!(ids, vec!["PODA", "podA"]),
            other => panic!("Expected DuplicateMirrorIds, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unsafe_mirror_id() {
        let result = parse_config(
            r#"
[[feeds]]
url = "http://a.test/rss"
mirror_id = "../outside"
"#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidMirrorId { .. })));
    }

    #[test]
    fn rejects_invalid_urls() {
        let result = parse_config(
            r#"
[[feeds]]
url = "not a url"
mirror_id = "podA"
"#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn rejects_non_http_schemes() {
        let result = parse_config(
            r#"
[[feeds]]
url = "ftp://a.test/rss"
mirror_id = "podA"
"#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn rejects_unparseable_toml() {
        let result = parse_config("[[feeds]\nurl = ");
        assert!(matches!(result, Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn blank_description_becomes_none() {
        let config = parse_config(
            r#"
[[feeds]]
url = "http://a.test/rss"
mirror_id = "podA"
description = "   "
"#,
        )
        .unwrap();
        assert!(config.feeds[0].description.is_none());
    }

    #[test]
    fn load_config_reports_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_config(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn load_config_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE_CONFIG).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.feeds.len(), 2);
    }

    #[test]
    fn find_feed_matches_mirror_id() {
        let config = parse_config(SAMPLE_CONFIG).unwrap();
        assert_eq!(
            config.find_feed("podA").map(|f| f.url.as_str()),
            Some("http://a.test/rss")
        );
        assert!(config.find_feed("unknown").is_none());
    }
}
