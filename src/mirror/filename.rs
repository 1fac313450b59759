// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File extension used for every mirrored feed
pub const MIRROR_EXTENSION: &str = "xml";

/// Maximum length of a mirror identifier, leaving room for the extension
const MAX_ID_LENGTH: usize = 200;

/// A validated, filesystem-safe identifier for a mirrored feed
///
/// The identifier is chosen by the user in the config file and is used
/// verbatim as the file stem, so it stays stable across runs even when the
/// feed URL changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MirrorId(String);

impl MirrorId {
    /// Validate a raw identifier
    ///
    /// Rejects anything that would not survive `sanitize-filename` unchanged,
    /// plus hidden names and path components, so the identifier can never
    /// escape the output directory.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &'static str| ConfigError::InvalidMirrorId {
            id: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if raw.starts_with('.') {
            return Err(invalid("must not start with '.'"));
        }
        if raw.len() > MAX_ID_LENGTH {
            return Err(invalid("is too long"));
        }
        if raw.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
            return Err(invalid("must not contain path separators or control characters"));
        }
        if sanitize_filename::sanitize(raw) != raw {
            return Err(invalid("is not a safe filename"));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MirrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Filename (without directory) of the mirrored copy of a feed
pub fn mirror_filename(id: &MirrorId) -> String {
    format!("{}.{}", id.as_str(), MIRROR_EXTENSION)
}

/// Full path of the mirrored copy of a feed inside the output directory
pub fn mirror_path(output_dir: &Path, id: &MirrorId) -> PathBuf {
    output_dir.join(mirror_filename(id))
}

/// Check whether a path looks like a mirrored feed file
pub fn is_mirror_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == MIRROR_EXTENSION)
}
