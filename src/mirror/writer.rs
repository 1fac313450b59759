// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::MirrorError;

/// Suffix of the temporary file a mirror is written to before it replaces the old copy
pub const PARTIAL_SUFFIX: &str = ".partial";

/// What happened to a mirrored file after a successful fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// No previous copy existed; the feed was written for the first time
    Created { bytes: u64, content_hash: String },
    /// The fetched content differed from the stored copy and replaced it
    Updated { bytes: u64, content_hash: String },
    /// The fetched content was byte-for-byte identical; nothing was written
    Unchanged,
}

/// Read the stored copy of a feed, if there is one
async fn read_existing(path: &Path) -> Result<Option<Vec<u8>>, MirrorError> {
    match tokio::fs::read(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(MirrorError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Check whether fetched content differs from the stored copy
///
/// A missing file counts as changed. Comparison is exact byte equality, so a
/// regenerated timestamp or reformatted whitespace in the source is a change.
pub async fn has_changed(content: &[u8], path: &Path) -> Result<bool, MirrorError> {
    Ok(read_existing(path)
        .await?
        .is_none_or(|existing| existing != content))
}

/// Path of the temporary file used while writing `path`
pub fn partial_path(path: &Path) -> PathBuf {
    let mut partial = path.as_os_str().to_owned();
    partial.push(PARTIAL_SUFFIX);
    PathBuf::from(partial)
}

/// Replace the stored copy of a feed with new content
///
/// Content goes to a `.partial` file first and is renamed over the target,
/// so the previous copy is either fully kept or fully replaced.
pub async fn write_mirror(content: &[u8], path: &Path) -> Result<(), MirrorError> {
    let partial = partial_path(path);

    if let Err(e) = write_partial(content, &partial).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e);
    }

    tokio::fs::rename(&partial, path)
        .await
        .map_err(|e| MirrorError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

async fn write_partial(content: &[u8], partial: &Path) -> Result<(), MirrorError> {
    let write_failed = |e: std::io::Error| MirrorError::WriteFailed {
        path: partial.to_path_buf(),
        source: e,
    };

    let mut file = File::create(partial).await.map_err(write_failed)?;
    file.write_all(content).await.map_err(write_failed)?;
    file.flush().await.map_err(write_failed)?;
    file.sync_all().await.map_err(write_failed)
}

/// Hex-encoded SHA-256 of mirrored content, prefixed with the algorithm
pub fn content_hash(content: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(content))
}

/// Store fetched content for a feed if it differs from the previous copy
pub async fn mirror_feed(content: &[u8], path: &Path) -> Result<MirrorOutcome, MirrorError> {
    let existed = tokio::fs::try_exists(path)
        .await
        .map_err(|e| MirrorError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    if !has_changed(content, path).await? {
        return Ok(MirrorOutcome::Unchanged);
    }

    write_mirror(content, path).await?;

    let bytes = content.len() as u64;
    let content_hash = content_hash(content);

    Ok(if existed {
        MirrorOutcome::Updated {
            bytes,
            content_hash,
        }
    } else {
        MirrorOutcome::Created {
            bytes,
            content_hash,
        }
    })
}
