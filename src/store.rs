// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::mirror::{PARTIAL_SUFFIX, is_mirror_file};

/// A feed file found in the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirroredFile {
    /// File stem, which is the mirror identifier the file was written under
    pub stem: String,
    /// Filename without directory, used for links in the index
    pub filename: String,
    /// Full path to the file
    pub path: PathBuf,
}

/// Contents of the output directory
#[derive(Debug, Clone)]
pub struct OutputState {
    /// Mirrored feed files, in filesystem iteration order
    pub files: Vec<MirroredFile>,
    /// The output directory path
    pub output_dir: PathBuf,
    /// Number of partial files that were cleaned up during scan
    pub partial_files_cleaned: usize,
}

/// Scan the output directory for mirrored feed files
///
/// Creates the directory if it does not exist yet and removes `.partial`
/// files left behind by interrupted writes. The returned list is a snapshot;
/// calling this again rescans the directory. Order is whatever the filesystem
/// yields and carries no meaning.
pub fn scan_output_dir(output_dir: &Path) -> Result<OutputState, StoreError> {
    let mut files = Vec::new();
    let mut partial_files_cleaned = 0;

    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir).map_err(|e| StoreError::CreateDirectoryFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

        return Ok(OutputState {
            files,
            output_dir: output_dir.to_path_buf(),
            partial_files_cleaned,
        });
    }

    if !output_dir.is_dir() {
        return Err(StoreError::NotADirectory(output_dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(output_dir).map_err(|e| StoreError::ReadDirectoryFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| StoreError::ReadDirectoryFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

        if !entry.file_type().is_ok_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        let Some(filename) = path.file_name().and_then(|n| n.to_str()).map(String::from) else {
            continue;
        };

        if filename.ends_with(PARTIAL_SUFFIX) {
            if std::fs::remove_file(&path).is_ok() {
                partial_files_cleaned += 1;
            }
            continue;
        }

        if !is_mirror_file(&path) {
            continue;
        }

        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(String::from) {
            files.push(MirroredFile {
                stem,
                filename,
                path,
            });
        }
    }

    Ok(OutputState {
        files,
        output_dir: output_dir.to_path_buf(),
        partial_files_cleaned,
    })
}
