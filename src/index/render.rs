// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::IndexError;

use super::page::{IndexEntry, IndexPage};

/// Filename of the generated index page inside the output directory
pub const INDEX_FILENAME: &str = "index.html";

const STYLE: &str = "\
    body { font-family: sans-serif; max-width: 800px; margin: 0 auto; padding: 1rem; }
    .feed { margin: 1rem 0; padding: 1rem; border: 1px solid #ccc; }
    footer { margin-top: 2rem; color: #666; font-size: 0.9rem; }";

/// Format a generation timestamp (UTC, second precision)
pub fn format_timestamp(generated_at: DateTime<Utc>) -> String {
    generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Render the complete index page
pub fn render_index(page: &IndexPage, generated_at: DateTime<Utc>) -> String {
    let title = encode_text(&page.title);

    let mut html = format!(
        "<!DOCTYPE html>
<html>
<head>
  <title>{title}</title>
  <meta charset=\"utf-8\">
  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">
  <style>
{STYLE}
  </style>
</head>
<body>
  <h1>{title}</h1>
"
    );

    for entry in &page.entries {
        html.push_str(&render_entry(entry));
    }

    html.push_str(&format!(
        "  <footer>
    <p>Last updated: {}</p>
  </footer>
</body>
</html>
",
        format_timestamp(generated_at)
    ));

    html
}

fn render_entry(entry: &IndexEntry) -> String {
    let mut html = String::from("  <div class=\"feed\">\n");
    html.push_str(&format!("    <h2>{}</h2>\n", encode_text(&entry.title)));

    if let Some(description) = &entry.description {
        html.push_str(&format!("    <p>{}</p>\n", encode_text(description)));
    }

    if let Some(url) = &entry.source_url {
        html.push_str(&format!(
            "    <p>Original URL: <a href=\"{}\">{}</a></p>\n",
            encode_double_quoted_attribute(url),
            encode_text(url)
        ));
    }

    html.push_str(&format!(
        "    <p>Mirror URL: <a href=\"{}\">{}</a></p>\n",
        encode_double_quoted_attribute(&entry.mirror_filename),
        encode_text(&entry.mirror_filename)
    ));
    html.push_str("  </div>\n");

    html
}

/// Write the rendered index page, replacing any previous one
pub fn write_index(output_dir: &Path, html: &str) -> Result<PathBuf, IndexError> {
    let path = output_dir.join(INDEX_FILENAME);

    std::fs::write(&path, html).map_err(|e| IndexError::WriteFailed {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}
