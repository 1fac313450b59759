// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::TitleError;

const TITLE_TAG: &[u8] = b"title";

/// Extract the display title of a stored feed
///
/// Returns the text of the first element whose local name is `title`, in
/// document order. The encoding named in the XML declaration (or BOM) is
/// honoured, so Latin-1 feeds decode correctly. Matching ignores namespaces,
/// so RSS `channel/title` and Atom `feed/title` are both found. The whole document is read so that
/// anything that is not well-formed XML is rejected, even if a title was
/// already seen.
pub fn extract_title(xml: &[u8]) -> Result<String, TitleError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().check_end_names = true;

    let mut buf = Vec::new();
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut roots = 0usize;
    let mut title: Option<String> = None;
    // Depth at which the first <title> was opened, plus its text so far
    let mut capture: Option<(usize, String)> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|source| TitleError::Malformed {
                position: reader.error_position(),
                source,
            })?;

        match event {
            Event::Start(e) => {
                if open.is_empty() {
                    roots += 1;
                    if roots > 1 {
                        return Err(TitleError::MultipleRoots);
                    }
                }
                if title.is_none() && capture.is_none() && e.local_name().as_ref() == TITLE_TAG {
                    capture = Some((open.len(), String::new()));
                }
                open.push(e.name().as_ref().to_vec());
            }
            Event::Empty(e) => {
                if open.is_empty() {
                    roots += 1;
                    if roots > 1 {
                        return Err(TitleError::MultipleRoots);
                    }
                }
                if title.is_none() && capture.is_none() && e.local_name().as_ref() == TITLE_TAG {
                    title = Some(String::new());
                }
            }
            Event::End(_) => {
                open.pop();
                if capture
                    .as_ref()
                    .is_some_and(|(depth, _)| *depth == open.len())
                {
                    title = capture.take().map(|(_, text)| text);
                }
            }
            Event::Text(e) => {
                if open.is_empty() {
                    if !e.iter().all(u8::is_ascii_whitespace) {
                        return Err(TitleError::TextOutsideRoot);
                    }
                } else if let Some((_, text)) = capture.as_mut() {
                    let unescaped = e.unescape().map_err(|source| TitleError::Malformed {
                        position: reader.buffer_position(),
                        source,
                    })?;
                    text.push_str(&unescaped);
                }
            }
            Event::CData(e) => {
                if let Some((_, text)) = capture.as_mut() {
                    let decoded =
                        reader
                            .decoder()
                            .decode(&e)
                            .map_err(|source| TitleError::Malformed {
                                position: reader.buffer_position(),
                                source: source.into(),
                            })?;
                    text.push_str(&decoded);
                }
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if let Some(name) = open.pop() {
        return Err(TitleError::UnclosedElement(
            String::from_utf8_lossy(&name).into_owned(),
        ));
    }
    if roots == 0 {
        return Err(TitleError::NoRootElement);
    }

    title
        .map(|t| t.trim().to_string())
        .ok_or(TitleError::MissingTitle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_rss_channel_title() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Podcast</title>
    <item><title>Episode 1</title></item>
  </channel>
</rss>"#;

        assert_eq!(extract_title(xml).unwrap(), "Test Podcast");
    }

    #[test]
    fn extracts_minimal_rss_title() {
        let xml = b"<rss><channel><title>A</title></channel></rss>";
        assert_eq!(extract_title(xml).unwrap(), "A");
    }

    #[test]
    fn extracts_namespaced_atom_title() {
        let xml = br#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Feed</title>
  <entry><title>Entry</title></entry>
</feed>"#;

        assert_eq!(extract_title(xml).unwrap(), "Atom Feed");
    }

    #[test]
    fn matches_prefixed_title_by_local_name() {
        let xml = br#"<a:feed xmlns:a="http://www.w3.org/2005/Atom"><a:title>Prefixed</a:title></a:feed>"#;
        assert_eq!(extract_title(xml).unwrap(), "Prefixed");
    }

    #[test]
    fn unescapes_entities() {
        let xml = b"<rss><channel><title>Tom &amp; Jerry</title></channel></rss>";
        assert_eq!(extract_title(xml).unwrap(), "Tom & Jerry");
    }

    #[test]
    fn reads_cdata_titles() {
        let xml = b"<rss><channel><title><![CDATA[Q&A <Live>]]></title></channel></rss>";
        assert_eq!(extract_title(xml).unwrap(), "Q&A <Live>");
    }

    #[test]
    fn decodes_latin1_declared_feed() {
        let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><rss><channel><title>Caf\xE9</title></channel></rss>";
        assert_eq!(extract_title(xml).unwrap(), "Caf\u{e9}");
    }

    #[test]
    fn decodes_latin1_cdata_title() {
        let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><rss><channel><title><![CDATA[Cr\xE8me & Co]]></title></channel></rss>";
        assert_eq!(extract_title(xml).unwrap(), "Cr\u{e8}me & Co");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let xml = b"<rss><channel><title>\n   Spaced Out \n</title></channel></rss>";
        assert_eq!(extract_title(xml).unwrap(), "Spaced Out");
    }

    #[test]
    fn empty_title_element_yields_empty_string() {
        let xml = b"<rss><channel><title/></channel></rss>";
        assert_eq!(extract_title(xml).unwrap(), "");
    }

    #[test]
    fn reports_missing_title() {
        let xml = b"<rss><channel><description>x</description></channel></rss>";
        assert!(matches!(extract_title(xml), Err(TitleError::MissingTitle)));
    }

    #[test]
    fn rejects_mismatched_end_tag() {
        let xml = b"<rss><channel><title>A</title></rss>";
        assert!(extract_title(xml).is_err());
    }

    #[test]
    fn rejects_unclosed_document() {
        let xml = b"<rss><channel><title>A</title>";
        assert!(extract_title(xml).is_err());
    }

    #[test]
    fn rejects_plain_text() {
        assert!(extract_title(b"this is not xml").is_err());
    }

    #[test]
    fn rejects_empty_document() {
        assert!(extract_title(b"").is_err());
    }

    #[test]
    fn rejects_multiple_roots() {
        let xml = b"<rss><title>A</title></rss><rss><title>B</title></rss>";
        assert!(matches!(extract_title(xml), Err(TitleError::MultipleRoots)));
    }

    #[test]
    fn rejects_malformed_content_after_title() {
        let xml = b"<rss><channel><title>A</title><item></channel></rss>";
        assert!(extract_title(xml).is_err());
    }
}
