// ABOUTME: Sitemap XML parsing that collects page locations from <loc> elements.
// ABOUTME: Namespace prefixes are ignored; duplicates are dropped keeping first occurrence.

use std::collections::HashSet;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// Extracts the text of every `loc` element in a sitemap or sitemap index.
///
/// Values are trimmed and deduplicated in document order. Malformed XML stops
/// the scan; locations read up to that point are still returned.
pub fn sitemap_locations(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);

    let mut pages = Vec::new();
    let mut seen = HashSet::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"loc" {
                    current = Some(String::new());
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(ref mut value) = current {
                    let text = e.decode().map(|s| s.into_owned()).unwrap_or_default();
                    value.push_str(&text);
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(ref mut value) = current {
                    let text = e.decode().map(|s| s.into_owned()).unwrap_or_default();
                    value.push_str(&text);
                }
            }
            Ok(Event::GeneralRef(ref e)) => {
                if let Some(ref mut value) = current {
                    let name = e.decode().map(|s| s.into_owned()).unwrap_or_default();
                    if let Ok(Some(ch)) = e.resolve_char_ref() {
                        value.push(ch);
                    } else if let Some(resolved) = resolve_predefined_entity(&name) {
                        value.push_str(resolved);
                    } else {
                        value.push('&');
                        value.push_str(&name);
                        value.push(';');
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                if e.local_name().as_ref() == b"loc" {
                    if let Some(value) = current.take() {
                        let value = value.trim().to_string();
                        if !value.is_empty() && seen.insert(value.clone()) {
                            pages.push(value);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                tracing::warn!(
                    position = reader.buffer_position(),
                    error = %err,
                    "sitemap XML is malformed"
                );
                break;
            }
            _ => {}
        }
    }

    tracing::debug!(pages = pages.len(), "parsed sitemap locations");
    pages
}
