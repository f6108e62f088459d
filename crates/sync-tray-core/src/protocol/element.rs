//! Minimal owned XML tree for control-channel frames.
//!
//! Frames are tiny (a root tag and a handful of leaf children), so the whole
//! frame is read into an [`Element`] before the kind-specific fields are
//! picked out.

use crate::{CoreError, CoreResult};

use std::panic::Location;

use error_location::ErrorLocation;
use quick_xml::{Reader, events::BytesStart, events::Event};

/// One parsed XML element with its concatenated text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub(crate) name: String,
    pub(crate) text: String,
    pub(crate) children: Vec<Element>,
}

impl Element {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// First direct child with the given tag name.
    pub(crate) fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Text of the first direct child with the given tag name.
    pub(crate) fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.as_str())
    }

    /// Text of a required direct child.
    #[track_caller]
    pub(crate) fn required_text(&self, name: &str) -> CoreResult<&str> {
        self.child_text(name)
            .ok_or_else(|| CoreError::ProtocolDecode {
                reason: format!("<{}> is missing required <{}>", self.name, name),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Texts of every descendant with the given tag name, in document order.
    pub(crate) fn descendant_texts(&self, name: &str) -> Vec<String> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants(&self, name: &str, found: &mut Vec<String>) {
        for child in &self.children {
            if child.name == name {
                found.push(child.text.clone());
            }
            child.collect_descendants(name, found);
        }
    }
}

/// Parse a complete frame into its root element.
///
/// Fails on anything that is not exactly one well-formed element: unclosed
/// or mismatched tags, text outside the root, or a second root.
#[track_caller]
pub(crate) fn parse(frame: &str) -> CoreResult<Element> {
    let mut reader = Reader::from_str(frame);
    reader.config_mut().trim_text(true);

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| CoreError::ProtocolDecode {
            reason: format!("invalid XML at byte {}: {}", reader.buffer_position(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(decode_error("content after the root element"));
                }
                open.push(Element::named(tag_name(&start)?));
            }
            Event::Empty(start) => {
                let element = Element::named(tag_name(&start)?);
                close(&mut open, &mut root, element)?;
            }
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| decode_error("closing tag without an opening tag"))?;
                close(&mut open, &mut root, element)?;
            }
            Event::Text(text) => {
                let value = text.unescape().map_err(|e| CoreError::ProtocolDecode {
                    reason: format!("invalid text content: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
                append_text(&mut open, &value)?;
            }
            Event::CData(data) => {
                append_text(&mut open, &String::from_utf8_lossy(&data))?;
            }
            Event::Eof => break,
            // Declarations, comments and processing instructions carry no fields.
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(decode_error(&format!("unclosed element <{}>", unclosed.name)));
    }

    root.ok_or_else(|| decode_error("frame contains no element"))
}

#[track_caller]
fn tag_name(start: &BytesStart<'_>) -> CoreResult<String> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_owned)
        .map_err(|e| CoreError::ProtocolDecode {
            reason: format!("tag name is not UTF-8: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
}

#[track_caller]
fn close(open: &mut [Element], root: &mut Option<Element>, element: Element) -> CoreResult<()> {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(decode_error("more than one root element")),
    }
    Ok(())
}

#[track_caller]
fn append_text(open: &mut [Element], value: &str) -> CoreResult<()> {
    match open.last_mut() {
        Some(element) => {
            element.text.push_str(value);
            Ok(())
        }
        None => Err(decode_error("text outside the root element")),
    }
}

#[track_caller]
fn decode_error(reason: &str) -> CoreError {
    CoreError::ProtocolDecode {
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
