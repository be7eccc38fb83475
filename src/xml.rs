// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! XML adapter.
//!
//! Lowers an XML document into [`Node`] trees using `quick-xml`'s pull
//! parser. Leaf elements become [`Node::Scalar`], elements with child
//! elements become [`Node::Record`], and any element carrying `nil="true"`
//! becomes [`Node::Null`]. Type hints such as `type="integer"` are ignored;
//! the field registry decides how a value is read.
//!
//! Leaf text is kept exactly as written. Text between child elements is
//! dropped once the element turns out to be a record.

use crate::PayloadError;
use crate::node::{Node, Record};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// An element under construction.
struct Frame {
    name: String,
    nil: bool,
    text: String,
    children: Record,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, PayloadError> {
        Ok(Self {
            name: element_name(start),
            nil: is_nil(start)?,
            text: String::new(),
            children: Record::new(),
        })
    }

    fn close(self) -> (String, Node) {
        let node = if self.nil {
            Node::Null
        } else if !self.children.is_empty() {
            Node::Record(self.children)
        } else {
            Node::Scalar(self.text)
        };
        (self.name, node)
    }
}

/// Parses `xml` and returns its top-level elements in document order.
///
/// The declaration, comments and processing instructions are skipped, so a
/// well-formed document yields exactly one entry. An empty document yields
/// none.
///
/// # Errors
///
/// Returns [`PayloadError::InvalidArgument`] for malformed XML.
pub fn parse_document(xml: &str) -> Result<Vec<(String, Node)>, PayloadError> {
    let mut reader = Reader::from_str(xml);

    let mut roots = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| invalid_xml(reader.buffer_position(), e))?;

        match event {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let frame = Frame::open(&start)?;
                attach(&mut stack, &mut roots, frame.close());
            }
            Event::End(_) => {
                // quick-xml has already checked that the end tag matches
                let Some(frame) = stack.pop() else {
                    return Err(PayloadError::invalid_argument(
                        "xml",
                        "unexpected closing tag",
                    ));
                };
                attach(&mut stack, &mut roots, frame.close());
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    let text = text
                        .unescape()
                        .map_err(|e| invalid_xml(reader.buffer_position(), e))?;
                    frame.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(PayloadError::invalid_argument(
            "xml",
            format!("unexpected end of document inside <{}>", open.name),
        ));
    }

    Ok(roots)
}

/// Finds the top-level element named `root` and returns its content.
///
/// # Errors
///
/// - [`PayloadError::InvalidArgument`] if the document is malformed or empty.
/// - [`PayloadError::InvalidArgument`] if no top-level element is named `root`.
pub fn parse_root(xml: &str, root: &str) -> Result<Node, PayloadError> {
    let elements = parse_document(xml)?;
    if elements.is_empty() {
        return Err(PayloadError::invalid_argument("xml", "XML not valid"));
    }

    elements
        .into_iter()
        .find(|(name, _)| name == root)
        .map(|(_, node)| node)
        .ok_or_else(|| {
            PayloadError::invalid_argument(
                "xml",
                format!("XML does not contain <{root}> information"),
            )
        })
}

fn attach(stack: &mut [Frame], roots: &mut Vec<(String, Node)>, (name, node): (String, Node)) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(name, node),
        None => roots.push((name, node)),
    }
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn is_nil(start: &BytesStart<'_>) -> Result<bool, PayloadError> {
    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|e| PayloadError::invalid_argument("xml", e.to_string()))?;
        if attribute.key.local_name().as_ref() == b"nil" {
            let value = attribute
                .unescape_value()
                .map_err(|e| PayloadError::invalid_argument("xml", e.to_string()))?;
            return Ok(value.trim().eq_ignore_ascii_case("true"));
        }
    }
    Ok(false)
}

fn invalid_xml(position: impl std::fmt::Display, error: impl std::fmt::Display) -> PayloadError {
    PayloadError::invalid_argument("xml", format!("malformed XML at byte {position}: {error}"))
}
