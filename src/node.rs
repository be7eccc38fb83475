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

//! Format-neutral view of a decoded payload.
//!
//! The XML and JSON adapters both lower their input into [`Node`] trees, and
//! every resource decoder works on those trees only. A [`Record`] keeps its
//! entries in source order and may hold the same key more than once (XML
//! collections are repeated sibling elements).

use crate::PayloadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Explicit null: JSON `null` or an XML element with `nil="true"`.
    Null,
    /// Text of a leaf element or a JSON string, number or boolean.
    Scalar(String),
    /// Named child fields.
    Record(Record),
    /// JSON array.
    List(Vec<Node>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, Node)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, node: Node) {
        self.entries.push((key.into(), node));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Last entry with the given key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }
}

impl Node {
    /// Returns the record if this node is one.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Node::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Expands a collection field into its member records, in source order.
    ///
    /// Accepts an XML wrapper holding repeated `element` children, or a JSON
    /// array whose members are either bare objects or `{element: {..}}`
    /// envelopes. Null and empty values are empty collections. An empty member
    /// (`<line_item/>` or `""`) is an empty record in either format.
    pub fn collection<'a>(
        &'a self,
        field: &'static str,
        element: &str,
    ) -> Result<Vec<&'a Record>, PayloadError> {
        match self {
            Node::Null => Ok(Vec::new()),
            Node::Scalar(text) if text.trim().is_empty() => Ok(Vec::new()),
            Node::Scalar(text) => Err(PayloadError::format(field, text.as_str(), "collection")),
            Node::Record(wrapper) => wrapper
                .iter()
                .filter(|(key, _)| *key == element)
                .filter_map(|(_, node)| match node {
                    Node::Null => None,
                    Node::Scalar(text) if text.trim().is_empty() => Some(Ok(empty_record())),
                    Node::Record(record) => Some(Ok(record)),
                    other => Some(Err(PayloadError::format(field, describe(other), "record"))),
                })
                .collect(),
            Node::List(members) => members
                .iter()
                .filter_map(|member| match member {
                    Node::Null => None,
                    Node::Scalar(text) if text.trim().is_empty() => Some(Ok(empty_record())),
                    Node::Record(record) => Some(Ok(unwrap_envelope(record, element))),
                    other => Some(Err(PayloadError::format(field, describe(other), "record"))),
                })
                .collect(),
        }
    }
}

fn unwrap_envelope<'a>(record: &'a Record, element: &str) -> &'a Record {
    match record.entries.as_slice() {
        [(key, Node::Record(inner))] if key == element => inner,
        _ => record,
    }
}

fn empty_record() -> &'static Record {
    static EMPTY: Record = Record {
        entries: Vec::new(),
    };
    &EMPTY
}

/// Short rendering of a node for error messages.
pub(crate) fn describe(node: &Node) -> String {
    match node {
        Node::Null => "null".to_string(),
        Node::Scalar(text) => text.clone(),
        Node::Record(record) => format!("<record with {} fields>", record.len()),
        Node::List(items) => format!("<list of {} items>", items.len()),
    }
}
