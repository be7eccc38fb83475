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

//! Scalar codec.
//!
//! Reads one field value out of a [`Node`]. Absence (`Null`, or an empty
//! numeric/date value) decodes to `None`; a present value that cannot be read
//! as the field's type is a [`PayloadError::Format`].

use crate::PayloadError;
use crate::base::{Cents, ComponentId, SubscriptionId};
use crate::node::{Node, describe};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const TIMESTAMP: &str = "ISO-8601 timestamp";
const INTEGER: &str = "integer";
const IDENTIFIER: &str = "non-negative integer";

/// Raw text of a string field.
pub(crate) fn text(node: &Node, field: &'static str) -> Result<Option<String>, PayloadError> {
    match node {
        Node::Null => Ok(None),
        Node::Scalar(text) => Ok(Some(text.clone())),
        other => Err(PayloadError::format(field, describe(other), "string")),
    }
}

/// Trimmed text of a numeric or date field; empty means absent.
fn token<'a>(
    node: &'a Node,
    field: &'static str,
    expected: &'static str,
) -> Result<Option<&'a str>, PayloadError> {
    match node {
        Node::Null => Ok(None),
        Node::Scalar(text) => {
            let trimmed = text.trim();
            Ok((!trimmed.is_empty()).then_some(trimmed))
        }
        other => Err(PayloadError::format(field, describe(other), expected)),
    }
}

pub(crate) fn integer(node: &Node, field: &'static str) -> Result<Option<i64>, PayloadError> {
    token(node, field, INTEGER)?
        .map(|raw| {
            raw.parse::<i64>()
                .map_err(|_| PayloadError::format(field, raw, INTEGER))
        })
        .transpose()
}

pub(crate) fn cents(node: &Node, field: &'static str) -> Result<Option<Cents>, PayloadError> {
    Ok(integer(node, field)?.map(Cents))
}

fn identifier(node: &Node, field: &'static str) -> Result<Option<u64>, PayloadError> {
    token(node, field, IDENTIFIER)?
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|_| PayloadError::format(field, raw, IDENTIFIER))
        })
        .transpose()
}

pub(crate) fn component_id(
    node: &Node,
    field: &'static str,
) -> Result<Option<ComponentId>, PayloadError> {
    Ok(identifier(node, field)?.map(ComponentId))
}

pub(crate) fn subscription_id(
    node: &Node,
    field: &'static str,
) -> Result<Option<SubscriptionId>, PayloadError> {
    Ok(identifier(node, field)?.map(SubscriptionId))
}

pub(crate) fn month_or_year(node: &Node, field: &'static str) -> Result<Option<u32>, PayloadError> {
    token(node, field, IDENTIFIER)?
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| PayloadError::format(field, raw, IDENTIFIER))
        })
        .transpose()
}

/// Parses a timestamp, assuming UTC when the text carries no offset.
pub(crate) fn timestamp(
    node: &Node,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, PayloadError> {
    token(node, field, TIMESTAMP)?
        .map(|raw| parse_timestamp(raw).ok_or_else(|| PayloadError::format(field, raw, TIMESTAMP)))
        .transpose()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
