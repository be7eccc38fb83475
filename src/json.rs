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

//! JSON adapter.
//!
//! Lowers a `serde_json::Value` into a [`Node`] tree. Scalars keep their
//! textual form (numbers via their canonical rendering) so the scalar codec
//! reads JSON and XML values with the same rules.

use crate::PayloadError;
use crate::node::{Node, Record};
use serde_json::Value;

/// Converts any JSON value into a [`Node`].
pub fn to_node(value: &Value) -> Node {
    match value {
        Value::Null => Node::Null,
        Value::Bool(flag) => Node::Scalar(flag.to_string()),
        Value::Number(number) => Node::Scalar(number.to_string()),
        Value::String(text) => Node::Scalar(text.clone()),
        Value::Array(items) => Node::List(items.iter().map(to_node).collect()),
        Value::Object(map) => {
            let mut record = Record::new();
            for (key, value) in map {
                record.push(key.as_str(), to_node(value));
            }
            Node::Record(record)
        }
    }
}

/// Converts a JSON object into the [`Record`] of a resource.
///
/// The API wraps single resources as `{"<root>": {...}}`; that envelope is
/// removed when it is the object's only key.
///
/// # Errors
///
/// Returns [`PayloadError::InvalidArgument`] if `value` is not an object.
pub fn to_resource(value: &Value, root: &str) -> Result<Record, PayloadError> {
    let Value::Object(map) = value else {
        return Err(PayloadError::invalid_argument(
            "json",
            format!("expected a JSON object for `{root}`"),
        ));
    };

    let inner = match map.get(root) {
        Some(Value::Object(inner)) if map.len() == 1 => inner,
        _ => map,
    };

    let mut record = Record::new();
    for (key, value) in inner {
        record.push(key.as_str(), to_node(value));
    }
    Ok(record)
}

/// Parses JSON text into a resource [`Record`]; see [`to_resource`].
///
/// # Errors
///
/// Returns [`PayloadError::InvalidArgument`] if the text is not valid JSON or
/// not an object.
pub fn parse_resource(json: &str, root: &str) -> Result<Record, PayloadError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| PayloadError::invalid_argument("json", format!("JSON not valid: {e}")))?;
    to_resource(&value, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_keep_textual_form() {
        assert_eq!(to_node(&json!(1296)), Node::Scalar("1296".into()));
        assert_eq!(to_node(&json!(-3)), Node::Scalar("-3".into()));
        assert_eq!(to_node(&json!(true)), Node::Scalar("true".into()));
        assert_eq!(to_node(&json!("charge")), Node::Scalar("charge".into()));
        assert_eq!(to_node(&json!(null)), Node::Null);
    }

    #[test]
    fn arrays_keep_order() {
        let node = to_node(&json!([3, 1, 2]));
        assert_eq!(
            node,
            Node::List(vec![
                Node::Scalar("3".into()),
                Node::Scalar("1".into()),
                Node::Scalar("2".into()),
            ])
        );
    }

    #[test]
    fn envelope_is_removed() {
        let wrapped = json!({"allocation_preview": {"total_in_cents": 5}});
        let record = to_resource(&wrapped, "allocation_preview").unwrap();
        assert_eq!(record.get("total_in_cents"), Some(&Node::Scalar("5".into())));

        let bare = json!({"total_in_cents": 5});
        assert_eq!(to_resource(&bare, "allocation_preview").unwrap(), record);
    }

    #[test]
    fn envelope_with_siblings_is_kept() {
        let value = json!({"allocation_preview": {"total_in_cents": 5}, "direction": "upgrade"});
        let record = to_resource(&value, "allocation_preview").unwrap();
        assert_eq!(record.len(), 2);
        assert!(record.get("direction").is_some());
    }

    #[test]
    fn non_objects_are_rejected() {
        let err = to_resource(&json!([1, 2]), "allocation_preview").unwrap_err();
        assert!(matches!(err, PayloadError::InvalidArgument { argument: "json", .. }));
    }

    #[test]
    fn invalid_text_is_rejected() {
        let err = parse_resource("{not json", "allocation_preview").unwrap_err();
        assert!(matches!(err, PayloadError::InvalidArgument { argument: "json", .. }));
    }
}
