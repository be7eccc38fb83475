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

//! Line items of an allocation preview.

use crate::PayloadError;
use crate::base::{Cents, ComponentId};
use crate::fields::{LINE_ITEM_ELEMENT, LineItemField};
use crate::node::{Node, Record, describe};
use crate::{json, scalar, xml};
use rust_decimal::Decimal;
use serde::Serialize;

/// One transaction that will post at the next renewal as a consequence of an
/// allocation change.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LineItem {
    transaction_type: Option<String>,
    kind: Option<String>,
    amount_in_cents: Option<Cents>,
    memo: Option<String>,
    discount_amount_in_cents: Option<Cents>,
    taxable_amount_in_cents: Option<Cents>,
    component_id: Option<ComponentId>,
}

impl LineItem {
    /// Decodes a standalone `<line_item>` XML fragment.
    ///
    /// # Errors
    ///
    /// - [`PayloadError::InvalidArgument`] if the XML is malformed, empty, or
    ///   has no `line_item` element.
    /// - [`PayloadError::Format`] if a recognized field is malformed.
    pub fn from_xml(xml: &str) -> Result<Self, PayloadError> {
        match xml::parse_root(xml, LINE_ITEM_ELEMENT)? {
            Node::Record(record) => Self::from_record(&record),
            Node::Null | Node::Scalar(_) => Ok(Self::default()),
            other => Err(PayloadError::format(LINE_ITEM_ELEMENT, describe(&other), "record")),
        }
    }

    /// Decodes a line item from a JSON object, bare or wrapped as
    /// `{"line_item": {..}}`.
    ///
    /// # Errors
    ///
    /// - [`PayloadError::InvalidArgument`] if `value` is not an object.
    /// - [`PayloadError::Format`] if a recognized field is malformed.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PayloadError> {
        Self::from_record(&json::to_resource(value, LINE_ITEM_ELEMENT)?)
    }

    /// Decodes a line item from its field record. No field is required;
    /// unrecognized fields are skipped.
    pub(crate) fn from_record(record: &Record) -> Result<Self, PayloadError> {
        let mut item = Self::default();

        for (key, node) in record.iter() {
            let Some(field) = LineItemField::from_key(key) else {
                tracing::trace!(field = key, "ignoring unrecognized line item field");
                continue;
            };
            let name = field.key();
            match field {
                LineItemField::TransactionType => item.transaction_type = scalar::text(node, name)?,
                LineItemField::Kind => item.kind = scalar::text(node, name)?,
                LineItemField::AmountInCents => item.amount_in_cents = scalar::cents(node, name)?,
                LineItemField::Memo => item.memo = scalar::text(node, name)?,
                LineItemField::DiscountAmountInCents => {
                    item.discount_amount_in_cents = scalar::cents(node, name)?
                }
                LineItemField::TaxableAmountInCents => {
                    item.taxable_amount_in_cents = scalar::cents(node, name)?
                }
                LineItemField::ComponentId => {
                    item.component_id = scalar::component_id(node, name)?
                }
            }
        }

        Ok(item)
    }

    /// Transaction type, e.g. `charge`, `credit` or `adjustment`.
    pub fn transaction_type(&self) -> Option<&str> {
        self.transaction_type.as_deref()
    }

    /// Line item kind, e.g. `component` or `tax`.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }

    pub fn amount_in_cents(&self) -> Option<Cents> {
        self.amount_in_cents
    }

    pub fn discount_amount_in_cents(&self) -> Option<Cents> {
        self.discount_amount_in_cents
    }

    pub fn taxable_amount_in_cents(&self) -> Option<Cents> {
        self.taxable_amount_in_cents
    }

    /// The component this item belongs to; `None` when it is not tied to a
    /// specific component.
    pub fn component_id(&self) -> Option<ComponentId> {
        self.component_id
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.amount_in_cents.map(Cents::to_decimal)
    }

    pub fn discount_amount(&self) -> Option<Decimal> {
        self.discount_amount_in_cents.map(Cents::to_decimal)
    }

    pub fn taxable_amount(&self) -> Option<Decimal> {
        self.taxable_amount_in_cents.map(Cents::to_decimal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn record(pairs: &[(&str, Node)]) -> Record {
        let mut record = Record::new();
        for (key, node) in pairs {
            record.push(*key, node.clone());
        }
        record
    }

    fn scalar(text: &str) -> Node {
        Node::Scalar(text.to_string())
    }

    #[test]
    fn decodes_all_fields() {
        let item = LineItem::from_record(&record(&[
            ("transaction_type", scalar("charge")),
            ("kind", scalar("component")),
            ("amount_in_cents", scalar("1200")),
            ("memo", scalar("Widgets: 10 to 20")),
            ("discount_amount_in_cents", scalar("100")),
            ("taxable_amount_in_cents", scalar("1100")),
            ("component_id", scalar("42")),
        ]))
        .unwrap();

        assert_eq!(item.transaction_type(), Some("charge"));
        assert_eq!(item.kind(), Some("component"));
        assert_eq!(item.memo(), Some("Widgets: 10 to 20"));
        assert_eq!(item.amount_in_cents(), Some(Cents(1200)));
        assert_eq!(item.amount(), Some(dec!(12.00)));
        assert_eq!(item.discount_amount(), Some(dec!(1.00)));
        assert_eq!(item.taxable_amount(), Some(dec!(11.00)));
        assert_eq!(item.component_id(), Some(ComponentId(42)));
    }

    #[test]
    fn empty_record_is_all_defaults() {
        let item = LineItem::from_record(&Record::new()).unwrap();
        assert_eq!(item, LineItem::default());
        assert_eq!(item.amount(), None);
    }

    #[test]
    fn missing_component_id_is_none_not_zero() {
        let item = LineItem::from_record(&record(&[("amount_in_cents", scalar("5"))])).unwrap();
        assert_eq!(item.component_id(), None);

        let item = LineItem::from_record(&record(&[("component_id", Node::Null)])).unwrap();
        assert_eq!(item.component_id(), None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let item = LineItem::from_record(&record(&[
            ("period_range_start", scalar("2024-01-01")),
            ("kind", scalar("tax")),
        ]))
        .unwrap();
        assert_eq!(item.kind(), Some("tax"));
    }

    #[test]
    fn malformed_amount_fails() {
        let err = LineItem::from_record(&record(&[("amount_in_cents", scalar("twelve"))])).unwrap_err();
        assert_eq!(err, PayloadError::format("amount_in_cents", "twelve", "integer"));
    }

    #[test]
    fn xml_and_json_fragments_agree() {
        let from_xml = LineItem::from_xml(
            "<line_item><transaction_type>credit</transaction_type>\
             <amount_in_cents>-350</amount_in_cents><component_id nil=\"true\"/></line_item>",
        )
        .unwrap();
        let from_json = LineItem::from_json(&json!({
            "line_item": {"transaction_type": "credit", "amount_in_cents": -350, "component_id": null}
        }))
        .unwrap();

        assert_eq!(from_xml, from_json);
        assert_eq!(from_xml.amount(), Some(dec!(-3.50)));
    }

    #[test]
    fn fragment_with_wrong_root_is_rejected() {
        let err = LineItem::from_xml("<item/>").unwrap_err();
        assert!(matches!(err, PayloadError::InvalidArgument { argument: "xml", .. }));
    }
}
