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

//! Component allocation previews.
//!
//! An [`AllocationPreview`] is the projected financial effect of a pending
//! change to a component's allocated quantity: the renewal period, the
//! totals, and the line items that would post.
//!
//! # Example
//!
//! ```
//! use chargify_allocations_rs::{AllocationPreview, Cents};
//! use rust_decimal_macros::dec;
//!
//! let preview = AllocationPreview::from_xml(
//!     "<allocation_preview>\
//!        <total_in_cents>1296</total_in_cents>\
//!        <line_items><line_item><kind>component</kind></line_item></line_items>\
//!      </allocation_preview>",
//! )
//! .unwrap();
//!
//! assert_eq!(preview.total_in_cents(), Some(Cents(1296)));
//! assert_eq!(preview.total(), Some(dec!(12.96)));
//! assert_eq!(preview.subtotal_in_cents(), None);
//! assert_eq!(preview.line_items().len(), 1);
//! ```

use crate::base::Cents;
use crate::fields::{ALLOCATION_PREVIEW_ROOT, LINE_ITEM_ELEMENT, PreviewField};
use crate::line_item::LineItem;
use crate::node::{Node, Record, describe};
use crate::proration::{DowngradeProrationScheme, UpgradeProrationScheme};
use crate::wire::WireEnum;
use crate::{PayloadError, json, scalar, xml};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;

/// Direction value reported for upgrades.
pub const DIRECTION_UPGRADE: &str = "upgrade";
/// Direction value reported for downgrades.
pub const DIRECTION_DOWNGRADE: &str = "downgrade";

/// Preview of the charges an allocation change would produce at the next
/// renewal.
///
/// Unset fields are `None`; an unset total is never the same as an explicit
/// zero. Decimal amounts are derived from the cent fields on every call.
///
/// # Ordering
///
/// Previews order by `start_date`, then `total_in_cents`, then the remaining
/// fields. Unset values sort before set ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AllocationPreview {
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    subtotal_in_cents: Option<Cents>,
    total_discount_in_cents: Option<Cents>,
    total_tax_in_cents: Option<Cents>,
    total_in_cents: Option<Cents>,
    direction: Option<String>,
    proration_scheme: Option<String>,
    line_items: Vec<LineItem>,
}

impl AllocationPreview {
    /// Decodes an `<allocation_preview>` XML document.
    ///
    /// # Errors
    ///
    /// - [`PayloadError::InvalidArgument`] if the XML is malformed or empty, or
    ///   has no top-level `allocation_preview` element.
    /// - [`PayloadError::Format`] if a recognized field holds a malformed value.
    pub fn from_xml(xml: &str) -> Result<Self, PayloadError> {
        match xml::parse_root(xml, ALLOCATION_PREVIEW_ROOT)? {
            Node::Record(record) => Self::from_record(&record),
            // <allocation_preview/> carries no fields
            Node::Null | Node::Scalar(_) => Ok(Self::default()),
            other => Err(PayloadError::format(
                ALLOCATION_PREVIEW_ROOT,
                describe(&other),
                "record",
            )),
        }
    }

    /// Decodes a preview from a JSON object. The API's
    /// `{"allocation_preview": {..}}` envelope is accepted as well.
    ///
    /// # Errors
    ///
    /// - [`PayloadError::InvalidArgument`] if `value` is not an object.
    /// - [`PayloadError::Format`] if a recognized field holds a malformed value.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PayloadError> {
        Self::from_record(&json::to_resource(value, ALLOCATION_PREVIEW_ROOT)?)
    }

    /// Parses JSON text and decodes it with [`AllocationPreview::from_json`].
    ///
    /// # Errors
    ///
    /// As [`AllocationPreview::from_json`], plus
    /// [`PayloadError::InvalidArgument`] for text that is not JSON.
    pub fn from_json_str(json: &str) -> Result<Self, PayloadError> {
        Self::from_record(&json::parse_resource(json, ALLOCATION_PREVIEW_ROOT)?)
    }

    fn from_record(record: &Record) -> Result<Self, PayloadError> {
        let mut preview = Self::default();

        for (key, node) in record.iter() {
            let Some(field) = PreviewField::from_key(key) else {
                tracing::trace!(field = key, "ignoring unrecognized allocation preview field");
                continue;
            };
            let name = field.key();
            match field {
                PreviewField::StartDate => preview.start_date = scalar::timestamp(node, name)?,
                PreviewField::EndDate => preview.end_date = scalar::timestamp(node, name)?,
                PreviewField::SubtotalInCents => {
                    preview.subtotal_in_cents = scalar::cents(node, name)?
                }
                PreviewField::TotalDiscountInCents => {
                    preview.total_discount_in_cents = scalar::cents(node, name)?
                }
                PreviewField::TotalTaxInCents => {
                    preview.total_tax_in_cents = scalar::cents(node, name)?
                }
                PreviewField::TotalInCents => preview.total_in_cents = scalar::cents(node, name)?,
                PreviewField::Direction => preview.direction = scalar::text(node, name)?,
                PreviewField::ProrationScheme => {
                    preview.proration_scheme = scalar::text(node, name)?
                }
                PreviewField::LineItems => {
                    preview.line_items = node
                        .collection(name, LINE_ITEM_ELEMENT)?
                        .into_iter()
                        .map(LineItem::from_record)
                        .collect::<Result<_, _>>()?
                }
            }
        }

        tracing::debug!(
            line_items = preview.line_items.len(),
            total_in_cents = ?preview.total_in_cents,
            "decoded allocation preview"
        );
        Ok(preview)
    }

    /// Start of the period the preview covers (the next renewal).
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    /// Pre-tax, pre-discount charges assessed at the next renewal.
    pub fn subtotal_in_cents(&self) -> Option<Cents> {
        self.subtotal_in_cents
    }

    /// Coupon discounts applied at the next renewal.
    pub fn total_discount_in_cents(&self) -> Option<Cents> {
        self.total_discount_in_cents
    }

    /// Tax charges assessed at the next renewal.
    pub fn total_tax_in_cents(&self) -> Option<Cents> {
        self.total_tax_in_cents
    }

    /// Total owed, less discounts, at the next renewal.
    pub fn total_in_cents(&self) -> Option<Cents> {
        self.total_in_cents
    }

    pub fn subtotal(&self) -> Option<Decimal> {
        self.subtotal_in_cents.map(Cents::to_decimal)
    }

    pub fn total_discount(&self) -> Option<Decimal> {
        self.total_discount_in_cents.map(Cents::to_decimal)
    }

    pub fn total_tax(&self) -> Option<Decimal> {
        self.total_tax_in_cents.map(Cents::to_decimal)
    }

    pub fn total(&self) -> Option<Decimal> {
        self.total_in_cents.map(Cents::to_decimal)
    }

    /// Direction of the change as reported by the API, e.g. `upgrade`.
    pub fn direction(&self) -> Option<&str> {
        self.direction.as_deref()
    }

    /// Proration scheme as reported by the API, e.g. `prorate-attempt-capture`.
    pub fn proration_scheme(&self) -> Option<&str> {
        self.proration_scheme.as_deref()
    }

    /// Renewal transactions in the order the API returned them.
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// The proration scheme read as an upgrade scheme.
    ///
    /// `Unknown` unless the direction is `upgrade` and the scheme is one of
    /// the known upgrade schemes.
    pub fn upgrade_scheme(&self) -> UpgradeProrationScheme {
        match (self.direction(), self.proration_scheme()) {
            (Some(direction), Some(scheme)) if direction.eq_ignore_ascii_case(DIRECTION_UPGRADE) => {
                UpgradeProrationScheme::from_wire(scheme)
            }
            _ => UpgradeProrationScheme::Unknown,
        }
    }

    /// The proration scheme read as a downgrade scheme.
    ///
    /// `Unknown` unless the direction is `downgrade` and the scheme is one of
    /// the known downgrade schemes.
    pub fn downgrade_scheme(&self) -> DowngradeProrationScheme {
        match (self.direction(), self.proration_scheme()) {
            (Some(direction), Some(scheme))
                if direction.eq_ignore_ascii_case(DIRECTION_DOWNGRADE) =>
            {
                DowngradeProrationScheme::from_wire(scheme)
            }
            _ => DowngradeProrationScheme::Unknown,
        }
    }
}

impl Ord for AllocationPreview {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start_date
            .cmp(&other.start_date)
            .then_with(|| self.total_in_cents.cmp(&other.total_in_cents))
            .then_with(|| self.end_date.cmp(&other.end_date))
            .then_with(|| self.subtotal_in_cents.cmp(&other.subtotal_in_cents))
            .then_with(|| self.total_discount_in_cents.cmp(&other.total_discount_in_cents))
            .then_with(|| self.total_tax_in_cents.cmp(&other.total_tax_in_cents))
            .then_with(|| self.direction.cmp(&other.direction))
            .then_with(|| self.proration_scheme.cmp(&other.proration_scheme))
            .then_with(|| self.line_items.cmp(&other.line_items))
    }
}

impl PartialOrd for AllocationPreview {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
