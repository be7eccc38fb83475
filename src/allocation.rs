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

//! Recorded component allocations.
//!
//! Unlike [`AllocationPreview`](crate::AllocationPreview), a recorded
//! allocation exposes its proration schemes as closed enumerations.

use crate::base::{ComponentId, SubscriptionId};
use crate::fields::{ALLOCATION_ROOT, AllocationField};
use crate::node::{Node, Record, describe};
use crate::proration::{DowngradeProrationScheme, UpgradeProrationScheme};
use crate::wire::WireEnum;
use crate::{PayloadError, json, scalar, xml};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A change to the allocated quantity of a component on a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentAllocation {
    component_id: Option<ComponentId>,
    subscription_id: Option<SubscriptionId>,
    quantity: Option<i64>,
    previous_quantity: Option<i64>,
    memo: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "WireEnum::is_unknown")]
    upgrade_scheme: UpgradeProrationScheme,
    #[serde(skip_serializing_if = "WireEnum::is_unknown")]
    downgrade_scheme: DowngradeProrationScheme,
}

impl ComponentAllocation {
    /// Decodes an `<allocation>` XML document.
    ///
    /// # Errors
    ///
    /// - [`PayloadError::InvalidArgument`] if the XML is malformed or empty, or
    ///   has no top-level `allocation` element.
    /// - [`PayloadError::Format`] if a recognized field holds a malformed value.
    pub fn from_xml(xml: &str) -> Result<Self, PayloadError> {
        match xml::parse_root(xml, ALLOCATION_ROOT)? {
            Node::Record(record) => Self::from_record(&record),
            Node::Null | Node::Scalar(_) => Ok(Self::default()),
            other => Err(PayloadError::format(ALLOCATION_ROOT, describe(&other), "record")),
        }
    }

    /// Decodes an allocation from a JSON object, bare or wrapped as
    /// `{"allocation": {..}}`.
    ///
    /// # Errors
    ///
    /// - [`PayloadError::InvalidArgument`] if `value` is not an object.
    /// - [`PayloadError::Format`] if a recognized field holds a malformed value.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PayloadError> {
        Self::from_record(&json::to_resource(value, ALLOCATION_ROOT)?)
    }

    /// Parses JSON text and decodes it with [`ComponentAllocation::from_json`].
    ///
    /// # Errors
    ///
    /// As [`ComponentAllocation::from_json`], plus
    /// [`PayloadError::InvalidArgument`] for text that is not JSON.
    pub fn from_json_str(json: &str) -> Result<Self, PayloadError> {
        Self::from_record(&json::parse_resource(json, ALLOCATION_ROOT)?)
    }

    fn from_record(record: &Record) -> Result<Self, PayloadError> {
        let mut allocation = Self::default();

        for (key, node) in record.iter() {
            let Some(field) = AllocationField::from_key(key) else {
                tracing::trace!(field = key, "ignoring unrecognized allocation field");
                continue;
            };
            let name = field.key();
            match field {
                AllocationField::ComponentId => {
                    allocation.component_id = scalar::component_id(node, name)?
                }
                AllocationField::SubscriptionId => {
                    allocation.subscription_id = scalar::subscription_id(node, name)?
                }
                AllocationField::Quantity => allocation.quantity = scalar::integer(node, name)?,
                AllocationField::PreviousQuantity => {
                    allocation.previous_quantity = scalar::integer(node, name)?
                }
                AllocationField::Memo => allocation.memo = scalar::text(node, name)?,
                AllocationField::Timestamp => allocation.timestamp = scalar::timestamp(node, name)?,
                AllocationField::UpgradeScheme => {
                    allocation.upgrade_scheme = scalar::text(node, name)?
                        .map_or(UpgradeProrationScheme::Unknown, |token| {
                            UpgradeProrationScheme::from_wire(&token)
                        })
                }
                AllocationField::DowngradeScheme => {
                    allocation.downgrade_scheme = scalar::text(node, name)?
                        .map_or(DowngradeProrationScheme::Unknown, |token| {
                            DowngradeProrationScheme::from_wire(&token)
                        })
                }
            }
        }

        Ok(allocation)
    }

    pub fn component_id(&self) -> Option<ComponentId> {
        self.component_id
    }

    pub fn subscription_id(&self) -> Option<SubscriptionId> {
        self.subscription_id
    }

    /// Quantity put into effect by this allocation.
    pub fn quantity(&self) -> Option<i64> {
        self.quantity
    }

    /// Quantity in effect before this allocation.
    pub fn previous_quantity(&self) -> Option<i64> {
        self.previous_quantity
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }

    /// When the allocation was recorded.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Present only for upgrades made mid-period.
    pub fn upgrade_scheme(&self) -> UpgradeProrationScheme {
        self.upgrade_scheme
    }

    /// Present only for downgrades made mid-period.
    pub fn downgrade_scheme(&self) -> DowngradeProrationScheme {
        self.downgrade_scheme
    }

    /// Change in quantity, when both quantities are known.
    pub fn quantity_delta(&self) -> Option<i64> {
        self.quantity?.checked_sub(self.previous_quantity?)
    }
}
