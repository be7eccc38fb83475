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

//! # Chargify allocation data contracts
//!
//! This library decodes the Chargify API's component allocation resources
//! from either of the API's wire formats (XML or JSON) into immutable, typed
//! values, and encodes the payment profile records used to import stored
//! payment methods.
//!
//! ## Core Components
//!
//! - [`AllocationPreview`]: projected totals and line items of an allocation change
//! - [`LineItem`]: one renewal transaction inside a preview
//! - [`ComponentAllocation`]: a recorded allocation with typed proration schemes
//! - [`UpgradeProrationScheme`] / [`DowngradeProrationScheme`]: proration policies
//! - [`PaymentProfileAttributes`]: stored payment method import record, with
//!   [`CardType`], [`VaultType`], [`BankAccountType`] and [`BankAccountHolderType`]
//! - [`PayloadError`]: error types for decoding and encoding failures
//!
//! ## Example
//!
//! ```
//! use chargify_allocations_rs::AllocationPreview;
//! use rust_decimal_macros::dec;
//! use serde_json::json;
//!
//! let xml = "<allocation_preview>\
//!              <subtotal_in_cents>1200</subtotal_in_cents>\
//!              <total_tax_in_cents>96</total_tax_in_cents>\
//!              <total_in_cents>1296</total_in_cents>\
//!            </allocation_preview>";
//! let from_xml = AllocationPreview::from_xml(xml).unwrap();
//!
//! let from_json = AllocationPreview::from_json(&json!({
//!     "subtotal_in_cents": 1200,
//!     "total_tax_in_cents": 96,
//!     "total_in_cents": 1296
//! }))
//! .unwrap();
//!
//! assert_eq!(from_xml, from_json);
//! assert_eq!(from_xml.total(), Some(dec!(12.96)));
//! assert_eq!(from_xml.total_discount_in_cents(), None);
//! ```
//!
//! ## Thread Safety
//!
//! Decoding is synchronous and keeps no shared state; every type here is
//! `Send + Sync`, so distinct payloads can be decoded in parallel.

pub mod allocation;
mod base;
pub mod error;
pub mod fields;
pub mod json;
pub mod line_item;
pub mod node;
pub mod payment_profile;
pub mod preview;
pub mod proration;
mod scalar;
pub mod wire;
pub mod xml;

pub use allocation::ComponentAllocation;
pub use base::{Cents, ComponentId, SubscriptionId};
pub use error::PayloadError;
pub use line_item::LineItem;
pub use payment_profile::{
    BankAccountHolderType, BankAccountType, CardType, PaymentProfileAttributes, VaultType,
};
pub use preview::AllocationPreview;
pub use proration::{DowngradeProrationScheme, UpgradeProrationScheme};
pub use wire::WireEnum;
