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

//! Proration schemes for mid-period component allocation changes.
//!
//! The API separates words with hyphens (`prorate-attempt-capture`); the
//! lookup tables use underscores and [`WireEnum`] converts between the two.
//!
//! # Example
//!
//! ```
//! use chargify_allocations_rs::{UpgradeProrationScheme, WireEnum};
//!
//! let scheme = UpgradeProrationScheme::from_wire("prorate-attempt-capture");
//! assert_eq!(scheme, UpgradeProrationScheme::ProrateAttemptCapture);
//! assert_eq!(UpgradeProrationScheme::from_wire("bogus-scheme"), UpgradeProrationScheme::Unknown);
//! ```

use crate::wire::{WireEnum, wire_enum_impls};

/// How an upgrade made mid-period is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeProrationScheme {
    /// A prorated charge is added; the card is charged at the next renewal.
    ProrateDelayCapture,
    /// A prorated charge is added and the card on file is charged now. A
    /// failed capture accrues until the next renewal.
    ProrateAttemptCapture,
    /// No charge is added.
    NoProrate,
    /// The full price of the change is charged to the card on file now. A
    /// failed capture accrues until the next renewal.
    FullPriceAttemptCapture,
    /// The full price of the change is added; the card is charged at the next
    /// renewal.
    FullPriceDelayCapture,
    /// Absent or unrecognized.
    Unknown,
}

impl WireEnum for UpgradeProrationScheme {
    const TABLE: &'static [(Self, &'static str)] = &[
        (Self::ProrateDelayCapture, "prorate_delay_capture"),
        (Self::ProrateAttemptCapture, "prorate_attempt_capture"),
        (Self::NoProrate, "no_prorate"),
        (Self::FullPriceAttemptCapture, "full_price_attempt_capture"),
        (Self::FullPriceDelayCapture, "full_price_delay_capture"),
    ];
    const UNKNOWN: Self = Self::Unknown;
    const WIRE_SEPARATOR: char = '-';
}

wire_enum_impls!(UpgradeProrationScheme);

/// How a downgrade made mid-period is credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DowngradeProrationScheme {
    /// A credit is added for the amount owed.
    Prorate,
    /// No credit is added.
    NoProrate,
    /// Absent or unrecognized.
    Unknown,
}

impl WireEnum for DowngradeProrationScheme {
    const TABLE: &'static [(Self, &'static str)] =
        &[(Self::Prorate, "prorate"), (Self::NoProrate, "no_prorate")];
    const UNKNOWN: Self = Self::Unknown;
    const WIRE_SEPARATOR: char = '-';
}

wire_enum_impls!(DowngradeProrationScheme);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_upgrade_token_decodes_to_its_variant() {
        let cases = [
            ("prorate-delay-capture", UpgradeProrationScheme::ProrateDelayCapture),
            ("prorate-attempt-capture", UpgradeProrationScheme::ProrateAttemptCapture),
            ("no-prorate", UpgradeProrationScheme::NoProrate),
            ("full-price-attempt-capture", UpgradeProrationScheme::FullPriceAttemptCapture),
            ("full-price-delay-capture", UpgradeProrationScheme::FullPriceDelayCapture),
        ];
        for (token, variant) in cases {
            assert_eq!(UpgradeProrationScheme::from_wire(token), variant);
            assert_eq!(variant.to_wire().as_deref(), Some(token));
        }
    }

    #[test]
    fn every_downgrade_token_decodes_to_its_variant() {
        assert_eq!(DowngradeProrationScheme::from_wire("prorate"), DowngradeProrationScheme::Prorate);
        assert_eq!(
            DowngradeProrationScheme::from_wire("no-prorate"),
            DowngradeProrationScheme::NoProrate
        );
        assert_eq!(DowngradeProrationScheme::NoProrate.to_string(), "no-prorate");
    }

    #[test]
    fn bogus_tokens_are_unknown() {
        assert_eq!(UpgradeProrationScheme::from_wire("bogus-scheme"), UpgradeProrationScheme::Unknown);
        assert_eq!(
            DowngradeProrationScheme::from_wire("prorate-attempt-capture"),
            DowngradeProrationScheme::Unknown
        );
        assert_eq!(UpgradeProrationScheme::Unknown.to_wire(), None);
    }

    #[test]
    fn underscore_tokens_are_accepted() {
        assert_eq!(
            UpgradeProrationScheme::from_wire("full_price_delay_capture"),
            UpgradeProrationScheme::FullPriceDelayCapture
        );
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(UpgradeProrationScheme::default(), UpgradeProrationScheme::Unknown);
        assert_eq!(DowngradeProrationScheme::default(), DowngradeProrationScheme::Unknown);
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&UpgradeProrationScheme::NoProrate).unwrap();
        assert_eq!(json, "\"no-prorate\"");
        let back: UpgradeProrationScheme = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UpgradeProrationScheme::NoProrate);
    }
}
