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

//! Wire field registries.
//!
//! Every resource has a closed set of recognized field names. Decoders map a
//! wire key onto one of these enums and match on it exhaustively; keys that
//! map to nothing are ignored.

use std::fmt;

/// Root element of an allocation preview XML document.
pub const ALLOCATION_PREVIEW_ROOT: &str = "allocation_preview";
/// Root element of a component allocation XML document.
pub const ALLOCATION_ROOT: &str = "allocation";
/// Root element of a payment profile import record.
pub const PAYMENT_PROFILE_ROOT: &str = "payment_profile_attributes";
/// Element name of one entry inside `line_items`.
pub const LINE_ITEM_ELEMENT: &str = "line_item";

macro_rules! field_registry {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All fields, in wire declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire name of the field.
            pub const fn key(self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }

            /// Looks up a field by its wire name.
            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

field_registry! {
    /// Top-level fields of an `allocation_preview`.
    PreviewField {
        StartDate => "start_date",
        EndDate => "end_date",
        SubtotalInCents => "subtotal_in_cents",
        TotalDiscountInCents => "total_discount_in_cents",
        TotalTaxInCents => "total_tax_in_cents",
        TotalInCents => "total_in_cents",
        Direction => "direction",
        ProrationScheme => "proration_scheme",
        LineItems => "line_items",
    }
}

field_registry! {
    /// Fields of a single `line_item`.
    LineItemField {
        TransactionType => "transaction_type",
        Kind => "kind",
        AmountInCents => "amount_in_cents",
        Memo => "memo",
        DiscountAmountInCents => "discount_amount_in_cents",
        TaxableAmountInCents => "taxable_amount_in_cents",
        ComponentId => "component_id",
    }
}

field_registry! {
    /// Fields of a recorded component `allocation`.
    AllocationField {
        ComponentId => "component_id",
        SubscriptionId => "subscription_id",
        Quantity => "quantity",
        PreviousQuantity => "previous_quantity",
        Memo => "memo",
        Timestamp => "timestamp",
        UpgradeScheme => "proration_upgrade_scheme",
        DowngradeScheme => "proration_downgrade_scheme",
    }
}

field_registry! {
    /// Fields of `payment_profile_attributes`.
    PaymentProfileField {
        VaultToken => "vault_token",
        CustomerVaultToken => "customer_vault_token",
        CurrentVault => "current_vault",
        ExpirationYear => "expiration_year",
        ExpirationMonth => "expiration_month",
        CardType => "card_type",
        LastFour => "last_four",
        BankName => "bank_name",
        BankRoutingNumber => "bank_routing_number",
        BankAccountNumber => "bank_account_number",
        BankAccountType => "bank_account_type",
        BankAccountHolderType => "bank_account_holder_type",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_lookup() {
        for field in PreviewField::ALL {
            assert_eq!(PreviewField::from_key(field.key()), Some(*field));
        }
        for field in LineItemField::ALL {
            assert_eq!(LineItemField::from_key(field.key()), Some(*field));
        }
        for field in AllocationField::ALL {
            assert_eq!(AllocationField::from_key(field.key()), Some(*field));
        }
        for field in PaymentProfileField::ALL {
            assert_eq!(PaymentProfileField::from_key(field.key()), Some(*field));
        }
    }

    #[test]
    fn unknown_keys_are_not_fields() {
        assert_eq!(PreviewField::from_key("line_item"), None);
        assert_eq!(LineItemField::from_key("AMOUNT_IN_CENTS"), None);
        assert_eq!(AllocationField::from_key(""), None);
    }

    #[test]
    fn display_uses_wire_name() {
        assert_eq!(PreviewField::TotalTaxInCents.to_string(), "total_tax_in_cents");
        assert_eq!(AllocationField::UpgradeScheme.to_string(), "proration_upgrade_scheme");
    }
}
