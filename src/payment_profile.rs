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

//! Payment profile attributes for importing stored payment methods.
//!
//! A subscription can be created against a card or bank account that already
//! lives in an external vault. [`PaymentProfileAttributes`] is that request
//! record; the enumerations below are its closed vocabularies.
//!
//! # Example
//!
//! ```
//! use chargify_allocations_rs::{CardType, PaymentProfileAttributes, VaultType};
//!
//! let attributes = PaymentProfileAttributes {
//!     vault_token: Some("tok_1234".to_string()),
//!     current_vault: VaultType::BraintreeBlue,
//!     card_type: CardType::AmericanExpress,
//!     last_four: Some("0005".to_string()),
//!     ..Default::default()
//! };
//!
//! let xml = attributes.to_xml().unwrap();
//! assert!(xml.contains("<current_vault>braintree_blue</current_vault>"));
//! assert_eq!(PaymentProfileAttributes::from_xml(&xml).unwrap(), attributes);
//! ```

use crate::fields::{PAYMENT_PROFILE_ROOT, PaymentProfileField};
use crate::node::{Node, Record, describe};
use crate::wire::{WireEnum, wire_enum_impls};
use crate::{PayloadError, json, scalar, xml};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::Serialize;

/// Card brands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Visa,
    Master,
    Discover,
    AmericanExpress,
    DinersClub,
    Jcb,
    Switch,
    Solo,
    Dankort,
    Maestro,
    Forbrugsforeningen,
    Laser,
    /// Not set.
    Unknown,
}

impl WireEnum for CardType {
    const TABLE: &'static [(Self, &'static str)] = &[
        (Self::Visa, "visa"),
        (Self::Master, "master"),
        (Self::Discover, "discover"),
        (Self::AmericanExpress, "american_express"),
        (Self::DinersClub, "diners_club"),
        (Self::Jcb, "jcb"),
        (Self::Switch, "switch"),
        (Self::Solo, "solo"),
        (Self::Dankort, "dankort"),
        (Self::Maestro, "maestro"),
        (Self::Forbrugsforeningen, "forbrugsforeningen"),
        (Self::Laser, "laser"),
    ];
    const UNKNOWN: Self = Self::Unknown;
}

wire_enum_impls!(CardType);

/// External vaults a stored payment profile can be imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VaultType {
    AuthorizeNet,
    TrustCommerce,
    PaymentExpress,
    Beanstream,
    /// Braintree version 1 (Orange).
    Braintree1,
    BraintreeBlue,
    PayPal,
    QuickPay,
    Eway,
    EwayRapidStd,
    Stripe,
    Pin,
    Wirecard,
    Bpoint,
    FirstData,
    /// Elavon Virtual Merchant Gateway.
    Elavon,
    CyberSource,
    PayMill,
    Litle,
    Moneris,
    /// Not set.
    Unknown,
}

impl WireEnum for VaultType {
    const TABLE: &'static [(Self, &'static str)] = &[
        (Self::AuthorizeNet, "authorizenet"),
        (Self::TrustCommerce, "trust_commerce"),
        (Self::PaymentExpress, "payment_express"),
        (Self::Beanstream, "beanstream"),
        (Self::Braintree1, "braintree1"),
        (Self::BraintreeBlue, "braintree_blue"),
        (Self::PayPal, "paypal"),
        (Self::QuickPay, "quickpay"),
        (Self::Eway, "eway"),
        (Self::EwayRapidStd, "eway_rapid_std"),
        (Self::Stripe, "stripe"),
        (Self::Pin, "pin"),
        (Self::Wirecard, "wirecard"),
        (Self::Bpoint, "bpoint"),
        (Self::FirstData, "firstdata"),
        (Self::Elavon, "elavon"),
        (Self::CyberSource, "cybersource"),
        (Self::PayMill, "paymill"),
        (Self::Litle, "litle"),
        (Self::Moneris, "moneris"),
    ];
    const UNKNOWN: Self = Self::Unknown;
}

wire_enum_impls!(VaultType);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BankAccountType {
    Checking,
    Savings,
    /// Not set.
    Unknown,
}

impl WireEnum for BankAccountType {
    const TABLE: &'static [(Self, &'static str)] =
        &[(Self::Checking, "checking"), (Self::Savings, "savings")];
    const UNKNOWN: Self = Self::Unknown;
}

wire_enum_impls!(BankAccountType);

/// Primary purpose of a bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BankAccountHolderType {
    Personal,
    Business,
    /// Not set.
    Unknown,
}

impl WireEnum for BankAccountHolderType {
    const TABLE: &'static [(Self, &'static str)] =
        &[(Self::Personal, "personal"), (Self::Business, "business")];
    const UNKNOWN: Self = Self::Unknown;
}

wire_enum_impls!(BankAccountHolderType);

/// A stored payment method to import from an external vault.
///
/// Only set fields are written out: `None` values and `Unknown` enumerations
/// are omitted from both the XML and the JSON encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentProfileAttributes {
    /// Token of the stored profile in `current_vault`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_token: Option<String>,
    /// Authorize.Net CIM only: the `customerProfileId` owning `vault_token`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_vault_token: Option<String>,
    #[serde(skip_serializing_if = "WireEnum::is_unknown")]
    pub current_vault: VaultType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_month: Option<u32>,
    /// Shown in the UI when supplied.
    #[serde(skip_serializing_if = "WireEnum::is_unknown")]
    pub card_type: CardType,
    /// Used to build a masked card number for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_four: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_routing_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_number: Option<String>,
    #[serde(skip_serializing_if = "WireEnum::is_unknown")]
    pub bank_account_type: BankAccountType,
    #[serde(skip_serializing_if = "WireEnum::is_unknown")]
    pub bank_account_holder_type: BankAccountHolderType,
}

impl PaymentProfileAttributes {
    /// Decodes a `<payment_profile_attributes>` XML document.
    ///
    /// # Errors
    ///
    /// - [`PayloadError::InvalidArgument`] if the XML is malformed or empty, or
    ///   has no top-level `payment_profile_attributes` element.
    /// - [`PayloadError::Format`] if a numeric field is malformed.
    pub fn from_xml(xml: &str) -> Result<Self, PayloadError> {
        match xml::parse_root(xml, PAYMENT_PROFILE_ROOT)? {
            Node::Record(record) => Self::from_record(&record),
            Node::Null | Node::Scalar(_) => Ok(Self::default()),
            other => Err(PayloadError::format(PAYMENT_PROFILE_ROOT, describe(&other), "record")),
        }
    }

    /// Decodes the attributes from a JSON object, bare or wrapped as
    /// `{"payment_profile_attributes": {..}}`.
    ///
    /// # Errors
    ///
    /// - [`PayloadError::InvalidArgument`] if `value` is not an object.
    /// - [`PayloadError::Format`] if a numeric field is malformed.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PayloadError> {
        Self::from_record(&json::to_resource(value, PAYMENT_PROFILE_ROOT)?)
    }

    fn from_record(record: &Record) -> Result<Self, PayloadError> {
        let mut attributes = Self::default();

        for (key, node) in record.iter() {
            let Some(field) = PaymentProfileField::from_key(key) else {
                tracing::trace!(field = key, "ignoring unrecognized payment profile field");
                continue;
            };
            let name = field.key();
            match field {
                PaymentProfileField::VaultToken => attributes.vault_token = scalar::text(node, name)?,
                PaymentProfileField::CustomerVaultToken => {
                    attributes.customer_vault_token = scalar::text(node, name)?
                }
                PaymentProfileField::CurrentVault => {
                    attributes.current_vault = decode_enum(node, name)?
                }
                PaymentProfileField::ExpirationYear => {
                    attributes.expiration_year = scalar::month_or_year(node, name)?
                }
                PaymentProfileField::ExpirationMonth => {
                    attributes.expiration_month = scalar::month_or_year(node, name)?
                }
                PaymentProfileField::CardType => attributes.card_type = decode_enum(node, name)?,
                PaymentProfileField::LastFour => attributes.last_four = scalar::text(node, name)?,
                PaymentProfileField::BankName => attributes.bank_name = scalar::text(node, name)?,
                PaymentProfileField::BankRoutingNumber => {
                    attributes.bank_routing_number = scalar::text(node, name)?
                }
                PaymentProfileField::BankAccountNumber => {
                    attributes.bank_account_number = scalar::text(node, name)?
                }
                PaymentProfileField::BankAccountType => {
                    attributes.bank_account_type = decode_enum(node, name)?
                }
                PaymentProfileField::BankAccountHolderType => {
                    attributes.bank_account_holder_type = decode_enum(node, name)?
                }
            }
        }

        Ok(attributes)
    }

    /// Wire representation of every set field, in declaration order.
    fn wire_fields(&self) -> Vec<(PaymentProfileField, String)> {
        let numbers = |value: Option<u32>| value.map(|n| n.to_string());
        let tokens = |value: Option<std::borrow::Cow<'static, str>>| value.map(|t| t.into_owned());

        let candidates = [
            (PaymentProfileField::VaultToken, self.vault_token.clone()),
            (PaymentProfileField::CustomerVaultToken, self.customer_vault_token.clone()),
            (PaymentProfileField::CurrentVault, tokens(self.current_vault.to_wire())),
            (PaymentProfileField::ExpirationYear, numbers(self.expiration_year)),
            (PaymentProfileField::ExpirationMonth, numbers(self.expiration_month)),
            (PaymentProfileField::CardType, tokens(self.card_type.to_wire())),
            (PaymentProfileField::LastFour, self.last_four.clone()),
            (PaymentProfileField::BankName, self.bank_name.clone()),
            (PaymentProfileField::BankRoutingNumber, self.bank_routing_number.clone()),
            (PaymentProfileField::BankAccountNumber, self.bank_account_number.clone()),
            (PaymentProfileField::BankAccountType, tokens(self.bank_account_type.to_wire())),
            (
                PaymentProfileField::BankAccountHolderType,
                tokens(self.bank_account_holder_type.to_wire()),
            ),
        ];

        candidates
            .into_iter()
            .filter_map(|(field, value)| value.map(|value| (field, value)))
            .collect()
    }

    /// Encodes the attributes as a `<payment_profile_attributes>` document.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Encode`] if the writer fails.
    pub fn to_xml(&self) -> Result<String, PayloadError> {
        let mut writer = Writer::new(Vec::new());

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(encode)?;
        writer
            .write_event(Event::Start(BytesStart::new(PAYMENT_PROFILE_ROOT)))
            .map_err(encode)?;
        for (field, value) in self.wire_fields() {
            writer
                .write_event(Event::Start(BytesStart::new(field.key())))
                .map_err(encode)?;
            writer
                .write_event(Event::Text(BytesText::new(&value)))
                .map_err(encode)?;
            writer
                .write_event(Event::End(BytesEnd::new(field.key())))
                .map_err(encode)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(PAYMENT_PROFILE_ROOT)))
            .map_err(encode)?;

        String::from_utf8(writer.into_inner()).map_err(encode)
    }

    /// Encodes the attributes as `{"payment_profile_attributes": {..}}`.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<serde_json::Value, PayloadError> {
        let body = serde_json::to_value(self).map_err(encode)?;
        let mut envelope = serde_json::Map::new();
        envelope.insert(PAYMENT_PROFILE_ROOT.to_string(), body);
        Ok(serde_json::Value::Object(envelope))
    }
}

fn encode(error: impl std::fmt::Display) -> PayloadError {
    PayloadError::Encode {
        reason: error.to_string(),
    }
}

fn decode_enum<E: WireEnum>(node: &Node, field: &'static str) -> Result<E, PayloadError> {
    Ok(scalar::text(node, field)?.map_or(E::UNKNOWN, |token| E::from_wire(&token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card_profile() -> PaymentProfileAttributes {
        PaymentProfileAttributes {
            vault_token: Some("tok_1234".to_string()),
            customer_vault_token: Some("cust_99".to_string()),
            current_vault: VaultType::AuthorizeNet,
            expiration_year: Some(2030),
            expiration_month: Some(12),
            card_type: CardType::Visa,
            last_four: Some("1111".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn card_type_tokens() {
        assert_eq!(CardType::from_wire("american_express"), CardType::AmericanExpress);
        assert_eq!(CardType::from_wire("diners_club"), CardType::DinersClub);
        assert_eq!(CardType::from_wire("master"), CardType::Master);
        assert_eq!(CardType::from_wire("mastercard"), CardType::Unknown);
        assert_eq!(CardType::Jcb.to_string(), "jcb");
    }

    #[test]
    fn vault_tokens() {
        for (variant, token) in VaultType::TABLE {
            assert_eq!(VaultType::from_wire(token), *variant);
            assert_eq!(variant.to_wire().as_deref(), Some(*token));
        }
        assert_eq!(VaultType::from_wire("square"), VaultType::Unknown);
        assert_eq!(VaultType::Unknown.to_wire(), None);
    }

    #[test]
    fn bank_account_tokens() {
        assert_eq!(BankAccountType::from_wire("Savings"), BankAccountType::Savings);
        assert_eq!(BankAccountHolderType::from_wire("business"), BankAccountHolderType::Business);
        assert_eq!(BankAccountType::default(), BankAccountType::Unknown);
        assert_eq!(BankAccountHolderType::default(), BankAccountHolderType::Unknown);
    }

    #[test]
    fn xml_writes_only_set_fields() {
        let xml = card_profile().to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<vault_token>tok_1234</vault_token>"));
        assert!(xml.contains("<current_vault>authorizenet</current_vault>"));
        assert!(xml.contains("<expiration_month>12</expiration_month>"));
        assert!(xml.contains("<card_type>visa</card_type>"));
        assert!(!xml.contains("bank_name"));
        assert!(!xml.contains("bank_account_type"));
    }

    #[test]
    fn xml_escapes_text() {
        let attributes = PaymentProfileAttributes {
            bank_name: Some("Smith & Sons <Savings>".to_string()),
            ..Default::default()
        };
        let xml = attributes.to_xml().unwrap();
        assert!(xml.contains("Smith &amp; Sons &lt;Savings&gt;"));
        assert_eq!(PaymentProfileAttributes::from_xml(&xml).unwrap(), attributes);
    }

    #[test]
    fn xml_round_trip() {
        let profile = card_profile();
        let decoded = PaymentProfileAttributes::from_xml(&profile.to_xml().unwrap()).unwrap();
        assert_eq!(decoded, profile);
    }

    #[test]
    fn json_writes_only_set_fields() {
        let bank = PaymentProfileAttributes {
            vault_token: Some("ba_1".to_string()),
            current_vault: VaultType::Stripe,
            bank_account_type: BankAccountType::Checking,
            bank_account_holder_type: BankAccountHolderType::Personal,
            ..Default::default()
        };
        let value = bank.to_json().unwrap();
        assert_eq!(
            value,
            json!({
                "payment_profile_attributes": {
                    "vault_token": "ba_1",
                    "current_vault": "stripe",
                    "bank_account_type": "checking",
                    "bank_account_holder_type": "personal"
                }
            })
        );
        assert_eq!(PaymentProfileAttributes::from_json(&value).unwrap(), bank);
    }

    #[test]
    fn empty_attributes_encode_to_empty_record() {
        let value = PaymentProfileAttributes::default().to_json().unwrap();
        assert_eq!(value, json!({"payment_profile_attributes": {}}));
        let xml = PaymentProfileAttributes::default().to_xml().unwrap();
        assert!(xml.ends_with("<payment_profile_attributes></payment_profile_attributes>"));
    }

    #[test]
    fn unrecognized_vault_decodes_to_unknown() {
        let decoded =
            PaymentProfileAttributes::from_json(&json!({"current_vault": "acme_vault"})).unwrap();
        assert_eq!(decoded.current_vault, VaultType::Unknown);
    }

    #[test]
    fn malformed_expiration_fails() {
        let err = PaymentProfileAttributes::from_json(&json!({"expiration_month": "Dec"})).unwrap_err();
        assert!(matches!(err, PayloadError::Format { field: "expiration_month", .. }));
    }
}
