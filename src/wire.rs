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

//! Closed enumerations with an external wire token.
//!
//! Each enumeration has one lookup table of `(variant, key)` pairs where the
//! key uses `_` between words. Wire tokens that use a different separator are
//! normalized to `_` before the lookup, and the separator is put back when
//! encoding. Tokens outside the table decode to the `UNKNOWN` variant; that
//! variant has no wire token.

use std::borrow::Cow;

pub trait WireEnum: Copy + PartialEq + Sized + 'static {
    /// Variants paired with their underscore-separated keys.
    const TABLE: &'static [(Self, &'static str)];

    /// Sentinel for an absent or unrecognized value.
    const UNKNOWN: Self;

    /// Word separator used on the wire.
    const WIRE_SEPARATOR: char = '_';

    /// Decodes a wire token. Never fails: unrecognized tokens are `UNKNOWN`.
    fn from_wire(token: &str) -> Self {
        let key = token
            .trim()
            .to_ascii_lowercase()
            .replace(Self::WIRE_SEPARATOR, "_");
        Self::TABLE
            .iter()
            .find(|(_, candidate)| *candidate == key)
            .map(|(variant, _)| *variant)
            .unwrap_or(Self::UNKNOWN)
    }

    /// Wire token of the variant, or `None` for `UNKNOWN`.
    fn to_wire(self) -> Option<Cow<'static, str>> {
        let (_, key) = Self::TABLE.iter().find(|(variant, _)| *variant == self)?;
        if Self::WIRE_SEPARATOR == '_' {
            Some(Cow::Borrowed(*key))
        } else {
            Some(Cow::Owned(key.replace('_', &Self::WIRE_SEPARATOR.to_string())))
        }
    }

    fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

/// Implements `Default`, `Display`, `FromStr` and serde support for a
/// [`WireEnum`] in terms of its wire token.
macro_rules! wire_enum_impls {
    ($name:ident) => {
        impl Default for $name {
            fn default() -> Self {
                <Self as $crate::wire::WireEnum>::UNKNOWN
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match $crate::wire::WireEnum::to_wire(*self) {
                    Some(token) => f.write_str(&token),
                    None => f.write_str("unknown"),
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::convert::Infallible;

            fn from_str(token: &str) -> Result<Self, Self::Err> {
                Ok(<Self as $crate::wire::WireEnum>::from_wire(token))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match $crate::wire::WireEnum::to_wire(*self) {
                    Some(token) => serializer.serialize_str(&token),
                    None => Err(<S::Error as ::serde::ser::Error>::custom(concat!(
                        stringify!($name),
                        "::Unknown has no wire representation"
                    ))),
                }
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let token = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Ok(<Self as $crate::wire::WireEnum>::from_wire(&token))
            }
        }
    };
}

pub(crate) use wire_enum_impls;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Speed {
        FullSpeed,
        Halt,
        Unknown,
    }

    impl WireEnum for Speed {
        const TABLE: &'static [(Self, &'static str)] =
            &[(Self::FullSpeed, "full_speed"), (Self::Halt, "halt")];
        const UNKNOWN: Self = Self::Unknown;
        const WIRE_SEPARATOR: char = '-';
    }

    wire_enum_impls!(Speed);

    #[test]
    fn separator_is_normalized() {
        assert_eq!(Speed::from_wire("full-speed"), Speed::FullSpeed);
        assert_eq!(Speed::from_wire(" FULL-SPEED "), Speed::FullSpeed);
        assert_eq!(Speed::FullSpeed.to_wire().as_deref(), Some("full-speed"));
    }

    #[test]
    fn unrecognized_tokens_are_unknown() {
        assert_eq!(Speed::from_wire("warp"), Speed::Unknown);
        assert_eq!(Speed::from_wire(""), Speed::Unknown);
        assert_eq!(Speed::Unknown.to_wire(), None);
        assert!(Speed::default().is_unknown());
    }

    #[test]
    fn display_and_from_str() {
        assert_eq!(Speed::Halt.to_string(), "halt");
        assert_eq!(Speed::Unknown.to_string(), "unknown");
        assert_eq!("full-speed".parse::<Speed>(), Ok(Speed::FullSpeed));
    }

    #[test]
    fn serde_uses_wire_tokens() {
        assert_eq!(serde_json::to_string(&Speed::FullSpeed).unwrap(), "\"full-speed\"");
        assert_eq!(serde_json::from_str::<Speed>("\"halt\"").unwrap(), Speed::Halt);
        assert_eq!(serde_json::from_str::<Speed>("\"reverse\"").unwrap(), Speed::Unknown);
        assert!(serde_json::to_string(&Speed::Unknown).is_err());
    }
}
