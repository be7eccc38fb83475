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

//! Error types for payload decoding and encoding.

use thiserror::Error;

/// Payload processing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// The input document is empty, unparseable, or not the expected resource
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    /// A recognized field holds a value that cannot be read as its declared type
    #[error("field `{field}` has malformed value {value:?} (expected {expected})")]
    Format {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A request body could not be written out
    #[error("failed to encode payload: {reason}")]
    Encode { reason: String },
}

impl PayloadError {
    pub(crate) fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    pub(crate) fn format(field: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        Self::Format {
            field,
            value: value.into(),
            expected,
        }
    }
}
