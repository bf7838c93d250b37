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

//! Error types for inventory operations.

use crate::base::AssetId;
use thiserror::Error;

/// Inventory processing errors.
///
/// `field` values are the persisted column names, so an API layer can point
/// the caller at the offending input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Malformed input or a rule violation (e.g. a movement whose shape does
    /// not match its kind)
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Referenced entity does not exist (or the asset is inactive)
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    /// Unique column already taken
    #[error("{field} '{value}' is already used by {entity} {existing}")]
    Conflict {
        field: &'static str,
        value: String,
        entity: &'static str,
        existing: u32,
    },

    /// The caller's view of the asset is out of date; refresh and retry
    #[error("stale state for asset {asset}: {field} is {actual}, request expected {expected}")]
    StaleState {
        asset: AssetId,
        field: &'static str,
        expected: String,
        actual: String,
    },

    /// Field is owned by the ledgers and cannot be set directly
    #[error("{field} can only be changed through the movement or maintenance ledger")]
    InvalidOperation { field: &'static str },

    /// Store-level failure unrelated to the request content
    #[error("store failure: {0}")]
    Store(String),
}

impl InventoryError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: u32) -> Self {
        Self::NotFound { entity, id }
    }

    /// Returns `true` for optimistic-concurrency and origin mismatches.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleState { .. })
    }

    /// Returns `true` when re-reading the asset and resubmitting may succeed.
    ///
    /// The core never retries on its own.
    pub fn is_retryable(&self) -> bool {
        self.is_stale()
    }
}
