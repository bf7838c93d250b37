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

//! Core identifier types for reference data, assets, ledger rows and users.
//!
//! All identifiers are opaque, assigned by the store and never reused.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the raw numeric value.
            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier! {
    /// Unique identifier for a location (building, site or warehouse).
    LocationId
}

identifier! {
    /// Unique identifier for a room inside a location.
    RoomId
}

identifier! {
    /// Unique identifier for an asset category.
    CategoryId
}

identifier! {
    /// Unique identifier for an asset.
    AssetId
}

identifier! {
    /// Unique identifier for a committed movement row.
    MovementId
}

identifier! {
    /// Unique identifier for a committed maintenance row.
    MaintenanceId
}

identifier! {
    /// Opaque identity of the acting user, supplied by the authentication layer.
    UserId
}
