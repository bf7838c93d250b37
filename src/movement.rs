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

//! Movement ledger rows: location and custodian transfers.

use crate::base::{AssetId, LocationId, MovementId, RoomId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a location-change event.
///
/// | Kind | from | to |
/// |------|------|----|
/// | Inbound | empty | required |
/// | Outbound | required | empty |
/// | Transfer | required | required, different from `from` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "masuk")]
    Inbound,
    #[serde(rename = "keluar")]
    Outbound,
    #[serde(rename = "mutasi")]
    Transfer,
}

impl MovementKind {
    pub const ALL: [MovementKind; 3] = [
        MovementKind::Inbound,
        MovementKind::Outbound,
        MovementKind::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "masuk",
            Self::Outbound => "keluar",
            Self::Transfer => "mutasi",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed movement, validated against the asset snapshot before commit.
///
/// The `from_*` and `pemegang_lama` fields are claims about the asset's
/// current state; a claim the snapshot does not match is rejected as stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRequest {
    #[serde(rename = "movement_type")]
    pub kind: MovementKind,
    pub from_location_id: Option<LocationId>,
    pub from_room_id: Option<RoomId>,
    pub to_location_id: Option<LocationId>,
    pub to_room_id: Option<RoomId>,
    #[serde(rename = "pemegang_lama")]
    pub custodian_old: Option<String>,
    /// `None` keeps the current custodian.
    #[serde(rename = "pemegang_baru")]
    pub custodian_new: Option<String>,
    #[serde(rename = "keterangan", default)]
    pub notes: String,
    #[serde(rename = "dokumen_referensi")]
    pub reference_doc: Option<String>,
    /// Snapshot version the caller last read.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

impl MovementRequest {
    fn empty(kind: MovementKind) -> Self {
        Self {
            kind,
            from_location_id: None,
            from_room_id: None,
            to_location_id: None,
            to_room_id: None,
            custodian_old: None,
            custodian_new: None,
            notes: String::new(),
            reference_doc: None,
            expected_version: None,
        }
    }

    pub fn inbound(to_location: LocationId, to_room: Option<RoomId>) -> Self {
        Self {
            to_location_id: Some(to_location),
            to_room_id: to_room,
            ..Self::empty(MovementKind::Inbound)
        }
    }

    pub fn outbound(from_location: LocationId, from_room: Option<RoomId>) -> Self {
        Self {
            from_location_id: Some(from_location),
            from_room_id: from_room,
            ..Self::empty(MovementKind::Outbound)
        }
    }

    pub fn transfer(
        from_location: LocationId,
        from_room: Option<RoomId>,
        to_location: LocationId,
        to_room: Option<RoomId>,
    ) -> Self {
        Self {
            from_location_id: Some(from_location),
            from_room_id: from_room,
            to_location_id: Some(to_location),
            to_room_id: to_room,
            ..Self::empty(MovementKind::Transfer)
        }
    }

    pub fn with_custodians(mut self, old: Option<&str>, new: Option<&str>) -> Self {
        self.custodian_old = old.map(str::to_owned);
        self.custodian_new = new.map(str::to_owned);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_reference(mut self, reference_doc: impl Into<String>) -> Self {
        self.reference_doc = Some(reference_doc.into());
        self
    }

    pub fn expecting(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }
}

/// A committed movement. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMovement {
    pub id: MovementId,
    pub asset_id: AssetId,
    #[serde(rename = "movement_type")]
    pub kind: MovementKind,
    pub from_location_id: Option<LocationId>,
    pub to_location_id: Option<LocationId>,
    pub from_room_id: Option<RoomId>,
    pub to_room_id: Option<RoomId>,
    #[serde(rename = "tanggal_movement")]
    pub moved_at: DateTime<Utc>,
    #[serde(rename = "keterangan")]
    pub notes: String,
    #[serde(rename = "dokumen_referensi")]
    pub reference_doc: Option<String>,
    #[serde(rename = "pemegang_lama")]
    pub custodian_old: Option<String>,
    #[serde(rename = "pemegang_baru")]
    pub custodian_new: Option<String>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl AssetMovement {
    pub(crate) fn from_request(
        id: MovementId,
        asset_id: AssetId,
        request: MovementRequest,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            asset_id,
            kind: request.kind,
            from_location_id: request.from_location_id,
            to_location_id: request.to_location_id,
            from_room_id: request.from_room_id,
            to_room_id: request.to_room_id,
            moved_at: now,
            notes: request.notes,
            reference_doc: request.reference_doc,
            custodian_old: request.custodian_old,
            custodian_new: request.custodian_new,
            user_id: actor,
            created_at: now,
        }
    }
}
