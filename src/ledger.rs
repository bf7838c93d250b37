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

//! Per-asset store record: the snapshot and its two append-only logs.
//!
//! One mutex guards all three, so a ledger-row insert and the matching
//! snapshot update are a single critical section: readers observe both or
//! neither. Writers carry the snapshot version they validated against; a
//! version that moved in the meantime loses with a stale-state error instead
//! of overwriting the winner.

use crate::asset::{Asset, AssetCondition};
use crate::base::UserId;
use crate::error::InventoryError;
use crate::maintenance::MaintenanceRecord;
use crate::movement::AssetMovement;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

#[derive(Debug)]
struct LedgerData {
    snapshot: Asset,
    movements: Vec<AssetMovement>,
    maintenance: Vec<MaintenanceRecord>,
}

impl LedgerData {
    fn assert_invariants(&self) {
        debug_assert!(
            self.snapshot.room_id.is_none() || self.snapshot.location_id.is_some(),
            "Invariant violated: asset {} has a room but no location",
            self.snapshot.id
        );
        if let Some(last) = self.movements.last() {
            debug_assert_eq!(
                (self.snapshot.location_id, self.snapshot.room_id),
                (last.to_location_id, last.to_room_id),
                "Invariant violated: asset {} placement diverged from movement {}",
                self.snapshot.id,
                last.id
            );
        }
    }

    fn check_version(&self, read_version: u64) -> Result<(), InventoryError> {
        if self.snapshot.version != read_version {
            return Err(InventoryError::StaleState {
                asset: self.snapshot.id,
                field: "version",
                expected: read_version.to_string(),
                actual: self.snapshot.version.to_string(),
            });
        }
        Ok(())
    }

    fn touch(&mut self, actor: UserId, now: DateTime<Utc>) {
        self.snapshot.version += 1;
        self.snapshot.updated_at = now;
        self.snapshot.updated_by = actor;
    }
}

#[derive(Debug)]
pub(crate) struct AssetLedger {
    inner: Mutex<LedgerData>,
}

impl AssetLedger {
    pub(crate) fn new(snapshot: Asset) -> Self {
        Self {
            inner: Mutex::new(LedgerData {
                snapshot,
                movements: Vec::new(),
                maintenance: Vec::new(),
            }),
        }
    }

    pub(crate) fn snapshot(&self) -> Asset {
        self.inner.lock().snapshot.clone()
    }

    /// Appends a movement and moves the snapshot to its destination.
    ///
    /// `build` receives the commit timestamp. Outbound rows carry no
    /// destination, which leaves the asset without a location or room.
    pub(crate) fn commit_movement(
        &self,
        read_version: u64,
        actor: UserId,
        build: impl FnOnce(DateTime<Utc>) -> AssetMovement,
    ) -> Result<AssetMovement, InventoryError> {
        let mut data = self.inner.lock();
        data.check_version(read_version)?;

        let now = Utc::now();
        let movement = build(now);
        data.snapshot.location_id = movement.to_location_id;
        data.snapshot.room_id = movement.to_room_id;
        if let Some(custodian) = &movement.custodian_new {
            data.snapshot.custodian = custodian.clone();
        }
        data.touch(actor, now);
        data.movements.push(movement.clone());
        data.assert_invariants();
        Ok(movement)
    }

    /// Appends a maintenance record and sets the snapshot condition.
    ///
    /// `build` receives the condition the asset is in at commit time.
    pub(crate) fn commit_maintenance(
        &self,
        read_version: u64,
        actor: UserId,
        build: impl FnOnce(AssetCondition, DateTime<Utc>) -> MaintenanceRecord,
    ) -> Result<MaintenanceRecord, InventoryError> {
        let mut data = self.inner.lock();
        data.check_version(read_version)?;

        let now = Utc::now();
        let record = build(data.snapshot.condition, now);
        debug_assert_eq!(record.condition_before, data.snapshot.condition);
        data.snapshot.condition = record.condition_after;
        data.touch(actor, now);
        data.maintenance.push(record.clone());
        data.assert_invariants();
        Ok(record)
    }

    /// Applies `change` to the snapshot.
    ///
    /// With `read_version` set the write is rejected if the snapshot moved.
    /// `change` runs under the asset's lock and returns whether it modified
    /// anything; an unchanged snapshot keeps its version. If `change` fails
    /// it must leave the snapshot untouched.
    pub(crate) fn modify(
        &self,
        read_version: Option<u64>,
        actor: UserId,
        change: impl FnOnce(&mut Asset) -> Result<bool, InventoryError>,
    ) -> Result<Asset, InventoryError> {
        let mut data = self.inner.lock();
        if let Some(read_version) = read_version {
            data.check_version(read_version)?;
        }
        if change(&mut data.snapshot)? {
            data.touch(actor, Utc::now());
        }
        data.assert_invariants();
        Ok(data.snapshot.clone())
    }

    pub(crate) fn movement_count(&self) -> usize {
        self.inner.lock().movements.len()
    }

    pub(crate) fn movement_at(&self, index: usize) -> Option<AssetMovement> {
        self.inner.lock().movements.get(index).cloned()
    }

    pub(crate) fn movements(&self) -> Vec<AssetMovement> {
        self.inner.lock().movements.clone()
    }

    pub(crate) fn maintenance_count(&self) -> usize {
        self.inner.lock().maintenance.len()
    }

    pub(crate) fn maintenance_at(&self, index: usize) -> Option<MaintenanceRecord> {
        self.inner.lock().maintenance.get(index).cloned()
    }
}
