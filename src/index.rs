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

//! Store primitives: unique column indexes and id sequences.

use crate::error::InventoryError;
use crate::validator;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU32, Ordering};

/// Unique constraint over one text column.
///
/// Maps each claimed value to the id of the row owning it. Values are never
/// released when a row is soft-deleted, so uniqueness spans active and
/// inactive rows alike.
#[derive(Debug)]
pub(crate) struct UniqueIndex {
    field: &'static str,
    entity: &'static str,
    owners: DashMap<String, u32>,
}

impl UniqueIndex {
    pub(crate) fn new(field: &'static str, entity: &'static str) -> Self {
        Self {
            field,
            entity,
            owners: DashMap::new(),
        }
    }

    /// Claims `value` for `owner`.
    ///
    /// Returns `true` if this call inserted the claim and `false` if the
    /// owner already held the value. Only a `true` claim may be rolled back
    /// by its caller.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Conflict`] if another row owns the value.
    pub(crate) fn claim(&self, value: &str, owner: u32) -> Result<bool, InventoryError> {
        // Entry API gives an atomic check-and-insert
        match self.owners.entry(value.to_owned()) {
            Entry::Occupied(entry) if *entry.get() == owner => Ok(false),
            Entry::Occupied(entry) => Err(self.conflict(value, *entry.get())),
            Entry::Vacant(entry) => {
                entry.insert(owner);
                Ok(true)
            }
        }
    }

    /// Releases `value` if (and only if) `owner` holds it.
    pub(crate) fn release(&self, value: &str, owner: u32) {
        self.owners.remove_if(value, |_, holder| *holder == owner);
    }

    /// Returns the id of the row owning `value`.
    pub(crate) fn owner(&self, value: &str) -> Option<u32> {
        self.owners.get(value).map(|holder| *holder)
    }

    /// Non-claiming check: fails if `value` is owned by a row other than `owner`.
    pub(crate) fn check(&self, value: &str, owner: Option<u32>) -> Result<(), InventoryError> {
        validator::check_unique(self.field, self.entity, value, self.owner(value), owner)
    }

    fn conflict(&self, value: &str, existing: u32) -> InventoryError {
        InventoryError::Conflict {
            field: self.field,
            value: value.to_owned(),
            entity: self.entity,
            existing,
        }
    }
}

/// Monotonic id sequence for one table. The first id handed out is 1.
#[derive(Debug, Default)]
pub(crate) struct Sequence {
    last: AtomicU32,
}

impl Sequence {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Allocates the next id. Ids of rejected requests are not reused.
    pub(crate) fn next(&self, table: &'static str) -> Result<u32, InventoryError> {
        self.last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .map(|last| last + 1)
            .map_err(|_| InventoryError::Store(format!("{table} id space exhausted")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_rejects_second_owner() {
        let index = UniqueIndex::new("kode", "asset");
        index.claim("A-1", 1).unwrap();

        let result = index.claim("A-1", 2);
        assert_eq!(
            result,
            Err(InventoryError::Conflict {
                field: "kode",
                value: "A-1".into(),
                entity: "asset",
                existing: 1,
            })
        );
    }

    #[test]
    fn reclaim_by_same_owner_is_noop() {
        let index = UniqueIndex::new("kode", "asset");
        assert_eq!(index.claim("A-1", 1), Ok(true));
        assert_eq!(index.claim("A-1", 1), Ok(false));
        assert_eq!(index.owner("A-1"), Some(1));
    }

    #[test]
    fn release_only_by_owner() {
        let index = UniqueIndex::new("kode", "asset");
        index.claim("A-1", 1).unwrap();

        index.release("A-1", 2);
        assert_eq!(index.owner("A-1"), Some(1));

        index.release("A-1", 1);
        assert_eq!(index.owner("A-1"), None);
        index.claim("A-1", 2).unwrap();
    }

    #[test]
    fn check_ignores_own_value() {
        let index = UniqueIndex::new("barcode", "asset");
        index.claim("899", 5).unwrap();
        assert!(index.check("899", Some(5)).is_ok());
        assert!(index.check("899", Some(6)).is_err());
        assert!(index.check("899", None).is_err());
        assert!(index.check("900", None).is_ok());
    }

    #[test]
    fn sequence_starts_at_one() {
        let seq = Sequence::new();
        assert_eq!(seq.next("assets"), Ok(1));
        assert_eq!(seq.next("assets"), Ok(2));
    }

    #[test]
    fn sequence_exhaustion_is_store_error() {
        let seq = Sequence {
            last: AtomicU32::new(u32::MAX),
        };
        assert_eq!(
            seq.next("assets"),
            Err(InventoryError::Store("assets id space exhausted".into()))
        );
    }
}
