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

//! Read views over an asset's ledgers.
//!
//! A [`History`] fixes the ledger length at the moment it is requested.
//! Because committed rows never change, iterating the first `len` rows
//! always yields the same sequence: the view is finite and can be iterated
//! any number of times. Rows are fetched one at a time as the iterator
//! advances; appends made after the view was taken are not visible through
//! it.

use crate::ledger::AssetLedger;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Iteration order of a history view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryOrder {
    /// Oldest first.
    #[default]
    Chronological,
    /// Newest first.
    ReverseChronological,
}

type Fetch<T> = fn(&AssetLedger, usize) -> Option<T>;

/// Snapshot-length view of one ledger of one asset.
pub struct History<T> {
    ledger: Arc<AssetLedger>,
    len: usize,
    order: HistoryOrder,
    fetch: Fetch<T>,
}

impl<T> History<T> {
    pub(crate) fn new(
        ledger: Arc<AssetLedger>,
        len: usize,
        order: HistoryOrder,
        fetch: Fetch<T>,
    ) -> Self {
        Self {
            ledger,
            len,
            order,
            fetch,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn order(&self) -> HistoryOrder {
        self.order
    }

    pub fn iter(&self) -> HistoryIter<'_, T> {
        HistoryIter {
            history: self,
            position: 0,
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Most recent row in the view, regardless of order.
    pub fn latest(&self) -> Option<T> {
        self.len
            .checked_sub(1)
            .and_then(|index| (self.fetch)(&self.ledger, index))
    }
}

impl<T> Clone for History<T> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            len: self.len,
            order: self.order,
            fetch: self.fetch,
        }
    }
}

impl<T> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("len", &self.len)
            .field("order", &self.order)
            .finish()
    }
}

/// Iterator over a [`History`].
pub struct HistoryIter<'a, T> {
    history: &'a History<T>,
    position: usize,
}

impl<T> Iterator for HistoryIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let history = self.history;
        if self.position >= history.len {
            return None;
        }
        let index = match history.order {
            HistoryOrder::Chronological => self.position,
            HistoryOrder::ReverseChronological => history.len - 1 - self.position,
        };
        self.position += 1;
        (history.fetch)(&history.ledger, index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.history.len - self.position;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for HistoryIter<'_, T> {}

impl<'a, T> IntoIterator for &'a History<T> {
    type Item = T;
    type IntoIter = HistoryIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
