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

//! Read projections for reporting collaborators.
//!
//! Both reports are computed on demand from the current snapshots and the
//! movement rows; nothing here is maintained incrementally.

use crate::asset::{Asset, AssetCondition};
use crate::base::LocationId;
use crate::movement::{AssetMovement, MovementKind};
use crate::reference::Location;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Active assets currently at one location, by condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub location_id: LocationId,
    #[serde(rename = "kode_lokasi")]
    pub code: String,
    #[serde(rename = "nama_lokasi")]
    pub name: String,
    pub total_assets: usize,
    /// Every condition is present, zero when no asset is in it.
    pub assets_by_condition: BTreeMap<AssetCondition, usize>,
}

impl LocationSummary {
    pub fn count(&self, condition: AssetCondition) -> usize {
        self.assets_by_condition.get(&condition).copied().unwrap_or(0)
    }
}

/// Movement counts for an inclusive date period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementReport {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub totals: BTreeMap<MovementKind, usize>,
    /// Inbound and transfer rows count at their destination, outbound rows
    /// at their origin.
    pub movements_by_location: BTreeMap<LocationId, BTreeMap<MovementKind, usize>>,
}

impl MovementReport {
    pub fn total(&self, kind: MovementKind) -> usize {
        self.totals.get(&kind).copied().unwrap_or(0)
    }

    pub fn at(&self, location: LocationId, kind: MovementKind) -> usize {
        self.movements_by_location
            .get(&location)
            .and_then(|counts| counts.get(&kind))
            .copied()
            .unwrap_or(0)
    }
}

fn zeroed<K: Ord + Copy>(keys: &[K]) -> BTreeMap<K, usize> {
    keys.iter().map(|key| (*key, 0)).collect()
}

pub(crate) fn summarize_locations(
    locations: Vec<Location>,
    assets: impl IntoIterator<Item = Asset>,
) -> Vec<LocationSummary> {
    let mut summaries: BTreeMap<LocationId, LocationSummary> = locations
        .into_iter()
        .map(|location| {
            let summary = LocationSummary {
                location_id: location.id,
                code: location.code,
                name: location.name,
                total_assets: 0,
                assets_by_condition: zeroed(&AssetCondition::ALL),
            };
            (location.id, summary)
        })
        .collect();

    for asset in assets.into_iter().filter(|asset| asset.is_active) {
        let Some(summary) = asset
            .location_id
            .and_then(|location| summaries.get_mut(&location))
        else {
            continue;
        };
        summary.total_assets += 1;
        *summary.assets_by_condition.entry(asset.condition).or_default() += 1;
    }

    summaries.into_values().collect()
}

pub(crate) fn summarize_movements(
    period_start: NaiveDate,
    period_end: NaiveDate,
    movements: impl IntoIterator<Item = AssetMovement>,
) -> MovementReport {
    let mut report = MovementReport {
        period_start,
        period_end,
        totals: zeroed(&MovementKind::ALL),
        movements_by_location: BTreeMap::new(),
    };

    for movement in movements {
        let day = movement.moved_at.date_naive();
        if day < period_start || day > period_end {
            continue;
        }
        *report.totals.entry(movement.kind).or_default() += 1;

        let location = match movement.kind {
            MovementKind::Inbound | MovementKind::Transfer => movement.to_location_id,
            MovementKind::Outbound => movement.from_location_id,
        };
        if let Some(location) = location {
            *report
                .movements_by_location
                .entry(location)
                .or_insert_with(|| zeroed(&MovementKind::ALL))
                .entry(movement.kind)
                .or_default() += 1;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{AssetId, MovementId, UserId};
    use crate::movement::MovementRequest;
    use chrono::{TimeZone, Utc};

    fn movement_on(day: u32, request: MovementRequest) -> AssetMovement {
        let at = Utc.with_ymd_and_hms(2024, 6, day, 10, 0, 0).unwrap();
        AssetMovement::from_request(MovementId(day), AssetId(1), request, UserId(1), at)
    }

    #[test]
    fn movements_outside_period_ignored() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();
        let movements = vec![
            movement_on(9, MovementRequest::inbound(LocationId(1), None)),
            movement_on(10, MovementRequest::inbound(LocationId(1), None)),
            movement_on(20, MovementRequest::outbound(LocationId(1), None)),
            movement_on(21, MovementRequest::outbound(LocationId(1), None)),
        ];

        let report = summarize_movements(start, end, movements);
        assert_eq!(report.total(MovementKind::Inbound), 1);
        assert_eq!(report.total(MovementKind::Outbound), 1);
        assert_eq!(report.total(MovementKind::Transfer), 0);
    }

    #[test]
    fn movements_attributed_by_kind() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let movements = vec![
            movement_on(1, MovementRequest::inbound(LocationId(1), None)),
            movement_on(2, MovementRequest::transfer(LocationId(1), None, LocationId(2), None)),
            movement_on(3, MovementRequest::outbound(LocationId(2), None)),
        ];

        let report = summarize_movements(start, end, movements);
        assert_eq!(report.at(LocationId(1), MovementKind::Inbound), 1);
        assert_eq!(report.at(LocationId(1), MovementKind::Transfer), 0);
        assert_eq!(report.at(LocationId(2), MovementKind::Transfer), 1);
        assert_eq!(report.at(LocationId(2), MovementKind::Outbound), 1);
    }

    #[test]
    fn empty_report_has_zeroed_totals() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let report = summarize_movements(day, day, Vec::new());
        assert_eq!(report.totals.len(), 3);
        assert!(report.totals.values().all(|count| *count == 0));
        assert!(report.movements_by_location.is_empty());
    }
}
