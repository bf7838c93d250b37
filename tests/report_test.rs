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

//! Report integration tests.

mod common;

use chrono::{Days, Utc};
use common::{ACTOR, day, fixture, make_asset, make_location};
use inventory_ledger_rs::{
    AssetCondition, InventoryError, MaintenanceRequest, MovementKind, MovementRequest,
};

#[test]
fn location_summary_counts_active_assets_by_condition() {
    let fx = fixture();
    let empty = make_location(&fx.inventory, "L3");
    make_asset(&fx, "A-1");
    let b = make_asset(&fx, "A-2");
    let c = make_asset(&fx, "A-3");
    let gone = make_asset(&fx, "A-4");

    fx.inventory
        .append_maintenance(
            b,
            MaintenanceRequest::new(
                day(2024, 5, 2),
                "perbaikan",
                "engsel patah",
                "Budi",
                AssetCondition::HeavilyDamaged,
            ),
            ACTOR,
        )
        .unwrap();
    fx.inventory
        .append_movement(
            c,
            MovementRequest::transfer(fx.l1, Some(fx.r1), fx.l2, None),
            ACTOR,
        )
        .unwrap();
    fx.inventory.deactivate_asset(gone, ACTOR).unwrap();

    let summary = fx.inventory.location_summary();
    assert_eq!(summary.len(), 3);

    let l1 = summary.iter().find(|s| s.location_id == fx.l1).unwrap();
    assert_eq!(l1.total_assets, 2);
    assert_eq!(l1.count(AssetCondition::Good), 1);
    assert_eq!(l1.count(AssetCondition::HeavilyDamaged), 1);
    assert_eq!(l1.count(AssetCondition::Lost), 0);
    assert_eq!(l1.assets_by_condition.len(), AssetCondition::ALL.len());

    let l2 = summary.iter().find(|s| s.location_id == fx.l2).unwrap();
    assert_eq!(l2.total_assets, 1);

    let l3 = summary.iter().find(|s| s.location_id == empty).unwrap();
    assert_eq!(l3.total_assets, 0);
    assert!(l3.assets_by_condition.values().all(|count| *count == 0));

}

#[test]
fn outbound_assets_leave_the_summary() {
    let fx = fixture();
    let id = make_asset(&fx, "A-1");
    fx.inventory
        .append_movement(id, MovementRequest::outbound(fx.l1, Some(fx.r1)), ACTOR)
        .unwrap();

    let summary = fx.inventory.location_summary();
    assert!(summary.iter().all(|s| s.total_assets == 0));
}

#[test]
fn movement_report_counts_by_kind_and_location() {
    let fx = fixture();
    let a = make_asset(&fx, "A-1");
    let b = make_asset(&fx, "A-2");

    fx.inventory
        .append_movement(
            a,
            MovementRequest::transfer(fx.l1, Some(fx.r1), fx.l2, Some(fx.r2)),
            ACTOR,
        )
        .unwrap();
    fx.inventory
        .append_movement(b, MovementRequest::outbound(fx.l1, Some(fx.r1)), ACTOR)
        .unwrap();
    fx.inventory
        .append_movement(b, MovementRequest::inbound(fx.l2, None), ACTOR)
        .unwrap();

    let today = Utc::now().date_naive();
    let report = fx
        .inventory
        .movement_report(today - Days::new(1), today + Days::new(1))
        .unwrap();

    assert_eq!(report.total(MovementKind::Transfer), 1);
    assert_eq!(report.total(MovementKind::Outbound), 1);
    assert_eq!(report.total(MovementKind::Inbound), 1);
    assert_eq!(report.at(fx.l2, MovementKind::Transfer), 1);
    assert_eq!(report.at(fx.l2, MovementKind::Inbound), 1);
    assert_eq!(report.at(fx.l1, MovementKind::Outbound), 1);
    assert_eq!(report.at(fx.l1, MovementKind::Transfer), 0);
}

#[test]
fn movement_report_excludes_other_periods() {
    let fx = fixture();
    let id = make_asset(&fx, "A-1");
    fx.inventory
        .append_movement(id, MovementRequest::outbound(fx.l1, Some(fx.r1)), ACTOR)
        .unwrap();

    let report = fx
        .inventory
        .movement_report(day(2020, 1, 1), day(2020, 12, 31))
        .unwrap();
    assert!(report.totals.values().all(|count| *count == 0));
    assert!(report.movements_by_location.is_empty());
}

#[test]
fn movement_report_rejects_inverted_period() {
    let fx = fixture();
    let result = fx
        .inventory
        .movement_report(day(2024, 2, 1), day(2024, 1, 1));
    assert!(matches!(
        result,
        Err(InventoryError::Validation { field: "period_end", .. })
    ));
}
