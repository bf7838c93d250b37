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

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use inventory_ledger_rs::{
    AssetCondition, AssetId, Inventory, LocationId, NewAsset, NewLocation, NewRoom, RoomId,
    Specification, UserId,
};
use rust_decimal_macros::dec;

pub const ACTOR: UserId = UserId(1);

/// Two locations with rooms: `r1`, `r1b` in `l1`; `r2` in `l2`.
pub struct Fixture {
    pub inventory: Inventory,
    pub l1: LocationId,
    pub l2: LocationId,
    pub r1: RoomId,
    pub r1b: RoomId,
    pub r2: RoomId,
}

pub fn fixture() -> Fixture {
    let inventory = Inventory::new();
    let l1 = make_location(&inventory, "L1");
    let l2 = make_location(&inventory, "L2");
    let r1 = make_room(&inventory, "R1", l1);
    let r1b = make_room(&inventory, "R1B", l1);
    let r2 = make_room(&inventory, "R2", l2);
    Fixture {
        inventory,
        l1,
        l2,
        r1,
        r1b,
        r2,
    }
}

pub fn make_location(inventory: &Inventory, code: &str) -> LocationId {
    inventory
        .catalog()
        .create_location(NewLocation {
            code: code.into(),
            name: format!("Lokasi {code}"),
            description: String::new(),
        })
        .unwrap()
        .id
}

pub fn make_room(inventory: &Inventory, name: &str, location_id: LocationId) -> RoomId {
    inventory
        .catalog()
        .create_room(NewRoom {
            name: name.into(),
            location_id,
            description: String::new(),
        })
        .unwrap()
        .id
}

pub fn new_asset(code: &str, location_id: LocationId, room_id: Option<RoomId>) -> NewAsset {
    NewAsset {
        code: code.into(),
        barcode: None,
        asset_number: format!("NA-{code}"),
        name: "Laptop".into(),
        brand_model: "Lenovo T14".into(),
        item_code: "3.10.02.03".into(),
        fiscal_year: 2024,
        unit_value: dec!(15000000.00),
        acquired_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        location_id,
        room_id,
        custodian: "Alice".into(),
        condition: AssetCondition::Good,
        category_id: None,
        notes: String::new(),
        specification: Specification::new(),
    }
}

/// Registers an asset at `l1`/`r1` held by Alice in good condition.
pub fn make_asset(fx: &Fixture, code: &str) -> AssetId {
    fx.inventory
        .create_asset(new_asset(code, fx.l1, Some(fx.r1)), ACTOR)
        .unwrap()
        .id
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
