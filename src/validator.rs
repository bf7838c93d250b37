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

//! Consistency rules shared by the registry and both ledgers.
//!
//! Every rule is a stateless predicate returning `Ok(())` or the error the
//! caller should see. The ledgers, the registry and the tests all call these
//! same functions, so each invariant has exactly one implementation:
//!
//! | Rule | Predicate |
//! |------|-----------|
//! | references exist | [`location_exists`], [`room_exists`], [`category_exists`] |
//! | room belongs to location | [`check_room_in_location`], [`check_placement`] |
//! | uniqueness | [`check_unique`] |
//! | movement shape per kind | [`check_movement_shape`] |
//! | claimed origin matches snapshot | [`check_origin`] |
//! | snapshot version matches | [`check_version`] |
//! | ledger-owned columns | [`check_ledger_owned`] |

use crate::asset::{Asset, AssetUpdate};
use crate::base::{CategoryId, LocationId, RoomId};
use crate::config::InventoryConfig;
use crate::error::InventoryError;
use crate::movement::{MovementKind, MovementRequest};
use crate::reference::{AssetCategory, Catalog, Location, Room};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::fmt::Display;

/// DECIMAL(15,2): 13 integral digits.
const MONEY_INTEGRAL_LIMIT: i64 = 10_000_000_000_000;
const MONEY_SCALE: u32 = 2;

// === Field rules ===

/// Non-blank text of at most `max` characters.
pub fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), InventoryError> {
    if value.trim().is_empty() {
        return Err(InventoryError::validation(field, "must not be blank"));
    }
    limit_text(field, value, max)
}

/// Text of at most `max` characters (blank allowed).
pub fn limit_text(field: &'static str, value: &str, max: usize) -> Result<(), InventoryError> {
    let length = value.chars().count();
    if length > max {
        return Err(InventoryError::validation(
            field,
            format!("must be at most {max} characters (got {length})"),
        ));
    }
    Ok(())
}

/// Non-negative fixed-point amount fitting DECIMAL(15,2).
pub fn check_money(field: &'static str, value: Decimal) -> Result<(), InventoryError> {
    if value < Decimal::ZERO {
        return Err(InventoryError::validation(field, "must not be negative"));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(InventoryError::validation(
            field,
            format!("must have at most {MONEY_SCALE} decimal places"),
        ));
    }
    if value.trunc() >= Decimal::from(MONEY_INTEGRAL_LIMIT) {
        return Err(InventoryError::validation(field, "exceeds 13 integral digits"));
    }
    Ok(())
}

pub fn check_fiscal_year(
    year: i32,
    today: NaiveDate,
    config: &InventoryConfig,
) -> Result<(), InventoryError> {
    let latest = today.year().saturating_add(config.max_fiscal_year_ahead);
    if !(InventoryConfig::MIN_FISCAL_YEAR..=latest).contains(&year) {
        return Err(InventoryError::validation(
            "tahun_anggaran",
            format!(
                "must be between {} and {latest}",
                InventoryConfig::MIN_FISCAL_YEAR
            ),
        ));
    }
    Ok(())
}

pub fn check_acquisition_date(
    date: NaiveDate,
    today: NaiveDate,
    config: &InventoryConfig,
) -> Result<(), InventoryError> {
    if !config.allow_future_acquisition && date > today {
        return Err(InventoryError::validation(
            "tanggal_perolehan",
            "must not be in the future",
        ));
    }
    Ok(())
}

// === Reference rules ===

pub fn location_exists(catalog: &Catalog, id: LocationId) -> Result<Location, InventoryError> {
    catalog
        .location(id)
        .ok_or_else(|| InventoryError::not_found("location", id.get()))
}

pub fn room_exists(catalog: &Catalog, id: RoomId) -> Result<Room, InventoryError> {
    catalog
        .room(id)
        .ok_or_else(|| InventoryError::not_found("room", id.get()))
}

pub fn category_exists(
    catalog: &Catalog,
    id: CategoryId,
) -> Result<AssetCategory, InventoryError> {
    catalog
        .category(id)
        .ok_or_else(|| InventoryError::not_found("category", id.get()))
}

pub fn check_room_in_location(
    room: &Room,
    location: LocationId,
    field: &'static str,
) -> Result<(), InventoryError> {
    if room.location_id != location {
        return Err(InventoryError::validation(
            field,
            format!(
                "room {} belongs to location {}, not {location}",
                room.id, room.location_id
            ),
        ));
    }
    Ok(())
}

/// Location exists, room (if any) exists and belongs to that location.
pub fn check_placement(
    catalog: &Catalog,
    location: LocationId,
    room: Option<RoomId>,
    room_field: &'static str,
) -> Result<(), InventoryError> {
    location_exists(catalog, location)?;
    if let Some(room) = room {
        let room = room_exists(catalog, room)?;
        check_room_in_location(&room, location, room_field)?;
    }
    Ok(())
}

/// `value` of a unique column is free or already owned by `owner`.
///
/// `holder` is the id of the `entity` row currently holding `value`, if any
/// (see [`Inventory::asset_by_code`](crate::Inventory::asset_by_code) and
/// the catalog's `*_by_code` lookups).
pub fn check_unique(
    field: &'static str,
    entity: &'static str,
    value: &str,
    holder: Option<u32>,
    owner: Option<u32>,
) -> Result<(), InventoryError> {
    match holder {
        Some(existing) if Some(existing) != owner => Err(InventoryError::Conflict {
            field,
            value: value.to_owned(),
            entity,
            existing,
        }),
        _ => Ok(()),
    }
}

// === Snapshot rules ===

/// Inactive assets are hidden from every write path.
pub fn check_active(asset: &Asset) -> Result<(), InventoryError> {
    if !asset.is_active {
        return Err(InventoryError::not_found("asset", asset.id.get()));
    }
    Ok(())
}

pub fn check_version(asset: &Asset, expected: Option<u64>) -> Result<(), InventoryError> {
    match expected {
        Some(expected) if expected != asset.version => Err(InventoryError::StaleState {
            asset: asset.id,
            field: "version",
            expected: expected.to_string(),
            actual: asset.version.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Rejects direct writes to columns only the ledgers may change.
pub fn check_ledger_owned(update: &AssetUpdate) -> Result<(), InventoryError> {
    let field = if update.location_id.is_some() {
        "location_id"
    } else if update.room_id.is_some() {
        "room_id"
    } else if update.condition.is_some() {
        "kondisi_barang"
    } else if update.custodian.is_some() {
        "pemegang_barang"
    } else {
        return Ok(());
    };
    Err(InventoryError::InvalidOperation { field })
}

// === Movement rules ===

/// Checks which from/to columns may be populated for the movement kind.
pub fn check_movement_shape(request: &MovementRequest) -> Result<(), InventoryError> {
    if request.from_room_id.is_some() && request.from_location_id.is_none() {
        return Err(InventoryError::validation(
            "from_room_id",
            "requires from_location_id",
        ));
    }
    if request.to_room_id.is_some() && request.to_location_id.is_none() {
        return Err(InventoryError::validation("to_room_id", "requires to_location_id"));
    }

    let kind = request.kind;
    let has_from = request.from_location_id.is_some();
    let has_to = request.to_location_id.is_some();
    match kind {
        MovementKind::Inbound => {
            if has_from {
                return Err(must_be_empty("from_location_id", kind));
            }
            if !has_to {
                return Err(is_required("to_location_id", kind));
            }
        }
        MovementKind::Outbound => {
            if !has_from {
                return Err(is_required("from_location_id", kind));
            }
            if has_to {
                return Err(must_be_empty("to_location_id", kind));
            }
        }
        MovementKind::Transfer => {
            if !has_from {
                return Err(is_required("from_location_id", kind));
            }
            if !has_to {
                return Err(is_required("to_location_id", kind));
            }
            if (request.from_location_id, request.from_room_id)
                == (request.to_location_id, request.to_room_id)
            {
                return Err(InventoryError::validation(
                    "to_location_id",
                    "transfer destination equals its origin",
                ));
            }
        }
    }
    Ok(())
}

/// The request's claimed origin must be the asset's current state.
///
/// A supplied `from_location_id` is compared together with `from_room_id`
/// (an omitted room claims the asset is in no room).
pub fn check_origin(asset: &Asset, request: &MovementRequest) -> Result<(), InventoryError> {
    if let Some(from) = request.from_location_id {
        if asset.location_id != Some(from) {
            return Err(stale(asset, "from_location_id", Some(from), asset.location_id));
        }
        if asset.room_id != request.from_room_id {
            return Err(stale(asset, "from_room_id", request.from_room_id, asset.room_id));
        }
    }
    if let Some(old) = &request.custodian_old {
        if *old != asset.custodian {
            return Err(InventoryError::StaleState {
                asset: asset.id,
                field: "pemegang_lama",
                expected: old.clone(),
                actual: asset.custodian.clone(),
            });
        }
    }
    Ok(())
}

fn must_be_empty(field: &'static str, kind: MovementKind) -> InventoryError {
    InventoryError::validation(field, format!("must be empty for a '{kind}' movement"))
}

fn is_required(field: &'static str, kind: MovementKind) -> InventoryError {
    InventoryError::validation(field, format!("is required for a '{kind}' movement"))
}

fn stale<T: Display>(
    asset: &Asset,
    field: &'static str,
    expected: Option<T>,
    actual: Option<T>,
) -> InventoryError {
    let show = |value: Option<T>| value.map_or_else(|| "none".to_owned(), |v| v.to_string());
    InventoryError::StaleState {
        asset: asset.id,
        field,
        expected: show(expected),
        actual: show(actual),
    }
}
