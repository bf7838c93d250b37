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

//! # Inventory Ledger
//!
//! This library keeps a physical asset inventory consistent: each asset's
//! current location, room, condition and custodian is a denormalized
//! snapshot, and two append-only ledgers (movements and maintenance) are the
//! only way to change it.
//!
//! ## Core Components
//!
//! - [`Inventory`]: Identity registry plus the movement and maintenance ledgers
//! - [`Catalog`]: Reference data (locations, rooms, asset categories)
//! - [`validator`]: Consistency rules shared by every write path
//! - [`History`]: Lazy, restartable views over an asset's ledgers
//! - [`InventoryError`]: Error types for rejected operations
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use inventory_ledger_rs::{
//!     AssetCondition, HistoryOrder, Inventory, MaintenanceRequest, MovementRequest, NewAsset,
//!     NewLocation, UserId,
//! };
//! use rust_decimal_macros::dec;
//!
//! let inventory = Inventory::new();
//! let actor = UserId(1);
//! let warehouse = inventory
//!     .catalog()
//!     .create_location(NewLocation {
//!         code: "GDG".into(),
//!         name: "Gudang".into(),
//!         description: String::new(),
//!     })
//!     .unwrap();
//! let office = inventory
//!     .catalog()
//!     .create_location(NewLocation {
//!         code: "KTR".into(),
//!         name: "Kantor".into(),
//!         description: String::new(),
//!     })
//!     .unwrap();
//!
//! let asset = inventory
//!     .create_asset(
//!         NewAsset {
//!             code: "AST-001".into(),
//!             barcode: None,
//!             asset_number: "NA-001".into(),
//!             name: "Laptop".into(),
//!             brand_model: "Lenovo T14".into(),
//!             item_code: "3.10.02".into(),
//!             fiscal_year: 2024,
//!             unit_value: dec!(15000000.00),
//!             acquired_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!             location_id: warehouse.id,
//!             room_id: None,
//!             custodian: "Alice".into(),
//!             condition: AssetCondition::Good,
//!             category_id: None,
//!             notes: String::new(),
//!             specification: Default::default(),
//!         },
//!         actor,
//!     )
//!     .unwrap();
//!
//! // Hand the laptop to Bob at the office
//! let transfer = MovementRequest::transfer(warehouse.id, None, office.id, None)
//!     .with_custodians(Some("Alice"), Some("Bob"));
//! inventory.append_movement(asset.id, transfer, actor).unwrap();
//!
//! // Keyboard broke
//! let repair = MaintenanceRequest::new(
//!     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//!     "pemeriksaan",
//!     "keyboard tidak berfungsi",
//!     "Budi",
//!     AssetCondition::LightlyDamaged,
//! );
//! let record = inventory.append_maintenance(asset.id, repair, actor).unwrap();
//! assert_eq!(record.condition_before, AssetCondition::Good);
//!
//! let current = inventory.asset(asset.id).unwrap();
//! assert_eq!(current.location_id, Some(office.id));
//! assert_eq!(current.custodian, "Bob");
//! assert_eq!(current.condition, AssetCondition::LightlyDamaged);
//! assert_eq!(inventory.movements(asset.id, HistoryOrder::Chronological).unwrap().len(), 1);
//! ```
//!
//! ## Thread Safety
//!
//! Appends to the same asset are serialized on that asset's record and
//! checked against the snapshot version they validated; the loser of a race
//! gets [`InventoryError::StaleState`]. Appends to different assets run in
//! parallel.

pub mod asset;
mod base;
pub mod config;
pub mod error;
mod history;
mod index;
mod inventory;
mod ledger;
pub mod maintenance;
pub mod movement;
pub mod reference;
pub mod report;
pub mod validator;

pub use asset::{Asset, AssetCondition, AssetUpdate, NewAsset, Specification};
pub use base::{AssetId, CategoryId, LocationId, MaintenanceId, MovementId, RoomId, UserId};
pub use config::InventoryConfig;
pub use error::InventoryError;
pub use history::{History, HistoryIter, HistoryOrder};
pub use inventory::Inventory;
pub use maintenance::{MaintenanceRecord, MaintenanceRequest};
pub use movement::{AssetMovement, MovementKind, MovementRequest};
pub use reference::{
    AssetCategory, Catalog, CategoryUpdate, Location, LocationUpdate, NewCategory, NewLocation,
    NewRoom, Room, RoomUpdate,
};
pub use report::{LocationSummary, MovementReport};
