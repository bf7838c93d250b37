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

//! Asset identity records and their condition.
//!
//! An [`Asset`] is the canonical record per physical item. Its location,
//! room, condition and custodian form the current-state snapshot; those four
//! columns are written only by the movement and maintenance ledgers.
//!
//! # Example
//!
//! ```
//! use inventory_ledger_rs::AssetCondition;
//!
//! assert_eq!(AssetCondition::default(), AssetCondition::Good);
//! assert_eq!(AssetCondition::LightlyDamaged.to_string(), "rusak_ringan");
//! ```

use crate::base::{AssetId, CategoryId, LocationId, RoomId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-form technical specification, stored as an opaque document.
pub type Specification = serde_json::Map<String, serde_json::Value>;

/// Physical condition of an asset.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AssetCondition {
    #[default]
    #[serde(rename = "baik")]
    Good,
    #[serde(rename = "rusak_ringan")]
    LightlyDamaged,
    #[serde(rename = "rusak_berat")]
    HeavilyDamaged,
    #[serde(rename = "hilang")]
    Lost,
}

impl AssetCondition {
    pub const ALL: [AssetCondition; 4] = [
        AssetCondition::Good,
        AssetCondition::LightlyDamaged,
        AssetCondition::HeavilyDamaged,
        AssetCondition::Lost,
    ];

    /// Persisted column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "baik",
            Self::LightlyDamaged => "rusak_ringan",
            Self::HeavilyDamaged => "rusak_berat",
            Self::Lost => "hilang",
        }
    }
}

impl fmt::Display for AssetCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current-state record of one physical item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,

    // Identification (each unique across active and inactive assets)
    #[serde(rename = "kode")]
    pub code: String,
    pub barcode: Option<String>,
    #[serde(rename = "nomor_aset")]
    pub asset_number: String,

    #[serde(rename = "nama_barang")]
    pub name: String,
    #[serde(rename = "merk_tipe")]
    pub brand_model: String,
    #[serde(rename = "kode_barang")]
    pub item_code: String,

    #[serde(rename = "tahun_anggaran")]
    pub fiscal_year: i32,
    #[serde(rename = "rupiah_satuan")]
    pub unit_value: Decimal,
    #[serde(rename = "tanggal_perolehan")]
    pub acquired_on: NaiveDate,

    // Snapshot owned by the ledgers. `location_id` is empty only after an
    // outbound movement took the asset out of the inventory.
    pub location_id: Option<LocationId>,
    pub room_id: Option<RoomId>,
    #[serde(rename = "kondisi_barang")]
    pub condition: AssetCondition,
    #[serde(rename = "pemegang_barang")]
    pub custodian: String,

    pub category_id: Option<CategoryId>,
    #[serde(rename = "spesifikasi")]
    pub specification: Specification,
    #[serde(rename = "keterangan")]
    pub notes: String,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: UserId,
    pub updated_by: UserId,
    /// Bumped on every committed change; used for optimistic concurrency.
    pub version: u64,
}

impl Asset {
    pub(crate) fn from_new(
        id: AssetId,
        new: NewAsset,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code: new.code,
            barcode: new.barcode,
            asset_number: new.asset_number,
            name: new.name,
            brand_model: new.brand_model,
            item_code: new.item_code,
            fiscal_year: new.fiscal_year,
            unit_value: new.unit_value,
            acquired_on: new.acquired_on,
            location_id: Some(new.location_id),
            room_id: new.room_id,
            condition: new.condition,
            custodian: new.custodian,
            category_id: new.category_id,
            specification: new.specification,
            notes: new.notes,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: actor,
            updated_by: actor,
            version: 1,
        }
    }

    /// Applies the descriptive and financial columns of `update`.
    ///
    /// Ledger-owned columns are rejected before this point.
    pub(crate) fn apply(&mut self, update: AssetUpdate) {
        if let Some(code) = update.code {
            self.code = code;
        }
        if let Some(barcode) = update.barcode {
            self.barcode = barcode;
        }
        if let Some(asset_number) = update.asset_number {
            self.asset_number = asset_number;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(brand_model) = update.brand_model {
            self.brand_model = brand_model;
        }
        if let Some(item_code) = update.item_code {
            self.item_code = item_code;
        }
        if let Some(fiscal_year) = update.fiscal_year {
            self.fiscal_year = fiscal_year;
        }
        if let Some(unit_value) = update.unit_value {
            self.unit_value = unit_value;
        }
        if let Some(acquired_on) = update.acquired_on {
            self.acquired_on = acquired_on;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(specification) = update.specification {
            self.specification = specification;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
    }
}

/// Fields for registering a new asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAsset {
    #[serde(rename = "kode")]
    pub code: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(rename = "nomor_aset")]
    pub asset_number: String,
    #[serde(rename = "nama_barang")]
    pub name: String,
    #[serde(rename = "merk_tipe")]
    pub brand_model: String,
    #[serde(rename = "kode_barang")]
    pub item_code: String,
    #[serde(rename = "tahun_anggaran")]
    pub fiscal_year: i32,
    #[serde(rename = "rupiah_satuan")]
    pub unit_value: Decimal,
    #[serde(rename = "tanggal_perolehan")]
    pub acquired_on: NaiveDate,
    pub location_id: LocationId,
    #[serde(default)]
    pub room_id: Option<RoomId>,
    #[serde(rename = "pemegang_barang")]
    pub custodian: String,
    #[serde(rename = "kondisi_barang", default)]
    pub condition: AssetCondition,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(rename = "keterangan", default)]
    pub notes: String,
    #[serde(rename = "spesifikasi", default)]
    pub specification: Specification,
}

/// Partial update of an asset. `None` leaves a column unchanged; for the
/// nullable columns `Some(None)` clears the value.
///
/// `location_id`, `room_id`, `kondisi_barang` and `pemegang_barang` are
/// accepted by the type so a request carrying them can be rejected with
/// [`InventoryError::InvalidOperation`](crate::InventoryError::InvalidOperation)
/// instead of being silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetUpdate {
    #[serde(rename = "kode")]
    pub code: Option<String>,
    pub barcode: Option<Option<String>>,
    #[serde(rename = "nomor_aset")]
    pub asset_number: Option<String>,
    #[serde(rename = "nama_barang")]
    pub name: Option<String>,
    #[serde(rename = "merk_tipe")]
    pub brand_model: Option<String>,
    #[serde(rename = "kode_barang")]
    pub item_code: Option<String>,
    #[serde(rename = "tahun_anggaran")]
    pub fiscal_year: Option<i32>,
    #[serde(rename = "rupiah_satuan")]
    pub unit_value: Option<Decimal>,
    #[serde(rename = "tanggal_perolehan")]
    pub acquired_on: Option<NaiveDate>,
    pub category_id: Option<Option<CategoryId>>,
    #[serde(rename = "spesifikasi")]
    pub specification: Option<Specification>,
    #[serde(rename = "keterangan")]
    pub notes: Option<String>,

    // Ledger-owned
    pub location_id: Option<LocationId>,
    pub room_id: Option<RoomId>,
    #[serde(rename = "kondisi_barang")]
    pub condition: Option<AssetCondition>,
    #[serde(rename = "pemegang_barang")]
    pub custodian: Option<String>,

    /// Snapshot version the caller last read.
    pub expected_version: Option<u64>,
}
