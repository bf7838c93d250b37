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

//! Reference data: locations, rooms and asset categories.
//!
//! These are static lookup rows the registry and both ledgers point at by id.
//! Rows are soft-deleted only; an inactive row stays a valid reference so that
//! historical ledger entries never dangle.

use crate::base::{CategoryId, LocationId, RoomId};
use crate::error::InventoryError;
use crate::index::{Sequence, UniqueIndex};
use crate::validator;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

const CODE_MAX: usize = 20;
const NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;

/// A site, building or warehouse holding assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    #[serde(rename = "kode_lokasi")]
    pub code: String,
    #[serde(rename = "nama_lokasi")]
    pub name: String,
    #[serde(rename = "deskripsi")]
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLocation {
    #[serde(rename = "kode_lokasi")]
    pub code: String,
    #[serde(rename = "nama_lokasi")]
    pub name: String,
    #[serde(rename = "deskripsi", default)]
    pub description: String,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationUpdate {
    #[serde(rename = "kode_lokasi")]
    pub code: Option<String>,
    #[serde(rename = "nama_lokasi")]
    pub name: Option<String>,
    #[serde(rename = "deskripsi")]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// A room inside exactly one location. The owning location is fixed at
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    #[serde(rename = "nama_ruang")]
    pub name: String,
    pub location_id: LocationId,
    #[serde(rename = "deskripsi")]
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoom {
    #[serde(rename = "nama_ruang")]
    pub name: String,
    pub location_id: LocationId,
    #[serde(rename = "deskripsi", default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomUpdate {
    #[serde(rename = "nama_ruang")]
    pub name: Option<String>,
    #[serde(rename = "deskripsi")]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Optional classification for assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCategory {
    pub id: CategoryId,
    #[serde(rename = "kode_kategori")]
    pub code: String,
    #[serde(rename = "nama_kategori")]
    pub name: String,
    #[serde(rename = "deskripsi")]
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    #[serde(rename = "kode_kategori")]
    pub code: String,
    #[serde(rename = "nama_kategori")]
    pub name: String,
    #[serde(rename = "deskripsi", default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryUpdate {
    #[serde(rename = "kode_kategori")]
    pub code: Option<String>,
    #[serde(rename = "nama_kategori")]
    pub name: Option<String>,
    #[serde(rename = "deskripsi")]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Reference data tables.
#[derive(Debug)]
pub struct Catalog {
    locations: DashMap<LocationId, Location>,
    location_codes: UniqueIndex,
    location_ids: Sequence,
    rooms: DashMap<RoomId, Room>,
    room_ids: Sequence,
    categories: DashMap<CategoryId, AssetCategory>,
    category_codes: UniqueIndex,
    category_ids: Sequence,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            locations: DashMap::new(),
            location_codes: UniqueIndex::new("kode_lokasi", "location"),
            location_ids: Sequence::new(),
            rooms: DashMap::new(),
            room_ids: Sequence::new(),
            categories: DashMap::new(),
            category_codes: UniqueIndex::new("kode_kategori", "category"),
            category_ids: Sequence::new(),
        }
    }

    // === Locations ===

    /// # Errors
    ///
    /// - [`InventoryError::Validation`] - Blank or over-long code/name.
    /// - [`InventoryError::Conflict`] - `kode_lokasi` already used.
    pub fn create_location(&self, new: NewLocation) -> Result<Location, InventoryError> {
        validator::require_text("kode_lokasi", &new.code, CODE_MAX)?;
        validator::require_text("nama_lokasi", &new.name, NAME_MAX)?;
        validator::limit_text("deskripsi", &new.description, DESCRIPTION_MAX)?;
        self.location_codes.check(&new.code, None)?;

        let id = LocationId(self.location_ids.next("locations")?);
        self.location_codes.claim(&new.code, id.get())?;

        let location = Location {
            id,
            code: new.code,
            name: new.name,
            description: new.description,
            is_active: true,
            created_at: Utc::now(),
        };
        self.locations.insert(id, location.clone());
        info!(event = "location.created", location_id = %id, code = %location.code);
        Ok(location)
    }

    pub fn update_location(
        &self,
        id: LocationId,
        update: LocationUpdate,
    ) -> Result<Location, InventoryError> {
        if let Some(code) = &update.code {
            validator::require_text("kode_lokasi", code, CODE_MAX)?;
        }
        if let Some(name) = &update.name {
            validator::require_text("nama_lokasi", name, NAME_MAX)?;
        }
        if let Some(description) = &update.description {
            validator::limit_text("deskripsi", description, DESCRIPTION_MAX)?;
        }

        let mut location = self
            .locations
            .get_mut(&id)
            .ok_or_else(|| InventoryError::not_found("location", id.get()))?;

        if let Some(code) = update.code {
            if code != location.code {
                self.location_codes.claim(&code, id.get())?;
                self.location_codes.release(&location.code, id.get());
                location.code = code;
            }
        }
        if let Some(name) = update.name {
            location.name = name;
        }
        if let Some(description) = update.description {
            location.description = description;
        }
        if let Some(is_active) = update.is_active {
            location.is_active = is_active;
        }
        Ok(location.clone())
    }

    /// Soft-deletes a location. Idempotent.
    pub fn deactivate_location(&self, id: LocationId) -> Result<Location, InventoryError> {
        self.update_location(
            id,
            LocationUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
    }

    pub fn location(&self, id: LocationId) -> Option<Location> {
        self.locations.get(&id).map(|location| location.clone())
    }

    pub fn location_by_code(&self, code: &str) -> Option<Location> {
        self.location_codes
            .owner(code)
            .and_then(|id| self.location(LocationId(id)))
    }

    /// All locations (active and inactive), ordered by id.
    pub fn locations(&self) -> Vec<Location> {
        let mut locations: Vec<Location> =
            self.locations.iter().map(|entry| entry.value().clone()).collect();
        locations.sort_by_key(|location| location.id);
        locations
    }

    // === Rooms ===

    /// # Errors
    ///
    /// - [`InventoryError::NotFound`] - `location_id` does not exist.
    pub fn create_room(&self, new: NewRoom) -> Result<Room, InventoryError> {
        validator::require_text("nama_ruang", &new.name, NAME_MAX)?;
        validator::limit_text("deskripsi", &new.description, DESCRIPTION_MAX)?;
        validator::location_exists(self, new.location_id)?;

        let id = RoomId(self.room_ids.next("rooms")?);
        let room = Room {
            id,
            name: new.name,
            location_id: new.location_id,
            description: new.description,
            is_active: true,
            created_at: Utc::now(),
        };
        self.rooms.insert(id, room.clone());
        info!(event = "room.created", room_id = %id, location_id = %room.location_id);
        Ok(room)
    }

    /// Updates name, description or active flag. A room cannot change
    /// location: assets and ledger rows referencing it rely on the pairing.
    pub fn update_room(&self, id: RoomId, update: RoomUpdate) -> Result<Room, InventoryError> {
        if let Some(name) = &update.name {
            validator::require_text("nama_ruang", name, NAME_MAX)?;
        }
        if let Some(description) = &update.description {
            validator::limit_text("deskripsi", description, DESCRIPTION_MAX)?;
        }

        let mut room = self
            .rooms
            .get_mut(&id)
            .ok_or_else(|| InventoryError::not_found("room", id.get()))?;
        if let Some(name) = update.name {
            room.name = name;
        }
        if let Some(description) = update.description {
            room.description = description;
        }
        if let Some(is_active) = update.is_active {
            room.is_active = is_active;
        }
        Ok(room.clone())
    }

    /// Soft-deletes a room. Idempotent.
    pub fn deactivate_room(&self, id: RoomId) -> Result<Room, InventoryError> {
        self.update_room(
            id,
            RoomUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
    }

    pub fn room(&self, id: RoomId) -> Option<Room> {
        self.rooms.get(&id).map(|room| room.clone())
    }

    /// All rooms, ordered by id.
    pub fn rooms(&self) -> Vec<Room> {
        let mut rooms: Vec<Room> = self.rooms.iter().map(|entry| entry.value().clone()).collect();
        rooms.sort_by_key(|room| room.id);
        rooms
    }

    /// Rooms belonging to `location`, ordered by id.
    pub fn rooms_in(&self, location: LocationId) -> Vec<Room> {
        let mut rooms = self.rooms();
        rooms.retain(|room| room.location_id == location);
        rooms
    }

    // === Categories ===

    pub fn create_category(&self, new: NewCategory) -> Result<AssetCategory, InventoryError> {
        validator::require_text("kode_kategori", &new.code, CODE_MAX)?;
        validator::require_text("nama_kategori", &new.name, NAME_MAX)?;
        validator::limit_text("deskripsi", &new.description, DESCRIPTION_MAX)?;
        self.category_codes.check(&new.code, None)?;

        let id = CategoryId(self.category_ids.next("asset_categories")?);
        self.category_codes.claim(&new.code, id.get())?;

        let category = AssetCategory {
            id,
            code: new.code,
            name: new.name,
            description: new.description,
            is_active: true,
            created_at: Utc::now(),
        };
        self.categories.insert(id, category.clone());
        info!(event = "category.created", category_id = %id, code = %category.code);
        Ok(category)
    }

    pub fn update_category(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<AssetCategory, InventoryError> {
        if let Some(code) = &update.code {
            validator::require_text("kode_kategori", code, CODE_MAX)?;
        }
        if let Some(name) = &update.name {
            validator::require_text("nama_kategori", name, NAME_MAX)?;
        }
        if let Some(description) = &update.description {
            validator::limit_text("deskripsi", description, DESCRIPTION_MAX)?;
        }

        let mut category = self
            .categories
            .get_mut(&id)
            .ok_or_else(|| InventoryError::not_found("category", id.get()))?;

        if let Some(code) = update.code {
            if code != category.code {
                self.category_codes.claim(&code, id.get())?;
                self.category_codes.release(&category.code, id.get());
                category.code = code;
            }
        }
        if let Some(name) = update.name {
            category.name = name;
        }
        if let Some(description) = update.description {
            category.description = description;
        }
        if let Some(is_active) = update.is_active {
            category.is_active = is_active;
        }
        Ok(category.clone())
    }

    /// Soft-deletes a category. Idempotent.
    pub fn deactivate_category(&self, id: CategoryId) -> Result<AssetCategory, InventoryError> {
        self.update_category(
            id,
            CategoryUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
    }

    pub fn category(&self, id: CategoryId) -> Option<AssetCategory> {
        self.categories.get(&id).map(|category| category.clone())
    }

    pub fn category_by_code(&self, code: &str) -> Option<AssetCategory> {
        self.category_codes
            .owner(code)
            .and_then(|id| self.category(CategoryId(id)))
    }

    /// All categories, ordered by id.
    pub fn categories(&self) -> Vec<AssetCategory> {
        let mut categories: Vec<AssetCategory> = self
            .categories
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        categories.sort_by_key(|category| category.id);
        categories
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
