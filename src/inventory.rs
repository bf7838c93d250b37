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

//! The inventory engine: identity registry, movement and maintenance ledgers.
//!
//! Every ledger append runs the same unit of work:
//!
//! 1. load the asset snapshot (inactive assets are not found),
//! 2. validate the request against it with the shared [`validator`] rules,
//! 3. commit the ledger row and the snapshot update in one critical section,
//!    provided the snapshot version is still the one validated against.
//!
//! A request that loses the race in step 3 fails with
//! [`InventoryError::StaleState`] and leaves no trace; the caller re-reads
//! the asset and decides whether to resubmit. Operations on different assets
//! never contend.

use crate::asset::{Asset, AssetUpdate, NewAsset};
use crate::base::{AssetId, MaintenanceId, MovementId, UserId};
use crate::config::InventoryConfig;
use crate::error::InventoryError;
use crate::history::{History, HistoryOrder};
use crate::index::{Sequence, UniqueIndex};
use crate::ledger::AssetLedger;
use crate::maintenance::{MaintenanceRecord, MaintenanceRequest};
use crate::movement::{AssetMovement, MovementRequest};
use crate::reference::Catalog;
use crate::report::{self, LocationSummary, MovementReport};
use crate::validator;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const IDENTIFIER_MAX: usize = 50;
const NAME_MAX: usize = 200;
const BRAND_MAX: usize = 100;
const PERSON_MAX: usize = 100;
const ASSET_NOTES_MAX: usize = 1000;
const MOVEMENT_NOTES_MAX: usize = 500;
const REFERENCE_MAX: usize = 100;
const MAINTENANCE_KIND_MAX: usize = 100;
const MAINTENANCE_DESCRIPTION_MAX: usize = 1000;

pub struct Inventory {
    config: InventoryConfig,
    catalog: Catalog,
    /// Per-asset snapshot plus ledgers, indexed by asset ID.
    assets: DashMap<AssetId, Arc<AssetLedger>>,
    codes: UniqueIndex,
    barcodes: UniqueIndex,
    asset_numbers: UniqueIndex,
    asset_ids: Sequence,
    movement_ids: Sequence,
    maintenance_ids: Sequence,
}

impl Inventory {
    /// Creates an empty inventory with the default policy.
    pub fn new() -> Self {
        Self::with_config(InventoryConfig::default())
    }

    pub fn with_config(config: InventoryConfig) -> Self {
        Inventory {
            config,
            catalog: Catalog::new(),
            assets: DashMap::new(),
            codes: UniqueIndex::new("kode", "asset"),
            barcodes: UniqueIndex::new("barcode", "asset"),
            asset_numbers: UniqueIndex::new("nomor_aset", "asset"),
            asset_ids: Sequence::new(),
            movement_ids: Sequence::new(),
            maintenance_ids: Sequence::new(),
        }
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Reference data (locations, rooms, categories).
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // === Identity registry ===

    /// Registers an asset at its initial location, condition and custodian.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::Validation`] - Malformed field, or room outside the location.
    /// - [`InventoryError::NotFound`] - Location, room or category does not exist.
    /// - [`InventoryError::Conflict`] - `kode`, `barcode` or `nomor_aset` already used.
    #[instrument(skip(self, new), fields(kode = %new.code))]
    pub fn create_asset(&self, new: NewAsset, actor: UserId) -> Result<Asset, InventoryError> {
        self.validate_new_asset(&new)
            .inspect_err(|error| debug!(%error, "asset rejected"))?;

        let id = AssetId(self.asset_ids.next("assets")?);
        let mut identifiers = vec![
            (&self.codes, new.code.clone()),
            (&self.asset_numbers, new.asset_number.clone()),
        ];
        if let Some(barcode) = &new.barcode {
            identifiers.push((&self.barcodes, barcode.clone()));
        }
        self.claim_all(id, &identifiers)?;

        let asset = Asset::from_new(id, new, actor, Utc::now());
        self.assets
            .insert(id, Arc::new(AssetLedger::new(asset.clone())));
        info!(
            event = "asset.created",
            asset_id = %id,
            kode = %asset.code,
            location_id = ?asset.location_id,
            room_id = ?asset.room_id,
        );
        Ok(asset)
    }

    /// Edits descriptive and financial columns.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::InvalidOperation`] - Update touches `location_id`, `room_id`,
    ///   `kondisi_barang` or `pemegang_barang`; those change only through the ledgers.
    /// - [`InventoryError::NotFound`] - Asset absent or inactive, or category absent.
    /// - [`InventoryError::Conflict`] - New identifier already used.
    /// - [`InventoryError::StaleState`] - `expected_version` is out of date, or the
    ///   asset changed while the update was validated.
    #[instrument(skip(self, update), fields(asset_id = %id))]
    pub fn update_asset(
        &self,
        id: AssetId,
        update: AssetUpdate,
        actor: UserId,
    ) -> Result<Asset, InventoryError> {
        validator::check_ledger_owned(&update)
            .inspect_err(|error| debug!(%error, "asset update rejected"))?;
        let (ledger, current) = self.active_snapshot(id)?;
        validator::check_version(&current, update.expected_version)?;
        self.validate_asset_update(&update)
            .inspect_err(|error| debug!(%error, "asset update rejected"))?;

        // Identifier ownership changes under the asset's lock, so it always
        // matches the snapshot that commits (or stays as it was).
        let result = ledger.modify(Some(current.version), actor, |asset| {
            self.swap_identifiers(asset, &update)?;
            asset.apply(update);
            Ok(true)
        });
        match result {
            Ok(asset) => {
                info!(event = "asset.updated", asset_id = %id, version = asset.version);
                Ok(asset)
            }
            Err(error) if error.is_stale() => {
                warn!(asset_id = %id, %error, "asset update lost a concurrent write");
                Err(error)
            }
            Err(error) => {
                debug!(asset_id = %id, %error, "asset update rejected");
                Err(error)
            }
        }
    }

    /// Moves the unique identifiers of `asset` to the values in `update`.
    ///
    /// Claims every new value first; on conflict only the claims made here
    /// are released and the old values stay reserved. Must run under the
    /// asset's lock.
    fn swap_identifiers(&self, asset: &Asset, update: &AssetUpdate) -> Result<(), InventoryError> {
        let mut changes: Vec<(&UniqueIndex, Option<&str>, Option<&str>)> = Vec::new();
        if let Some(code) = &update.code {
            if *code != asset.code {
                changes.push((&self.codes, Some(code.as_str()), Some(asset.code.as_str())));
            }
        }
        if let Some(barcode) = &update.barcode {
            if *barcode != asset.barcode {
                changes.push((&self.barcodes, barcode.as_deref(), asset.barcode.as_deref()));
            }
        }
        if let Some(asset_number) = &update.asset_number {
            if *asset_number != asset.asset_number {
                changes.push((
                    &self.asset_numbers,
                    Some(asset_number.as_str()),
                    Some(asset.asset_number.as_str()),
                ));
            }
        }

        let claims: Vec<(&UniqueIndex, String)> = changes
            .iter()
            .filter_map(|&(index, new, _)| new.map(|value| (index, value.to_owned())))
            .collect();
        self.claim_all(asset.id, &claims)?;

        for (index, _, old) in changes {
            if let Some(old) = old {
                index.release(old, asset.id.get());
            }
        }
        Ok(())
    }

    /// Soft-deletes an asset. Idempotent; history is untouched and the
    /// asset's identifiers stay reserved.
    #[instrument(skip(self), fields(asset_id = %id))]
    pub fn deactivate_asset(&self, id: AssetId, actor: UserId) -> Result<Asset, InventoryError> {
        self.set_active(id, actor, false)
    }

    /// Restores a soft-deleted asset. Idempotent.
    #[instrument(skip(self), fields(asset_id = %id))]
    pub fn reactivate_asset(&self, id: AssetId, actor: UserId) -> Result<Asset, InventoryError> {
        self.set_active(id, actor, true)
    }

    fn set_active(
        &self,
        id: AssetId,
        actor: UserId,
        active: bool,
    ) -> Result<Asset, InventoryError> {
        let ledger = self.ledger(id)?;
        let asset = ledger.modify(None, actor, |asset| {
            if asset.is_active == active {
                return Ok(false);
            }
            asset.is_active = active;
            Ok(true)
        })?;
        info!(event = "asset.active_changed", asset_id = %id, is_active = active);
        Ok(asset)
    }

    /// Current snapshot of an asset, active or not.
    pub fn asset(&self, id: AssetId) -> Option<Asset> {
        self.assets.get(&id).map(|ledger| ledger.snapshot())
    }

    pub fn asset_by_code(&self, code: &str) -> Option<Asset> {
        self.codes
            .owner(code)
            .and_then(|id| self.asset(AssetId(id)))
    }

    /// Lookup used by barcode scanners.
    pub fn asset_by_barcode(&self, barcode: &str) -> Option<Asset> {
        self.barcodes
            .owner(barcode)
            .and_then(|id| self.asset(AssetId(id)))
    }

    /// Asset snapshots ordered by id. Inactive assets only on request.
    pub fn assets(&self, include_inactive: bool) -> Vec<Asset> {
        let mut assets: Vec<Asset> = self
            .ledgers()
            .iter()
            .map(|ledger| ledger.snapshot())
            .filter(|asset| include_inactive || asset.is_active)
            .collect();
        assets.sort_by_key(|asset| asset.id);
        assets
    }

    // === Movement ledger ===

    /// Validates a movement against the asset snapshot and commits it,
    /// moving the asset to the movement's destination.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::NotFound`] - Asset absent or inactive, or a referenced
    ///   location/room does not exist.
    /// - [`InventoryError::Validation`] - From/to pattern does not fit the kind, a
    ///   transfer goes nowhere, or a room is outside its claimed location.
    /// - [`InventoryError::StaleState`] - Claimed origin or custodian differs from the
    ///   snapshot, or another write committed first.
    #[instrument(skip(self, request), fields(kind = %request.kind))]
    pub fn append_movement(
        &self,
        asset_id: AssetId,
        request: MovementRequest,
        actor: UserId,
    ) -> Result<AssetMovement, InventoryError> {
        let (ledger, current) = self.active_snapshot(asset_id)?;
        self.validate_movement(&current, &request)
            .inspect_err(|error| debug!(%asset_id, %error, "movement rejected"))?;

        let id = MovementId(self.movement_ids.next("asset_movements")?);
        let movement = ledger
            .commit_movement(current.version, actor, |now| {
                AssetMovement::from_request(id, asset_id, request, actor, now)
            })
            .inspect_err(|error| warn!(%asset_id, %error, "movement lost a concurrent write"))?;

        info!(
            event = "movement.appended",
            %asset_id,
            movement_id = %movement.id,
            kind = %movement.kind,
            to_location_id = ?movement.to_location_id,
            to_room_id = ?movement.to_room_id,
        );
        Ok(movement)
    }

    fn validate_movement(
        &self,
        current: &Asset,
        request: &MovementRequest,
    ) -> Result<(), InventoryError> {
        validator::check_movement_shape(request)?;
        validator::check_version(current, request.expected_version)?;
        validator::check_origin(current, request)?;

        if let Some(from) = request.from_location_id {
            validator::check_placement(&self.catalog, from, request.from_room_id, "from_room_id")?;
        }
        if let Some(to) = request.to_location_id {
            validator::check_placement(&self.catalog, to, request.to_room_id, "to_room_id")?;
        }

        if let Some(custodian) = &request.custodian_new {
            validator::require_text("pemegang_baru", custodian, PERSON_MAX)?;
        }
        if let Some(custodian) = &request.custodian_old {
            validator::limit_text("pemegang_lama", custodian, PERSON_MAX)?;
        }
        validator::limit_text("keterangan", &request.notes, MOVEMENT_NOTES_MAX)?;
        if let Some(reference) = &request.reference_doc {
            validator::limit_text("dokumen_referensi", reference, REFERENCE_MAX)?;
        }
        Ok(())
    }

    /// Movement history of one asset (active or not).
    pub fn movements(
        &self,
        asset_id: AssetId,
        order: HistoryOrder,
    ) -> Result<History<AssetMovement>, InventoryError> {
        let ledger = self.ledger(asset_id)?;
        let len = ledger.movement_count();
        Ok(History::new(ledger, len, order, AssetLedger::movement_at))
    }

    // === Maintenance ledger ===

    /// Records a maintenance event and sets the asset's condition.
    ///
    /// `kondisi_sebelum` is the snapshot's condition at commit time; a
    /// condition reported by the caller is ignored.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::NotFound`] - Asset absent or inactive.
    /// - [`InventoryError::Validation`] - Negative or malformed cost, blank text.
    /// - [`InventoryError::StaleState`] - `expected_version` is out of date, or
    ///   another write committed first.
    #[instrument(skip(self, request), fields(condition_after = %request.condition_after))]
    pub fn append_maintenance(
        &self,
        asset_id: AssetId,
        request: MaintenanceRequest,
        actor: UserId,
    ) -> Result<MaintenanceRecord, InventoryError> {
        let (ledger, current) = self.active_snapshot(asset_id)?;
        validate_maintenance(&current, &request)
            .inspect_err(|error| debug!(%asset_id, %error, "maintenance rejected"))?;

        if let Some(reported) = request.reported_condition_before {
            if reported != current.condition {
                debug!(
                    %asset_id,
                    %reported,
                    actual = %current.condition,
                    "ignoring reported condition before maintenance"
                );
            }
        }

        let id = MaintenanceId(self.maintenance_ids.next("maintenance_records")?);
        let record = ledger
            .commit_maintenance(current.version, actor, |before, now| {
                MaintenanceRecord::from_request(id, asset_id, request, before, actor, now)
            })
            .inspect_err(|error| warn!(%asset_id, %error, "maintenance lost a concurrent write"))?;

        info!(
            event = "maintenance.appended",
            %asset_id,
            maintenance_id = %record.id,
            before = %record.condition_before,
            after = %record.condition_after,
        );
        Ok(record)
    }

    /// Maintenance history of one asset (active or not).
    pub fn maintenance(
        &self,
        asset_id: AssetId,
        order: HistoryOrder,
    ) -> Result<History<MaintenanceRecord>, InventoryError> {
        let ledger = self.ledger(asset_id)?;
        let len = ledger.maintenance_count();
        Ok(History::new(ledger, len, order, AssetLedger::maintenance_at))
    }

    // === Reports ===

    /// Active assets per location, grouped by condition.
    pub fn location_summary(&self) -> Vec<LocationSummary> {
        let snapshots = self.ledgers().into_iter().map(|ledger| ledger.snapshot());
        report::summarize_locations(self.catalog.locations(), snapshots)
    }

    /// Movement counts for the inclusive period `start..=end`.
    pub fn movement_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MovementReport, InventoryError> {
        if start > end {
            return Err(InventoryError::validation(
                "period_end",
                "must not precede period_start",
            ));
        }
        let movements = self
            .ledgers()
            .into_iter()
            .flat_map(|ledger| ledger.movements());
        Ok(report::summarize_movements(start, end, movements))
    }

    // === Helpers ===

    fn ledger(&self, id: AssetId) -> Result<Arc<AssetLedger>, InventoryError> {
        self.assets
            .get(&id)
            .map(|ledger| Arc::clone(ledger.value()))
            .ok_or_else(|| InventoryError::not_found("asset", id.get()))
    }

    fn active_snapshot(&self, id: AssetId) -> Result<(Arc<AssetLedger>, Asset), InventoryError> {
        let ledger = self.ledger(id)?;
        let snapshot = ledger.snapshot();
        validator::check_active(&snapshot)?;
        Ok((ledger, snapshot))
    }

    /// Clones the ledger handles so no map shard stays locked while a
    /// ledger mutex is taken.
    fn ledgers(&self) -> Vec<Arc<AssetLedger>> {
        self.assets
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Claims every identifier for `id`, or none of them.
    ///
    /// On conflict only values this call inserted are released; values `id`
    /// already held stay reserved.
    fn claim_all(
        &self,
        id: AssetId,
        identifiers: &[(&UniqueIndex, String)],
    ) -> Result<(), InventoryError> {
        let mut fresh = Vec::with_capacity(identifiers.len());
        for (index, value) in identifiers {
            match index.claim(value, id.get()) {
                Ok(true) => fresh.push((*index, value.clone())),
                Ok(false) => {}
                Err(error) => {
                    release_all(id, &fresh);
                    return Err(error);
                }
            }
        }
        Ok(())
    }

    fn validate_new_asset(&self, new: &NewAsset) -> Result<(), InventoryError> {
        let today = Utc::now().date_naive();
        validator::require_text("kode", &new.code, IDENTIFIER_MAX)?;
        if let Some(barcode) = &new.barcode {
            validator::require_text("barcode", barcode, IDENTIFIER_MAX)?;
        }
        validator::require_text("nomor_aset", &new.asset_number, IDENTIFIER_MAX)?;
        validator::require_text("nama_barang", &new.name, NAME_MAX)?;
        validator::require_text("merk_tipe", &new.brand_model, BRAND_MAX)?;
        validator::require_text("kode_barang", &new.item_code, IDENTIFIER_MAX)?;
        validator::require_text("pemegang_barang", &new.custodian, PERSON_MAX)?;
        validator::limit_text("keterangan", &new.notes, ASSET_NOTES_MAX)?;
        validator::check_money("rupiah_satuan", new.unit_value)?;
        validator::check_fiscal_year(new.fiscal_year, today, &self.config)?;
        validator::check_acquisition_date(new.acquired_on, today, &self.config)?;

        validator::check_placement(&self.catalog, new.location_id, new.room_id, "room_id")?;
        if let Some(category) = new.category_id {
            validator::category_exists(&self.catalog, category)?;
        }

        self.codes.check(&new.code, None)?;
        if let Some(barcode) = &new.barcode {
            self.barcodes.check(barcode, None)?;
        }
        self.asset_numbers.check(&new.asset_number, None)?;
        Ok(())
    }

    fn validate_asset_update(&self, update: &AssetUpdate) -> Result<(), InventoryError> {
        let today = Utc::now().date_naive();
        if let Some(code) = &update.code {
            validator::require_text("kode", code, IDENTIFIER_MAX)?;
        }
        if let Some(Some(barcode)) = &update.barcode {
            validator::require_text("barcode", barcode, IDENTIFIER_MAX)?;
        }
        if let Some(asset_number) = &update.asset_number {
            validator::require_text("nomor_aset", asset_number, IDENTIFIER_MAX)?;
        }
        if let Some(name) = &update.name {
            validator::require_text("nama_barang", name, NAME_MAX)?;
        }
        if let Some(brand_model) = &update.brand_model {
            validator::require_text("merk_tipe", brand_model, BRAND_MAX)?;
        }
        if let Some(item_code) = &update.item_code {
            validator::require_text("kode_barang", item_code, IDENTIFIER_MAX)?;
        }
        if let Some(notes) = &update.notes {
            validator::limit_text("keterangan", notes, ASSET_NOTES_MAX)?;
        }
        if let Some(unit_value) = update.unit_value {
            validator::check_money("rupiah_satuan", unit_value)?;
        }
        if let Some(fiscal_year) = update.fiscal_year {
            validator::check_fiscal_year(fiscal_year, today, &self.config)?;
        }
        if let Some(acquired_on) = update.acquired_on {
            validator::check_acquisition_date(acquired_on, today, &self.config)?;
        }
        if let Some(Some(category)) = update.category_id {
            validator::category_exists(&self.catalog, category)?;
        }
        Ok(())
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

fn release_all(id: AssetId, identifiers: &[(&UniqueIndex, String)]) {
    for (index, value) in identifiers {
        index.release(value, id.get());
    }
}

fn validate_maintenance(
    current: &Asset,
    request: &MaintenanceRequest,
) -> Result<(), InventoryError> {
    validator::check_version(current, request.expected_version)?;
    validator::require_text("jenis_maintenance", &request.kind, MAINTENANCE_KIND_MAX)?;
    validator::require_text(
        "deskripsi",
        &request.description,
        MAINTENANCE_DESCRIPTION_MAX,
    )?;
    validator::require_text("teknisi", &request.technician, PERSON_MAX)?;
    if let Some(cost) = request.cost {
        validator::check_money("biaya", cost)?;
    }
    Ok(())
}
