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

//! Maintenance ledger rows: condition-affecting service events.

use crate::asset::AssetCondition;
use crate::base::{AssetId, MaintenanceId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A proposed maintenance event.
///
/// The condition before the work is taken from the asset snapshot at commit
/// time. A caller may report what it believed that condition was; the report
/// is never recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    #[serde(rename = "tanggal_maintenance")]
    pub date: NaiveDate,
    #[serde(rename = "jenis_maintenance")]
    pub kind: String,
    #[serde(rename = "deskripsi")]
    pub description: String,
    #[serde(rename = "biaya", default)]
    pub cost: Option<Decimal>,
    #[serde(rename = "teknisi")]
    pub technician: String,
    #[serde(rename = "kondisi_sesudah")]
    pub condition_after: AssetCondition,
    #[serde(rename = "kondisi_sebelum", default)]
    pub reported_condition_before: Option<AssetCondition>,
    #[serde(default)]
    pub expected_version: Option<u64>,
}

impl MaintenanceRequest {
    pub fn new(
        date: NaiveDate,
        kind: impl Into<String>,
        description: impl Into<String>,
        technician: impl Into<String>,
        condition_after: AssetCondition,
    ) -> Self {
        Self {
            date,
            kind: kind.into(),
            description: description.into(),
            cost: None,
            technician: technician.into(),
            condition_after,
            reported_condition_before: None,
            expected_version: None,
        }
    }

    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn expecting(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }
}

/// A committed maintenance event. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: MaintenanceId,
    pub asset_id: AssetId,
    #[serde(rename = "tanggal_maintenance")]
    pub date: NaiveDate,
    #[serde(rename = "jenis_maintenance")]
    pub kind: String,
    #[serde(rename = "deskripsi")]
    pub description: String,
    #[serde(rename = "biaya")]
    pub cost: Option<Decimal>,
    #[serde(rename = "teknisi")]
    pub technician: String,
    #[serde(rename = "kondisi_sebelum")]
    pub condition_before: AssetCondition,
    #[serde(rename = "kondisi_sesudah")]
    pub condition_after: AssetCondition,
    pub created_at: DateTime<Utc>,
    pub created_by: UserId,
}

impl MaintenanceRecord {
    pub(crate) fn from_request(
        id: MaintenanceId,
        asset_id: AssetId,
        request: MaintenanceRequest,
        condition_before: AssetCondition,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            asset_id,
            date: request.date,
            kind: request.kind,
            description: request.description,
            cost: request.cost,
            technician: request.technician,
            condition_before,
            condition_after: request.condition_after,
            created_at: now,
            created_by: actor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn record_uses_supplied_before_condition_not_reported_one() {
        let mut request = MaintenanceRequest::new(
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            "servis",
            "ganti keyboard",
            "Budi",
            AssetCondition::Good,
        );
        request.reported_condition_before = Some(AssetCondition::Lost);

        let record = MaintenanceRecord::from_request(
            MaintenanceId(1),
            AssetId(1),
            request,
            AssetCondition::LightlyDamaged,
            UserId(1),
            Utc::now(),
        );
        assert_eq!(record.condition_before, AssetCondition::LightlyDamaged);
        assert_eq!(record.condition_after, AssetCondition::Good);
    }

    #[test]
    fn request_deserializes_cost_from_string() {
        let request: MaintenanceRequest = serde_json::from_str(
            r#"{
                "tanggal_maintenance": "2024-05-02",
                "jenis_maintenance": "servis",
                "deskripsi": "ganti baterai",
                "biaya": "250000.00",
                "teknisi": "Budi",
                "kondisi_sesudah": "baik"
            }"#,
        )
        .unwrap();
        assert_eq!(request.cost, Some(dec!(250000.00)));
        assert_eq!(request.reported_condition_before, None);
        assert_eq!(request.condition_after, AssetCondition::Good);
    }
}
