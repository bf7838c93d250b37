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

//! Validation policy knobs for an [`Inventory`](crate::Inventory).

use serde::{Deserialize, Serialize};

/// Policy applied by the identity registry when validating asset fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Accept `tanggal_perolehan` values later than today.
    pub allow_future_acquisition: bool,
    /// How many years past the current year `tahun_anggaran` may be.
    pub max_fiscal_year_ahead: i32,
}

impl InventoryConfig {
    /// Earliest accepted fiscal year.
    pub const MIN_FISCAL_YEAR: i32 = 1900;
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            allow_future_acquisition: false,
            max_fiscal_year_ahead: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reject_future_acquisition() {
        let config = InventoryConfig::default();
        assert!(!config.allow_future_acquisition);
        assert_eq!(config.max_fiscal_year_ahead, 1);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: InventoryConfig =
            serde_json::from_str(r#"{"allow_future_acquisition": true}"#).unwrap();
        assert!(config.allow_future_acquisition);
        assert_eq!(config.max_fiscal_year_ahead, 1);
    }
}
