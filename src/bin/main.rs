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

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use csv::Writer;
use inventory_ledger_rs::{
    AssetId, AssetUpdate, Inventory, InventoryConfig, InventoryError, MaintenanceRequest,
    MovementKind, MovementRequest, NewAsset, NewCategory, NewLocation, NewRoom, UserId,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "inventory-ledger")]
#[command(about = "Replays an inventory command journal and prints a report", long_about = None)]
struct Args {
    /// Path to a JSON-lines command journal
    ///
    /// One command per line, e.g.
    /// {"op": "move", "user": 1, "asset": 1, "movement": {"movement_type": "masuk", "to_location_id": 2}}
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Report written to stdout as CSV
    #[arg(long, value_enum, default_value_t = ReportKind::Locations)]
    report: ReportKind,

    /// First day of the movement report period (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the movement report period (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Accept acquisition dates later than today
    #[arg(long)]
    allow_future_acquisition: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportKind {
    /// Active assets per location by condition
    Locations,
    /// Movement counts per location by kind
    Movements,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_ledger_rs=warn,inventory_ledger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let config = InventoryConfig {
        allow_future_acquisition: args.allow_future_acquisition,
        ..Default::default()
    };
    let inventory = match replay(BufReader::new(file), config) {
        Ok(inventory) => inventory,
        Err(e) => {
            tracing::error!("Error reading journal: {}", e);
            process::exit(1);
        }
    };

    let written = match args.report {
        ReportKind::Locations => write_location_summary(&inventory, std::io::stdout()),
        ReportKind::Movements => {
            let from = args.from.unwrap_or(NaiveDate::MIN);
            let to = args.to.unwrap_or(NaiveDate::MAX);
            write_movement_report(&inventory, from, to, std::io::stdout())
        }
    };
    if let Err(e) = written {
        tracing::error!("Error writing report: {}", e);
        process::exit(1);
    }
}

/// One journal line.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Command {
    Location(NewLocation),
    Room(NewRoom),
    Category(NewCategory),
    Asset {
        user: UserId,
        asset: NewAsset,
    },
    Update {
        user: UserId,
        asset: AssetId,
        changes: AssetUpdate,
    },
    Move {
        user: UserId,
        asset: AssetId,
        movement: MovementRequest,
    },
    Maintain {
        user: UserId,
        asset: AssetId,
        maintenance: MaintenanceRequest,
    },
    Deactivate {
        user: UserId,
        asset: AssetId,
    },
    Reactivate {
        user: UserId,
        asset: AssetId,
    },
}

impl Command {
    fn apply(self, inventory: &Inventory) -> Result<(), InventoryError> {
        match self {
            Command::Location(new) => inventory.catalog().create_location(new).map(drop),
            Command::Room(new) => inventory.catalog().create_room(new).map(drop),
            Command::Category(new) => inventory.catalog().create_category(new).map(drop),
            Command::Asset { user, asset } => inventory.create_asset(asset, user).map(drop),
            Command::Update {
                user,
                asset,
                changes,
            } => inventory.update_asset(asset, changes, user).map(drop),
            Command::Move {
                user,
                asset,
                movement,
            } => inventory.append_movement(asset, movement, user).map(drop),
            Command::Maintain {
                user,
                asset,
                maintenance,
            } => inventory.append_maintenance(asset, maintenance, user).map(drop),
            Command::Deactivate { user, asset } => inventory.deactivate_asset(asset, user).map(drop),
            Command::Reactivate { user, asset } => inventory.reactivate_asset(asset, user).map(drop),
        }
    }
}

/// Applies every journal line to a fresh inventory.
///
/// Malformed lines and rejected commands are logged and skipped; only I/O
/// failures abort the replay.
pub fn replay<R: BufRead>(reader: R, config: InventoryConfig) -> Result<Inventory, std::io::Error> {
    let inventory = Inventory::with_config(config);

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let command = match serde_json::from_str::<Command>(line) {
            Ok(command) => command,
            Err(error) => {
                tracing::warn!(line = number + 1, %error, "skipping malformed command");
                continue;
            }
        };
        if let Err(error) = command.apply(&inventory) {
            tracing::warn!(line = number + 1, %error, "skipping rejected command");
        }
    }

    Ok(inventory)
}

#[derive(Debug, Serialize)]
struct LocationRow {
    location_id: u32,
    kode_lokasi: String,
    nama_lokasi: String,
    total_assets: usize,
    baik: usize,
    rusak_ringan: usize,
    rusak_berat: usize,
    hilang: usize,
}

pub fn write_location_summary<W: Write>(inventory: &Inventory, writer: W) -> Result<(), csv::Error> {
    use inventory_ledger_rs::AssetCondition::*;

    let mut wtr = Writer::from_writer(writer);
    for summary in inventory.location_summary() {
        wtr.serialize(LocationRow {
            location_id: summary.location_id.get(),
            total_assets: summary.total_assets,
            baik: summary.count(Good),
            rusak_ringan: summary.count(LightlyDamaged),
            rusak_berat: summary.count(HeavilyDamaged),
            hilang: summary.count(Lost),
            kode_lokasi: summary.code,
            nama_lokasi: summary.name,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct MovementRow {
    location: String,
    masuk: usize,
    keluar: usize,
    mutasi: usize,
}

pub fn write_movement_report<W: Write>(
    inventory: &Inventory,
    from: NaiveDate,
    to: NaiveDate,
    writer: W,
) -> Result<(), csv::Error> {
    let report = inventory
        .movement_report(from, to)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let mut wtr = Writer::from_writer(writer);
    for (location, counts) in &report.movements_by_location {
        let count = |kind| counts.get(&kind).copied().unwrap_or(0);
        wtr.serialize(MovementRow {
            location: location.to_string(),
            masuk: count(MovementKind::Inbound),
            keluar: count(MovementKind::Outbound),
            mutasi: count(MovementKind::Transfer),
        })?;
    }
    wtr.serialize(MovementRow {
        location: "total".into(),
        masuk: report.total(MovementKind::Inbound),
        keluar: report.total(MovementKind::Outbound),
        mutasi: report.total(MovementKind::Transfer),
    })?;
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_ledger_rs::{AssetCondition, HistoryOrder, LocationId};
    use std::io::Cursor;

    const SETUP: &str = r#"
{"op": "location", "kode_lokasi": "GDG", "nama_lokasi": "Gudang"}
{"op": "location", "kode_lokasi": "KTR", "nama_lokasi": "Kantor"}
{"op": "room", "nama_ruang": "Ruang 1", "location_id": 1}
{"op": "asset", "user": 1, "asset": {"kode": "A-1", "nomor_aset": "NA-1", "nama_barang": "Laptop", "merk_tipe": "Lenovo", "kode_barang": "3.1", "tahun_anggaran": 2024, "rupiah_satuan": "1500000.00", "tanggal_perolehan": "2024-01-10", "location_id": 1, "room_id": 1, "pemegang_barang": "Alice"}}
"#;

    fn replay_str(journal: &str) -> Inventory {
        replay(Cursor::new(journal), InventoryConfig::default()).unwrap()
    }

    #[test]
    fn replay_builds_reference_data_and_assets() {
        let inventory = replay_str(SETUP);
        assert_eq!(inventory.catalog().locations().len(), 2);
        assert_eq!(inventory.catalog().rooms().len(), 1);

        let asset = inventory.asset(AssetId(1)).unwrap();
        assert_eq!(asset.custodian, "Alice");
        assert_eq!(asset.condition, AssetCondition::Good);
    }

    #[test]
    fn replay_applies_ledger_commands() {
        let journal = format!(
            "{SETUP}\n{}\n{}\n",
            r#"{"op": "move", "user": 2, "asset": 1, "movement": {"movement_type": "mutasi", "from_location_id": 1, "from_room_id": 1, "to_location_id": 2, "pemegang_lama": "Alice", "pemegang_baru": "Bob"}}"#,
            r#"{"op": "maintain", "user": 2, "asset": 1, "maintenance": {"tanggal_maintenance": "2024-02-01", "jenis_maintenance": "servis", "deskripsi": "baterai", "teknisi": "Budi", "kondisi_sesudah": "rusak_ringan"}}"#,
        );
        let inventory = replay_str(&journal);

        let asset = inventory.asset(AssetId(1)).unwrap();
        assert_eq!(asset.location_id, Some(LocationId(2)));
        assert_eq!(asset.room_id, None);
        assert_eq!(asset.custodian, "Bob");
        assert_eq!(asset.condition, AssetCondition::LightlyDamaged);
        assert_eq!(
            inventory
                .maintenance(AssetId(1), HistoryOrder::Chronological)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn replay_skips_malformed_and_rejected_lines() {
        let journal = format!(
            "{SETUP}\nnot json\n{}\n{}\n",
            // origin does not match the snapshot
            r#"{"op": "move", "user": 2, "asset": 1, "movement": {"movement_type": "mutasi", "from_location_id": 2, "to_location_id": 1}}"#,
            r#"{"op": "deactivate", "user": 1, "asset": 1}"#,
        );
        let inventory = replay_str(&journal);

        let asset = inventory.asset(AssetId(1)).unwrap();
        assert_eq!(asset.location_id, Some(LocationId(1)));
        assert!(!asset.is_active);
    }

    #[test]
    fn write_location_summary_to_csv() {
        let inventory = replay_str(SETUP);

        let mut output = Vec::new();
        write_location_summary(&inventory, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("location_id,kode_lokasi,nama_lokasi,total_assets,baik,rusak_ringan,rusak_berat,hilang")
        );
        assert_eq!(lines.next(), Some("1,GDG,Gudang,1,1,0,0,0"));
        assert_eq!(lines.next(), Some("2,KTR,Kantor,0,0,0,0,0"));
    }

    #[test]
    fn write_movement_report_to_csv() {
        let journal = format!(
            "{SETUP}\n{}\n",
            r#"{"op": "move", "user": 2, "asset": 1, "movement": {"movement_type": "keluar", "from_location_id": 1, "from_room_id": 1}}"#,
        );
        let inventory = replay_str(&journal);

        let mut output = Vec::new();
        write_movement_report(&inventory, NaiveDate::MIN, NaiveDate::MAX, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("location,masuk,keluar,mutasi"));
        assert!(output.contains("1,0,1,0"));
        assert!(output.contains("total,0,1,0"));
    }

    #[test]
    fn inverted_period_is_an_error() {
        let inventory = replay_str(SETUP);
        let from = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(write_movement_report(&inventory, from, to, Vec::new()).is_err());
    }
}
