// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use serde_json::json;
use std::path::Path;
use tempfile::tempdir;
use umkmboard::commands::{dashboard, exporter};
use umkmboard::{cli, db};

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn write_ledger(dir: &Path) -> String {
    let path = dir.join("audit.json");
    let body = json!({
        "data": [
            {"id": 1, "jenis_transaksi": "pengeluaran", "tanggal": "2025-11-19T08:00:00",
             "total_pendapatan": 0, "produk_id": null},
            {"id": 2, "jenis_transaksi": "penjualan", "tanggal": "2025-11-12T10:00:00",
             "jumlah": 10, "total_pendapatan": 100000,
             "produk": {"nama_produk": "Kerupuk Kulit"}, "produk_id": 1},
            {"id": 3, "jenis_transaksi": "penjualan", "tanggal": "2025-10-28T10:00:00",
             "jumlah": 6, "total_pendapatan": 48000,
             "produk": {"nama_produk": "Stik Bawang"}, "produk_id": 2},
            {"id": 4, "jenis_transaksi": "penjualan", "tanggal": "2025-11-13T10:00:00",
             "jumlah": 4, "total_pendapatan": 20000,
             "produk": {"nama_produk": "Rengginang"}, "produk_id": 9}
        ]
    });
    std::fs::write(&path, body.to_string()).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn export_series_writes_csv_rows_per_bucket_and_product() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let ledger = write_ledger(dir.path());
    let out_path = dir.path().join("series.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "umkmboard",
        "export",
        "series",
        "--out",
        &out_str,
        "--file",
        &ledger,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1 + 4 * 3);
    assert_eq!(
        lines[0],
        "week,period_start,period_end,audit_start,audit_end,product,quantity"
    );
    assert_eq!(
        lines[1],
        "1,2025-10-13,2025-10-19,2025-10-20,2025-10-26,Kerupuk Kulit,0"
    );
    assert!(lines.contains(&"2,2025-10-20,2025-10-26,2025-10-27,2025-11-02,Stik Bawang,6"));
    assert!(lines.contains(&"4,2025-11-03,2025-11-09,2025-11-10,2025-11-16,Kerupuk Kulit,10"));
}

#[test]
fn export_series_json_carries_shares() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let ledger = write_ledger(dir.path());
    let out_path = dir.path().join("series.json");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "umkmboard",
        "export",
        "series",
        "--format",
        "json",
        "--out",
        &out_str,
        "--file",
        &ledger,
        "--products",
        "Kerupuk Kulit,Stik Bawang",
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(parsed["week_start"], json!("2025-11-10"));
    assert_eq!(parsed["week_end"], json!("2025-11-16"));
    assert_eq!(parsed["buckets"].as_array().unwrap().len(), 4);
    assert_eq!(
        parsed["series"],
        json!([
            {"product_name": "Kerupuk Kulit", "quantities": [0, 0, 0, 10]},
            {"product_name": "Stik Bawang", "quantities": [0, 6, 0, 0]}
        ])
    );
    let shares: Vec<(String, i64)> = parsed["shares"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| {
            (
                s["productName"].as_str().unwrap().to_string(),
                s["totalQuantity"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        shares,
        vec![
            ("Kerupuk Kulit".to_string(), 10),
            ("Stik Bawang".to_string(), 6),
            ("Lainnya".to_string(), 4)
        ]
    );
}

#[test]
fn export_series_rejects_unknown_format() {
    let cli = cli::build_cli();
    let res = cli.try_get_matches_from([
        "umkmboard", "export", "series", "--format", "xml", "--out", "x.xml",
    ]);
    assert!(res.is_err());
}

#[test]
fn missing_ledger_file_is_an_error() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let missing_str = missing.to_string_lossy().to_string();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "umkmboard",
        "dashboard",
        "summary",
        "--file",
        &missing_str,
    ]);
    let (_, dash_m) = matches.subcommand().unwrap();
    let (_, view_m) = dash_m.subcommand().unwrap();
    assert!(dashboard::build(&conn, view_m).is_err());
}

#[test]
fn dashboard_uses_cached_snapshot_and_today_fallback() {
    let mut conn = base_conn();
    db::replace_audit_records(
        &mut conn,
        &[json!({"id": 1, "jenis_transaksi": "penjualan", "tanggal": "rusak", "jumlah": 3})],
    )
    .unwrap();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["umkmboard", "dashboard", "all", "--today", "2025-11-19"]);
    let (_, dash_m) = matches.subcommand().unwrap();
    let (_, view_m) = dash_m.subcommand().unwrap();
    let dash = dashboard::build(&conn, view_m).unwrap();
    assert_eq!(dash.undated, 1);
    assert_eq!(dash.week.start_date().to_string(), "2025-11-10");
    assert_eq!(dash.series.total_units(), 0);
}
