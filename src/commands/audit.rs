// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db::load_audit_records;
use crate::models::{Category, TransactionRecord};
use crate::records::{filter_tab, month_totals, search};
use crate::utils::{fmt_rupiah, fmt_timestamp, maybe_print_json, parse_month, pretty_table};
use anyhow::{Result, anyhow};
use chrono::{Datelike, FixedOffset, Utc};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("search", sub)) => search_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn row(i: usize, r: &TransactionRecord, offset: &FixedOffset) -> Vec<String> {
    vec![
        (i + 1).to_string(),
        r.jenis_transaksi
            .as_deref()
            .unwrap_or("-")
            .to_uppercase(),
        r.source_label().to_string(),
        fmt_rupiah(&r.harga_satuan),
        r.unit().unwrap_or("-").to_string(),
        r.jumlah.to_string(),
        r.audited_at(offset)
            .map(fmt_timestamp)
            .unwrap_or_else(|| r.tanggal.clone().unwrap_or_else(|| "-".into())),
        fmt_rupiah(&r.total_pendapatan),
    ]
}

const HEADERS: [&str; 8] = [
    "No", "Jenis", "Sumber/Produk", "Harga", "Unit", "Jml", "Tanggal", "Total",
];

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let settings = Settings::load(conn)?;
    let tab_raw = sub.get_one::<String>("tab").unwrap();
    let tab = Category::from_label(tab_raw).ok_or_else(|| anyhow!("Unknown tab '{}'", tab_raw))?;
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => {
            let now = Utc::now().with_timezone(&settings.offset);
            (now.year(), now.month())
        }
    };
    let records = load_audit_records(conn)?;
    let mut data = filter_tab(&records, tab, month, &settings.offset);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .enumerate()
            .map(|(i, r)| row(i, r, &settings.offset))
            .collect();
        println!("{}", pretty_table(&HEADERS, rows));
        let totals = month_totals(&records, month, &settings.offset);
        println!(
            "{}-{:02}: pemasukan {} | pengeluaran {}",
            month.0,
            month.1,
            fmt_rupiah(&totals.income),
            fmt_rupiah(&totals.expense)
        );
    }
    Ok(())
}

fn search_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let settings = Settings::load(conn)?;
    let term = sub.get_one::<String>("term").unwrap();
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&20);
    let records = load_audit_records(conn)?;
    let mut hits = search(&records, term, &settings.offset)?;
    hits.truncate(limit);
    if !maybe_print_json(json_flag, jsonl_flag, &hits)? {
        if hits.is_empty() {
            println!("Data tidak ditemukan");
            return Ok(());
        }
        let rows = hits
            .iter()
            .enumerate()
            .map(|(i, r)| row(i, r, &settings.offset))
            .collect();
        println!("{}", pretty_table(&HEADERS, rows));
    }
    Ok(())
}
