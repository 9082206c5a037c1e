// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use umkmboard::models::{Category, ProductId, TransactionRecord, parse_timestamp};
use umkmboard::records::{
    filter_tab, month_totals, parse_audit_payload, parse_products_payload, payload_items, search,
};

fn wib() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).unwrap()
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap()
}

const LEDGER: &str = r#"{
  "data": [
    {"id": 1, "jenis_transaksi": "penjualan", "tanggal": "2025-11-12T09:00:00",
     "jumlah": 5, "harga_satuan": 10000, "total_pendapatan": 50000,
     "produk": {"nama_produk": "Kerupuk Kulit", "unit": "pcs"}, "produk_id": 1},
    {"id": 2, "jenis_transaksi": "pengeluaran", "tanggal": "2025-11-20T08:00:00",
     "jumlah": 1, "total_pendapatan": -20000, "produk": null, "produk_id": null,
     "sumber_pengeluaran": "Bayar listrik"},
    {"id": 3, "jenis_transaksi": "pemasukan", "tanggal": "2025-10-31T10:00:00",
     "jumlah": 2, "total_pendapatan": 16000,
     "produk": {"nama_produk": "Stik Bawang"}, "produk_id": 2},
    {"id": 4, "jenis_transaksi": "penjualan", "tanggal": "2025-11-25T10:00:00",
     "jumlah": 1, "total_pendapatan": 8000,
     "produk": {"nama_produk": "Stik Bawang"}, "produk_id": 2}
  ]
}"#;

fn ledger() -> Vec<TransactionRecord> {
    parse_audit_payload(LEDGER).unwrap()
}

#[test]
fn payload_accepts_bare_array_or_data_envelope() {
    assert_eq!(payload_items("[1, 2]").unwrap().len(), 2);
    assert_eq!(payload_items(r#"{"data": [{}]}"#).unwrap().len(), 1);
    assert!(payload_items(r#"{"rows": []}"#).is_err());
    assert!(payload_items("\"nope\"").is_err());
    assert!(payload_items("{not json").is_err());
}

#[test]
fn malformed_fields_never_abort_a_load() {
    let body = r#"[
        {"id": "7", "jenis_transaksi": "penjualan", "tanggal": "2025-11-12",
         "jumlah": "5", "harga_satuan": "abc", "total_pendapatan": "75000.50",
         "produk": "Kerupuk Kulit", "produk_id": "n/a"},
        42,
        {"id": {"nested": true}, "jumlah": 3.9, "total_pendapatan": null},
        "stray"
    ]"#;
    let records = parse_audit_payload(body).unwrap();
    assert_eq!(records.len(), 2);

    let r = &records[0];
    assert_eq!(r.id, 7);
    assert_eq!(r.jumlah, 5);
    assert_eq!(r.harga_satuan, Decimal::ZERO);
    assert_eq!(r.total_pendapatan, Decimal::from_str("75000.50").unwrap());
    assert_eq!(r.produk, None);
    assert_eq!(r.produk_id, ProductId::Invalid);
    assert_eq!(r.category(), Some(Category::Income));

    let r = &records[1];
    assert_eq!(r.id, 0);
    assert_eq!(r.jumlah, 3);
    assert_eq!(r.total_pendapatan, Decimal::ZERO);
    assert_eq!(r.jenis_transaksi, None);
    assert_eq!(r.produk_id, ProductId::Missing);
}

#[test]
fn product_id_keeps_null_apart_from_missing() {
    let records = parse_audit_payload(
        r#"[{"id": 1, "produk_id": null}, {"id": 2}, {"id": 3, "produk_id": "4"}]"#,
    )
    .unwrap();
    assert_eq!(records[0].produk_id, ProductId::Null);
    assert_eq!(records[1].produk_id, ProductId::Missing);
    assert_eq!(records[2].produk_id.id(), Some(4));

    let v = serde_json::to_value(&records[0]).unwrap();
    assert!(v["produk_id"].is_null());
    let v = serde_json::to_value(&records[1]).unwrap();
    assert!(v.get("produk_id").is_none());
}

#[test]
fn month_totals_clamp_instead_of_overflowing() {
    let body = r#"[
        {"id": 1, "jenis_transaksi": "penjualan", "tanggal": "2025-11-12", "total_pendapatan": "50000000000000000000000000000"},
        {"id": 2, "jenis_transaksi": "penjualan", "tanggal": "2025-11-13", "total_pendapatan": "50000000000000000000000000000"}
    ]"#;
    let t = month_totals(&parse_audit_payload(body).unwrap(), (2025, 11), &wib());
    assert_eq!(t.income, Decimal::MAX);
}

#[test]
fn blank_product_names_read_as_missing() {
    let records = parse_audit_payload(
        r#"[{"id": 1, "produk": {"nama_produk": "   "}}, {"id": 2, "produk": {"nama_produk": " Stik Bawang "}}]"#,
    )
    .unwrap();
    assert_eq!(records[0].product_name(), None);
    assert_eq!(records[1].product_name(), Some("Stik Bawang"));
}

#[test]
fn timestamps_truncate_to_milliseconds() {
    let off = wib();
    assert_eq!(
        parse_timestamp("2025-11-12T09:00:00.123456", &off),
        Some(at("2025-11-12 09:00:00.123"))
    );
    assert_eq!(
        parse_timestamp("2025-11-12 09:30", &off),
        Some(at("2025-11-12 09:30:00"))
    );
    assert_eq!(
        parse_timestamp("2025-11-12", &off),
        Some(at("2025-11-12 00:00:00"))
    );
    assert_eq!(
        parse_timestamp("2025-11-12T09:00:00+07:00", &off),
        Some(at("2025-11-12 09:00:00"))
    );
    assert_eq!(
        parse_timestamp("2025-11-12T02:00:00.000Z", &off),
        Some(at("2025-11-12 09:00:00"))
    );
    assert_eq!(parse_timestamp("", &off), None);
    assert_eq!(parse_timestamp("12/11/2025", &off), None);
}

#[test]
fn products_payload_reads_aliases() {
    let products = parse_products_payload(
        r#"{"data": [{"id": 1, "nama_produk": "Kerupuk Kulit", "unit": "pcs", "stok": "12", "harga_satuan": 15000, "detail": "Renyah"}]}"#,
    )
    .unwrap();
    assert_eq!(products.len(), 1);
    let p = &products[0];
    assert_eq!(p.name(), "Kerupuk Kulit");
    assert_eq!(p.stok_tersedia, 12);
    assert_eq!(p.harga, Decimal::from(15000));
    assert_eq!(p.deskripsi.as_deref(), Some("Renyah"));
}

#[test]
fn search_is_case_insensitive_and_newest_first() {
    let records = ledger();
    let hits = search(&records, "STIK", &wib()).unwrap();
    let ids: Vec<i64> = hits.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![4, 3]);

    let hits = search(&records, "listrik", &wib()).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source_label(), "Bayar listrik");

    let hits = search(&records, "pengeluaran", &wib()).unwrap();
    assert_eq!(hits.len(), 1);

    let all = search(&records, "  ", &wib()).unwrap();
    let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![4, 2, 1, 3]);

    assert!(search(&records, "(kerupuk", &wib()).unwrap().is_empty());
}

#[test]
fn tabs_split_by_category_and_month() {
    let records = ledger();
    let income = filter_tab(&records, Category::Income, (2025, 11), &wib());
    let ids: Vec<i64> = income.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![4, 1]);

    let expenses = filter_tab(&records, Category::Expense, (2025, 11), &wib());
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].id, 2);

    let october = filter_tab(&records, Category::Income, (2025, 10), &wib());
    assert_eq!(october.len(), 1);
    assert_eq!(october[0].id, 3);
}

#[test]
fn month_totals_keep_stored_signs() {
    let t = month_totals(&ledger(), (2025, 11), &wib());
    assert_eq!(t.income, Decimal::from(58000));
    assert_eq!(t.expense, Decimal::from(-20000));

    let empty = month_totals(&ledger(), (2024, 1), &wib());
    assert_eq!(empty.income, Decimal::ZERO);
    assert_eq!(empty.expense, Decimal::ZERO);
}
