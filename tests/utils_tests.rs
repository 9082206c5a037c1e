// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use umkmboard::api::{ApiError, error_message, join_url};
use umkmboard::utils::{
    fmt_long_date, fmt_rupiah, fmt_rupiah_diff, fmt_short_date, fmt_timestamp, parse_month,
    parse_utc_offset, resolve_today,
};

fn d(n: &str) -> Decimal {
    Decimal::from_str(n).unwrap()
}

#[test]
fn rupiah_groups_thousands_with_dots() {
    assert_eq!(fmt_rupiah(&d("1250000")), "Rp 1.250.000");
    assert_eq!(fmt_rupiah(&d("999")), "Rp 999");
    assert_eq!(fmt_rupiah(&d("1000")), "Rp 1.000");
    assert_eq!(fmt_rupiah(&d("0")), "Rp 0");
    assert_eq!(fmt_rupiah(&d("-20000")), "-Rp 20.000");
    assert_eq!(fmt_rupiah(&d("75000.40")), "Rp 75.000");
    assert_eq!(fmt_rupiah(&d("-0.2")), "Rp 0");
}

#[test]
fn rupiah_diff_carries_sign() {
    assert_eq!(fmt_rupiah_diff(&d("2000")), "+Rp 2.000");
    assert_eq!(fmt_rupiah_diff(&d("-800")), "-Rp 800");
    assert_eq!(fmt_rupiah_diff(&d("0")), "Rp 0");
}

#[test]
fn dates_render_in_indonesian() {
    let date = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
    assert_eq!(fmt_long_date(date), "10 November 2025");
    assert_eq!(fmt_short_date(date), "10/11/25");
    let ts = NaiveDateTime::parse_from_str("2025-08-07 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
    assert_eq!(fmt_timestamp(ts), "07 Agu 2025 09.30");
}

#[test]
fn month_and_offset_parsing() {
    assert_eq!(parse_month("2025-11").unwrap(), (2025, 11));
    assert!(parse_month("2025-13").is_err());
    assert!(parse_month("November").is_err());
    assert_eq!(parse_utc_offset("+07:00").unwrap().local_minus_utc(), 25200);
    assert_eq!(parse_utc_offset("utc").unwrap().local_minus_utc(), 0);
    assert!(parse_utc_offset("WIB").is_err());
}

#[test]
fn explicit_today_is_start_of_day() {
    let off = parse_utc_offset("+07:00").unwrap();
    let arg = "2025-11-19".to_string();
    let today = resolve_today(Some(&arg), &off).unwrap();
    assert_eq!(today.to_string(), "2025-11-19 00:00:00");
    assert!(resolve_today(Some(&"19/11/2025".to_string()), &off).is_err());
}

#[test]
fn urls_join_with_single_slash() {
    assert_eq!(
        join_url("http://localhost:5000/api/", "/audit"),
        "http://localhost:5000/api/audit"
    );
    assert_eq!(join_url("http://localhost:5001", "predict"), "http://localhost:5001/predict");
}

#[test]
fn error_bodies_prefer_json_message() {
    assert_eq!(error_message(r#"{"error": "Produk tidak ditemukan"}"#), "Produk tidak ditemukan");
    assert_eq!(error_message(r#"{"message": "Token expired"}"#), "Token expired");
    assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
}

#[test]
fn not_configured_error_names_the_key() {
    let msg = ApiError::NotConfigured("forecast_url").to_string();
    assert!(msg.contains("forecast_url"));
    assert!(ApiError::Unauthorized.to_string().contains("login"));
}
