// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

const UA: &str = concat!("umkmboard/", env!("CARGO_PKG_VERSION"));

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok((d.year(), d.month()))
}

/// Accepts `+07:00`, `-03:30`, `+0700` or `Z`.
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| anyhow!("Invalid offset '{}'", s));
    }
    s.parse::<FixedOffset>()
        .map_err(|_| anyhow!("Invalid UTC offset '{}', expected e.g. +07:00", s))
}

/// `--today` if given (start of that day), otherwise the current wall clock
/// at `offset`.
pub fn resolve_today(arg: Option<&String>, offset: &FixedOffset) -> Result<NaiveDateTime> {
    match arg {
        Some(s) => Ok(parse_date(s)?.and_time(NaiveTime::MIN)),
        None => Ok(Utc::now().with_timezone(offset).naive_local()),
    }
}

const MONTHS_LONG: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// `10 November 2025`
pub fn fmt_long_date(d: NaiveDate) -> String {
    format!("{} {} {}", d.day(), MONTHS_LONG[d.month0() as usize], d.year())
}

/// `10/11/25`
pub fn fmt_short_date(d: NaiveDate) -> String {
    d.format("%d/%m/%y").to_string()
}

/// `17 Nov 2025 09.30`
pub fn fmt_timestamp(dt: NaiveDateTime) -> String {
    format!(
        "{:02} {} {} {}",
        dt.day(),
        MONTHS_SHORT[dt.month0() as usize],
        dt.year(),
        dt.format("%H.%M")
    )
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Whole-rupiah amount with `.` grouping: `Rp 1.250.000`, `-Rp 20.000`.
pub fn fmt_rupiah(d: &Decimal) -> String {
    let rounded = d.round_dp(0);
    let digits = rounded.abs().trunc().to_string();
    let body = format!("Rp {}", group_thousands(&digits));
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", body)
    } else {
        body
    }
}

/// Trend badge text: `+Rp 2.000`, `-Rp 800`, `Rp 0`.
pub fn fmt_rupiah_diff(d: &Decimal) -> String {
    let body = fmt_rupiah(&d.abs());
    if d.is_zero() {
        body
    } else if d.is_sign_negative() {
        format!("-{}", body)
    } else {
        format!("+{}", body)
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
