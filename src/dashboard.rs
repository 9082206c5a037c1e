// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Weekly aggregation over the audit ledger.
//!
//! Everything here is a pure function of the record slice and the caller's
//! `today`: nothing is cached between calls and records are only read.
//! Audit dates report on the week *before* they were entered, which is why
//! the reporting week trails the latest audit by one week and why bucket
//! display labels trail their search range by another.

use crate::models::{Category, TransactionRecord};
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Catch-all product label.
pub const OTHER_PRODUCT: &str = "Lainnya";
pub const BUCKETS: usize = 4;
pub const DEFAULT_PRODUCTS: &[&str] = &["Kerupuk Kulit", "Stik Bawang", "Keripik Bawang"];
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 7 * 3600;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub offset: FixedOffset,
    /// Count records with an unrecognized category and a null `produk_id` as
    /// expenses. Mirrors the ledger's historical behaviour; turn off to
    /// require an explicit category.
    pub null_product_as_expense: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix()),
            null_product_as_expense: true,
        }
    }
}

/// Inclusive Monday 00:00 .. Sunday 23:59:59.999 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportingWeek {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportingWeek {
    pub fn starting(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN);
        Self {
            start,
            end: start + Duration::days(7) - Duration::milliseconds(1),
        }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }

    pub fn weeks_before(&self, weeks: i64) -> Self {
        Self {
            start: self.start - Duration::weeks(weeks),
            end: self.end - Duration::weeks(weeks),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }
}

/// Income, expense, or neither. Unrecognized categories fall back to expense
/// only when `produk_id` is null and the fallback is enabled.
pub fn classify(record: &TransactionRecord, opts: &EngineOptions) -> Option<Category> {
    match record.category() {
        Some(c) => Some(c),
        None if opts.null_product_as_expense && record.produk_id.is_null() => {
            Some(Category::Expense)
        }
        None => None,
    }
}

fn dated<'a>(
    records: &'a [TransactionRecord],
    offset: &'a FixedOffset,
) -> impl Iterator<Item = (NaiveDateTime, &'a TransactionRecord)> + 'a {
    records
        .iter()
        .filter_map(move |r| r.audited_at(offset).map(|at| (at, r)))
}

pub fn resolve_reporting_week(
    records: &[TransactionRecord],
    today: NaiveDateTime,
    opts: &EngineOptions,
) -> ReportingWeek {
    let latest = dated(records, &opts.offset)
        .map(|(at, _)| at)
        .max()
        .unwrap_or(today);
    let back = i64::from(latest.weekday().num_days_from_monday());
    let monday = latest.date() - Duration::days(back);
    ReportingWeek::starting(monday - Duration::days(7))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeekTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit: Decimal,
}

/// `a + b`, clamped to the `Decimal` range instead of panicking.
pub fn clamped_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        tracing::warn!(%a, %b, "amount overflowed the decimal range and was clamped");
        if b.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// `a - b`, clamped like [`clamped_add`].
pub fn clamped_sub(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or_else(|| {
        tracing::warn!(%a, %b, "amount overflowed the decimal range and was clamped");
        if b.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

/// Unit counts saturate at the `i64` range.
fn add_units(a: i64, b: i64) -> i64 {
    a.checked_add(b).unwrap_or_else(|| {
        tracing::warn!(a, b, "unit count overflowed and was saturated");
        a.saturating_add(b)
    })
}

fn week_totals(records: &[TransactionRecord], week: &ReportingWeek, opts: &EngineOptions) -> WeekTotals {
    let mut t = WeekTotals::default();
    for (_, r) in dated(records, &opts.offset).filter(|(at, _)| week.contains(*at)) {
        match classify(r, opts) {
            Some(Category::Income) => t.income = clamped_add(t.income, r.total_pendapatan.abs()),
            Some(Category::Expense) => {
                t.expense = clamped_add(t.expense, r.total_pendapatan.abs())
            }
            None => {}
        }
    }
    t.profit = clamped_sub(t.income, t.expense);
    t
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub diff_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub diff_expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub diff_profit: Decimal,
    pub previous: WeekTotals,
    pub week_label_start: NaiveDate,
    pub week_label_end: NaiveDate,
}

pub fn compute_weekly_summary(
    records: &[TransactionRecord],
    week: &ReportingWeek,
    opts: &EngineOptions,
) -> WeeklySummary {
    let curr = week_totals(records, week, opts);
    let prev = week_totals(records, &week.weeks_before(1), opts);
    WeeklySummary {
        income: curr.income,
        expense: curr.expense,
        profit: curr.profit,
        diff_income: clamped_sub(curr.income, prev.income),
        diff_expense: clamped_sub(curr.expense, prev.expense),
        diff_profit: clamped_sub(curr.profit, prev.profit),
        previous: prev,
        week_label_start: week.start_date(),
        week_label_end: week.end_date(),
    }
}

/// Search range of bucket `i` weeks before the reporting week (`i = 0` is
/// the reporting week itself).
pub fn bucket_range(week_start: NaiveDate, i: usize) -> ReportingWeek {
    ReportingWeek::starting(week_start - Duration::weeks(i as i64))
}

/// Sales period reported by bucket `i`: one week before its search range.
pub fn display_label(week_start: NaiveDate, i: usize) -> (NaiveDate, NaiveDate) {
    let start = bucket_range(week_start, i).start_date() - Duration::days(7);
    (start, start + Duration::days(6))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekBucket {
    /// 0 is the oldest bucket, `BUCKETS - 1` the reporting week.
    pub position: usize,
    pub search: ReportingWeek,
    pub label_start: NaiveDate,
    pub label_end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSeries {
    pub product_name: String,
    pub quantities: [i64; BUCKETS],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductShare {
    pub product_name: String,
    pub total_quantity: i64,
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FourWeekSeries {
    pub buckets: Vec<WeekBucket>,
    pub series: Vec<ProductSeries>,
    pub shares: Vec<ProductShare>,
}

impl FourWeekSeries {
    pub fn quantities(&self, product: &str) -> Option<&[i64; BUCKETS]> {
        self.series
            .iter()
            .find(|s| s.product_name == product)
            .map(|s| &s.quantities)
    }

    pub fn total_units(&self) -> i64 {
        self.shares
            .iter()
            .fold(0, |acc, s| add_units(acc, s.total_quantity))
    }
}

pub fn build_four_week_series(
    records: &[TransactionRecord],
    week_start: NaiveDate,
    known_products: &[String],
    opts: &EngineOptions,
) -> FourWeekSeries {
    let sales: Vec<(NaiveDateTime, &TransactionRecord)> = dated(records, &opts.offset)
        .filter(|(_, r)| classify(r, opts) == Some(Category::Income))
        .collect();

    let mut buckets = Vec::with_capacity(BUCKETS);
    let mut series: Vec<ProductSeries> = known_products
        .iter()
        .map(|name| ProductSeries {
            product_name: name.clone(),
            quantities: [0; BUCKETS],
        })
        .collect();

    for i in (0..BUCKETS).rev() {
        let position = BUCKETS - 1 - i;
        let search = bucket_range(week_start, i);
        let (label_start, label_end) = display_label(week_start, i);
        for (_, r) in sales.iter().filter(|(at, _)| search.contains(*at)) {
            let name = r.product_name().unwrap_or(OTHER_PRODUCT);
            if let Some(s) = series.iter_mut().find(|s| s.product_name == name) {
                s.quantities[position] = add_units(s.quantities[position], r.jumlah);
            }
        }
        buckets.push(WeekBucket {
            position,
            search,
            label_start,
            label_end,
        });
    }

    let window = ReportingWeek {
        start: bucket_range(week_start, BUCKETS - 1).start,
        end: bucket_range(week_start, 0).end,
    };
    let mut per_product: HashMap<&str, i64> = HashMap::new();
    for (_, r) in sales.iter().filter(|(at, _)| window.contains(*at)) {
        let name = r
            .product_name()
            .filter(|n| known_products.iter().any(|k| k.as_str() == *n))
            .unwrap_or(OTHER_PRODUCT);
        let qty = per_product.entry(name).or_insert(0);
        *qty = add_units(*qty, r.jumlah);
    }
    let grand_total = per_product.values().fold(0, |acc, q| add_units(acc, *q));
    let mut shares = Vec::new();
    let order = known_products
        .iter()
        .map(String::as_str)
        .filter(|n| *n != OTHER_PRODUCT)
        .chain(std::iter::once(OTHER_PRODUCT));
    for name in order {
        if let Some(&qty) = per_product.get(name) {
            let share_percent = if grand_total > 0 {
                qty as f64 / grand_total as f64 * 100.0
            } else {
                0.0
            };
            shares.push(ProductShare {
                product_name: name.to_string(),
                total_quantity: qty,
                share_percent,
            });
        }
    }

    FourWeekSeries {
        buckets,
        series,
        shares,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub week: ReportingWeek,
    pub summary: WeeklySummary,
    pub series: FourWeekSeries,
    /// Records skipped by every date-bounded aggregation.
    pub undated: usize,
}

pub fn aggregate(
    records: &[TransactionRecord],
    today: NaiveDateTime,
    known_products: &[String],
    opts: &EngineOptions,
) -> Dashboard {
    let undated = records
        .iter()
        .filter(|r| r.audited_at(&opts.offset).is_none())
        .count();
    if undated > 0 {
        tracing::debug!(undated, "records without a parseable tanggal left out");
    }
    let fallback = records
        .iter()
        .filter(|r| r.category().is_none() && classify(r, opts).is_some())
        .count();
    if fallback > 0 {
        tracing::warn!(
            fallback,
            "records with an unknown jenis_transaksi and a null produk_id counted as expenses"
        );
    }
    let week = resolve_reporting_week(records, today, opts);
    let summary = compute_weekly_summary(records, &week, opts);
    let series = build_four_week_series(records, week.start_date(), known_products, opts);
    Dashboard {
        week,
        summary,
        series,
        undated,
    }
}
