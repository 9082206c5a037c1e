// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dashboard::clamped_add;
use crate::models::{Category, Product, TransactionRecord};
use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, FixedOffset};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Elements of `{data: [...]}` or of a bare array, each kept as raw JSON.
pub fn payload_items(json: &str) -> Result<Vec<Value>> {
    let v: Value = serde_json::from_str(json).context("Payload is not valid JSON")?;
    match v {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(anyhow!("Expected a 'data' array in payload")),
        },
        _ => Err(anyhow!("Expected an array or an object with 'data'")),
    }
}

/// Decodes each element on its own; anything that is not an object is
/// logged and dropped instead of failing the batch.
pub fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Vec<(Value, T)> {
    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            tracing::debug!(idx, "skipping non-object payload element");
            continue;
        }
        match serde_json::from_value::<T>(item.clone()) {
            Ok(rec) => out.push((item, rec)),
            Err(err) => tracing::debug!(idx, %err, "skipping undecodable payload element"),
        }
    }
    out
}

pub fn parse_audit_payload(json: &str) -> Result<Vec<TransactionRecord>> {
    Ok(decode_items(payload_items(json)?)
        .into_iter()
        .map(|(_, r)| r)
        .collect())
}

pub fn parse_products_payload(json: &str) -> Result<Vec<Product>> {
    Ok(decode_items(payload_items(json)?)
        .into_iter()
        .map(|(_, p)| p)
        .collect())
}

/// Newest first; undated records sink to the bottom in input order.
pub fn sort_newest_first(records: &mut [&TransactionRecord], offset: &FixedOffset) {
    records.sort_by(|a, b| b.audited_at(offset).cmp(&a.audited_at(offset)));
}

/// History-table search over product name, expense source and category,
/// case-insensitive. An empty term matches everything.
pub fn search<'a>(
    records: &'a [TransactionRecord],
    term: &str,
    offset: &FixedOffset,
) -> Result<Vec<&'a TransactionRecord>> {
    let re = Regex::new(&format!("(?i){}", regex::escape(term.trim())))
        .with_context(|| format!("Invalid search term '{}'", term))?;
    let mut hits: Vec<&TransactionRecord> = records
        .iter()
        .filter(|r| {
            let hay = format!(
                "{}{}{}",
                r.product_name().unwrap_or(""),
                r.sumber_pengeluaran.as_deref().unwrap_or(""),
                r.jenis_transaksi.as_deref().unwrap_or("")
            );
            re.is_match(&hay)
        })
        .collect();
    sort_newest_first(&mut hits, offset);
    Ok(hits)
}

fn in_month(r: &TransactionRecord, month: (i32, u32), offset: &FixedOffset) -> bool {
    r.audited_at(offset)
        .map(|at| (at.year(), at.month()) == month)
        .unwrap_or(false)
}

/// Audit page tab: one category within one calendar month.
pub fn filter_tab<'a>(
    records: &'a [TransactionRecord],
    tab: Category,
    month: (i32, u32),
    offset: &FixedOffset,
) -> Vec<&'a TransactionRecord> {
    let mut out: Vec<&TransactionRecord> = records
        .iter()
        .filter(|r| r.category() == Some(tab) && in_month(r, month, offset))
        .collect();
    sort_newest_first(&mut out, offset);
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
}

/// Raw monthly sums, signs as stored, like the audit page header.
pub fn month_totals(
    records: &[TransactionRecord],
    month: (i32, u32),
    offset: &FixedOffset,
) -> MonthTotals {
    let mut t = MonthTotals::default();
    for r in records.iter().filter(|r| in_month(r, month, offset)) {
        match r.category() {
            Some(Category::Income) => t.income = clamped_add(t.income, r.total_pendapatan),
            Some(Category::Expense) => t.expense = clamped_add(t.expense, r.total_pendapatan),
            None => {}
        }
    }
    t
}
