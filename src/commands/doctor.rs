// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::dashboard::{EngineOptions, OTHER_PRODUCT, classify};
use crate::db::load_audit_records;
use crate::models::{Category, TransactionRecord};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: &'static str,
    pub record_id: i64,
    pub detail: String,
}

/// Records the dashboard silently excludes, reclassifies or relabels.
pub fn diagnose(
    records: &[TransactionRecord],
    known_products: &[String],
    opts: &EngineOptions,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    for r in records {
        let mut push = |kind: &'static str, detail: String| {
            issues.push(Issue {
                kind,
                record_id: r.id,
                detail,
            })
        };
        if r.audited_at(&opts.offset).is_none() {
            push(
                "undated",
                format!("tanggal {:?}", r.tanggal.as_deref().unwrap_or("")),
            );
        }
        let jenis = r.jenis_transaksi.as_deref().unwrap_or("");
        match (r.category(), classify(r, opts)) {
            (None, Some(Category::Expense)) => push(
                "fallback_expense",
                format!("jenis {:?} with null produk_id counted as expense", jenis),
            ),
            (None, _) => push("unknown_category", format!("jenis {:?} excluded", jenis)),
            (Some(Category::Income), _) => match r.product_name() {
                None => push(
                    "income_without_product",
                    format!("charted as {}", OTHER_PRODUCT),
                ),
                Some(name) if !known_products.iter().any(|k| k == name) => push(
                    "unknown_product",
                    format!("{:?} merged into {}", name, OTHER_PRODUCT),
                ),
                Some(_) => {}
            },
            (Some(Category::Expense), _) => {}
        }
    }
    issues
}

pub fn handle(conn: &Connection) -> Result<()> {
    let settings = Settings::load(conn)?;
    let records = load_audit_records(conn)?;
    let issues = diagnose(&records, &settings.products, &settings.engine_options());
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.record_id.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Record", "Detail"], rows));
    }
    Ok(())
}
