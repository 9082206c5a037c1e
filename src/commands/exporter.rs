// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::dashboard::build;
use crate::dashboard::FourWeekSeries;
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("series", sub)) => export_series(conn, sub),
        _ => Ok(()),
    }
}

fn export_series(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    let dash = build(conn, sub)?;

    match fmt.as_str() {
        "csv" => write_csv(&dash.series, out)?,
        _ => {
            let doc = json!({
                "week_start": dash.week.start_date(),
                "week_end": dash.week.end_date(),
                "buckets": dash.series.buckets,
                "series": dash.series.series,
                "shares": dash.series.shares,
            });
            std::fs::write(out, serde_json::to_string_pretty(&doc)?)
                .with_context(|| format!("Write {}", out))?;
        }
    }
    println!("Exported 4-week series to {}", out);
    Ok(())
}

/// One row per product per bucket, oldest bucket first.
fn write_csv(series: &FourWeekSeries, out: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
    wtr.write_record([
        "week",
        "period_start",
        "period_end",
        "audit_start",
        "audit_end",
        "product",
        "quantity",
    ])?;
    for b in &series.buckets {
        for s in &series.series {
            wtr.write_record([
                (b.position + 1).to_string(),
                b.label_start.to_string(),
                b.label_end.to_string(),
                b.search.start_date().to_string(),
                b.search.end_date().to_string(),
                s.product_name.clone(),
                s.quantities[b.position].to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}
