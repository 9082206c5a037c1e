// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::charts::{bar_chart, pie_chart, pie_label, summary_cards};
use crate::config::{Settings, parse_products};
use crate::dashboard::{Dashboard, aggregate};
use crate::db::load_audit_records;
use crate::models::TransactionRecord;
use crate::records::parse_audit_payload;
use crate::utils::{
    fmt_long_date, fmt_rupiah, fmt_rupiah_diff, fmt_short_date, maybe_print_json, pretty_table,
    resolve_today,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde_json::json;

/// Records from `--file` when given, otherwise the cached snapshot.
pub fn load_records(conn: &Connection, file: Option<&String>) -> Result<Vec<TransactionRecord>> {
    match file.map(|s| s.trim()) {
        Some(path) => {
            let body =
                std::fs::read_to_string(path).with_context(|| format!("Read payload {}", path))?;
            parse_audit_payload(&body)
        }
        None => load_audit_records(conn),
    }
}

/// Runs the engine with the window arguments shared by `dashboard` and `export`.
pub fn build(conn: &Connection, sub: &clap::ArgMatches) -> Result<Dashboard> {
    let settings = Settings::load(conn)?;
    let records = load_records(conn, sub.get_one::<String>("file"))?;
    let known = sub
        .get_one::<String>("products")
        .map(|s| parse_products(s))
        .unwrap_or_else(|| settings.products.clone());
    let today = resolve_today(sub.get_one::<String>("today"), &settings.offset)?;
    let dash = aggregate(&records, today, &known, &settings.engine_options());
    if dash.undated > 0 {
        tracing::warn!(
            undated = dash.undated,
            "some records have no usable tanggal and were left out"
        );
    }
    Ok(dash)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let Some((view, sub)) = m.subcommand() else {
        return Ok(());
    };
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let chart = sub.get_flag("chart");
    let dash = build(conn, sub)?;

    if chart {
        let payload = match view {
            "summary" => json!(summary_cards(&dash.summary)),
            "bar" => json!(bar_chart(&dash.series)),
            "pie" => json!(pie_chart(&dash.series.shares)),
            _ => json!({
                "cards": summary_cards(&dash.summary),
                "bar": bar_chart(&dash.series),
                "pie": pie_chart(&dash.series.shares),
            }),
        };
        if !maybe_print_json(json_flag, jsonl_flag, &payload)? {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        return Ok(());
    }

    let printed = match view {
        "summary" => maybe_print_json(json_flag, jsonl_flag, &dash.summary)?,
        "bar" => maybe_print_json(json_flag, jsonl_flag, &dash.series.series)?,
        "pie" => maybe_print_json(json_flag, jsonl_flag, &dash.series.shares)?,
        _ => maybe_print_json(json_flag, jsonl_flag, &dash)?,
    };
    if printed {
        return Ok(());
    }
    match view {
        "summary" => print_summary(&dash),
        "bar" => print_bar(&dash),
        "pie" => print_pie(&dash),
        _ => {
            print_summary(&dash);
            print_bar(&dash);
            print_pie(&dash);
        }
    }
    Ok(())
}

fn print_summary(dash: &Dashboard) {
    let s = &dash.summary;
    println!(
        "Data Audit Minggu: {} - {}",
        fmt_long_date(s.week_label_start),
        fmt_long_date(s.week_label_end)
    );
    let rows = summary_cards(s)
        .into_iter()
        .map(|c| {
            vec![
                c.title.to_string(),
                fmt_rupiah(&c.value),
                fmt_rupiah_diff(&c.diff),
                format!("{:?}", c.trend).to_lowercase(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Metrik", "Minggu ini", "Perubahan", "Tren"], rows)
    );
}

fn print_bar(dash: &Dashboard) {
    let headers: Vec<String> = std::iter::once("Produk".to_string())
        .chain(dash.series.buckets.iter().map(|b| {
            format!(
                "Minggu {} ({} - {})",
                b.position + 1,
                fmt_short_date(b.label_start),
                fmt_short_date(b.label_end)
            )
        }))
        .collect();
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = dash
        .series
        .series
        .iter()
        .map(|s| {
            std::iter::once(s.product_name.clone())
                .chain(s.quantities.iter().map(|q| q.to_string()))
                .collect()
        })
        .collect();
    println!("Grafik Penjualan (4 Minggu Terakhir)");
    println!("{}", pretty_table(&header_refs, rows));
}

fn print_pie(dash: &Dashboard) {
    println!("Persentase Penjualan (4 minggu terakhir)");
    if dash.series.shares.is_empty() {
        println!("Belum ada data penjualan");
        return;
    }
    let rows = dash
        .series
        .shares
        .iter()
        .map(|s| {
            vec![
                s.product_name.clone(),
                s.total_quantity.to_string(),
                format!("{:.1}%", s.share_percent),
                pie_label(s).unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Produk", "Terjual", "Porsi", "Label"], rows)
    );
}
