// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::charts::{ForecastMetric, prediction_chart};
use crate::config::Settings;
use crate::models::ForecastRequest;
use crate::utils::{fmt_rupiah, maybe_print_json, pretty_table};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let product = sub.get_one::<String>("product").unwrap().trim().to_string();
    if product.is_empty() {
        return Err(anyhow!("--product must not be empty"));
    }
    let steps = *sub.get_one::<u32>("steps").unwrap_or(&1);
    let metric_raw = sub.get_one::<String>("metric").unwrap();
    let metric = ForecastMetric::parse(metric_raw)
        .ok_or_else(|| anyhow!("Unknown metric '{}'", metric_raw))?;

    let settings = Settings::load(conn)?;
    let req = ForecastRequest {
        product_name: product.clone(),
        forecast_steps: steps,
    };
    let resp = settings
        .api_client()?
        .predict(&req)
        .with_context(|| format!("Forecast for '{}' failed", product))?;

    if sub.get_flag("chart") {
        let chart = prediction_chart(&resp, metric);
        if !maybe_print_json(json_flag, jsonl_flag, &chart)? {
            println!("{}", serde_json::to_string_pretty(&chart)?);
        }
        return Ok(());
    }
    if maybe_print_json(json_flag, jsonl_flag, &resp)? {
        return Ok(());
    }

    let hist = resp
        .historical_data
        .iter()
        .map(|h| vec![h.tanggal.clone(), h.jumlah.to_string()])
        .collect();
    println!("Data historis: {}", product);
    println!("{}", pretty_table(&["Tanggal", "Jumlah"], hist));

    let ahead = resp
        .forecast_data
        .iter()
        .map(|p| {
            vec![
                p.tanggal_audit.clone(),
                p.prediksi_jumlah_terjual.to_string(),
                fmt_rupiah(&Decimal::from(p.prediksi_pendapatan)),
            ]
        })
        .collect();
    println!("Prediksi {} minggu ke depan", steps);
    println!(
        "{}",
        pretty_table(&["Tanggal Audit", "Prediksi Jumlah", "Prediksi Pendapatan"], ahead)
    );
    Ok(())
}
