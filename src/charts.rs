// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Chart-ready shapes for the dashboard's cards, bar, pie and prediction charts.

use crate::dashboard::{FourWeekSeries, OTHER_PRODUCT, ProductShare, WeeklySummary};
use crate::models::ForecastResponse;
use crate::utils::fmt_short_date;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub const FALLBACK_COLOR: &str = "#607D8B";

static PALETTE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Kerupuk Kulit", "#4CAF50"),
        ("Stik Bawang", "#FF9800"),
        ("Keripik Bawang", "#2196F3"),
        (OTHER_PRODUCT, "#9E9E9E"),
    ])
});

pub fn color_for(product: &str) -> &'static str {
    PALETTE.get(product).copied().unwrap_or(FALLBACK_COLOR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn of(diff: &Decimal) -> Self {
        if diff.is_zero() {
            Trend::Stable
        } else if diff.is_sign_negative() {
            Trend::Down
        } else {
            Trend::Up
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub title: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub diff: Decimal,
    pub trend: Trend,
    /// Any movement is worth flagging (expenses).
    pub alert: bool,
}

pub fn summary_cards(s: &WeeklySummary) -> Vec<SummaryCard> {
    vec![
        SummaryCard {
            title: "Total Pendapatan",
            value: s.income,
            diff: s.diff_income,
            trend: Trend::of(&s.diff_income),
            alert: s.diff_income.is_sign_negative() && !s.diff_income.is_zero(),
        },
        SummaryCard {
            title: "Total Pengeluaran",
            value: s.expense,
            diff: s.diff_expense,
            trend: Trend::of(&s.diff_expense),
            alert: !s.diff_expense.is_zero(),
        },
        SummaryCard {
            title: "Profit Penjualan",
            value: s.profit,
            diff: s.diff_profit,
            trend: Trend::of(&s.diff_profit),
            alert: s.diff_profit.is_sign_negative() && !s.diff_profit.is_zero(),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarDataset {
    pub label: String,
    pub data: Vec<i64>,
    pub background_color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartData {
    /// Two-line x-axis labels: `Minggu n` and the reported sales period.
    pub labels: Vec<[String; 2]>,
    pub datasets: Vec<BarDataset>,
}

pub fn bar_chart(series: &FourWeekSeries) -> BarChartData {
    let labels = series
        .buckets
        .iter()
        .map(|b| {
            [
                format!("Minggu {}", b.position + 1),
                format!(
                    "({} - {})",
                    fmt_short_date(b.label_start),
                    fmt_short_date(b.label_end)
                ),
            ]
        })
        .collect();
    let datasets = series
        .series
        .iter()
        .map(|s| BarDataset {
            label: s.product_name.clone(),
            data: s.quantities.to_vec(),
            background_color: color_for(&s.product_name),
        })
        .collect();
    BarChartData { labels, datasets }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieDataset {
    pub data: Vec<i64>,
    pub background_color: Vec<&'static str>,
    pub border_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<PieDataset>,
}

pub fn pie_chart(shares: &[ProductShare]) -> PieChartData {
    PieChartData {
        labels: shares.iter().map(|s| s.product_name.clone()).collect(),
        datasets: vec![PieDataset {
            data: shares.iter().map(|s| s.total_quantity).collect(),
            background_color: shares.iter().map(|s| color_for(&s.product_name)).collect(),
            border_width: 1,
        }],
    }
}

/// Slice label; thin slices (5% or less) stay unlabeled.
pub fn pie_label(share: &ProductShare) -> Option<String> {
    if share.share_percent > 5.0 {
        Some(format!("{}%", share.share_percent.round() as i64))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastMetric {
    /// Units sold.
    Jumlah,
    /// Revenue in rupiah.
    Pendapatan,
}

impl ForecastMetric {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "jumlah" | "qty" | "units" => Some(ForecastMetric::Jumlah),
            "pendapatan" | "revenue" => Some(ForecastMetric::Pendapatan),
            _ => None,
        }
    }

    pub fn axis_title(&self) -> &'static str {
        match self {
            ForecastMetric::Jumlah => "Jumlah (Pcs)",
            ForecastMetric::Pendapatan => "Pendapatan (Rp)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDataset {
    pub label: &'static str,
    pub data: Vec<Option<f64>>,
    pub border_color: &'static str,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<LineDataset>,
    pub axis_title: &'static str,
}

/// Unit price implied by the first forecast step, 0 when it predicts nothing.
pub fn estimated_unit_price(forecast: &ForecastResponse) -> f64 {
    match forecast.forecast_data.first() {
        Some(p) if p.prediksi_jumlah_terjual > 0 => {
            p.prediksi_pendapatan as f64 / p.prediksi_jumlah_terjual as f64
        }
        _ => 0.0,
    }
}

/// Historical line followed by a dashed forecast line that starts on the last
/// historical point so the two connect.
pub fn prediction_chart(forecast: &ForecastResponse, metric: ForecastMetric) -> LineChartData {
    let price = estimated_unit_price(forecast);
    let hist: Vec<f64> = forecast
        .historical_data
        .iter()
        .map(|h| match metric {
            ForecastMetric::Jumlah => h.jumlah as f64,
            ForecastMetric::Pendapatan => h.jumlah as f64 * price,
        })
        .collect();
    let ahead: Vec<f64> = forecast
        .forecast_data
        .iter()
        .map(|p| match metric {
            ForecastMetric::Jumlah => p.prediksi_jumlah_terjual as f64,
            ForecastMetric::Pendapatan => p.prediksi_pendapatan as f64,
        })
        .collect();

    let labels = forecast
        .historical_data
        .iter()
        .map(|h| h.tanggal.clone())
        .chain(forecast.forecast_data.iter().map(|p| p.tanggal_audit.clone()))
        .collect();

    let mut hist_data: Vec<Option<f64>> = hist.iter().copied().map(Some).collect();
    hist_data.extend(std::iter::repeat(None).take(ahead.len()));

    let mut ahead_data: Vec<Option<f64>> = Vec::with_capacity(hist.len() + ahead.len());
    if let Some(last) = hist.last() {
        ahead_data.extend(std::iter::repeat(None).take(hist.len() - 1));
        ahead_data.push(Some(*last));
    }
    ahead_data.extend(ahead.iter().copied().map(Some));

    LineChartData {
        labels,
        datasets: vec![
            LineDataset {
                label: "Data Historis",
                data: hist_data,
                border_color: "#FCAA0B",
                dashed: false,
            },
            LineDataset {
                label: "Prediksi Masa Depan",
                data: ahead_data,
                border_color: "#00A86B",
                dashed: true,
            },
        ],
        axis_title: metric.axis_title(),
    }
}
