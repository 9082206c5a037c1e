// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Normalized transaction classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Income,
    Expense,
}

/// Every spelling of `jenis_transaksi` the ledger is known to emit.
pub const CATEGORY_TABLE: &[(&str, Category)] = &[
    ("penjualan", Category::Income),
    ("pemasukan", Category::Income),
    ("pengeluaran", Category::Expense),
];

impl Category {
    pub fn from_label(raw: &str) -> Option<Self> {
        let norm = raw.trim().to_lowercase();
        CATEGORY_TABLE
            .iter()
            .find(|(label, _)| *label == norm)
            .map(|(_, c)| *c)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Income => "pemasukan",
            Category::Expense => "pengeluaran",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    #[serde(default, deserialize_with = "lenient_string")]
    pub nama_produk: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,
}

/// One row of the `/audit` listing. Numeric fields accept numbers or numeric
/// strings; anything else reads as zero so a single bad row never aborts a load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub jenis_transaksi: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tanggal: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub jumlah: i64,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub harga_satuan: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total_pendapatan: Decimal,
    #[serde(default, deserialize_with = "lenient_product")]
    pub produk: Option<ProductRef>,
    #[serde(
        default,
        skip_serializing_if = "ProductId::is_missing",
        deserialize_with = "lenient_product_id"
    )]
    pub produk_id: ProductId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sumber_pengeluaran: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub keterangan: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub satuan: Option<String>,
}

impl TransactionRecord {
    pub fn category(&self) -> Option<Category> {
        self.jenis_transaksi.as_deref().and_then(Category::from_label)
    }

    /// Audit timestamp in the reporting timezone, `None` when `tanggal` is
    /// missing or unparseable.
    pub fn audited_at(&self, offset: &FixedOffset) -> Option<NaiveDateTime> {
        self.tanggal
            .as_deref()
            .and_then(|raw| parse_timestamp(raw, offset))
    }

    pub fn product_name(&self) -> Option<&str> {
        self.produk
            .as_ref()
            .and_then(|p| p.nama_produk.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Product name for sales, source description for expenses.
    pub fn source_label(&self) -> &str {
        self.product_name()
            .or(self.sumber_pengeluaran.as_deref())
            .unwrap_or("-")
    }

    pub fn unit(&self) -> Option<&str> {
        self.produk
            .as_ref()
            .and_then(|p| p.unit.as_deref())
            .or(self.satuan.as_deref())
    }
}

/// What the ledger sent under `produk_id`. Only an explicit `null` marks an
/// expense-only record; a missing key does not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductId {
    #[default]
    Missing,
    Null,
    Id(i64),
    /// Present but neither null nor numeric.
    Invalid,
}

impl ProductId {
    pub fn id(&self) -> Option<i64> {
        match self {
            ProductId::Id(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        *self == ProductId::Null
    }

    pub fn is_missing(&self) -> bool {
        *self == ProductId::Missing
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self.id() {
            Some(n) => s.serialize_i64(n),
            None => s.serialize_none(),
        }
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Reads an audit timestamp as wall-clock time at `offset`, truncated to
/// millisecond precision. Values carrying their own offset are converted;
/// naive values are taken as already local; a bare date is local midnight.
pub fn parse_timestamp(raw: &str, offset: &FixedOffset) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(offset).naive_local().trunc_subsecs(3));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.trunc_subsecs(3));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Product metadata from `/produk`; display only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nama_produk: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,
    #[serde(default, alias = "stok", deserialize_with = "lenient_i64")]
    pub stok_tersedia: i64,
    #[serde(default, alias = "harga_satuan", deserialize_with = "lenient_decimal")]
    pub harga: Decimal,
    #[serde(default, alias = "detail", deserialize_with = "lenient_string")]
    pub deskripsi: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gambar: Option<String>,
}

impl Product {
    pub fn name(&self) -> &str {
        self.nama_produk.as_deref().unwrap_or("-")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: i64,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastRequest {
    pub product_name: String,
    pub forecast_steps: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    #[serde(default)]
    pub tanggal: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub jumlah: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(default)]
    pub tanggal_audit: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub produk: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub prediksi_jumlah_terjual: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub prediksi_pendapatan: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub historical_data: Vec<HistoricalPoint>,
    #[serde(default)]
    pub forecast_data: Vec<ForecastPoint>,
}

fn number_text(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_decimal<'de, D>(d: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(number_text(&v)
        .and_then(|s| {
            s.parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(&s).ok())
        })
        .unwrap_or(Decimal::ZERO))
}

fn parse_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

fn lenient_i64<'de, D>(d: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(parse_i64(&v).unwrap_or(0))
}

fn lenient_product_id<'de, D>(d: D) -> Result<ProductId, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Null => ProductId::Null,
        other => parse_i64(&other).map_or(ProductId::Invalid, ProductId::Id),
    })
}

fn lenient_product<'de, D>(d: D) -> Result<Option<ProductRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Object(_) => serde_json::from_value(v).ok(),
        _ => None,
    })
}
