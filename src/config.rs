// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::dashboard::{DEFAULT_PRODUCTS, EngineOptions};
use crate::utils::parse_utc_offset;
use anyhow::{Result, anyhow};
use chrono::FixedOffset;
use rusqlite::{Connection, OptionalExtension, params};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_FORECAST_URL: &str = "http://localhost:5001";
pub const DEFAULT_UTC_OFFSET: &str = "+07:00";
pub const TOKEN_ENV: &str = "UMKMBOARD_TOKEN";

pub const KEYS: &[&str] = &[
    "api_url",
    "forecast_url",
    "token",
    "utc_offset",
    "products",
    "null_product_as_expense",
];

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn parse_products(s: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(anyhow!("Invalid boolean '{}', expected true|false", other)),
    }
}

/// Validates and normalizes `value` for `key`, then stores it.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    let normalized = match key {
        "api_url" | "forecast_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(anyhow!("{} must start with http:// or https://", key));
            }
            value.trim_end_matches('/').to_string()
        }
        "token" => {
            if value.is_empty() {
                return Err(anyhow!("token must not be empty"));
            }
            value.to_string()
        }
        "utc_offset" => parse_utc_offset(value)?.to_string(),
        "products" => {
            let names = parse_products(value);
            if names.is_empty() {
                return Err(anyhow!("products needs at least one name"));
            }
            names.join(",")
        }
        "null_product_as_expense" => parse_bool(value)?.to_string(),
        other => {
            return Err(anyhow!(
                "Unknown setting '{}' (known: {})",
                other,
                KEYS.join(", ")
            ));
        }
    };
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, normalized],
    )?;
    Ok(normalized)
}

pub fn unset_setting(conn: &Connection, key: &str) -> Result<bool> {
    if !KEYS.contains(&key) {
        return Err(anyhow!("Unknown setting '{}'", key));
    }
    let n = conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(n > 0)
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub forecast_url: String,
    pub token: Option<String>,
    pub offset: FixedOffset,
    pub products: Vec<String>,
    pub null_product_as_expense: bool,
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Self> {
        let offset_raw =
            get_setting(conn, "utc_offset")?.unwrap_or_else(|| DEFAULT_UTC_OFFSET.to_string());
        let products = get_setting(conn, "products")?
            .map(|s| parse_products(&s))
            .unwrap_or_else(|| DEFAULT_PRODUCTS.iter().map(|s| s.to_string()).collect());
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or(get_setting(conn, "token")?);
        Ok(Self {
            api_url: get_setting(conn, "api_url")?.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            forecast_url: get_setting(conn, "forecast_url")?
                .unwrap_or_else(|| DEFAULT_FORECAST_URL.to_string()),
            token,
            offset: parse_utc_offset(&offset_raw)?,
            products,
            null_product_as_expense: get_setting(conn, "null_product_as_expense")?
                .map(|s| parse_bool(&s))
                .transpose()?
                .unwrap_or(true),
        })
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            offset: self.offset,
            null_product_as_expense: self.null_product_as_expense,
        }
    }

    pub fn api_client(&self) -> Result<ApiClient> {
        ApiClient::new(
            Some(self.api_url.clone()),
            Some(self.forecast_url.clone()),
            self.token.clone(),
        )
    }
}
