// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Product, TransactionRecord};
use anyhow::{Context, Result};
use chrono::Utc;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Umkmboard", "umkmboard"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("umkmboard.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- Verbatim elements of the last /audit snapshot, in server order
    CREATE TABLE IF NOT EXISTS audit_records(
        row_id INTEGER PRIMARY KEY AUTOINCREMENT,
        record_id INTEGER,
        payload TEXT NOT NULL,
        synced_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS products(
        row_id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_id INTEGER,
        nama_produk TEXT,
        payload TEXT NOT NULL,
        synced_at TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}

fn item_id(item: &Value) -> Option<i64> {
    match item.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Replaces the cached audit snapshot in one transaction.
pub fn replace_audit_records(conn: &mut Connection, items: &[Value]) -> Result<usize> {
    let now = Utc::now();
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM audit_records", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO audit_records(record_id, payload, synced_at) VALUES (?1, ?2, ?3)",
        )?;
        for item in items {
            stmt.execute(params![item_id(item), serde_json::to_string(item)?, now])?;
        }
    }
    tx.commit()?;
    Ok(items.len())
}

pub fn replace_products(conn: &mut Connection, items: &[Value]) -> Result<usize> {
    let now = Utc::now();
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM products", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO products(product_id, nama_produk, payload, synced_at) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for item in items {
            let name = item.get("nama_produk").and_then(Value::as_str);
            stmt.execute(params![item_id(item), name, serde_json::to_string(item)?, now])?;
        }
    }
    tx.commit()?;
    Ok(items.len())
}

fn load_payloads<T: DeserializeOwned>(conn: &Connection, table: &str) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(&format!("SELECT row_id, payload FROM {table} ORDER BY row_id"))?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?;
    let mut out = Vec::new();
    for row in rows {
        let (row_id, payload) = row?;
        match serde_json::from_str::<T>(&payload) {
            Ok(v) => out.push(v),
            Err(err) => tracing::debug!(table, row_id, %err, "skipping unreadable cached row"),
        }
    }
    Ok(out)
}

pub fn load_audit_records(conn: &Connection) -> Result<Vec<TransactionRecord>> {
    load_payloads(conn, "audit_records")
}

pub fn load_products(conn: &Connection) -> Result<Vec<Product>> {
    load_payloads(conn, "products")
}

/// When the table was last synced and how many rows it holds.
pub fn sync_status(conn: &Connection, table: &str) -> Result<(Option<String>, i64)> {
    let synced: Option<String> = conn
        .query_row(
            &format!("SELECT synced_at FROM {table} ORDER BY row_id DESC LIMIT 1"),
            [],
            |r| r.get(0),
        )
        .optional()?;
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
    Ok((synced, count))
}
