// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db::{replace_audit_records, replace_products, sync_status};
use crate::records::payload_items;
use crate::utils::pretty_table;
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("audit", sub)) => sync_audit(conn, sub)?,
        Some(("products", sub)) => sync_products(conn, sub)?,
        Some(("status", _)) => status(conn)?,
        _ => {}
    }
    Ok(())
}

/// `--file` contents when given, otherwise whatever `fetch` returns.
fn read_source<F>(sub: &clap::ArgMatches, fetch: F) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    match sub.get_one::<String>("file").map(|s| s.trim()) {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Read payload {}", path))
        }
        None => fetch(),
    }
}

fn sync_audit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let body = read_source(sub, || {
        let settings = Settings::load(conn)?;
        Ok(settings
            .api_client()?
            .audit_payload()
            .context("Fetching audit records failed")?)
    })?;
    let items = payload_items(&body)?;
    let n = replace_audit_records(conn, &items)?;
    tracing::info!(records = n, "audit snapshot replaced");
    println!("Synced {} audit records", n);
    Ok(())
}

fn sync_products(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let body = read_source(sub, || {
        let settings = Settings::load(conn)?;
        Ok(settings
            .api_client()?
            .products_payload()
            .context("Fetching products failed")?)
    })?;
    let items = payload_items(&body)?;
    let n = replace_products(conn, &items)?;
    tracing::info!(products = n, "product snapshot replaced");
    println!("Synced {} products", n);
    Ok(())
}

fn status(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();
    for table in ["audit_records", "products"] {
        let (synced, count) = sync_status(conn, table)?;
        rows.push(vec![
            table.to_string(),
            count.to_string(),
            synced.unwrap_or_else(|| "never".to_string()),
        ]);
    }
    println!("{}", pretty_table(&["Snapshot", "Rows", "Synced at"], rows));
    Ok(())
}
