// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::load_products;
use crate::utils::{fmt_rupiah, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let products = load_products(conn)?;
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &products)? {
            let rows = products
                .iter()
                .map(|p| {
                    vec![
                        p.name().to_string(),
                        p.unit.clone().unwrap_or_default(),
                        p.stok_tersedia.to_string(),
                        fmt_rupiah(&p.harga),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Produk", "Unit", "Sisa Stok", "Harga"], rows)
            );
        }
    }
    Ok(())
}
