// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Settings, TOKEN_ENV, set_setting, unset_setting};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(conn)?,
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap();
            let stored = set_setting(conn, key, value)?;
            if key == "token" {
                println!("Set token ({})", mask(&stored));
            } else {
                println!("Set {} = {}", key, stored);
            }
        }
        Some(("unset", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            if unset_setting(conn, key)? {
                println!("Reset {} to its default", key);
            } else {
                println!("{} was not set", key);
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn mask(token: &str) -> String {
    let head: String = token.chars().take(6).collect();
    if token.chars().count() > 6 {
        format!("{}…", head)
    } else {
        "…".to_string()
    }
}

fn show(conn: &Connection) -> Result<()> {
    let s = Settings::load(conn)?;
    let token = match &s.token {
        Some(t) if std::env::var(TOKEN_ENV).is_ok() => format!("{} (from {})", mask(t), TOKEN_ENV),
        Some(t) => mask(t),
        None => "(not logged in)".to_string(),
    };
    let rows = vec![
        vec!["api_url".to_string(), s.api_url.clone()],
        vec!["forecast_url".to_string(), s.forecast_url.clone()],
        vec!["token".to_string(), token],
        vec!["utc_offset".to_string(), s.offset.to_string()],
        vec!["products".to_string(), s.products.join(", ")],
        vec![
            "null_product_as_expense".to_string(),
            s.null_product_as_expense.to_string(),
        ],
    ];
    println!("{}", pretty_table(&["Key", "Value"], rows));
    Ok(())
}
