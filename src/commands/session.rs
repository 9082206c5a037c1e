// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Settings, set_setting};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn login(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let username = sub.get_one::<String>("username").unwrap().trim();
    let password = sub.get_one::<String>("password").unwrap();
    let settings = Settings::load(conn)?;
    let token = settings
        .api_client()?
        .login(username, password)
        .with_context(|| format!("Login as '{}' failed", username))?;
    set_setting(conn, "token", &token)?;
    tracing::info!(username, "token stored");
    println!("Logged in as {}", username);
    Ok(())
}

pub fn whoami(conn: &Connection) -> Result<()> {
    let settings = Settings::load(conn)?;
    let user = settings.api_client()?.me()?;
    println!("{} (id {})", user.username, user.id);
    Ok(())
}
