// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON document per line"),
    )
}

fn window_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("today")
            .long("today")
            .value_name("YYYY-MM-DD")
            .help("Reference date used when the ledger has no dated records"),
    )
    .arg(
        Arg::new("products")
            .long("products")
            .value_name("NAMES")
            .help("Comma-separated product names charted individually"),
    )
    .arg(
        Arg::new("file")
            .long("file")
            .value_name("PATH")
            .help("Read records from an /audit JSON dump instead of the cache"),
    )
}

fn dashboard_view(name: &'static str, about: &'static str) -> Command {
    let cmd = Command::new(name).about(about).arg(
        Arg::new("chart")
            .long("chart")
            .action(ArgAction::SetTrue)
            .help("Emit chart-ready JSON instead of the raw aggregates"),
    );
    json_args(window_args(cmd))
}

pub fn build_cli() -> Command {
    Command::new("umkmboard")
        .about("Weekly sales/expense dashboard for UMKM audit ledgers")
        .version(clap::crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Raise log verbosity (-v debug, -vv trace)"),
        )
        .subcommand(Command::new("init").about("Create the local cache"))
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").long("key").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                )
                .subcommand(Command::new("unset").arg(Arg::new("key").long("key").required(true))),
        )
        .subcommand(
            Command::new("login")
                .about("Log in to the shop API and store the token")
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(Command::new("whoami").about("Show the logged-in user"))
        .subcommand(
            Command::new("sync")
                .about("Refresh the local snapshot")
                .subcommand(
                    Command::new("audit").arg(
                        Arg::new("file")
                            .long("file")
                            .value_name("PATH")
                            .help("Load an /audit JSON dump instead of calling the API"),
                    ),
                )
                .subcommand(
                    Command::new("products").arg(
                        Arg::new("file")
                            .long("file")
                            .value_name("PATH")
                            .help("Load a /produk JSON dump instead of calling the API"),
                    ),
                )
                .subcommand(Command::new("status")),
        )
        .subcommand(
            Command::new("audit")
                .about("Browse cached transactions")
                .subcommand(json_args(
                    Command::new("list")
                        .arg(
                            Arg::new("tab")
                                .long("tab")
                                .value_parser(["pemasukan", "pengeluaran"])
                                .default_value("pemasukan"),
                        )
                        .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_args(
                    Command::new("search")
                        .arg(Arg::new("term").long("term").default_value(""))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .default_value("20"),
                        ),
                )),
        )
        .subcommand(
            Command::new("products")
                .about("Cached product metadata")
                .subcommand(json_args(Command::new("list"))),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Weekly summary and 4-week charts")
                .subcommand(dashboard_view("summary", "Income, expense and profit vs. previous week"))
                .subcommand(dashboard_view("bar", "Units sold per product, last 4 weeks"))
                .subcommand(dashboard_view("pie", "Product share of units, last 4 weeks"))
                .subcommand(dashboard_view("all", "Everything above")),
        )
        .subcommand(json_args(
            Command::new("forecast")
                .about("Ask the forecasting service about a product")
                .arg(Arg::new("product").long("product").required(true))
                .arg(
                    Arg::new("steps")
                        .long("steps")
                        .value_parser(value_parser!(u32).range(1..=52))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("metric")
                        .long("metric")
                        .value_parser(["jumlah", "pendapatan"])
                        .default_value("jumlah"),
                )
                .arg(
                    Arg::new("chart")
                        .long("chart")
                        .action(ArgAction::SetTrue)
                        .help("Emit the line-chart JSON"),
                ),
        ))
        .subcommand(
            Command::new("export")
                .about("Export dashboard data")
                .subcommand(window_args(
                    Command::new("series")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )),
        )
        .subcommand(Command::new("doctor").about("Report records the dashboard cannot use as-is"))
}
