//! clap command tree

use clap::{Arg, ArgAction, Command};

/// Build the `stockguard` command.
pub fn build_cli() -> Command {
    Command::new("stockguard")
        .about("Stock reservation ledger that prevents overselling")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("db")
                .long("db")
                .value_name("DIR")
                .global(true)
                .help("Data directory holding the journal"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .global(true)
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("ephemeral")
                .long("ephemeral")
                .action(ArgAction::SetTrue)
                .global(true)
                .conflicts_with("db")
                .help("Keep the ledger in memory only"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .global(true)
                .help("tracing filter (overrides RUST_LOG)"),
        )
        .subcommand(Command::new("inventory").about("List every item with its status"))
        .subcommand(
            Command::new("sale")
                .about("Sell one unit")
                .arg(Arg::new("item").required(true)),
        )
        .subcommand(
            Command::new("trial")
                .about("Fire simultaneous sales at one item")
                .arg(Arg::new("item").required(true))
                .arg(
                    Arg::new("requests")
                        .short('n')
                        .long("requests")
                        .value_parser(clap::value_parser!(usize))
                        .help("Number of simultaneous attempts"),
                )
                .arg(
                    Arg::new("hold-ms")
                        .long("hold-ms")
                        .value_parser(clap::value_parser!(u64))
                        .help("Time each winner holds the lock"),
                ),
        )
        .subcommand(
            Command::new("checkin")
                .about("Receive one unit")
                .arg(Arg::new("item").required(true))
                .arg(
                    Arg::new("defective")
                        .long("defective")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("return")
                .about("Route one returned unit")
                .arg(Arg::new("item").required(true))
                .arg(
                    Arg::new("destination")
                        .required(true)
                        .help("shelf, repair or trash"),
                ),
        )
        .subcommand(
            Command::new("seed")
                .about("Create or overwrite an item's count")
                .arg(Arg::new("item").required(true))
                .arg(
                    Arg::new("count")
                        .required(true)
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(Arg::new("name").long("name")),
        )
        .subcommand(
            Command::new("item")
                .about("Read one item")
                .arg(Arg::new("item").required(true)),
        )
        .subcommand(
            Command::new("bin").about("List a bin").arg(
                Arg::new("bin")
                    .required(true)
                    .value_parser(["repair", "trash"]),
            ),
        )
        .subcommand(Command::new("stats").about("Store counters"))
}
