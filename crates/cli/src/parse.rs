//! ArgMatches to Command conversion

use clap::ArgMatches;
use stockguard_core::Bin;
use stockguard_executor::Command;

/// What a subcommand asks for.
pub enum CliAction {
    /// Run through the executor
    Execute(Command),
    /// A trial with an explicit hold, which bypasses the executor
    Trial {
        item: String,
        requests: Option<usize>,
        hold_ms: u64,
    },
}

fn item(m: &ArgMatches) -> Result<String, String> {
    m.get_one::<String>("item")
        .cloned()
        .ok_or_else(|| "missing item".to_string())
}

/// Convert clap matches into a [`CliAction`].
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub, m) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    let command = match sub {
        "inventory" => Command::Inventory,
        "stats" => Command::Stats,
        "sale" => Command::Sale { item_key: item(m)? },
        "item" => Command::Item { item_key: item(m)? },
        "trial" => {
            let requests = m.get_one::<usize>("requests").copied();
            if let Some(hold_ms) = m.get_one::<u64>("hold-ms").copied() {
                return Ok(CliAction::Trial {
                    item: item(m)?,
                    requests,
                    hold_ms,
                });
            }
            Command::Trial {
                item_key: item(m)?,
                num_requests: requests,
            }
        }
        "checkin" => Command::CheckIn {
            item_key: item(m)?,
            is_defective: m.get_flag("defective"),
        },
        "return" => Command::Return {
            item_key: item(m)?,
            destination: m
                .get_one::<String>("destination")
                .cloned()
                .ok_or("missing destination")?,
        },
        "seed" => Command::Seed {
            item_key: item(m)?,
            name: m.get_one::<String>("name").cloned(),
            count: m.get_one::<u64>("count").copied().ok_or("missing count")?,
        },
        "bin" => {
            let bin = match m.get_one::<String>("bin").map(String::as_str) {
                Some("repair") => Bin::Repair,
                Some("trash") => Bin::Trash,
                other => return Err(format!("Unknown bin: {:?}", other)),
            };
            Command::Bin { bin }
        }
        other => return Err(format!("Unknown command: {}", other)),
    };
    Ok(CliAction::Execute(command))
}
