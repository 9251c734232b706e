//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// Build the `thinqscribe` command tree
#[must_use]
pub fn command() -> Command {
    Command::new("thinqscribe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("ThinqScribe client utilities: location, chat persistence, payment status")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory for persisted state (overrides the config file)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("location")
                .about("Show the detected location and currency")
                .arg(
                    Arg::new("refresh")
                        .long("refresh")
                        .action(ArgAction::SetTrue)
                        .help("Bypass cached data"),
                )
                .subcommand(Command::new("clear").about("Remove cached location data")),
        )
        .subcommand(
            Command::new("chat")
                .about("Inspect persisted chat state")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List saved conversations"))
                .subcommand(Command::new("show").about("Print the current conversation"))
                .subcommand(Command::new("clear").about("Remove all persisted chat data"))
                .subcommand(
                    Command::new("restore-flag")
                        .about("Manage the force-restore flag")
                        .arg(
                            Arg::new("action")
                                .required(true)
                                .value_parser(["set", "check", "clear"])
                                .help("Flag operation"),
                        ),
                ),
        )
        .subcommand(
            Command::new("payment")
                .about("Payment display helpers")
                .subcommand_required(true)
                .subcommand(
                    Command::new("status")
                        .about("Canonical status for a payment object")
                        .arg(
                            Arg::new("json")
                                .required(true)
                                .help(r#"Payment object, e.g. '{"status":"processing"}'"#),
                        ),
                ),
        )
}
