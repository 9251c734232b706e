use std::path::PathBuf;
use thinq_cli::{cli, logging, payment_status, App, AppConfig, RestoreFlagAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli::command().get_matches();

    logging::init(matches.get_flag("log-json"))?;

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = matches.get_one::<PathBuf>("data-dir") {
        config = config.with_data_dir(dir.clone());
    }

    let output = match matches.subcommand() {
        Some(("location", args)) => {
            let app = App::from_config(&config)?;
            match args.subcommand() {
                Some(("clear", _)) => app.clear_location().await,
                _ => app.show_location(args.get_flag("refresh")).await,
            }
        }
        Some(("chat", args)) => {
            let app = App::from_config(&config)?;
            match args.subcommand() {
                Some(("list", _)) => app.list_conversations(),
                Some(("show", _)) => app.show_current()?,
                Some(("clear", _)) => app.clear_chat()?,
                Some(("restore-flag", flag)) => {
                    let action = flag
                        .get_one::<String>("action")
                        .and_then(|value| RestoreFlagAction::parse(value))
                        .ok_or_else(|| anyhow::anyhow!("expected set, check, or clear"))?;
                    app.restore_flag(action)?
                }
                _ => anyhow::bail!("unknown chat command"),
            }
        }
        Some(("payment", args)) => match args.subcommand() {
            Some(("status", status)) => {
                let json = status
                    .get_one::<String>("json")
                    .ok_or_else(|| anyhow::anyhow!("missing payment JSON"))?;
                payment_status(json)?
            }
            _ => anyhow::bail!("unknown payment command"),
        },
        _ => anyhow::bail!("no command given"),
    };

    println!("{output}");
    Ok(())
}
