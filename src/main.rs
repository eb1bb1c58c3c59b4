//! Telegram Message Purge CLI - main entry point
//!
//! Interactive only: every choice is made through the console menu.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use telegram_purge::config::CREDENTIALS_HELP;
use telegram_purge::{commands, Config};

#[derive(Parser)]
#[command(name = "telegram_purge")]
#[command(about = "Delete your own Telegram messages in chats, groups and private dialogs", long_about = None)]
#[command(version)]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they do not interleave with the menu
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("telegram_purge=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let _cli = Cli::parse();

    let config = Config::new()?;
    if let Err(err) = config.validate() {
        tracing::warn!("{}", err);
        println!("{}", CREDENTIALS_HELP);
        return Ok(());
    }

    let result = commands::interactive_run(config).await;
    if let Err(err) = &result {
        eprintln!("❌ {}", err);
    }

    // A pending stdin read keeps a blocking thread alive; do not wait for it
    std::process::exit(if result.is_ok() { 0 } else { 1 });
}
