mod commands;

use clap::Parser;
use log::error;

use crate::commands::{use_command, Commands};

#[derive(Parser)]
#[command(name = "rusbit-announce", version, about = "Announce to a BitTorrent HTTP tracker")]
struct Cli {
    /// Path to the TOML config file (created with defaults if missing).
    #[arg(long, default_value = rusbit_announce::config::DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = use_command(&cli.config, cli.command) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
