use anyhow::Context;
use clap::Parser;
use tracing::debug;

use wings_client::cli::Cli;
use wings_client::config::WingsConfig;
use wings_client::interfaces::cli::run_cli_command;
use wings_client::system::logging::init_logging;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = WingsConfig::load(cli.config.as_deref());
    cli.node.apply(&mut config);

    let _guard = init_logging(&config.logging).context("Failed to initialize logging")?;
    debug!(
        "wingsctl {} targeting {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.node.host,
        config.node.port
    );

    if let Err(e) = run_cli_command(cli.command, &config) {
        eprintln!("{}", e.format_colored());
        std::process::exit(e.exit_code());
    }

    Ok(())
}
