//! Node commands: ping, system, ips, servers, logs, power

use colored::Colorize;
use serde_json::Value;

use crate::interfaces::cli::CliError;
use crate::wings::{PowerAction, Wings, WingsResponse};

fn print_json(title: &str, response: &WingsResponse) -> Result<(), CliError> {
    let pretty = serde_json::to_string_pretty(response.data())
        .map_err(|e| CliError::CommandError(format!("Failed to render response: {}", e)))?;
    println!("{}", title.bold().green());
    println!("{}", pretty);
    Ok(())
}

pub fn node_ping(wings: &Wings) -> Result<(), CliError> {
    let base_url = wings.connection().base_url();
    if wings.test_connection() {
        println!("{} {} is reachable", "✓".bold().green(), base_url.blue());
        Ok(())
    } else {
        println!("{} {} is not reachable", "✗".bold().red(), base_url.blue());
        Err(CliError::CommandError(format!(
            "Connection test failed: {}",
            base_url
        )))
    }
}

pub fn node_system(wings: &Wings, detailed: bool) -> Result<(), CliError> {
    let response = if detailed {
        wings.system().detailed_info()?
    } else {
        wings.system().info()?
    };
    print_json("System information:", &response)
}

pub fn node_ips(wings: &Wings) -> Result<(), CliError> {
    let response = wings.system().ips()?;
    print_json("IP addresses:", &response)
}

pub fn node_servers(wings: &Wings) -> Result<(), CliError> {
    let response = wings.server().list()?;
    let servers = response.items();

    if servers.is_empty() {
        println!("{} No servers on this node", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Servers:".bold().green());
    println!();
    for server in &servers {
        let uuid = server
            .pointer("/configuration/uuid")
            .and_then(Value::as_str)
            .unwrap_or("?");
        let name = server
            .pointer("/configuration/meta/name")
            .and_then(Value::as_str)
            .unwrap_or("");
        let state = server.get("state").and_then(Value::as_str).unwrap_or("unknown");

        let state = match state {
            "running" => state.green(),
            "starting" | "stopping" => state.yellow(),
            _ => state.red(),
        };
        println!("  {} {} {}", uuid.cyan(), name, format!("({})", state).dimmed());
    }
    println!();
    println!(
        "{} Total {} servers",
        "ℹ".bold().blue(),
        servers.len().to_string().green()
    );
    Ok(())
}

pub fn node_logs(wings: &Wings, uuid: &str, lines: u32) -> Result<(), CliError> {
    let response = wings.server().logs(uuid, lines)?;
    match response.get("data").and_then(Value::as_array) {
        Some(lines) => {
            for line in lines {
                println!("{}", line.as_str().unwrap_or_default());
            }
            Ok(())
        }
        None => print_json("Logs:", &response),
    }
}

pub fn node_power(wings: &Wings, uuid: &str, action: PowerAction) -> Result<(), CliError> {
    wings.server().power(uuid, action)?;
    println!(
        "{} Sent {} to {}",
        "✓".bold().green(),
        action.to_string().yellow(),
        uuid.cyan()
    );
    Ok(())
}
