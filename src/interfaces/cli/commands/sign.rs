//! Signed URL and token commands

use chrono::{TimeZone, Utc};
use colored::Colorize;

use crate::cli::SignCommands;
use crate::interfaces::cli::CliError;
use crate::wings::Wings;

pub fn sign(wings: &Wings, target: SignCommands) -> Result<(), CliError> {
    let output = match target {
        SignCommands::Backup {
            server,
            backup,
            unique_id,
        } => wings
            .backups()
            .download_url(&server, &backup, unique_id.as_deref())?,
        SignCommands::File { server, path } => wings.files().download_url(&server, &path)?,
        SignCommands::Upload { server, user } => wings.files().upload_url(&server, &user)?,
        SignCommands::Transfer { server } => wings.transfers().token(&server)?,
        SignCommands::Websocket {
            server,
            user,
            permissions,
        } => wings.websocket().url(&server, &user, &permissions)?,
    };

    println!("{}", output);
    Ok(())
}

pub fn decode_token(wings: &Wings, token: &str) -> Result<(), CliError> {
    let generator = wings.token_generator();
    let claims = generator.decode_token(token)?;

    let pretty = serde_json::to_string_pretty(&claims)
        .map_err(|e| CliError::CommandError(format!("Failed to render claims: {}", e)))?;
    println!("{}", "Token claims:".bold().green());
    println!("{}", pretty);

    if let Some(exp) = generator.get_token_expiration(token)
        && let Some(at) = Utc.timestamp_opt(exp, 0).single()
    {
        println!(
            "  {} {}",
            "Expires:".cyan(),
            at.format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed()
        );
    }
    Ok(())
}
