//! CLI tools and first-run setup

use anyhow::{Context, Result};
use std::io::{self, Write};
use tracing::info;

use crate::config::AppConfig;
use crate::core::CredentialStore;
use crate::utils::auth::generate_random_string;

/// Environment variable holding the first administrator's password
pub const ADMIN_PASSWORD_ENV: &str = "JUKEBOX_ADMIN_PASSWORD";

const GENERATED_PASSWORD_LENGTH: usize = 20;

/// Create the administrator account when the database has no users yet
///
/// The password comes from the environment, or is generated and printed
/// once. Returns the generated password, if one was generated.
pub async fn bootstrap_admin(users: &CredentialStore, config: &AppConfig) -> Result<Option<String>> {
    if users.has_users().await? {
        return Ok(None);
    }

    let (password, generated) = match std::env::var(ADMIN_PASSWORD_ENV) {
        Ok(p) if !p.is_empty() => (p, false),
        _ => (generate_random_string(GENERATED_PASSWORD_LENGTH), true),
    };

    users
        .create(&config.admin_username, &password, true)
        .await
        .context("Failed to create administrator")?;
    info!("Created administrator '{}'", config.admin_username);

    if generated {
        println!(
            "\nAdministrator '{}' created with password: {}\nChange it after logging in.\n",
            config.admin_username, password
        );
        Ok(Some(password))
    } else {
        Ok(None)
    }
}

/// Password reset tool
pub async fn password_reset(users: &CredentialStore) -> Result<()> {
    println!("=== Jukebox Password Reset ===\n");

    let username = prompt("Username: ")?.trim().to_string();
    if username.is_empty() {
        println!("Error: Username cannot be empty");
        return Ok(());
    }

    let password = prompt("New password: ")?;
    if password.is_empty() {
        println!("Error: Password cannot be empty");
        return Ok(());
    }

    let confirm = prompt("Confirm password: ")?;
    if password != confirm {
        println!("Error: Passwords do not match");
        return Ok(());
    }

    match users.find_by_username(&username).await? {
        Some(user) => {
            users.reset_password(&user, &password).await?;
            println!("\nPassword updated successfully for user: {}", username);
        }
        None => println!("Error: User '{}' not found", username),
    }

    Ok(())
}

/// Read one line; only the line ending is removed so password spaces survive
fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(strip_line_ending(&input).to_string())
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
