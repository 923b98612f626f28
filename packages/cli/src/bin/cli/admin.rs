// ABOUTME: CLI commands for managing admin accounts
// ABOUTME: Creates admins and rotates passwords, prompting when none is given

use anyhow::{bail, Context};
use clap::Subcommand;
use colored::*;
use inquire::{Password, PasswordDisplayMode};
use std::path::PathBuf;
use storefront_security::password::MIN_PASSWORD_LENGTH;
use storefront_security::AdminStorage;
use storefront_storage::Database;

use storefront_cli::Config;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Create a new admin account
    Create {
        username: String,
        #[arg(long, help = "Password (prompted for when omitted)")]
        password: Option<String>,
        #[arg(long, help = "SQLite database file (overrides DATABASE_PATH)")]
        database: Option<PathBuf>,
    },
    /// Replace an admin's password and sign out their sessions
    SetPassword {
        username: String,
        #[arg(long, help = "SQLite database file (overrides DATABASE_PATH)")]
        database: Option<PathBuf>,
    },
}

impl AdminCommands {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        match self {
            AdminCommands::Create {
                username,
                password,
                database,
            } => {
                let password = match password {
                    Some(password) => password.clone(),
                    None => prompt_new_password()?,
                };

                let db = open_database(config, database.as_ref()).await?;
                let admin = AdminStorage::new(db.pool().clone())
                    .create_admin(username, &password)
                    .await?;
                db.close().await;

                println!(
                    "{} Admin '{}' created",
                    "✓".green().bold(),
                    admin.username.cyan()
                );
                Ok(())
            }
            AdminCommands::SetPassword { username, database } => {
                let password = prompt_new_password()?;

                let db = open_database(config, database.as_ref()).await?;
                let admin = AdminStorage::new(db.pool().clone())
                    .set_password(username, &password)
                    .await?;
                db.close().await;

                println!(
                    "{} Password updated for '{}'; existing sessions were signed out",
                    "✓".green().bold(),
                    admin.username.cyan()
                );
                Ok(())
            }
        }
    }
}

async fn open_database(config: &Config, database: Option<&PathBuf>) -> anyhow::Result<Database> {
    let path = database.unwrap_or(&config.database_path);
    Database::connect(path)
        .await
        .with_context(|| format!("Failed to open database at {}", path.display()))
}

fn prompt_new_password() -> anyhow::Result<String> {
    let password = Password::new("New password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message(&format!("At least {} characters", MIN_PASSWORD_LENGTH))
        .without_confirmation()
        .prompt()
        .context("Password input cancelled")?;

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        bail!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        );
    }

    let password_confirm = Password::new("Confirm password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Password confirmation cancelled")?;

    if password != password_confirm {
        bail!("Passwords do not match");
    }

    Ok(password)
}
