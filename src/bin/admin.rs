//! CLI administration tool for clicktrail.
//!
//! Manages link owners and their API tokens, shows statistics, and runs
//! database diagnostics without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Register a link owner
//! cargo run --bin admin -- user create --email me@example.com
//!
//! # Issue a token for that owner
//! cargo run --bin admin -- token create --user me@example.com --name "Laptop"
//!
//! # List and revoke tokens
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "Laptop"
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required)
//! - `TOKEN_SIGNING_SECRET` (required for `token create`); must match the server

use clicktrail::application::services::hash_token;
use clicktrail::config::database_url_from_env;
use clicktrail::domain::repositories::{TokenRepository, UserRepository};
use clicktrail::infrastructure::persistence::{PgTokenRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;

/// CLI tool for managing clicktrail.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage link owners
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a new user
    Create {
        #[arg(short, long)]
        email: String,
    },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token for a user
    Create {
        /// Email of the owning user
        #[arg(short, long)]
        user: String,

        /// Token name (e.g., "Laptop", "CI")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = database_url_from_env()?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let users = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create { email } => {
            let email = email.trim();
            if email.is_empty() || !email.contains('@') {
                anyhow::bail!("'{}' is not an email address", email);
            }

            let user = users
                .create(email)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

            println!(
                "{} user {} (id {})",
                "Created".green().bold(),
                user.email.cyan(),
                user.id
            );
        }
        UserAction::List => {
            let all = users
                .list()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

            println!("{}", "Users".bright_blue().bold());
            println!();

            if all.is_empty() {
                println!("{}", "  No users found".yellow());
                return Ok(());
            }

            println!(
                "  {:<5} {:<40} {:<20}",
                "ID".bright_white().bold(),
                "Email".bright_white().bold(),
                "Created".bright_white().bold()
            );
            println!("  {}", "-".repeat(65).bright_black());

            for user in &all {
                println!(
                    "  {:<5} {:<40} {}",
                    user.id.to_string().bright_black(),
                    user.email.cyan(),
                    user.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
                );
            }
            println!();
        }
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let tokens = PgTokenRepository::new(pool.clone());

    match action {
        TokenAction::Create {
            user,
            name,
            token,
            yes,
        } => {
            let users = PgUserRepository::new(pool);
            create_token(&tokens, &users, &user, name, token, yes).await?;
        }
        TokenAction::List => {
            let users = PgUserRepository::new(pool);
            list_tokens(&tokens, &users).await?;
        }
        TokenAction::Revoke { name_or_id } => {
            revoke_token(&tokens, &name_or_id).await?;
        }
    }

    Ok(())
}

/// Creates a new API token with interactive prompts.
///
/// Only the HMAC digest is stored; the raw token is printed once.
async fn create_token(
    tokens: &PgTokenRepository,
    users: &PgUserRepository,
    email: &str,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let signing_secret = std::env::var("TOKEN_SIGNING_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .context("TOKEN_SIGNING_SECRET must be set to the server's value")?;

    let owner = users
        .find_by_email(email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("No user with email '{}'", email))?;

    println!("{}", "Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Laptop")
            .interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            println!("{}", "Using provided token value".yellow());
            t
        }
        None => generate_token(),
    };

    println!();
    println!("  Owner: {}", owner.email.cyan());
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "Save this token now. It cannot be shown again.".red().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(&signing_secret, &token_value);

    tokens
        .create_token(owner.id, &token_name, &token_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "Token created.".green().bold());
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/urls",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(tokens: &PgTokenRepository, users: &PgUserRepository) -> Result<()> {
    let all = tokens
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    let emails: HashMap<i64, String> = users
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?
        .into_iter()
        .map(|u| (u.id, u.email))
        .collect();

    println!("{}", "API Tokens".bright_blue().bold());
    println!();

    if all.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<24} {:<28} {:<17} {:<17} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Owner".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(100).bright_black());

    for token in &all {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let owner = emails.get(&token.user_id).map(String::as_str).unwrap_or("?");
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<4} {:<24} {:<28} {:<17} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            owner,
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", all.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Revokes a token by ID (numeric input) or exact name, after confirmation.
async fn revoke_token(tokens: &PgTokenRepository, name_or_id: &str) -> Result<()> {
    let token = match name_or_id.parse::<i64>() {
        Ok(id) => tokens.find_by_id(id).await,
        Err(_) => tokens.find_by_name(name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    tokens
        .revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "Token revoked.".green().bold());

    Ok(())
}

async fn handle_stats(pool: &PgPool) -> Result<()> {
    let (users, links, counted, events, tokens): (i64, i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users),
            (SELECT COUNT(*) FROM links),
            (SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM links),
            (SELECT COUNT(*) FROM link_clicks),
            (SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL)
        "#,
    )
    .fetch_one(pool)
    .await?;

    println!("{}", "Statistics".bright_blue().bold());
    println!();
    println!("  Users:           {}", users.to_string().bright_green().bold());
    println!("  Links:           {}", links.to_string().bright_green().bold());
    println!("  Counted clicks:  {}", counted.to_string().bright_green().bold());
    println!("  Click events:    {}", events.to_string().bright_green().bold());
    println!("  Active tokens:   {}", tokens.to_string().bright_green().bold());
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("{}", "Database Information".bright_blue().bold());
            println!();
            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Applied migrations: {}", migrations);
            println!();
        }
    }

    Ok(())
}

/// Generates a 48-character alphanumeric token (~286 bits of entropy).
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
