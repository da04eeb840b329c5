//! Tanuki CLI - GitLab webhook rendering from the terminal
//!
//! Render payload files offline, replay them against a running server and
//! manage the local configuration.

mod api;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::io::Read;

use api::TanukiClient;
use config::Config;
use tanuki::{Dispatcher, EventKind, InboundEvent, Outcome};

#[derive(Parser)]
#[command(name = "tanuki")]
#[command(about = "Tanuki CLI - GitLab webhooks as chat messages", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a payload locally and print the resulting JSON
    Format {
        /// GitLab event header, e.g. "Push Hook"
        #[arg(short, long)]
        event: String,
        /// Payload file (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<String>,
        /// Channel override
        #[arg(short, long)]
        channel: Option<String>,
    },

    /// List recognized event headers
    Events,

    /// Replay a payload against a running server
    Send {
        /// GitLab event header, e.g. "Push Hook"
        #[arg(short, long)]
        event: String,
        /// Payload file
        #[arg(short, long)]
        file: String,
        /// Channel override
        #[arg(short, long)]
        channel: Option<String>,
        /// Server URL (overrides config)
        #[arg(long)]
        url: Option<String>,
        /// GitLab token (overrides config)
        #[arg(long)]
        token: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value, e.g. `hook.ignore_unknown_events true`
    Set {
        key: String,
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Format { event, file, channel } => cmd_format(event, file, channel),
        Commands::Events => cmd_events(),
        Commands::Send { event, file, channel, url, token } => {
            cmd_send(event, file, channel, url, token).await
        }
        Commands::Config { action } => cmd_config(action).await,
    }
}

// ============================================
// Command Implementations
// ============================================

fn read_payload(file: Option<&str>) -> Result<Value> {
    let content = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload from {}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read payload from stdin")?;
            buffer
        }
    };

    serde_json::from_str(&content).context("Payload is not valid JSON")
}

fn cmd_format(event: String, file: Option<String>, channel: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let payload = read_payload(file.as_deref())?;

    let dispatcher = Dispatcher::new(config.hook);
    let outcome = dispatcher.route(&InboundEvent::new(event, payload).with_channel(channel));

    match &outcome {
        Outcome::Message(_) => {}
        Outcome::Failed { report, .. } => {
            eprintln!("{} {}", "✗".red(), report.message);
        }
        Outcome::Ignored => {
            eprintln!("{}", "Event suppressed by configuration".dimmed());
        }
    }

    println!("{}", serde_json::to_string_pretty(&outcome.into_json())?);
    Ok(())
}

fn cmd_events() -> Result<()> {
    println!("{}", "Recognized events:".bold());
    for kind in EventKind::ALL {
        let marker = if kind.is_confidential() {
            " (confidential)".yellow().to_string()
        } else {
            String::new()
        };
        println!("  {}{}", kind.header().cyan(), marker);
    }
    println!("\n{}", "\"Job Hook\" is accepted as an alias of \"Build Hook\".".dimmed());
    Ok(())
}

async fn cmd_send(
    event: String,
    file: String,
    channel: Option<String>,
    url: Option<String>,
    token: Option<String>,
) -> Result<()> {
    let config = Config::load()?;
    let payload = read_payload(Some(&file))?;

    let base_url = url.unwrap_or(config.server_url);
    let token = token.or(config.gitlab_token);
    let client = TanukiClient::new(&base_url, token.as_deref());

    println!("Sending {} to {}...", event.cyan(), client.hook_url());
    let reply = client.send_hook(&event, &payload, channel.as_deref()).await?;

    let status = reply.status.to_string();
    if reply.status.is_success() {
        println!("{} {}", "✓".green(), status.green());
    } else {
        println!("{} {}", "✗".red(), status.red());
    }

    match reply.json() {
        Some(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        None if !reply.body.is_empty() => println!("{}", reply.body),
        None => {}
    }

    Ok(())
}

async fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            let client = TanukiClient::new(&config.server_url, config.gitlab_token.as_deref());
            let reachable = client.health().await.unwrap_or(false);

            println!("{}", "Configuration:".bold());
            println!("  Config file: {:?}", Config::config_path()?);
            println!(
                "  Server: {} {}",
                config.server_url,
                if reachable {
                    "(reachable)".green()
                } else {
                    "(unreachable)".red()
                }
            );
            println!(
                "  GitLab token: {}",
                if config.gitlab_token.is_some() {
                    "configured".green()
                } else {
                    "not set".yellow()
                }
            );
            println!("\n{}", "[hook]".bold());
            print!("{}", toml::to_string_pretty(&config.hook)?);
        }

        ConfigAction::Init { force } => {
            let path = Config::config_path()?;
            if path.exists() && !force {
                println!("{} Config already exists at {:?}", "!".yellow(), path);
                println!("{}", "Use --force to overwrite it.".dimmed());
                return Ok(());
            }
            Config::default().save()?;
            println!("{} Config written to {:?}", "✓".green(), path);
        }

        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("{} {} = {}", "✓".green(), key.cyan(), value);
        }
    }

    Ok(())
}
