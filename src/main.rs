//! Command-line diagnostics for a Herald deployment.
//!
//! The following subcommands are supported:
//!
//! - `herald test [channel]` - send a test message through the configured
//!   transport
//! - `herald channels` - list every channel visible to the bot, per team
//! - `herald my-channels` - list the channels the bot is a member of
//! - `herald debug [channel]` - check connectivity and team access, and
//!   optionally walk a channel reference through live resolution

use dotenvy::dotenv;
use herald::config::Config;
use herald::logger::{Level, Logger};
use herald::mattermost::directory::{Directory, PAGE_SIZE};
use herald::mattermost::resolve::{Resolver, TracingDiagnostics};
use serde_json::{Map, Value};
use std::env;
use std::error::Error;
use std::process::ExitCode;
use tracing::warn;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let has_dotenv = dotenv().is_ok();
    if !has_dotenv {
        warn!("No .env found");
    }

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str);
    let channel = args.get(2).map(String::as_str);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match command {
        Some("test") => test(&config, channel).await,
        Some("channels") => channels(&config).await,
        Some("my-channels") => my_channels(&config).await,
        Some("debug") => debug(&config, channel).await,
        _ => {
            eprintln!("Usage: herald <test|channels|my-channels|debug> [channel]");
            return ExitCode::FAILURE;
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Send a test message to the given channel, or the default one.
async fn test(config: &Config, channel: Option<&str>) -> Result<(), Box<dyn Error>> {
    let channel = channel.unwrap_or(&config.default_channel).to_owned();
    let logger = Logger::new(config.clone())?;

    let mut context = Map::new();
    context.insert("source".into(), Value::from("herald test"));

    if logger
        .log_to(&channel, Level::Info, "Test message from Herald", &context)
        .await
    {
        println!("Delivered to '{}'", channel);
        Ok(())
    } else {
        Err("Delivery failed; see the log output above".into())
    }
}

/// List every channel visible to the bot, team by team.
async fn channels(config: &Config) -> Result<(), Box<dyn Error>> {
    let client = config.bot_client()?;

    for team in client.my_teams().await? {
        println!("{} ({})", team.display_name, team.id);

        for channel in client.team_channels(&team.id, PAGE_SIZE).await? {
            println!(
                "  {} - {} [{}] {}",
                channel.name, channel.display_name, channel.channel_type, channel.id
            );
        }
    }

    Ok(())
}

/// List the channels the bot is a member of.
async fn my_channels(config: &Config) -> Result<(), Box<dyn Error>> {
    let client = config.bot_client()?;
    let mine = client.my_channels(PAGE_SIZE).await?;

    println!("Bot is a member of {} channel(s):", mine.len());
    for channel in mine {
        println!(
            "  {} - {} [{}] {}",
            channel.name, channel.display_name, channel.channel_type, channel.id
        );
    }

    Ok(())
}

/// Check connectivity and team access; optionally resolve a channel
/// reference end to end.
async fn debug(config: &Config, channel: Option<&str>) -> Result<(), Box<dyn Error>> {
    let client = config.bot_client()?;

    let me = client.me().await?;
    println!(
        "Connected as: {} ({})",
        me.username,
        me.email.unwrap_or_default()
    );
    println!("  User ID: {}", me.id);
    println!("  Roles: {}", me.roles);

    let teams = client.my_teams().await?;
    println!("Member of {} team(s):", teams.len());
    for team in &teams {
        println!("  {} - {}", team.display_name, team.id);
    }

    if let Some(reference) = channel {
        println!("Resolving '{}'...", reference);

        let resolver = Resolver::new(&client, &config.channel_prefix, &TracingDiagnostics);
        match resolver.resolve(reference).await {
            Ok(id) => println!("Resolved to channel ID: {}", id),
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
