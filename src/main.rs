//! CLI entry point for the feeds client.

use anyhow::{Context, Result};
use clap::Parser;
use delicious_feeds::{FeedsClient, FeedsConfig};
use serde::Serialize;
use tracing::{debug, info};

mod app_config;
mod cli;

use cli::{Args, Command};

fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(command = ?args.command, "CLI arguments parsed");

    let config = build_config(&args)?;
    let client = FeedsClient::new(config).context("Failed to create feeds client")?;

    if let Some(json) = run(&client, args.command)? {
        println!("{json}");
    } else {
        info!("No results");
    }
    Ok(())
}

/// Defaults, then the config file, then command-line flags.
fn build_config(args: &Args) -> Result<FeedsConfig> {
    let mut config = FeedsConfig::default();
    if let Some(file) = app_config::load_config(args.config.as_deref())? {
        debug!(?file, "config file loaded");
        file.apply_to(&mut config);
    }
    if let Some(user_agent) = &args.user_agent {
        config.user_agent.clone_from(user_agent);
    }
    if let Some(endpoint) = &args.endpoint {
        config.endpoint.clone_from(endpoint);
    }
    config.expand_urls |= args.expand_urls;
    config.pace_requests |= args.pace;
    Ok(config)
}

fn run(client: &FeedsClient, command: Command) -> Result<Option<String>> {
    match command {
        Command::Recent { count } => to_json(client.find_bookmarks(count.count)?),
        Command::Popular { count, tags } if tags.is_empty() => {
            to_json(client.find_popular_bookmarks(count.count)?)
        }
        Command::Popular { count, tags } => {
            to_json(client.find_popular_bookmarks_by_tags(count.count, &tags)?)
        }
        Command::Tag { count, tags } => to_json(client.find_bookmarks_by_tags(count.count, &tags)?),
        Command::User {
            count,
            user,
            tags,
            key,
        } => {
            let bookmarks = match (key, tags.is_empty()) {
                (None, true) => client.find_bookmarks_by_user(count.count, &user)?,
                (None, false) => client.find_bookmarks_by_user_and_tags(count.count, &user, &tags)?,
                (Some(key), true) => client.find_private_bookmarks_by_user(count.count, &user, &key)?,
                (Some(key), false) => client
                    .find_private_bookmarks_by_user_and_tags(count.count, &user, &key, &tags)?,
            };
            to_json(bookmarks)
        }
        Command::Inbox { count, user, key } => {
            to_json(client.find_private_inbox_bookmarks_by_user(count.count, &user, &key)?)
        }
        Command::Network { count, user, tags } if tags.is_empty() => {
            to_json(client.find_network_bookmarks_by_user(count.count, &user)?)
        }
        Command::Network { count, user, tags } => {
            to_json(client.find_network_bookmarks_by_user_and_tags(count.count, &user, &tags)?)
        }
        Command::Url { count, url } => to_json(client.find_bookmarks_by_url(count.count, &url)?),
        Command::UserInfo { user } => to_json(client.find_public_user_summary(&user)?),
        Command::Tags { user, tags } if tags.is_empty() => {
            to_json(client.find_public_tags_by_user(&user)?)
        }
        Command::Tags { user, tags } => {
            to_json(client.find_related_public_tags_by_user_and_tags(&user, &tags)?)
        }
        Command::Members { user } => to_json(client.find_network_members_by_user(&user)?),
        Command::UrlInfo { url } => to_json(client.find_url_info_by_url(&url)?),
    }
}

fn to_json<T: Serialize>(value: Option<T>) -> Result<Option<String>> {
    value
        .map(|value| serde_json::to_string_pretty(&value).context("Failed to serialize results"))
        .transpose()
}
