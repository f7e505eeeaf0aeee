//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use delicious_feeds::DEFAULT_COUNT;

/// Query the Delicious feeds API and print the results as JSON.
///
/// Nothing is printed when a feed has no results for the query.
#[derive(Parser, Debug)]
#[command(name = "delicious-feeds")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// User-Agent sent with every request
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Resolve shortened icio.us URLs in bookmark results
    #[arg(long, global = true)]
    pub expand_urls: bool,

    /// Wait one second before each request
    #[arg(long, global = true)]
    pub pace: bool,

    /// Base URL of the feeds API
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/delicious-feeds/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Number of bookmarks to request.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct CountArg {
    /// Number of bookmarks to fetch (1-100)
    #[arg(short = 'n', long, default_value_t = DEFAULT_COUNT, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub count: u32,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Most recent public bookmarks
    Recent {
        #[command(flatten)]
        count: CountArg,
    },
    /// Popular bookmarks, optionally restricted to tags
    Popular {
        #[command(flatten)]
        count: CountArg,
        tags: Vec<String>,
    },
    /// Recent bookmarks carrying all of the given tags
    Tag {
        #[command(flatten)]
        count: CountArg,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Bookmarks of a user, optionally restricted to tags
    User {
        #[command(flatten)]
        count: CountArg,
        user: String,
        tags: Vec<String>,
        /// Private feed key; includes the user's private bookmarks
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Bookmarks sent to a user's inbox
    Inbox {
        #[command(flatten)]
        count: CountArg,
        user: String,
        /// Private feed key
        #[arg(short, long)]
        key: String,
    },
    /// Bookmarks from a user's network, optionally restricted to tags
    Network {
        #[command(flatten)]
        count: CountArg,
        user: String,
        tags: Vec<String>,
    },
    /// Recent bookmarks of a URL
    Url {
        #[command(flatten)]
        count: CountArg,
        url: String,
    },
    /// Public summary of a user
    UserInfo { user: String },
    /// Public tags of a user, or tags related to the given tags
    Tags { user: String, tags: Vec<String> },
    /// Members of a user's network
    Members { user: String },
    /// Title, post count and top tags of a URL
    UrlInfo { url: String },
}
