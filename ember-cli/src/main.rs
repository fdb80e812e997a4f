//! Ember CLI
//!
//! Command-line interface for the ember aggregation service: run the API
//! server or query the newest-items feed directly from the terminal.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ember_api::{ApiConfig, ApiServer};
use ember_core::types::Item;
use ember_feed::FeedService;
use ember_upstream::{HnClient, HnConfig};

/// Ember - paginated, searchable view over the Hacker News firehose
#[derive(Parser)]
#[command(name = "ember")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Print a page of the newest stories
    Newest {
        /// 1-based page number
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Stories per page
        #[arg(short = 's', long, default_value = "30")]
        page_size: u32,
    },

    /// Fetch one story by id
    Item {
        /// Story id
        id: u64,
    },

    /// Search the newest stories by title or author
    Search {
        /// Query, matched as a case-insensitive substring
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "ember=debug,info"
    } else {
        "ember=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Newest { page, page_size } => cmd_newest(page, page_size).await,
        Commands::Item { id } => cmd_item(id).await,
        Commands::Search { query, limit } => cmd_search(&query, limit).await,
    }
}

/// Builds the feed service used by the one-shot commands.
fn feed_from_env() -> FeedService {
    let api_config = ApiConfig::from_env();
    let client = HnClient::with_config(HnConfig {
        base_url: api_config.hn_base_url.clone(),
        timeout_seconds: api_config.upstream_timeout_seconds,
        ..HnConfig::default()
    });
    FeedService::new(Arc::new(client))
}

/// Token cancelled on Ctrl-C so in-flight fetches abort promptly.
fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, cancelling");
            canceller.cancel();
        }
    });
    token
}

/// Run the API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    let ip: IpAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {bind}"))?;
    let addr = SocketAddr::from((ip, port));

    println!("{}", "🔥 Starting ember API server...".cyan().bold());
    println!("   Listening on {}", addr.to_string().yellow());
    println!("   Press Ctrl-C to stop\n");

    let server = ApiServer::new(ApiConfig::from_env());

    let shutdown = server.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            shutdown.cancel();
        }
    });

    server.run(addr).await.context("API server failed")?;

    println!("{}", "👋 Server stopped".green());
    Ok(())
}

/// Print a page of the newest stories
async fn cmd_newest(page: u32, page_size: u32) -> Result<()> {
    anyhow::ensure!(page >= 1, "page must be >= 1");
    anyhow::ensure!(
        (1..=50).contains(&page_size),
        "page size must be between 1 and 50"
    );

    let feed = feed_from_env();
    let cancel = ctrl_c_token();

    let result = feed.newest(page, page_size, &cancel).await?;

    println!(
        "{} {}",
        "📰 Newest stories".cyan().bold(),
        format!(
            "(page {} of {}, {} total)",
            result.current_page, result.total_pages, result.total_count
        )
        .dimmed()
    );
    println!();

    let offset = (page - 1) * page_size;
    for (i, item) in result.stories.iter().enumerate() {
        print_item(offset as usize + i + 1, item);
    }

    Ok(())
}

/// Fetch one story by id
async fn cmd_item(id: u64) -> Result<()> {
    anyhow::ensure!(id > 0, "id must be > 0");

    let feed = feed_from_env();
    let cancel = ctrl_c_token();

    match feed.by_id(id, &cancel).await? {
        Some(item) => {
            println!("{}", item.title.bold());
            println!(
                "   {} points by {} {} | {}",
                item.score,
                item.by.green(),
                relative_age(item.time).dimmed(),
                item.kind.to_string().blue()
            );
            if let Some(url) = &item.url {
                println!("   {}", url.underline());
            }
            if let Some(descendants) = item.descendants {
                println!("   {descendants} comments");
            }
        }
        None => println!("{}", format!("Story {id} not found").yellow()),
    }

    Ok(())
}

/// Search the newest stories
async fn cmd_search(query: &str, limit: u32) -> Result<()> {
    anyhow::ensure!(!query.trim().is_empty(), "query must not be empty");
    anyhow::ensure!((1..=100).contains(&limit), "limit must be between 1 and 100");

    let feed = feed_from_env();
    let cancel = ctrl_c_token();

    let hits = feed.search(query, limit, &cancel).await?;

    if hits.is_empty() {
        println!("{}", format!("No matches for \"{query}\"").yellow());
        return Ok(());
    }

    println!(
        "{} {}",
        format!("🔍 {} match(es) for", hits.len()).cyan().bold(),
        format!("\"{query}\"").bold()
    );
    println!();

    for (i, item) in hits.iter().enumerate() {
        print_item(i + 1, item);
    }

    Ok(())
}

fn print_item(rank: usize, item: &Item) {
    println!("{} {}", format!("{rank:>3}.").dimmed(), item.title.bold());
    println!(
        "     {} points by {} {} | id {}",
        item.score,
        item.by.green(),
        relative_age(item.time).dimmed(),
        item.id
    );
    if let Some(url) = &item.url {
        println!("     {}", url.dimmed());
    }
}

fn relative_age(epoch_seconds: u64) -> String {
    let Some(then) = chrono::DateTime::from_timestamp(epoch_seconds as i64, 0) else {
        return "unknown".into();
    };
    let delta = chrono::Utc::now().signed_duration_since(then);

    if delta.num_days() >= 1 {
        format!("{}d ago", delta.num_days())
    } else if delta.num_hours() >= 1 {
        format!("{}h ago", delta.num_hours())
    } else if delta.num_minutes() >= 1 {
        format!("{}m ago", delta.num_minutes())
    } else {
        "just now".into()
    }
}
