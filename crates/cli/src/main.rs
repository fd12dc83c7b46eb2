//! Coaching site CLI - CMS migrations, seeders and content checks.
//!
//! # Usage
//!
//! ```bash
//! # Create and update content types
//! cs-cli migrate
//!
//! # Insert sample entries for one domain, or all of them
//! cs-cli seed clients
//! cs-cli seed all
//!
//! # Read a domain through the site's read path
//! cs-cli content testimonials --featured --limit 3
//! cs-cli content services --slug executive-coaching
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run schema migrations in order, stopping at the first failure
//! - `seed` - Create and publish sample entries
//! - `content` - Print a domain's records as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::content::ContentArgs;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(author, version, about = "Coaching site CMS tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CMS schema migrations
    Migrate,
    /// Create and publish sample entries
    Seed {
        /// Seeder name (clients, results, testimonials, why-choose-us,
        /// services, team, blog-posts, events) or `all`
        name: String,
    },
    /// Print a content domain as JSON
    Content(ContentArgs),
}

/// Initialize Sentry when `SENTRY_DSN` is set; the guard must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|v| !v.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env before reading SENTRY_DSN (ignore errors if not found)
    let _ = dotenvy::dotenv();
    let sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "cs_cli=info,coachsite_content=info,coachsite_provisioning=info".into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        // Flush pending Sentry events; exit skips destructors.
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { name } => commands::seed::run(&name).await?,
        Commands::Content(args) => commands::content::run(&args).await?,
    }
    Ok(())
}
