//! Content read command.
//!
//! Reads a domain through the same fail-soft path the site uses and prints
//! the records as JSON. A CMS failure prints `[]` (or `null`) and is logged.
//!
//! # Usage
//!
//! ```bash
//! cs-cli content clients
//! cs-cli content testimonials --featured --limit 3
//! cs-cli content blog-posts --slug five-questions-one-to-one
//! cs-cli content events --upcoming
//! ```

use chrono::Utc;
use clap::{Args, ValueEnum};
use coachsite_content::{
    CmsConfig, ContentClient, ContentDomain, DomainQueries, FeaturedDomain, SiteContent,
};
use serde::Serialize;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Domain {
    Clients,
    Results,
    Testimonials,
    WhyChooseUs,
    Services,
    Team,
    BlogPosts,
    Events,
}

impl Domain {
    const fn has_slug(self) -> bool {
        matches!(self, Self::Services | Self::BlogPosts | Self::Events)
    }
}

#[derive(Debug, Args)]
pub struct ContentArgs {
    /// Content domain to read
    #[arg(value_enum)]
    domain: Domain,

    /// Only entries flagged as featured
    #[arg(long)]
    featured: bool,

    /// Maximum number of featured entries
    #[arg(long, requires = "featured")]
    limit: Option<u32>,

    /// Fetch a single entry by id
    #[arg(long, conflicts_with_all = ["featured", "slug"])]
    id: Option<String>,

    /// Fetch a single entry by slug (services, blog-posts, events)
    #[arg(long, conflicts_with = "featured")]
    slug: Option<String>,

    /// Only events starting from now (events)
    #[arg(long)]
    upcoming: bool,
}

/// Read and print a content domain.
///
/// # Errors
///
/// Returns an error for malformed configuration or an option the domain does
/// not support. CMS failures are not errors here.
pub async fn run(args: &ContentArgs) -> CommandResult {
    if args.slug.is_some() && !args.domain.has_slug() {
        return Err(format!("{:?} entries have no slug", args.domain).into());
    }
    if args.upcoming && args.domain != Domain::Events {
        return Err("--upcoming only applies to events".into());
    }

    let config = CmsConfig::from_env()?;
    let content = SiteContent::uncached(ContentClient::from_config(&config));

    match args.domain {
        Domain::Clients => featured_or_all(content.clients(), args).await,
        Domain::Results => featured_or_all(content.results(), args).await,
        Domain::Testimonials => featured_or_all(content.testimonials(), args).await,
        Domain::WhyChooseUs => all(content.why_choose_us(), args).await,
        Domain::Team => all(content.team(), args).await,
        Domain::Services => match &args.slug {
            Some(slug) => print_json(&content.services().by_slug(slug).await),
            None => featured_or_all(content.services(), args).await,
        },
        Domain::BlogPosts => match &args.slug {
            Some(slug) => print_json(&content.blog_posts().by_slug(slug).await),
            None => featured_or_all(content.blog_posts(), args).await,
        },
        Domain::Events => match &args.slug {
            Some(slug) => print_json(&content.events().by_slug(slug).await),
            None if args.upcoming => print_json(&content.events().upcoming(Utc::now()).await),
            None => featured_or_all(content.events(), args).await,
        },
    }
}

async fn featured_or_all<D: FeaturedDomain>(
    queries: DomainQueries<'_, D>,
    args: &ContentArgs,
) -> CommandResult {
    if args.featured {
        return print_json(&queries.featured(args.limit).await);
    }
    all(queries, args).await
}

async fn all<D: ContentDomain>(queries: DomainQueries<'_, D>, args: &ContentArgs) -> CommandResult {
    if args.featured {
        return Err(format!("{} has no featured flag", D::NAME).into());
    }
    match &args.id {
        Some(id) => print_json(&queries.by_id(id).await),
        None => print_json(&queries.all().await),
    }
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
