//! Coaching site content library.
//!
//! Read path for the marketing site: every piece of page content (clients,
//! results, testimonials, services, team, blog posts, events) lives in the
//! CMS and is fetched through this crate.
//!
//! # Layers
//!
//! - [`client`] - CMS client accessor: a live delivery client, or a stub when
//!   credentials are missing
//! - [`mapper`] - total, lenient conversion from raw entries to records
//! - [`domains`] - one module per content type with its record shape
//! - [`queries`] - `all` / `featured` / `by_id` reads; `try_*` variants return
//!   the error, the plain variants degrade to empty results
//!
//! # Example
//!
//! ```rust,ignore
//! use coachsite_content::{CmsConfig, ContentClient, SiteContent};
//!
//! let config = CmsConfig::from_env()?;
//! let content = SiteContent::new(ContentClient::from_config(&config));
//!
//! let clients = content.clients().all().await;
//! let featured = content.testimonials().featured(Some(3)).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod client;
pub mod config;
pub mod domains;
pub mod error;
pub mod mapper;
pub mod queries;

pub use client::{ContentClient, ContentSource, DeliveryClient, EntryQuery, UnconfiguredSource};
pub use config::{CmsConfig, ConfigError};
pub use domains::*;
pub use error::ContentError;
pub use queries::{DomainQueries, SiteContent};
