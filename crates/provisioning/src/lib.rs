//! Coaching site CMS provisioning.
//!
//! Write path, run out-of-band by an operator:
//!
//! - [`schema`] - declarative content-type schemas
//! - [`migrations`] - ordered schema migrations with typed step outcomes
//! - [`seed`] - fixed sample data, validated locally then created and
//!   published
//! - [`management`] - management API access
//!
//! Unlike the read path, everything here fails fast. The one exception is an
//! edit of a content type that does not exist yet, which migrations may mark
//! as a skip.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content_types;
pub mod error;
pub mod management;
pub mod migrations;
pub mod schema;
pub mod seed;

pub use config::{ConfigError, ManagementConfig};
pub use error::{ManagementError, MigrationError, SeedError};
pub use management::{ManagementApi, ManagementClient};
pub use migrations::{MigrationReport, StepOutcome, registry, run_migrations};
pub use seed::{SeedReport, SeedTarget, run_seeders};
