//! Sample-data seeders.
//!
//! Each seeder owns a fixed YAML list of records for one content type,
//! compiled into the binary. Running a seeder validates every record against
//! the migrated schema, then creates and publishes them one at a time.
//!
//! There is no duplicate detection: running a seeder twice creates every
//! record twice. A failure stops that seeder; records already published stay.
//!
//! ## YAML Format
//!
//! ```yaml
//! - name: Northwind Analytics
//!   website: https://northwind.example.com
//!   featured: true
//!   order: 1
//! ```

mod validate;

pub use validate::validate_record;

use coachsite_core::{
    BLOG_POST, CLIENT, EVENT, RESULT, SERVICE, TEAM_MEMBER, TESTIMONIAL, WHY_CHOOSE_US,
};
use serde_json::{Map, Value};
use tracing::{error, info, instrument};

use crate::error::SeedError;
use crate::management::{EntryFields, ManagementApi};
use crate::migrations::resolved_schemas;

/// Name that selects every seeder.
pub const ALL: &str = "all";

/// A fixed sample list for one content type.
#[derive(Debug, Clone, Copy)]
pub struct Seeder {
    pub name: &'static str,
    pub content_type: &'static str,
    data: &'static str,
}

/// Every seeder, in the order `all` runs them.
pub const SEEDERS: &[Seeder] = &[
    Seeder {
        name: "clients",
        content_type: CLIENT,
        data: include_str!("data/clients.yaml"),
    },
    Seeder {
        name: "results",
        content_type: RESULT,
        data: include_str!("data/results.yaml"),
    },
    Seeder {
        name: "testimonials",
        content_type: TESTIMONIAL,
        data: include_str!("data/testimonials.yaml"),
    },
    Seeder {
        name: "why-choose-us",
        content_type: WHY_CHOOSE_US,
        data: include_str!("data/why-choose-us.yaml"),
    },
    Seeder {
        name: "services",
        content_type: SERVICE,
        data: include_str!("data/services.yaml"),
    },
    Seeder {
        name: "team",
        content_type: TEAM_MEMBER,
        data: include_str!("data/team.yaml"),
    },
    Seeder {
        name: "blog-posts",
        content_type: BLOG_POST,
        data: include_str!("data/blog-posts.yaml"),
    },
    Seeder {
        name: "events",
        content_type: EVENT,
        data: include_str!("data/events.yaml"),
    },
];

/// Valid seeder names, including `all`.
#[must_use]
pub fn seeder_names() -> Vec<&'static str> {
    SEEDERS.iter().map(|s| s.name).chain([ALL]).collect()
}

/// Seeders selected by a CLI argument.
#[derive(Debug, Clone, Copy)]
pub enum SeedTarget {
    One(&'static Seeder),
    All,
}

impl SeedTarget {
    /// Resolve a seeder name.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::UnknownSeeder` listing the valid names.
    pub fn parse(name: &str) -> Result<Self, SeedError> {
        if name == ALL {
            return Ok(Self::All);
        }
        SEEDERS
            .iter()
            .find(|s| s.name == name)
            .map(Self::One)
            .ok_or_else(|| SeedError::UnknownSeeder {
                name: name.to_string(),
                valid: seeder_names().join(", "),
            })
    }

    #[must_use]
    pub fn seeders(self) -> &'static [Seeder] {
        match self {
            Self::One(seeder) => std::slice::from_ref(seeder),
            Self::All => SEEDERS,
        }
    }
}

/// Result of a completed seeder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub seeder: &'static str,
    pub created: usize,
    pub published: usize,
}

impl Seeder {
    /// Parse the sample records.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Data` if the YAML is malformed.
    pub fn records(&self) -> Result<Vec<Map<String, Value>>, SeedError> {
        serde_yaml::from_str(self.data).map_err(|e| SeedError::Data {
            seeder: self.name.to_string(),
            message: format!("Failed to parse YAML: {e}"),
        })
    }

    /// Validate every record against the migrated schema.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Invalid` for the first bad record.
    pub fn validated_records(&self) -> Result<Vec<Map<String, Value>>, SeedError> {
        let schemas = resolved_schemas();
        let schema = schemas.get(self.content_type).ok_or_else(|| SeedError::Data {
            seeder: self.name.to_string(),
            message: format!("no schema for content type {}", self.content_type),
        })?;

        let records = self.records()?;
        for (index, record) in records.iter().enumerate() {
            validate_record(schema, record).map_err(|message| SeedError::Invalid {
                seeder: self.name.to_string(),
                index,
                message,
            })?;
        }
        Ok(records)
    }

    /// Create and publish every record.
    ///
    /// # Errors
    ///
    /// Returns the first validation or management error. Records published
    /// before the error are not rolled back.
    #[instrument(skip(self, api), fields(seeder = self.name, content_type = self.content_type))]
    pub async fn run(&self, api: &dyn ManagementApi, locale: &str) -> Result<SeedReport, SeedError> {
        let records = self.validated_records()?;
        info!(records = records.len(), "Seeding");

        let mut report = SeedReport {
            seeder: self.name,
            created: 0,
            published: 0,
        };

        for (index, record) in records.into_iter().enumerate() {
            let fail = |source| SeedError::Management {
                seeder: self.name.to_string(),
                index,
                published: report.published,
                source,
            };

            let fields = localize(record, locale);
            let entry = api
                .create_entry(self.content_type, &fields)
                .await
                .map_err(fail)?;
            report.created += 1;

            api.publish_entry(&entry.id, entry.version)
                .await
                .map_err(fail)?;
            report.published += 1;
        }

        info!(
            created = report.created,
            published = report.published,
            "Seeding complete"
        );
        Ok(report)
    }
}

/// Wrap each value as `{locale: value}`.
fn localize(record: Map<String, Value>, locale: &str) -> EntryFields {
    record
        .into_iter()
        .map(|(field, value)| {
            let mut localized = Map::new();
            localized.insert(locale.to_string(), value);
            (field, Value::Object(localized))
        })
        .collect()
}

/// Run the selected seeders in order.
///
/// A failing seeder is logged and the next one still runs. Results are
/// returned per seeder so callers can decide the exit status.
pub async fn run_seeders(
    api: &dyn ManagementApi,
    target: SeedTarget,
    locale: &str,
) -> Vec<Result<SeedReport, SeedError>> {
    let mut results = Vec::new();

    for seeder in target.seeders() {
        let result = seeder.run(api, locale).await;
        if let Err(e) = &result {
            error!(seeder = seeder.name, error = %e, "Seeder failed");
        }
        results.push(result);
    }

    results
}
