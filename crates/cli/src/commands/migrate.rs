//! Schema migration command.
//!
//! # Usage
//!
//! ```bash
//! cs-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CONTENTFUL_SPACE_ID` - CMS space identifier
//! - `CONTENTFUL_MANAGEMENT_TOKEN` - Content Management API token
//! - `CONTENTFUL_ENVIRONMENT` - Environment name (default: master)

use coachsite_provisioning::{
    ManagementClient, ManagementConfig, MigrationReport, registry, run_migrations,
};
use tracing::info;

/// Run every migration in order.
///
/// # Errors
///
/// Returns an error if configuration is missing or any migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ManagementConfig::from_env()?;
    let client = ManagementClient::new(&config)?;

    info!(
        space_id = %config.space_id,
        environment = %config.environment,
        "Running CMS migrations"
    );

    let report = run_migrations(&client, &registry()).await;
    print_report(&report);

    match report.failed() {
        Some(step) => Err(format!("Migration {} failed: {}", step.name, step.outcome).into()),
        None => Ok(()),
    }
}

#[allow(clippy::print_stdout)]
fn print_report(report: &MigrationReport) {
    for step in &report.steps {
        println!("{:<32} {}", step.name, step.outcome);
    }
    for name in &report.not_run {
        println!("{name:<32} not run");
    }
    println!(
        "\n{} applied, {} skipped, {} not run",
        report.applied(),
        report.skipped(),
        report.not_run.len()
    );
}
