//! Sample data command.
//!
//! Seeders are not idempotent: running one twice creates every entry twice.
//!
//! # Usage
//!
//! ```bash
//! cs-cli seed clients
//! cs-cli seed all
//! ```

use coachsite_provisioning::{ManagementClient, ManagementConfig, SeedTarget, run_seeders};

/// Run one seeder, or all of them.
///
/// # Errors
///
/// Returns an error for an unknown seeder name, missing configuration, or if
/// any seeder failed. With `all`, every seeder runs before the error is
/// returned.
pub async fn run(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    // Validate the name before touching configuration
    let target = SeedTarget::parse(name)?;

    let config = ManagementConfig::from_env()?;
    let client = ManagementClient::new(&config)?;

    let results = run_seeders(&client, target, &config.locale).await;

    let mut failed = 0;
    for result in &results {
        match result {
            Ok(report) => print_line(&format!(
                "{:<16} {} created, {} published",
                report.seeder, report.created, report.published
            )),
            Err(e) => {
                failed += 1;
                print_line(&format!("failed: {e}"));
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} seeders failed", results.len()).into());
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}
