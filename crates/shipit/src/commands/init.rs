//! Write a default shipit.toml.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::DEFAULT_CONFIG;
use crate::report::Reporter;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool, reporter: &mut Reporter) -> Result<()> {
    if config_path.exists() && !yes {
        reporter.warning(format!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        ));
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            anyhow::bail!("Project directory not found: {}", parent.display());
        }
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    reporter.success(format!("Created {}", config_path.display()));
    reporter.info("Run 'shipit' to build and stage the site.");

    Ok(())
}
