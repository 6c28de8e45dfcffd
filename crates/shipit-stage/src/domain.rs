//! Custom domain marker.

use std::fs;
use std::path::{Path, PathBuf};

use crate::stager::StageError;

/// File GitHub Pages reads the custom domain from.
pub const DOMAIN_FILE: &str = "CNAME";

/// Write `domain` to `output_dir/CNAME`, replacing any previous file.
///
/// The file holds exactly the given text. The domain is not validated.
pub fn write_domain(output_dir: &Path, domain: &str) -> Result<PathBuf, StageError> {
    if domain.is_empty() {
        return Err(StageError::EmptyDomain);
    }

    let path = output_dir.join(DOMAIN_FILE);
    fs::write(&path, domain).map_err(StageError::io(&path))?;
    tracing::debug!("Wrote {} with {}", path.display(), domain);

    Ok(path)
}
