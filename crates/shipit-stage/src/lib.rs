//! Staging of a built static site for publication.
//!
//! Writes the `.nojekyll` marker, copies the offline fallback page and the
//! optional `CNAME` file into the build output directory.

pub mod domain;
pub mod stager;
pub mod summary;

pub use domain::{write_domain, DOMAIN_FILE};
pub use stager::{OfflinePage, StageError, StageReport, Stager, NO_JEKYLL_FILE, OFFLINE_FILE};
pub use summary::OutputSummary;
