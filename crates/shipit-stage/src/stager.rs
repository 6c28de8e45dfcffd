//! Output directory staging.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Marker that tells GitHub Pages to skip Jekyll processing.
pub const NO_JEKYLL_FILE: &str = ".nojekyll";

/// File name of the offline fallback page inside the output directory.
pub const OFFLINE_FILE: &str = "offline.html";

/// What happened to the offline fallback page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflinePage {
    /// Copied from the source into the output directory
    Copied,

    /// The output directory already had one; left untouched
    AlreadyPresent,

    /// No source page in the project; nothing to copy
    SourceMissing,
}

/// Result of a staging operation.
#[derive(Debug, Clone)]
pub struct StageReport {
    /// Path of the `.nojekyll` marker
    pub marker: PathBuf,

    /// Offline page outcome
    pub offline: OfflinePage,
}

/// Errors that can occur during staging.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("Output directory not found: {0}. Build the project first.")]
    OutputMissing(PathBuf),

    #[error("Domain must not be empty")]
    /// Returned by [`crate::write_domain`] only; staging itself never asks for a domain.
    EmptyDomain,

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StageError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> StageError + '_ {
        move |source| StageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Prepares a build output directory for GitHub Pages.
#[derive(Debug, Clone)]
pub struct Stager {
    offline_source: PathBuf,
}

impl Default for Stager {
    fn default() -> Self {
        Self::new("public/offline.html")
    }
}

impl Stager {
    /// Create a stager that copies the offline page from `offline_source`.
    pub fn new(offline_source: impl Into<PathBuf>) -> Self {
        Self {
            offline_source: offline_source.into(),
        }
    }

    pub fn offline_source(&self) -> &Path {
        &self.offline_source
    }

    /// Stage `output_dir`. The directory must already exist; it is never
    /// created here. Running this twice leaves the same files behind.
    pub fn stage(&self, output_dir: &Path) -> Result<StageReport, StageError> {
        if !output_dir.is_dir() {
            return Err(StageError::OutputMissing(output_dir.to_path_buf()));
        }

        let marker = output_dir.join(NO_JEKYLL_FILE);
        touch(&marker).map_err(StageError::io(&marker))?;
        tracing::debug!("Touched {}", marker.display());

        let offline = self.copy_offline_page(&output_dir.join(OFFLINE_FILE))?;

        Ok(StageReport { marker, offline })
    }

    fn copy_offline_page(&self, dest: &Path) -> Result<OfflinePage, StageError> {
        if !self.offline_source.is_file() {
            tracing::debug!(
                "No offline page at {}, skipping",
                self.offline_source.display()
            );
            return Ok(OfflinePage::SourceMissing);
        }

        let mut source =
            File::open(&self.offline_source).map_err(StageError::io(&self.offline_source))?;

        // create_new refuses to replace a page the build already emitted
        let mut target = match OpenOptions::new().write(true).create_new(true).open(dest) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Ok(OfflinePage::AlreadyPresent)
            }
            Err(e) => return Err(StageError::io(dest)(e)),
        };

        if let Err(e) = io::copy(&mut source, &mut target) {
            drop(target);
            let _ = fs::remove_file(dest);
            return Err(StageError::io(dest)(e));
        }

        tracing::debug!(
            "Copied {} to {}",
            self.offline_source.display(),
            dest.display()
        );
        Ok(OfflinePage::Copied)
    }
}

/// Create `path` if missing; an existing file keeps its contents.
fn touch(path: &Path) -> io::Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;
    use walkdir::WalkDir;

    fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| (e.path().to_path_buf(), fs::read(e.path()).unwrap()))
            .collect()
    }

    #[test]
    fn writes_marker_and_copies_offline_page() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("public").join("offline.html");
        let out = temp.path().join("dist");
        fs::create_dir_all(source.parent().unwrap()).unwrap();
        fs::create_dir_all(&out).unwrap();
        fs::write(&source, "<h1>You are offline</h1>").unwrap();

        let report = Stager::new(&source).stage(&out).unwrap();

        assert_eq!(report.offline, OfflinePage::Copied);
        assert_eq!(report.marker, out.join(".nojekyll"));
        assert_eq!(fs::read(out.join(".nojekyll")).unwrap(), b"");
        assert_eq!(
            fs::read(out.join("offline.html")).unwrap(),
            fs::read(&source).unwrap()
        );
    }

    #[test]
    fn staging_twice_is_idempotent() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("offline.html");
        let out = temp.path().join("dist");
        fs::create_dir_all(&out).unwrap();
        fs::write(&source, "offline").unwrap();
        fs::write(out.join("index.html"), "<html></html>").unwrap();
        let stager = Stager::new(&source);

        stager.stage(&out).unwrap();
        let first = snapshot(&out);
        let second_report = stager.stage(&out).unwrap();

        assert_eq!(second_report.offline, OfflinePage::AlreadyPresent);
        assert_eq!(snapshot(&out), first);
    }

    #[test]
    fn never_overwrites_existing_offline_page() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("offline.html");
        let out = temp.path().join("dist");
        fs::create_dir_all(&out).unwrap();
        fs::write(&source, "new page").unwrap();
        fs::write(out.join("offline.html"), "page from the build").unwrap();

        let report = Stager::new(&source).stage(&out).unwrap();

        assert_eq!(report.offline, OfflinePage::AlreadyPresent);
        assert_eq!(
            fs::read_to_string(out.join("offline.html")).unwrap(),
            "page from the build"
        );
    }

    #[test]
    fn keeps_existing_marker() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join(".nojekyll"), "keep").unwrap();

        let report = Stager::new(temp.path().join("none.html"))
            .stage(&out)
            .unwrap();

        assert_eq!(fs::read_to_string(&report.marker).unwrap(), "keep");
    }

    #[test]
    fn missing_offline_source_is_not_an_error() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        fs::create_dir_all(&out).unwrap();

        let report = Stager::new(temp.path().join("public/offline.html"))
            .stage(&out)
            .unwrap();

        assert_eq!(report.offline, OfflinePage::SourceMissing);
        assert!(out.join(".nojekyll").is_file());
        assert!(!out.join("offline.html").exists());
    }

    #[test]
    fn fails_without_creating_missing_output_directory() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");

        let err = Stager::default().stage(&out).unwrap_err();

        assert!(matches!(err, StageError::OutputMissing(ref path) if path == &out));
        assert!(!out.exists());
    }

    #[test]
    fn output_path_that_is_a_file_is_missing() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        fs::write(&out, "not a directory").unwrap();

        let err = Stager::default().stage(&out).unwrap_err();

        assert!(matches!(err, StageError::OutputMissing(_)));
    }
}
