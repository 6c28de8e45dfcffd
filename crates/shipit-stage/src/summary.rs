//! Output directory summary.

use std::fmt;
use std::path::Path;

use humansize::{format_size, WINDOWS};
use walkdir::WalkDir;

/// File count and total size of a staged output directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputSummary {
    pub files: usize,
    pub bytes: u64,
}

impl OutputSummary {
    /// Walk `dir` and total up regular files. Unreadable entries are skipped.
    pub fn scan(dir: &Path) -> Self {
        let mut summary = OutputSummary::default();

        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            summary.files += 1;
            summary.bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }

        summary
    }
}

impl fmt::Display for OutputSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.files == 1 { "file" } else { "files" };
        write!(f, "{} {}, {}", self.files, noun, format_size(self.bytes, WINDOWS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn counts_nested_files() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("assets")).unwrap();
        fs::write(temp.path().join("index.html"), "0123456789").unwrap();
        fs::write(temp.path().join(".nojekyll"), "").unwrap();
        fs::write(temp.path().join("assets").join("app.js"), "12345").unwrap();

        let summary = OutputSummary::scan(temp.path());

        assert_eq!(summary, OutputSummary { files: 3, bytes: 15 });
    }

    #[test]
    fn missing_directory_is_empty() {
        let temp = tempdir().unwrap();

        let summary = OutputSummary::scan(&temp.path().join("dist"));

        assert_eq!(summary, OutputSummary::default());
    }

    #[test]
    fn formats_sizes() {
        let small = OutputSummary { files: 1, bytes: 512 }.to_string();
        assert!(small.starts_with("1 file, 512"));
        assert!(small.ends_with(" B"));

        let kilo = OutputSummary { files: 4, bytes: 1536 }.to_string();
        assert!(kilo.starts_with("4 files, 1.5"));
        assert!(kilo.ends_with(" KB"));

        let mega = OutputSummary { files: 9, bytes: 3 * 1024 * 1024 }.to_string();
        assert!(mega.starts_with("9 files, 3"));
        assert!(mega.ends_with(" MB"));
    }
}
