//! Project configuration (shipit.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use shipit_build::Toolchain;

/// Configuration file structure (shipit.toml).
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub project: ProjectConfig,
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Build output directory, relative to the project root
    pub output: String,

    /// Offline fallback page, relative to the project root
    pub offline_page: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            output: "dist".to_string(),
            offline_page: "public/offline.html".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildSettings {
    pub tool: String,
    pub install: Vec<String>,
    pub build: Vec<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        let toolchain = Toolchain::default();
        Self {
            tool: toolchain.tool,
            install: toolchain.install,
            build: toolchain.build,
        }
    }
}

impl ConfigFile {
    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            tool: self.build.tool.clone(),
            install: self.build.install.clone(),
            build: self.build.build.clone(),
        }
    }

    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.project.output)
    }

    pub fn offline_source(&self, root: &Path) -> PathBuf {
        root.join(&self.project.offline_page)
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::debug!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("No config at {}, using defaults", path.display());
    Ok(ConfigFile::default())
}

pub const DEFAULT_CONFIG: &str = r#"# shipit configuration

[project]
# Directory the build writes the static site to
output = "dist"

# Page served when the app has no network; copied into the output if missing
offline_page = "public/offline.html"

[build]
# Build tool, looked up on PATH
tool = "npm"

# Arguments for the dependency install step
install = ["install"]

# Arguments for the production build step
build = ["run", "build"]
"#;
