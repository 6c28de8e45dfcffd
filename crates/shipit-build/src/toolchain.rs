//! Build tool description and lookup.

use std::fmt;
use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::builder::BuildError;

/// A step of the production build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Dependency installation (`npm install`)
    Install,

    /// Production build (`npm run build`)
    Build,
}

impl Step {
    /// Steps in execution order. Build assumes installed dependencies.
    pub const ALL: [Step; 2] = [Step::Install, Step::Build];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Install => write!(f, "install"),
            Step::Build => write!(f, "build"),
        }
    }
}

/// The build tool and the arguments for each step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Program name or path (e.g., "npm")
    pub tool: String,

    /// Arguments for the install step
    pub install: Vec<String>,

    /// Arguments for the build step
    pub build: Vec<String>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            tool: "npm".to_string(),
            install: vec!["install".to_string()],
            build: vec!["run".to_string(), "build".to_string()],
        }
    }
}

impl Toolchain {
    /// Arguments for a step.
    pub fn args(&self, step: Step) -> &[String] {
        match step {
            Step::Install => &self.install,
            Step::Build => &self.build,
        }
    }

    /// Human readable command line for a step, e.g. "npm run build".
    pub fn describe(&self, step: Step) -> String {
        let args = self.args(step);
        if args.is_empty() {
            self.tool.clone()
        } else {
            format!("{} {}", self.tool, args.join(" "))
        }
    }

    /// Find the program to invoke for this toolchain.
    ///
    /// The tool is probed with `--version`; only whether it could be spawned
    /// matters, not its exit status. On Windows, Node tools are installed as
    /// `.cmd` shims, so a bare name that is not found is looked up again with
    /// that suffix.
    ///
    /// The probe is an extra run of the tool on top of the install and build
    /// steps. It only tells a missing tool apart from a failing one and is
    /// never retried.
    pub async fn resolve(&self, root: &Path) -> Result<String, BuildError> {
        match probe(&self.tool, root).await {
            Ok(()) => return Ok(self.tool.clone()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(BuildError::Spawn {
                    program: self.tool.clone(),
                    source,
                })
            }
        }

        if cfg!(windows) && Path::new(&self.tool).extension().is_none() {
            let shim = format!("{}.cmd", self.tool);
            if probe(&shim, root).await.is_ok() {
                return Ok(shim);
            }
        }

        Err(BuildError::ToolingMissing {
            tool: self.tool.clone(),
        })
    }
}

async fn probe(program: &str, root: &Path) -> io::Result<()> {
    tracing::debug!("Probing {} --version", program);

    Command::new(program)
        .arg("--version")
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_to_npm() {
        let toolchain = Toolchain::default();

        assert_eq!(toolchain.describe(Step::Install), "npm install");
        assert_eq!(toolchain.describe(Step::Build), "npm run build");
    }

    #[test]
    fn describes_step_without_arguments() {
        let toolchain = Toolchain {
            tool: "make".to_string(),
            install: vec![],
            build: vec!["site".to_string()],
        };

        assert_eq!(toolchain.describe(Step::Install), "make");
        assert_eq!(toolchain.describe(Step::Build), "make site");
    }

    #[tokio::test]
    async fn reports_missing_tool() {
        let temp = tempdir().unwrap();
        let toolchain = Toolchain {
            tool: "shipit-test-no-such-tool".to_string(),
            ..Default::default()
        };

        let err = toolchain.resolve(temp.path()).await.unwrap_err();

        assert!(matches!(
            err,
            BuildError::ToolingMissing { ref tool } if tool == "shipit-test-no-such-tool"
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn resolves_tool_regardless_of_version_exit_code() {
        let temp = tempdir().unwrap();
        // `false` exits non-zero for every argument
        let toolchain = Toolchain {
            tool: "false".to_string(),
            ..Default::default()
        };

        let program = toolchain.resolve(temp.path()).await.unwrap();

        assert_eq!(program, "false");
    }
}
