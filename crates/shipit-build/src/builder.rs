//! Project builder.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;

use tokio::process::Command;

use crate::toolchain::{Step, Toolchain};

/// Captured output of a finished step.
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub step: Step,
    pub stdout: String,
    pub stderr: String,
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Program that was invoked (may carry a platform suffix, e.g. "npm.cmd")
    pub program: String,

    /// Output of each step, in execution order
    pub steps: Vec<StepOutput>,

    /// Total build time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Project directory not found: {0}")]
    ProjectMissing(PathBuf),

    #[error("Could not find `{tool}` on PATH. Install it before deploying (npm ships with Node.js).")]
    ToolingMissing { tool: String },

    #[error("The {step} step failed ({status})")]
    BuildFailed {
        step: Step,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs the install and build steps of a project.
pub struct ProjectBuilder {
    root: PathBuf,
    toolchain: Toolchain,
}

impl ProjectBuilder {
    /// Create a builder for the project rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, toolchain: Toolchain) -> Self {
        Self {
            root: root.into(),
            toolchain,
        }
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Build the project.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        self.build_with_progress(|_, _| {}).await
    }

    /// Build the project, calling `on_step` with each step and its command
    /// line right before the step starts.
    pub async fn build_with_progress<F>(&self, mut on_step: F) -> Result<BuildResult, BuildError>
    where
        F: FnMut(Step, &str),
    {
        let start = Instant::now();

        if !self.root.is_dir() {
            return Err(BuildError::ProjectMissing(self.root.clone()));
        }

        let program = self.toolchain.resolve(&self.root).await?;

        let mut steps = Vec::with_capacity(Step::ALL.len());
        for step in Step::ALL {
            on_step(step, &self.toolchain.describe(step));
            steps.push(self.run_step(&program, step).await?);
        }

        Ok(BuildResult {
            program,
            steps,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Run a single step to completion and capture its output.
    async fn run_step(&self, program: &str, step: Step) -> Result<StepOutput, BuildError> {
        let args = self.toolchain.args(step);
        tracing::debug!("Running {} {} in {}", program, args.join(" "), self.root.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| BuildError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::debug!("{} step exited with {}", step, output.status);
            return Err(BuildError::BuildFailed {
                step,
                status: output.status,
                stderr,
            });
        }

        Ok(StepOutput {
            step,
            stdout,
            stderr,
        })
    }
}
