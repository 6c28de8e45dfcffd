//! Deployment pipeline: build, stage, optional domain, report.

use std::path::PathBuf;

use shipit_build::{BuildError, BuildResult, ProjectBuilder, Step};
use shipit_stage::{write_domain, OfflinePage, OutputSummary, StageError, StageReport, Stager};

use crate::prompt::PromptProvider;
use crate::report::Reporter;

const CUSTOM_DOMAIN_QUESTION: &str = "Do you have a custom domain to use with GitHub Pages?";
const DOMAIN_QUESTION: &str = "Enter the custom domain (e.g. example.com):";

/// Pipeline progress. Every run moves forward through these in order and
/// finishes in `End`, early on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,
    Built,
    Staged,
    DomainPrompted,
    Reported,
    End,
}

/// What a successful run produced.
#[derive(Debug)]
pub struct Outcome {
    pub output_dir: PathBuf,
    pub stage: StageReport,
    /// Path of the CNAME file, when one was written
    pub domain_file: Option<PathBuf>,
    pub summary: OutputSummary,
}

/// Errors that stop the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Stage(#[from] StageError),
}

pub struct Pipeline {
    builder: ProjectBuilder,
    stager: Stager,
    output_dir: PathBuf,
    domain: Option<String>,
    state: State,
}

impl Pipeline {
    pub fn new(builder: ProjectBuilder, stager: Stager, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            builder,
            stager,
            output_dir: output_dir.into(),
            domain: None,
            state: State::Start,
        }
    }

    /// Use `domain` instead of asking for one.
    pub fn with_domain(mut self, domain: Option<String>) -> Self {
        self.domain = domain;
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Run every stage once. Failures have already been reported when this
    /// returns an error.
    pub async fn run(
        &mut self,
        prompt: &mut dyn PromptProvider,
        reporter: &mut Reporter,
    ) -> Result<Outcome, PipelineError> {
        reporter.blank();
        reporter.header("shipit: preparing the app for GitHub Pages");

        let build = self.build(reporter).await;
        let build = self.finish_on_error(build)?;
        log_build_output(&build);
        self.advance(State::Built);

        let stage = self.stage(reporter);
        let stage = self.finish_on_error(stage)?;
        self.advance(State::Staged);

        let domain_file = self.domain_step(prompt, reporter);
        self.advance(State::DomainPrompted);

        let summary = OutputSummary::scan(&self.output_dir);
        reporter.blank();
        reporter.summary(&self.output_dir, &summary);
        reporter.success("Done! The project is ready to publish on GitHub Pages.");
        reporter.instructions();
        self.advance(State::Reported);
        self.advance(State::End);

        Ok(Outcome {
            output_dir: self.output_dir.clone(),
            stage,
            domain_file,
            summary,
        })
    }

    async fn build(&self, reporter: &mut Reporter) -> Result<BuildResult, PipelineError> {
        reporter.header("Building the project for production");

        let result = self
            .builder
            .build_with_progress(|step, command| {
                let label = match step {
                    Step::Install => "Installing dependencies",
                    Step::Build => "Building the project",
                };
                reporter.info(format!("{}... ({})", label, command));
            })
            .await;

        match result {
            Ok(build) => {
                reporter.success(format!("Build finished in {}ms.", build.duration_ms));
                Ok(build)
            }
            Err(e) => {
                reporter.error(&e);
                if let BuildError::BuildFailed { stderr, .. } = &e {
                    let stderr = stderr.trim_end();
                    if !stderr.is_empty() {
                        reporter.plain_err(stderr);
                    }
                }
                reporter.error("The project build failed.");
                Err(e.into())
            }
        }
    }

    fn stage(&self, reporter: &mut Reporter) -> Result<StageReport, PipelineError> {
        reporter.header("Preparing files for GitHub Pages");

        let report = self.stager.stage(&self.output_dir).map_err(|e| {
            reporter.error(&e);
            PipelineError::from(e)
        })?;

        reporter.success("Created .nojekyll");
        match report.offline {
            OfflinePage::Copied => reporter.success(format!(
                "Copied {} into {}",
                self.stager.offline_source().display(),
                self.output_dir.display()
            )),
            OfflinePage::AlreadyPresent => {
                reporter.info("The output already has offline.html; left it as is.")
            }
            OfflinePage::SourceMissing => tracing::debug!(
                "No offline page at {}",
                self.stager.offline_source().display()
            ),
        }

        Ok(report)
    }

    /// Ask for and write the custom domain. Failures here never stop the run.
    fn domain_step(
        &mut self,
        prompt: &mut dyn PromptProvider,
        reporter: &mut Reporter,
    ) -> Option<PathBuf> {
        let domain = match self.domain.take() {
            Some(domain) => domain.trim().to_string(),
            None => {
                reporter.blank();
                match ask_domain(prompt) {
                    Ok(Some(domain)) => domain,
                    Ok(None) => return None,
                    Err(e) => {
                        reporter.warning(format!("Could not read the answer ({}); skipping CNAME.", e));
                        return None;
                    }
                }
            }
        };

        if domain.is_empty() {
            return None;
        }

        reporter.header("Creating the CNAME file");
        match write_domain(&self.output_dir, &domain) {
            Ok(path) => {
                reporter.success(format!("Created CNAME for domain: {}", domain));
                Some(path)
            }
            Err(e) => {
                reporter.error(format!("Could not create the CNAME file: {}", e));
                None
            }
        }
    }

    fn finish_on_error<T>(&mut self, result: Result<T, PipelineError>) -> Result<T, PipelineError> {
        if result.is_err() {
            self.advance(State::End);
        }
        result
    }

    fn advance(&mut self, next: State) {
        tracing::debug!("pipeline: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

fn ask_domain(prompt: &mut dyn PromptProvider) -> std::io::Result<Option<String>> {
    if !prompt.confirm(CUSTOM_DOMAIN_QUESTION)? {
        return Ok(None);
    }
    Ok(Some(prompt.input(DOMAIN_QUESTION)?))
}

fn log_build_output(build: &BuildResult) {
    for step in &build.steps {
        if !step.stdout.trim().is_empty() {
            tracing::debug!("{} stdout:\n{}", step.step, step.stdout.trim_end());
        }
        if !step.stderr.trim().is_empty() {
            tracing::debug!("{} stderr:\n{}", step.step, step.stderr.trim_end());
        }
    }
}
