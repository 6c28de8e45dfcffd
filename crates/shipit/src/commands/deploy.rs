//! Deploy preparation command.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use shipit_build::ProjectBuilder;
use shipit_stage::Stager;

use crate::config::load_config;
use crate::pipeline::Pipeline;
use crate::prompt;
use crate::report::Reporter;

/// Run the deploy command.
///
/// Build and staging failures are reported by the pipeline itself and come
/// back as a failing exit code; configuration errors are returned.
pub async fn run(
    root: &Path,
    config_path: &Path,
    domain: Option<String>,
    reporter: &mut Reporter,
) -> Result<ExitCode> {
    let config = load_config(config_path)?;

    let builder = ProjectBuilder::new(root, config.toolchain());
    let stager = Stager::new(config.offline_source(root));
    let mut pipeline = Pipeline::new(builder, stager, config.output_dir(root)).with_domain(domain);

    let mut prompt = prompt::for_stdin();
    match pipeline.run(prompt.as_mut(), reporter).await {
        Ok(outcome) => {
            tracing::debug!("Pipeline finished: {:?}", outcome);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::debug!("Pipeline stopped in {:?}: {:?}", pipeline.state(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}
