//! Production build runner for shipit.
//!
//! Runs the dependency install step and then the build step of a static web
//! app, invoking the build tool directly with argument vectors.

pub mod builder;
pub mod toolchain;

pub use builder::{BuildError, BuildResult, ProjectBuilder, StepOutput};
pub use toolchain::{Step, Toolchain};
