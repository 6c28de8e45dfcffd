//! CLI commands.

pub mod deploy;
pub mod init;
pub mod serve;
