//! Subcommands of the `sparse-agent` binary

pub mod catalog;
pub mod export;
pub mod init;
pub mod inspect;
