//! Command implementations.
//!
//! Each module does the work of one subcommand and returns a summary the
//! CLI layer renders as text or JSON.

pub mod check;
pub mod generate;
pub mod init;
pub mod migrate;
