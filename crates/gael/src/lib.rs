//! Gael - catalog markdown to JSONL records and back.
//!
//! This crate wraps [`gael_markdown`] with everything a working catalog
//! needs around it: a `.gael/` configuration, JSONL-backed record storage,
//! a docs-directory loader, canonical regeneration, a public JSON export,
//! statistics, a round-trip checker and the `gael` CLI.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod error;
pub mod export;
pub mod loader;
pub mod stats;
pub mod storage;

// Public CLI module (needed by binary)
pub mod cli;

// Command implementations
pub mod commands;

// Application context
pub mod app;

// Output formatting
pub mod output;
