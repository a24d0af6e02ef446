//! Subcommand handlers

pub mod extract;
pub mod formats;
