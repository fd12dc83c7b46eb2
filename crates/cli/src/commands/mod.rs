//! CLI subcommands.

pub mod content;
pub mod migrate;
pub mod seed;
