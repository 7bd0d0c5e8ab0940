//! CLI subcommands

pub mod check;
pub mod clean;
pub mod generate;
pub mod list;
pub mod new;
