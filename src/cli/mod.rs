// src/cli/mod.rs
use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::infrastructure::di::ServiceContainer;

pub mod args;
pub mod bookmark_commands;
pub mod display;
pub mod error;
pub mod tag_commands;

pub fn execute_command(cli: Cli, services: &ServiceContainer) -> CliResult<()> {
    match cli.command {
        Some(Commands::Add { .. }) => bookmark_commands::add(cli, services),
        Some(Commands::Show { .. }) => bookmark_commands::show(cli, services),
        Some(Commands::List { .. }) => bookmark_commands::list(cli, services),
        Some(Commands::Delete { .. }) => bookmark_commands::delete(cli, services),
        Some(Commands::Tags { .. }) => tag_commands::show_tags(cli, services),
        Some(Commands::Health { .. }) => bookmark_commands::health(cli, services),
        None => Ok(()),
    }
}
