// src/cli/tag_commands.rs
use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::json::write_as_json;
use crossterm::style::Stylize;
use std::fmt::Write;

pub fn show_tags(cli: Cli, services: &ServiceContainer) -> CliResult<()> {
    if let Some(Commands::Tags { is_json }) = cli.command {
        let counts = services.bookmark_service.tag_counts()?;

        if is_json {
            write_as_json(&counts)?;
        } else if counts.is_empty() {
            eprintln!("No tags found");
        } else {
            eprintln!("All tags:");

            // Already ordered most frequent first
            let mut output = String::new();
            for tag_count in counts {
                writeln!(
                    &mut output,
                    "  {} ({})",
                    tag_count.tag.value().green(),
                    tag_count.n
                )
                .unwrap();
            }

            print!("{}", output);
        }
    }

    Ok(())
}
