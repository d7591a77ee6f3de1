// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// A bookmark hoarder for the terminal
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a bookmark; metadata is fetched from the page itself
    Add {
        url: String,

        #[arg(
            short = 't',
            long = "tags",
            help = "tags for the bookmark, comma separated"
        )]
        tags: Option<String>,

        #[arg(short = 'n', long = "note", help = "free-form note")]
        note: Option<String>,
    },
    /// Show a single bookmark
    Show {
        id: i32,

        #[arg(long = "json", help = "output as json")]
        is_json: bool,
    },
    /// List bookmarks, newest first
    List {
        #[arg(short = 'q', long = "query", help = "substring match on stored fields")]
        query: Option<String>,

        #[arg(short = 't', long = "tag", help = "only bookmarks carrying this tag")]
        tag: Option<String>,

        #[arg(short = 'l', long = "limit", help = "limit number of results")]
        limit: Option<i64>,

        #[arg(short = 'o', long = "offset", help = "skip this many results")]
        offset: Option<i64>,

        #[arg(long = "json", help = "output as json")]
        is_json: bool,
    },
    /// Delete a bookmark
    Delete { id: i32 },
    /// Show all tags with usage counts
    Tags {
        #[arg(long = "json", help = "output as json")]
        is_json: bool,
    },
    /// Check that the bookmark store is reachable
    Health {
        #[arg(long = "json", help = "output as json")]
        is_json: bool,
    },
}
