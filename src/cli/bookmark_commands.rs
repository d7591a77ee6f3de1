// src/cli/bookmark_commands.rs
use crate::application::error::ApplicationError;
use crate::application::services::DbHealth;
use crate::cli::args::{Cli, Commands};
use crate::cli::display::{show_bookmarks, DisplayBookmark, DEFAULT_FIELDS};
use crate::cli::error::{CliError, CliResult};
use crate::domain::bookmark::Bookmark;
use crate::domain::metadata::MetadataStatus;
use crate::domain::repositories::query::BookmarkListQuery;
use crate::domain::tag::{Tag, TagInput};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::json::{write_as_json, JsonBookmarkView, JsonListPageView};
use crossterm::style::Stylize;
use tracing::instrument;

#[instrument(skip(cli, services))]
pub fn add(cli: Cli, services: &ServiceContainer) -> CliResult<()> {
    if let Some(Commands::Add { url, tags, note }) = cli.command {
        let tag_input = tags.as_deref().map(TagInput::from);
        let bookmark =
            services
                .bookmark_service
                .add_bookmark(&url, tag_input.as_ref(), note.as_deref())?;

        println!(
            "Added bookmark: {} (ID: {})",
            bookmark.title.as_deref().unwrap_or(&bookmark.url),
            bookmark.id.unwrap_or(0)
        );

        // The bookmark is stored either way; a failed fetch only means its
        // metadata fields stayed empty.
        if bookmark.status != MetadataStatus::Ok {
            match &bookmark.error_message {
                Some(message) => eprintln!("Warning: metadata fetch failed: {}", message),
                None => eprintln!(
                    "Warning: metadata fetch failed (HTTP {})",
                    bookmark
                        .http_status
                        .map_or("?".to_string(), |s| s.to_string())
                ),
            }
        }
    }
    Ok(())
}

pub fn show(cli: Cli, services: &ServiceContainer) -> CliResult<()> {
    if let Some(Commands::Show { id, is_json }) = cli.command {
        match services.bookmark_service.get_bookmark(id)? {
            Some(bookmark) => {
                if is_json {
                    write_as_json(&JsonBookmarkView::from_domain(&bookmark))?;
                } else {
                    print_bookmark_details(&bookmark);
                }
            }
            None => {
                return Err(CliError::Application(ApplicationError::BookmarkNotFound(
                    id,
                )))
            }
        }
    }
    Ok(())
}

fn print_bookmark_details(bookmark: &Bookmark) {
    println!(
        "{} {} [{}]",
        bookmark
            .id
            .map_or("?".to_string(), |id| id.to_string())
            .blue(),
        bookmark.title.as_deref().unwrap_or(&bookmark.url).green(),
        bookmark.tags_string().unwrap_or_default().yellow()
    );
    println!("  URL: {}", bookmark.url);
    println!("  Canonical: {}", bookmark.url_norm);
    if let Some(description) = &bookmark.description {
        println!("  Description: {}", description);
    }
    if let Some(site_name) = &bookmark.site_name {
        println!("  Site: {}", site_name);
    }
    if let Some(image_url) = &bookmark.image_url {
        println!("  Image: {}", image_url);
    }
    if let Some(note) = &bookmark.note {
        println!("  Note: {}", note);
    }
    println!("  Created: {}", bookmark.created_at);
    println!("  Status: {}", bookmark.status);
    if let Some(http_status) = bookmark.http_status {
        println!("  HTTP status: {}", http_status);
    }
    if let Some(error_message) = &bookmark.error_message {
        println!("  Error: {}", error_message);
    }
    println!();
}

#[instrument(skip(cli, services))]
pub fn list(cli: Cli, services: &ServiceContainer) -> CliResult<()> {
    if let Some(Commands::List {
        query,
        tag,
        limit,
        offset,
        is_json,
    }) = cli.command
    {
        let mut list_query = BookmarkListQuery::new();
        if let Some(q) = query {
            list_query = list_query.with_query(q);
        }
        if let Some(tag_str) = tag {
            // An unusable tag filter is dropped rather than failing the
            // whole listing.
            match Tag::new(&tag_str) {
                Ok(parsed) => list_query = list_query.with_tag(parsed),
                Err(e) => eprintln!("Ignoring tag filter: {}", e),
            }
        }
        if let Some(limit) = limit {
            list_query = list_query.with_limit(limit);
        }
        if let Some(offset) = offset {
            list_query = list_query.with_offset(offset);
        }

        let page = services.bookmark_service.list_bookmarks(&list_query)?;

        if is_json {
            write_as_json(&JsonListPageView::from_page(&page))?;
        } else {
            let displays: Vec<DisplayBookmark> = page
                .items
                .iter()
                .map(DisplayBookmark::from_domain)
                .collect();
            show_bookmarks(&displays, DEFAULT_FIELDS);
            eprintln!(
                "Showing {} of {} bookmarks (limit {}, offset {})",
                page.items.len(),
                page.total,
                page.limit,
                page.offset
            );
        }
    }
    Ok(())
}

#[instrument(skip(cli, services))]
pub fn delete(cli: Cli, services: &ServiceContainer) -> CliResult<()> {
    if let Some(Commands::Delete { id }) = cli.command {
        match services.bookmark_service.delete_bookmark(id)? {
            true => println!("Deleted bookmark with ID {}", id),
            false => println!("Bookmark with ID {} not found", id),
        }
    }
    Ok(())
}

pub fn health(cli: Cli, services: &ServiceContainer) -> CliResult<()> {
    if let Some(Commands::Health { is_json }) = cli.command {
        let report = services.bookmark_service.health();

        if is_json {
            write_as_json(&report)?;
        } else {
            match report.db {
                DbHealth::Ok => println!("db: ok ({})", report.time),
                DbHealth::Ng => println!("db: ng ({})", report.time),
            }
        }
    }
    Ok(())
}
