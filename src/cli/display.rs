// src/cli/display.rs

use crate::domain::bookmark::Bookmark;
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use std::fmt;
use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayField {
    Id,
    Url,
    Title,
    Description,
    Tags,
    SiteName,
    Status,
    CreatedAt,
}

impl fmt::Display for DisplayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayField::Id => write!(f, "ID"),
            DisplayField::Url => write!(f, "URL"),
            DisplayField::Title => write!(f, "Title"),
            DisplayField::Description => write!(f, "Description"),
            DisplayField::Tags => write!(f, "Tags"),
            DisplayField::SiteName => write!(f, "Site"),
            DisplayField::Status => write!(f, "Status"),
            DisplayField::CreatedAt => write!(f, "Created"),
        }
    }
}

pub const DEFAULT_FIELDS: &[DisplayField] = &[
    DisplayField::Id,
    DisplayField::Url,
    DisplayField::Title,
    DisplayField::Description,
    DisplayField::Tags,
    DisplayField::SiteName,
    DisplayField::Status,
    DisplayField::CreatedAt,
];

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct DisplayBookmark {
    #[builder(default = "0")]
    pub id: i32,

    #[builder(default)]
    pub url: String,

    #[builder(default)]
    pub title: String,

    #[builder(default)]
    pub description: String,

    #[builder(default)]
    pub tags: String,

    #[builder(default)]
    pub site_name: String,

    #[builder(default)]
    pub status: String,

    #[builder(default = "chrono::Utc::now()")]
    pub created_at: DateTime<Utc>,
}

impl DisplayBookmark {
    pub fn from_domain(bookmark: &Bookmark) -> Self {
        DisplayBookmarkBuilder::default()
            .id(bookmark.id.unwrap_or(0))
            .url(bookmark.url.clone())
            .title(bookmark.title.clone().unwrap_or_default())
            .description(bookmark.description.clone().unwrap_or_default())
            .tags(bookmark.tags_string().unwrap_or_default())
            .site_name(bookmark.site_name.clone().unwrap_or_default())
            .status(bookmark.status.as_str().to_string())
            .created_at(bookmark.created_at)
            .build()
            .unwrap()
    }

    pub fn get_value(&self, field: &DisplayField) -> String {
        match field {
            DisplayField::Id => self.id.to_string(),
            DisplayField::Url => self.url.clone(),
            DisplayField::Title => self.title.clone(),
            DisplayField::Description => self.description.clone(),
            DisplayField::Tags => self.tags.clone(),
            DisplayField::SiteName => self.site_name.clone(),
            DisplayField::Status => self.status.clone(),
            DisplayField::CreatedAt => self.created_at.to_string(),
        }
    }
}

// Implement Default directly instead of deriving it,
// as we already provide defaults in the builder
impl Default for DisplayBookmark {
    fn default() -> Self {
        Self {
            id: 0,
            url: String::new(),
            title: String::new(),
            description: String::new(),
            tags: String::new(),
            site_name: String::new(),
            status: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// Display bookmarks with color formatting
pub fn show_bookmarks(bookmarks: &[DisplayBookmark], fields: &[DisplayField]) {
    if bookmarks.is_empty() {
        eprintln!("No bookmarks to display");
        return;
    }

    // Check if the output is a TTY
    let color_choice = if io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(color_choice);
    let first_col_width = bookmarks.len().to_string().len();

    for (i, bm) in bookmarks.iter().enumerate() {
        // Title line (green); an untitled bookmark shows its URL instead
        if fields.contains(&DisplayField::Title) {
            let heading = if bm.title.is_empty() {
                &bm.url
            } else {
                &bm.title
            };
            if let Err(e) = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Green))) {
                eprintln!("Error setting color: {}", e);
            }
            if let Err(e) = write!(&mut stderr, "{:first_col_width$}. {}", i + 1, heading) {
                eprintln!("Error writing to stderr: {}", e);
            }
        }

        // ID (white)
        if fields.contains(&DisplayField::Id) {
            if let Err(e) = stderr.set_color(ColorSpec::new().set_fg(Some(Color::White))) {
                eprintln!("Error setting color: {}", e);
            }
            if let Err(e) = writeln!(&mut stderr, " [{}]", bm.id) {
                eprintln!("Error writing to stderr: {}", e);
            }
        } else {
            // End the title line if no ID is shown
            if let Err(e) = writeln!(&mut stderr) {
                eprintln!("Error writing to stderr: {}", e);
            }
        }

        // URL (yellow)
        if fields.contains(&DisplayField::Url) {
            if let Err(e) = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow))) {
                eprintln!("Error setting color: {}", e);
            }
            if let Err(e) = writeln!(&mut stderr, "{:first_col_width$}  {}", "", bm.url) {
                eprintln!("Error writing to stderr: {}", e);
            }
        }

        // Description (white)
        if fields.contains(&DisplayField::Description) && !bm.description.is_empty() {
            if let Err(e) = stderr.set_color(ColorSpec::new().set_fg(Some(Color::White))) {
                eprintln!("Error setting color: {}", e);
            }
            if let Err(e) = writeln!(&mut stderr, "{:first_col_width$}  {}", "", bm.description) {
                eprintln!("Error writing to stderr: {}", e);
            }
        }

        // Tags (blue)
        if fields.contains(&DisplayField::Tags) {
            let tags = bm.tags.replace(',', " ");
            if tags.find(|c: char| !c.is_whitespace()).is_some() {
                if let Err(e) = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Blue))) {
                    eprintln!("Error setting color: {}", e);
                }
                if let Err(e) = writeln!(&mut stderr, "{:first_col_width$}  {}", "", tags.trim()) {
                    eprintln!("Error writing to stderr: {}", e);
                }
            }
        }

        // Site name and any non-ok fetch status on one line
        let mut status_line = String::new();

        if fields.contains(&DisplayField::SiteName) && !bm.site_name.is_empty() {
            status_line.push_str(&format!("site: {}", bm.site_name));
        }

        if fields.contains(&DisplayField::Status) && !bm.status.is_empty() && bm.status != "ok" {
            if !status_line.is_empty() {
                status_line.push_str(" | ");
            }
            status_line.push_str(&format!("status: {}", bm.status));
        }

        if !status_line.is_empty() {
            if let Err(e) = stderr.set_color(ColorSpec::new().set_fg(Some(Color::White))) {
                eprintln!("Error setting color: {}", e);
            }
            if let Err(e) = writeln!(&mut stderr, "{:first_col_width$}  {}", "", status_line) {
                eprintln!("Error writing to stderr: {}", e);
            }
        }

        // Creation timestamp (magenta)
        if fields.contains(&DisplayField::CreatedAt) {
            if let Err(e) = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Magenta))) {
                eprintln!("Error setting color: {}", e);
            }
            if let Err(e) = writeln!(&mut stderr, "{:first_col_width$}  {}", "", bm.created_at) {
                eprintln!("Error writing to stderr: {}", e);
            }
        }

        // Reset colors and print a blank line between bookmarks
        if let Err(e) = stderr.reset() {
            eprintln!("Error resetting color: {}", e);
        }
        eprintln!();
    }
}
