// src/domain/repositories/mod.rs
pub mod query;
pub mod repository;

pub use query::{BookmarkListQuery, ListPage, TagCount};
pub use repository::BookmarkRepository;
