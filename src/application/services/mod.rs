// src/application/services/mod.rs
pub mod bookmark_service;
pub mod bookmark_service_impl;

pub use bookmark_service::{BookmarkService, DbHealth, HealthReport};
pub use bookmark_service_impl::BookmarkServiceImpl;
