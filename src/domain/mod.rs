// src/domain/mod.rs
pub mod bookmark;
pub mod error;
pub mod metadata;
pub mod repositories;
pub mod tag;
pub mod url;
