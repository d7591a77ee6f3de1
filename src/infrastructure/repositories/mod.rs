// src/infrastructure/repositories/mod.rs

pub mod sqlite;
