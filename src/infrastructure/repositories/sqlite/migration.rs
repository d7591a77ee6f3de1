// src/infrastructure/repositories/sqlite/migration.rs

use diesel_migrations::{embed_migrations, EmbeddedMigrations};

/// All schema migrations, compiled into the binary. They run automatically
/// when a pool is opened; see `connection::run_pending_migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
