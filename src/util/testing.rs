// src/util/testing.rs

use std::env;
use std::sync::OnceLock;

use tempfile::TempDir;
use tracing::debug;
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::repositories::sqlite::repository::SqliteBookmarkRepository;

static TEST_LOGGING: OnceLock<()> = OnceLock::new();

/// Initializes test logging exactly once. Safe to call from every test.
pub fn init_test_env() {
    TEST_LOGGING.get_or_init(|| {
        setup_test_logging();
    });
}

/// Logging setup only runs once; subsequent calls do nothing if `tracing` is already set.
fn setup_test_logging() {
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "debug");
    }

    // Silence spammy modules
    let noisy_modules = ["reqwest", "hyper_util", "mio", "want"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}

/// Saves the process environment variables the crate reads and restores
/// them on drop, so env-twiddling tests cannot leak into each other.
#[derive(Debug, Clone)]
pub struct EnvGuard {
    db_url: Option<String>,
    fetch_stub: Option<String>,
    config: Option<String>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            db_url: env::var("LINKHOARD_DB_URL").ok(),
            fetch_stub: env::var("LINKHOARD_FETCH_STUB").ok(),
            config: env::var("LINKHOARD_CONFIG").ok(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var("LINKHOARD_DB_URL");
        env::remove_var("LINKHOARD_FETCH_STUB");
        env::remove_var("LINKHOARD_CONFIG");
        if let Some(val) = &self.db_url {
            env::set_var("LINKHOARD_DB_URL", val);
        }
        if let Some(val) = &self.fetch_stub {
            env::set_var("LINKHOARD_FETCH_STUB", val);
        }
        if let Some(val) = &self.config {
            env::set_var("LINKHOARD_CONFIG", val);
        }
    }
}

/// Creates a migrated repository backed by a database file in a fresh
/// temporary directory. The directory lives as long as the returned
/// handle, so keep it bound for the duration of the test.
pub fn setup_test_db() -> (SqliteBookmarkRepository, TempDir) {
    init_test_env();

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("linkhoard.db");
    let repository = SqliteBookmarkRepository::from_url(&db_path.to_string_lossy())
        .expect("Failed to create SqliteBookmarkRepository");

    (repository, temp_dir)
}
