use crate::domain::error::DomainResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{instrument, trace};

/// Seconds before an in-flight metadata request is abandoned.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
/// Upper bound on the bytes read from a metadata response body.
pub const DEFAULT_MAX_BODY_BYTES: u64 = 1024 * 1024;
/// User-Agent sent with every metadata request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; LinkhoardBot/1.0)";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchSettings {
    /// Replace live metadata fetching with a fixed stub record (default: false)
    #[serde(default)]
    pub stub: bool,

    /// Total request timeout in seconds (default: 10)
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum response body size in bytes (default: 1 MiB)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: u64,

    /// User-Agent header for metadata requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_max_body_bytes() -> u64 {
    DEFAULT_MAX_BODY_BYTES
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            stub: false,
            timeout_secs: default_fetch_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_url: String,

    /// Options for the metadata fetcher
    #[serde(default)]
    pub fetch: FetchSettings,
}

fn default_db_path() -> String {
    let db_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("../db"))
        .join(".local/share/linkhoard");

    // Ensure directory exists
    std::fs::create_dir_all(&db_dir).ok();

    db_dir
        .join("linkhoard.db")
        .to_str()
        .unwrap_or("../db/linkhoard.db")
        .to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_url: default_db_path(),
            fetch: FetchSettings::default(),
        }
    }
}

// Accepts the usual truthy spellings for boolean environment flags.
fn parse_bool_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// Load settings from config files and environment variables
#[instrument(level = "debug")]
pub fn load_settings(config_path: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    // Start with default settings
    let mut settings = Settings::default();

    // Most specific location first; the first file that exists wins.
    let config_sources = [
        config_path.map(Path::to_path_buf),
        std::env::var("LINKHOARD_CONFIG").ok().map(PathBuf::from),
        dirs::home_dir().map(|p| p.join(".config/linkhoard/config.toml")),
    ];

    for config_path in config_sources.iter().flatten() {
        if config_path.exists() {
            trace!("Loading config from: {:?}", config_path);

            if let Ok(config_text) = std::fs::read_to_string(config_path) {
                if let Ok(file_settings) = toml::from_str::<Settings>(&config_text) {
                    // Update settings with values from file
                    settings.db_url = file_settings.db_url;
                    settings.fetch = file_settings.fetch;
                }
            }
            break;
        }
    }

    // Override with environment variables
    if let Ok(db_url) = std::env::var("LINKHOARD_DB_URL") {
        trace!("Using LINKHOARD_DB_URL from environment: {}", db_url);
        settings.db_url = db_url;
    }

    if let Ok(stub) = std::env::var("LINKHOARD_FETCH_STUB") {
        trace!("Using LINKHOARD_FETCH_STUB from environment: {}", stub);
        settings.fetch.stub = parse_bool_flag(&stub);
    }

    trace!("Settings loaded: {:?}", settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{init_test_env, EnvGuard};
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    // Helper function to create a temporary config file
    fn create_temp_config_file(content: &str) -> (TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).unwrap();
        (temp_dir, config_path)
    }

    #[test]
    #[serial]
    fn test_default_settings() {
        init_test_env();
        let _guard = EnvGuard::new();
        env::remove_var("LINKHOARD_DB_URL");
        env::remove_var("LINKHOARD_FETCH_STUB");
        env::remove_var("LINKHOARD_CONFIG");

        let settings = load_settings(None).unwrap();

        // Check default values
        assert!(settings.db_url.contains("linkhoard.db"));
        assert!(!settings.fetch.stub);
        assert_eq!(settings.fetch.timeout_secs, 10);
        assert_eq!(settings.fetch.max_body_bytes, 1024 * 1024);
        assert_eq!(settings.fetch.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    #[serial]
    fn test_environment_variables_override() {
        init_test_env();
        let _guard = EnvGuard::new();
        env::remove_var("LINKHOARD_CONFIG");

        // Set environment variables
        env::set_var("LINKHOARD_DB_URL", "/test/custom.db");
        env::set_var("LINKHOARD_FETCH_STUB", "1");

        let settings = load_settings(None).unwrap();

        // Check that environment values override defaults
        assert_eq!(settings.db_url, "/test/custom.db");
        assert!(settings.fetch.stub);
        assert_eq!(settings.fetch.timeout_secs, 10); // Default untouched
    }

    #[test]
    #[serial]
    fn test_config_file_loading() {
        init_test_env();
        let _guard = EnvGuard::new();
        env::remove_var("LINKHOARD_DB_URL");
        env::remove_var("LINKHOARD_FETCH_STUB");
        env::remove_var("LINKHOARD_CONFIG");

        let config_content = r#"
        db_url = "/config/file/path.db"

        [fetch]
        stub = true
        timeout_secs = 3
        max_body_bytes = 4096
        user_agent = "test-agent/0.1"
        "#;

        let (temp_dir, config_path) = create_temp_config_file(config_content);

        let settings = load_settings(Some(&config_path)).unwrap();

        assert_eq!(settings.db_url, "/config/file/path.db");
        assert!(settings.fetch.stub);
        assert_eq!(settings.fetch.timeout_secs, 3);
        assert_eq!(settings.fetch.max_body_bytes, 4096);
        assert_eq!(settings.fetch.user_agent, "test-agent/0.1");

        drop(temp_dir);
    }

    #[test]
    #[serial]
    fn test_partial_config_file_uses_defaults() {
        init_test_env();
        let _guard = EnvGuard::new();
        env::remove_var("LINKHOARD_DB_URL");
        env::remove_var("LINKHOARD_FETCH_STUB");
        env::remove_var("LINKHOARD_CONFIG");

        // Only the db path is set; everything under [fetch] should default.
        let config_content = r#"db_url = "/partial/override.db""#;
        let (temp_dir, config_path) = create_temp_config_file(config_content);

        let settings = load_settings(Some(&config_path)).unwrap();

        assert_eq!(settings.db_url, "/partial/override.db");
        assert!(!settings.fetch.stub);
        assert_eq!(settings.fetch.timeout_secs, 10);
        assert_eq!(settings.fetch.user_agent, DEFAULT_USER_AGENT);

        drop(temp_dir);
    }

    #[test]
    #[serial]
    fn test_environment_overrides_config_file() {
        init_test_env();
        let _guard = EnvGuard::new();

        env::set_var("LINKHOARD_DB_URL", "/env/override.db");
        env::set_var("LINKHOARD_FETCH_STUB", "yes");

        let config_content = r#"
        db_url = "/config/non-override.db"

        [fetch]
        stub = false
        timeout_secs = 7
        "#;

        let (temp_dir, config_path) = create_temp_config_file(config_content);

        let settings = load_settings(Some(&config_path)).unwrap();

        // Environment values win over the file
        assert_eq!(settings.db_url, "/env/override.db");
        assert!(settings.fetch.stub);
        // File values survive where the environment is silent
        assert_eq!(settings.fetch.timeout_secs, 7);

        drop(temp_dir);
    }

    #[test]
    #[serial]
    fn test_explicit_path_beats_env_config() {
        init_test_env();
        let _guard = EnvGuard::new();
        env::remove_var("LINKHOARD_DB_URL");
        env::remove_var("LINKHOARD_FETCH_STUB");

        let (env_dir, env_path) = create_temp_config_file(r#"db_url = "/from/env-config.db""#);
        let (arg_dir, arg_path) = create_temp_config_file(r#"db_url = "/from/arg-config.db""#);
        env::set_var("LINKHOARD_CONFIG", &env_path);

        let settings = load_settings(Some(&arg_path)).unwrap();
        assert_eq!(settings.db_url, "/from/arg-config.db");

        // Without the explicit path the environment pointer is honored.
        let settings = load_settings(None).unwrap();
        assert_eq!(settings.db_url, "/from/env-config.db");

        drop(env_dir);
        drop(arg_dir);
    }

    #[test]
    fn test_parse_bool_flag() {
        assert!(parse_bool_flag("1"));
        assert!(parse_bool_flag("true"));
        assert!(parse_bool_flag("YES"));
        assert!(parse_bool_flag(" on "));
        assert!(!parse_bool_flag("0"));
        assert!(!parse_bool_flag("false"));
        assert!(!parse_bool_flag("off"));
        assert!(!parse_bool_flag(""));
        assert!(!parse_bool_flag("maybe"));
    }

    #[test]
    fn test_default_db_path() {
        // Test the default path generation
        let path = default_db_path();
        assert!(path.contains("linkhoard.db"));
    }
}
