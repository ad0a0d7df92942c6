//! Configuration management for the status proxy

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

use crate::errors::StartupError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server listens on
    pub bind_address: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Host of the IDO database
    pub db_host: String,

    /// Port of the IDO database
    pub db_port: u16,

    /// Name of the IDO database
    pub db_name: String,

    /// Database role used for the read-only queries
    pub db_user: String,

    /// Password for `db_user`
    #[serde(skip_serializing)]
    pub db_password: String,

    /// Upper bound on pooled database connections
    pub max_connections: u32,

    /// How long a request waits for a pooled connection
    pub acquire_timeout: Duration,

    /// Whether the status tables carry `problem_has_been_acknowledged`
    pub track_acknowledgements: bool,
}

/// Keys accepted in the JSON file named by `APP_CONFIG`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct FileConfig {
    db_name: Option<String>,
    db_user: Option<String>,
    db_pass: Option<String>,
    db_host: Option<String>,
    db_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "::".to_string(),
            port: 5000,
            db_host: "localhost".to_string(),
            db_port: 5432,
            db_name: "icinga".to_string(),
            db_user: "icinga".to_string(),
            db_password: String::new(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
            track_acknowledgements: true,
        }
    }
}

impl Config {
    /// Load configuration from the `APP_CONFIG` file (if set) and environment variables
    pub fn from_env() -> Result<Self, StartupError> {
        Self::load(None)
    }

    /// Like `from_env`, but an explicit file path takes the place of `APP_CONFIG`
    pub fn load(config_file: Option<&Path>) -> Result<Self, StartupError> {
        let mut config = Config::default();

        match config_file {
            Some(path) => config.apply_file(path)?,
            None => {
                if let Ok(path) = env::var("APP_CONFIG") {
                    config.apply_file(&path)?;
                }
            }
        }

        config.apply_env();
        Ok(config)
    }

    /// Overlay database settings from a JSON config file
    pub fn apply_file(&mut self, path: impl AsRef<Path>) -> Result<(), StartupError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            StartupError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let file: FileConfig = serde_json::from_str(&raw).map_err(|e| {
            StartupError::Config(format!("invalid JSON in {}: {}", path.display(), e))
        })?;

        if let Some(name) = file.db_name {
            self.db_name = name;
        }
        if let Some(user) = file.db_user {
            self.db_user = user;
        }
        if let Some(pass) = file.db_pass {
            self.db_password = pass;
        }
        if let Some(host) = file.db_host {
            self.db_host = host;
        }
        if let Some(port) = file.db_port {
            self.db_port = port;
        }

        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(bind_address) = env::var("BIND_ADDRESS") {
            self.bind_address = bind_address;
        }

        if let Ok(port) = env::var("PORT") {
            if let Ok(port) = port.parse() {
                self.port = port;
            }
        }

        if let Ok(db_host) = env::var("DB_HOST") {
            self.db_host = db_host;
        }

        if let Ok(db_port) = env::var("DB_PORT") {
            if let Ok(port) = db_port.parse() {
                self.db_port = port;
            }
        }

        if let Ok(db_name) = env::var("DB_NAME") {
            self.db_name = db_name;
        }

        if let Ok(db_user) = env::var("DB_USER") {
            self.db_user = db_user;
        }

        if let Ok(db_password) = env::var("DB_PASS") {
            self.db_password = db_password;
        }

        if let Ok(max_connections) = env::var("DB_MAX_CONNECTIONS") {
            if let Ok(max) = max_connections.parse() {
                self.max_connections = max;
            }
        }

        if let Ok(timeout) = env::var("DB_ACQUIRE_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                self.acquire_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(track) = env::var("TRACK_ACKNOWLEDGEMENTS") {
            self.track_acknowledgements = track.to_lowercase() == "true";
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.db_name.is_empty() {
            return Err("db_name cannot be empty".to_string());
        }

        if self.db_user.is_empty() {
            return Err("db_user cannot be empty".to_string());
        }

        if self.db_host.is_empty() {
            return Err("db_host cannot be empty".to_string());
        }

        if self.max_connections == 0 {
            return Err("max_connections must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Connection options for the IDO database
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .database(&self.db_name)
            .username(&self.db_user)
            .password(&self.db_password)
            // Marker timestamps are cast to naive UTC in the session zone.
            .options([("timezone", "UTC")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_connect_options_pin_session_timezone() {
        let options = Config::default().connect_options();
        assert_eq!(options.get_host(), "localhost");
        assert!(options
            .get_options()
            .is_some_and(|opts| opts.contains("timezone=UTC")));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.port, 5000);
        assert!(config.track_acknowledgements);
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let config = Config {
            db_name: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_connections: 0,
            ..Config::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            "max_connections must be greater than 0"
        );
    }

    #[test]
    fn test_apply_file_reads_database_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"DB_NAME": "ido", "DB_USER": "reader", "DB_PASS": "secret", "DB_PORT": 6432}}"#
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file.path()).unwrap();

        assert_eq!(config.db_name, "ido");
        assert_eq!(config.db_user, "reader");
        assert_eq!(config.db_password, "secret");
        assert_eq!(config.db_port, 6432);
        assert_eq!(config.db_host, "localhost");
    }

    #[test]
    fn test_apply_file_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "DB_NAME=ido").unwrap();

        let mut config = Config::default();
        let err = config.apply_file(file.path()).unwrap_err();
        assert!(matches!(err, StartupError::Config(_)));
    }

    #[test]
    fn test_password_is_not_serialized() {
        let config = Config {
            db_password: "hunter2".to_string(),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
    }
}
