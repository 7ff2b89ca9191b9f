//! Server configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup (the binary also honors a `.env`
//! file via `dotenvy` and command-line overrides) and validated before the
//! server starts.
//!
//! ## Variables
//!
//! - `PROTOCOL` - `http` or `https` (default: `http`)
//! - `PORT` - Listening port (default: `8080`)
//! - `STATIC_URL` - URL prefix for static content, must start with `/` (default: `/`)
//! - `HANDLERS_DIR` - Handler manifest directory (default: `./demo/handlers`)
//! - `STATIC_DIR` - Static content directory (default: `./demo/static_html`)
//! - `LOG_DIR` - Log directory (default: `./log`)
//! - `LOG_LEVEL` - `trace`, `debug`, `info`, `warn` or `error` (default: `info`)
//! - `LOG_MAX_SIZE_MB` - Rotate the log file past this size (default: `10`)
//! - `LOG_BACKUP_COUNT` - Rotated files kept (default: `5`)
//! - `SSL_DIR` - Directory holding the TLS files (default: `./ssl`)
//! - `SSL_CERT_FILE` - PEM certificate file name (default: `ca.csr`)
//! - `SSL_KEY_FILE` - PEM private key file name (default: `ca.key`)
//! - `CONSOLE_MESSAGES` - Print routes and console logs (default: `true`)
//!
//! `RUST_LOG`, when set, takes precedence over `LOG_LEVEL`.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::logging::LogSettings;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// TLS material used when the protocol is `https`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    pub dir: PathBuf,
    pub cert_file: String,
    pub key_file: String,
}

impl TlsSettings {
    pub fn cert_path(&self) -> PathBuf {
        self.dir.join(&self.cert_file)
    }

    pub fn key_path(&self) -> PathBuf {
        self.dir.join(&self.key_file)
    }
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./ssl"),
            cert_file: "ca.csr".to_string(),
            key_file: "ca.key".to_string(),
        }
    }
}

/// Startup parameters of the server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Raw protocol string. Parsed by the bootstrap, which fails fast on
    /// anything other than `http`/`https`.
    pub protocol: String,
    pub port: u16,
    pub static_url: String,
    pub handlers_dir: PathBuf,
    pub static_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub log_max_size_mb: u64,
    pub log_backup_count: usize,
    pub tls: TlsSettings,
    pub console_messages: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            port: 8080,
            static_url: "/".to_string(),
            handlers_dir: PathBuf::from("./demo/handlers"),
            static_dir: PathBuf::from("./demo/static_html"),
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
            log_max_size_mb: 10,
            log_backup_count: 5,
            tls: TlsSettings::default(),
            console_messages: true,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// Unparsable numeric values fall back to their defaults as well.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let protocol = env::var("PROTOCOL").unwrap_or(defaults.protocol);

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);

        let static_url = env::var("STATIC_URL").unwrap_or(defaults.static_url);

        let handlers_dir = env::var("HANDLERS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.handlers_dir);
        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);
        let log_dir = env::var("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        let log_level = env::var("LOG_LEVEL")
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or(defaults.log_level);

        let log_max_size_mb = env::var("LOG_MAX_SIZE_MB")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.log_max_size_mb);

        let log_backup_count = env::var("LOG_BACKUP_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.log_backup_count);

        let tls = TlsSettings {
            dir: env::var("SSL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.tls.dir),
            cert_file: env::var("SSL_CERT_FILE").unwrap_or(defaults.tls.cert_file),
            key_file: env::var("SSL_KEY_FILE").unwrap_or(defaults.tls.key_file),
        };

        let console_messages = env::var("CONSOLE_MESSAGES")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(defaults.console_messages);

        Ok(Self {
            protocol,
            port,
            static_url,
            handlers_dir,
            static_dir,
            log_dir,
            log_level,
            log_max_size_mb,
            log_backup_count,
            tls,
            console_messages,
        })
    }

    /// Validates the configuration.
    ///
    /// The protocol is checked by [`crate::server::Server::run`] instead, so an
    /// unsupported value surfaces as its own startup error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `port` is 0
    /// - `static_url` does not start with `/`
    /// - `log_level` is not a known level
    /// - `log_max_size_mb` is 0
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("PORT must be between 1 and 65535");
        }

        if !self.static_url.trim().starts_with('/') {
            anyhow::bail!(
                "STATIC_URL must start with '/', got '{}'",
                self.static_url
            );
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            anyhow::bail!(
                "LOG_LEVEL must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            );
        }

        if self.log_max_size_mb == 0 {
            anyhow::bail!("LOG_MAX_SIZE_MB must be greater than 0");
        }

        Ok(())
    }

    /// Logging parameters derived from this configuration.
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            dir: self.log_dir.clone(),
            level: self.log_level.clone(),
            max_size_mb: self.log_max_size_mb,
            backup_count: self.log_backup_count,
            console: self.console_messages,
        }
    }

    /// Logs a configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Protocol: {}", self.protocol);
        tracing::info!("  Port: {}", self.port);
        tracing::info!("  Handlers: {}", self.handlers_dir.display());
        tracing::info!(
            "  Static content: {} -> {}",
            self.static_url,
            self.static_dir.display()
        );
        tracing::info!(
            "  Log: {} (level {}, {} MB x {})",
            self.log_dir.display(),
            self.log_level,
            self.log_max_size_mb,
            self.log_backup_count
        );
        if self.protocol.trim().eq_ignore_ascii_case("https") {
            tracing::info!(
                "  TLS: cert {}, key {}",
                self.tls.cert_path().display(),
                self.tls.key_path().display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.port = 0;
        assert!(config.validate().is_err());
        config.port = 8080;

        config.static_url = "static".to_string();
        assert!(config.validate().is_err());
        config.static_url = "/static".to_string();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
        config.log_level = "debug".to_string();
        assert!(config.validate().is_ok());

        config.log_max_size_mb = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_protocol_passes_validation() {
        let config = Config {
            protocol: "ftp".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tls_paths() {
        let tls = TlsSettings {
            dir: PathBuf::from("certs"),
            cert_file: "server.pem".to_string(),
            key_file: "server.key".to_string(),
        };
        assert_eq!(tls.cert_path(), PathBuf::from("certs/server.pem"));
        assert_eq!(tls.key_path(), PathBuf::from("certs/server.key"));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("PROTOCOL", "https");
            env::set_var("PORT", "9443");
            env::set_var("STATIC_URL", "/static/");
            env::set_var("LOG_LEVEL", "DEBUG");
            env::set_var("CONSOLE_MESSAGES", "false");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.protocol, "https");
        assert_eq!(config.port, 9443);
        assert_eq!(config.static_url, "/static/");
        assert_eq!(config.log_level, "debug");
        assert!(!config.console_messages);

        // Cleanup
        unsafe {
            env::remove_var("PROTOCOL");
            env::remove_var("PORT");
            env::remove_var("STATIC_URL");
            env::remove_var("LOG_LEVEL");
            env::remove_var("CONSOLE_MESSAGES");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_bad_number_falls_back() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("PORT", "not-a-port");
            env::set_var("LOG_BACKUP_COUNT", "-3");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_backup_count, 5);

        // Cleanup
        unsafe {
            env::remove_var("PORT");
            env::remove_var("LOG_BACKUP_COUNT");
        }
    }
}
