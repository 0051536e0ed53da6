//! Server configuration.
//!
//! Loaded once at startup from TOML and handed to [`app::router`](crate::app::router)
//! and [`Server::from_config`](crate::Server::from_config). Every field has a
//! default, so an empty file is a valid configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Address the listener binds to.
    pub bind: SocketAddr,
    /// Value the `pass` cookie must carry on guarded routes.
    pub secret: String,
    /// Directory served under `/file/{name}`.
    pub static_root: PathBuf,
    /// Where `/redirect` points.
    pub redirect_target: String,
    /// Also guard `POST /headers`.
    pub guard_echo: bool,
    pub max_body_bytes: usize,
    pub max_file_bytes: u64,
    pub body_timeout_ms: u64,
    pub file_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            secret: "1234567890".to_owned(),
            static_root: PathBuf::from("public"),
            redirect_target: "/inline".to_owned(),
            guard_echo: false,
            max_body_bytes: 1024 * 1024,
            max_file_bytes: 16 * 1024 * 1024,
            body_timeout_ms: 10_000,
            file_timeout_ms: 10_000,
        }
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml(src: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml(&src)
    }

    pub fn body_timeout(&self) -> Duration {
        Duration::from_millis(self.body_timeout_ms)
    }

    pub fn file_timeout(&self) -> Duration {
        Duration::from_millis(self.file_timeout_ms)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.secret.is_empty() {
            return Err(Error::InvalidConfig("secret must not be empty".into()));
        }
        if !self.redirect_target.starts_with('/') && !self.redirect_target.contains("://") {
            return Err(Error::InvalidConfig(format!(
                "redirect_target `{}` is neither a path nor an absolute URL",
                self.redirect_target
            )));
        }
        if self.body_timeout_ms == 0 || self.file_timeout_ms == 0 {
            return Err(Error::InvalidConfig("timeouts must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config = Config::from_toml(
            r#"
            bind = "0.0.0.0:8080"
            secret = "hunter2"
            static_root = "/srv/files"
            guard_echo = true
            max_body_bytes = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.secret, "hunter2");
        assert_eq!(config.static_root, PathBuf::from("/srv/files"));
        assert!(config.guard_echo);
        assert_eq!(config.max_body_bytes, 10);
        assert_eq!(config.redirect_target, "/inline");
    }

    #[test]
    fn empty_secret_is_rejected() {
        let err = Config::from_toml(r#"secret = """#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn relative_redirect_target_is_rejected() {
        let err = Config::from_toml(r#"redirect_target = "inline""#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(Config::from_toml(r#"redirect_target = "https://example.com/""#).is_ok());
    }

    #[test]
    fn unknown_keys_and_bad_addresses_fail_to_parse() {
        assert!(matches!(Config::from_toml("sekret = \"x\""), Err(Error::ConfigParse(_))));
        assert!(matches!(Config::from_toml("bind = \"nowhere\""), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wicket.toml");
        std::fs::write(&path, "secret = \"abc\"\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().secret, "abc");
        assert!(matches!(Config::load(dir.path().join("missing.toml")), Err(Error::Io(_))));
    }
}
