// Configuration module entry point
// Loads layered configuration and holds shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Config file used when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the path given as first CLI argument,
    /// falling back to `config.*` in the working directory. `PORT` in the
    /// environment overrides `server.port`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path, std::env::var("PORT").ok())
    }

    /// Load configuration from specified file path (without extension).
    /// `port_override` takes precedence over both the file and the defaults.
    pub fn load_from(
        config_path: &str,
        port_override: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 1234)?
            .set_default("storage.blogs_file", "blogs.csv")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "flatblog/0.1")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_override_option("server.port", port_override)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Whether debug-level lines should be written
    pub fn debug_enabled(&self) -> bool {
        self.logging.level.eq_ignore_ascii_case("debug")
            || self.logging.level.eq_ignore_ascii_case("trace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let cfg = Config::load_from(missing.to_str().unwrap(), None).unwrap();

        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 1234);
        assert_eq!(cfg.storage.blogs_file, "blogs.csv");
        assert!(cfg.blog.seed_tags.is_empty());
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.max_body_size, 1_048_576);
        assert!(cfg.performance.max_connections.is_none());
        assert!(!cfg.debug_enabled());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.toml");
        fs::write(
            &path,
            r#"
[server]
port = 9000

[storage]
blogs_file = "data/posts.csv"

[blog]
seed_tags = ["custom"]

[logging]
level = "debug"
access_log_format = "json"
"#,
        )
        .unwrap();

        let base = dir.path().join("blog");
        let cfg = Config::load_from(base.to_str().unwrap(), None).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.storage.blogs_file, "data/posts.csv");
        assert_eq!(cfg.blog.seed_tags, vec!["custom"]);
        assert_eq!(cfg.logging.access_log_format, "json");
        assert!(cfg.debug_enabled());
    }

    #[test]
    fn test_port_override() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let cfg = Config::load_from(missing.to_str().unwrap(), Some("4321".to_string())).unwrap();
        assert_eq!(cfg.server.port, 4321);
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:4321".parse().unwrap()
        );
    }

    #[test]
    fn test_bad_port_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(Config::load_from(missing.to_str().unwrap(), Some("http".to_string())).is_err());
    }
}
