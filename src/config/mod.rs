// Configuration module entry point
// Loads the host configuration from file, environment and defaults

mod types;

use std::net::SocketAddr;

// Re-export public types
pub use types::{
    AssetsConfig, Config, HtmlHandling, LoggingConfig, NotFoundHandling, PerformanceConfig,
    ServerConfig,
};

/// Config file used when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// A missing file is fine; defaults and `WORKER__SECTION__KEY`
    /// environment variables still apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("WORKER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8787)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 30)?
            .set_default("assets.binding", "ASSETS")?
            .set_default("assets.directory", "dist")?
            .set_default("assets.html_handling", "auto-trailing-slash")?
            .set_default("assets.not_found_handling", "none")?
            .set_default("assets.cache_control", "public, max-age=0, must-revalidate")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely/not/here/config").unwrap();
        assert_eq!(cfg.server.port, 8787);
        assert_eq!(cfg.assets.binding, "ASSETS");
        assert_eq!(cfg.assets.directory, "dist");
        assert_eq!(cfg.assets.index_files, vec!["index.html".to_string()]);
        assert_eq!(cfg.assets.html_handling, HtmlHandling::AutoTrailingSlash);
        assert_eq!(cfg.assets.not_found_handling, NotFoundHandling::None);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.performance.max_connections.is_none());
        assert_eq!(cfg.performance.shutdown_timeout, 30);
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worker.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9000
workers = 2

[assets]
directory = "public"
not_found_handling = "single-page-application"
html_handling = "none"
index_files = ["index.html", "index.htm"]

[performance]
max_connections = 64
"#
        )
        .unwrap();

        let stem = dir.path().join("worker");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.assets.directory, "public");
        assert_eq!(
            cfg.assets.not_found_handling,
            NotFoundHandling::SinglePageApplication
        );
        assert_eq!(cfg.assets.html_handling, HtmlHandling::None);
        assert_eq!(cfg.assets.index_files.len(), 2);
        assert_eq!(cfg.performance.max_connections, Some(64));
    }

    #[test]
    fn test_not_found_page_name() {
        let parsed: NotFoundHandling = serde_json::from_str("\"404-page\"").unwrap();
        assert_eq!(parsed, NotFoundHandling::NotFoundPage);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("definitely/not/here/config").unwrap();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8787".parse::<SocketAddr>().unwrap()
        );
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
