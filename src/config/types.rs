// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub assets: AssetsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written: error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
    /// Seconds in-flight connections get to finish after a shutdown signal
    pub shutdown_timeout: u64,
}

/// Static asset binding configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    /// Binding name the asset fetcher is registered under
    pub binding: String,
    /// Directory holding the built site
    pub directory: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
    pub html_handling: HtmlHandling,
    pub not_found_handling: NotFoundHandling,
    /// `Cache-Control` value sent with every asset
    pub cache_control: String,
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string()]
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            binding: "ASSETS".to_string(),
            directory: "dist".to_string(),
            index_files: default_index_files(),
            html_handling: HtmlHandling::default(),
            not_found_handling: NotFoundHandling::default(),
            cache_control: "public, max-age=0, must-revalidate".to_string(),
        }
    }
}

/// How extensionless paths map onto `.html` files
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HtmlHandling {
    /// `/about` also tries `about.html`
    #[default]
    AutoTrailingSlash,
    None,
}

/// What the asset binding answers when nothing matches
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NotFoundHandling {
    /// Plain 404
    #[default]
    None,
    /// Nearest `404.html` up the directory tree, served with status 404
    #[serde(rename = "404-page")]
    NotFoundPage,
    /// Root `index.html` with status 200
    SinglePageApplication,
}
