use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::analysis::batch::IdfStrategy;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Where reports for uploaded batches are written.
    pub report_dir: PathBuf,
    /// Parent of the per-request upload staging folders.
    pub staging_dir: PathBuf,
    pub idf_strategy: IdfStrategy,
    pub stopwords_case_insensitive: bool,
    /// Allows clients to name a server-side folder to scan.
    pub enable_folder_scan: bool,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 5000,
            rust_log: "info".to_string(),
            report_dir: PathBuf::from("."),
            staging_dir: std::env::temp_dir(),
            idf_strategy: IdfStrategy::Pair,
            stopwords_case_insensitive: false,
            enable_folder_scan: true,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            port: optional_env("PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(defaults.port),
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            report_dir: optional_env("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.report_dir),
            staging_dir: optional_env("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.staging_dir),
            idf_strategy: optional_env("IDF_STRATEGY")
                .map(|v| v.parse::<IdfStrategy>())
                .transpose()
                .context("IDF_STRATEGY must be 'pair' or 'batch'")?
                .unwrap_or(defaults.idf_strategy),
            stopwords_case_insensitive: optional_env("STOPWORDS_CASE_INSENSITIVE")
                .map(|v| parse_bool(&v))
                .transpose()
                .context("STOPWORDS_CASE_INSENSITIVE must be a boolean")?
                .unwrap_or(defaults.stopwords_case_insensitive),
            enable_folder_scan: optional_env("ENABLE_FOLDER_SCAN")
                .map(|v| parse_bool(&v))
                .transpose()
                .context("ENABLE_FOLDER_SCAN must be a boolean")?
                .unwrap_or(defaults.enable_folder_scan),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a byte count")?
                .unwrap_or(defaults.max_upload_bytes),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("'{other}' is not a boolean"),
    }
}
