use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// Directory that receives exported PDFs.
    pub output_dir: PathBuf,
    /// Directory scanned for `*.css` files whose rules are inlined into exports.
    pub stylesheet_dir: PathBuf,
    /// Stylesheet names whose raw text is inlined in addition to their rules.
    pub local_stylesheets: Vec<String>,
    /// Extra stylesheet URLs listed alongside the local ones.
    pub remote_stylesheets: Vec<String>,
    /// Wait between mounting the standalone document and rasterizing it.
    pub settle_delay: Duration,
    pub rasterizer_command: String,
    pub seed_sample_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            host: env_or("HOST", "127.0.0.1"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            output_dir: PathBuf::from(env_or("OUTPUT_DIR", "./exports")),
            stylesheet_dir: PathBuf::from(env_or("STYLESHEET_DIR", "./static/css")),
            local_stylesheets: split_list(&env_or("LOCAL_STYLESHEETS", "style.css")),
            remote_stylesheets: split_list(&env_or("REMOTE_STYLESHEETS", "")),
            settle_delay: Duration::from_millis(
                env_or("EXPORT_SETTLE_MS", "500")
                    .parse::<u64>()
                    .context("EXPORT_SETTLE_MS must be a whole number of milliseconds")?,
            ),
            rasterizer_command: env_or("RASTERIZER_COMMAND", "wkhtmltopdf"),
            seed_sample_data: parse_bool(&env_or("SEED_SAMPLE_DATA", "true"))
                .context("SEED_SAMPLE_DATA must be true or false")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognized boolean '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("style.css, print.css ,"), vec!["style.css", "print.css"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool(" off ").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
