//! Stylesheet collection for the standalone export document.
//!
//! Every failure here is recoverable: a sheet whose rules or text cannot be read is
//! logged and skipped, and the export proceeds with whatever styling was gathered.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum StylesheetError {
    #[error("Rules of '{0}' are not accessible")]
    RulesUnavailable(String),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch '{href}': {source}")]
    Http {
        href: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unsupported stylesheet href '{0}'")]
    UnsupportedHref(String),
}

/// One stylesheet as the page sees it. Either part may be unavailable.
#[derive(Debug)]
pub struct Stylesheet {
    pub href: Option<String>,
    pub rules: Result<Vec<String>, StylesheetError>,
}

#[async_trait]
pub trait StylesheetSource: Send + Sync {
    async fn stylesheets(&self) -> Result<Vec<Stylesheet>, StylesheetError>;

    async fn fetch_text(&self, href: &str) -> Result<String, StylesheetError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Directory-backed source
// ────────────────────────────────────────────────────────────────────────────

/// Local `*.css` files from one directory, plus optional remote sheets whose rules
/// are never enumerable (only their text can be fetched).
pub struct DirStylesheetSource {
    dir: PathBuf,
    remote: Vec<String>,
    http: reqwest::Client,
}

impl DirStylesheetSource {
    pub fn new(dir: PathBuf, remote: Vec<String>) -> Self {
        Self {
            dir,
            remote,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl StylesheetSource for DirStylesheetSource {
    async fn stylesheets(&self) -> Result<Vec<Stylesheet>, StylesheetError> {
        let mut sheets = Vec::new();

        match tokio::fs::read_dir(&self.dir).await {
            Ok(mut entries) => {
                let mut paths = Vec::new();
                while let Some(entry) = entries.next_entry().await.map_err(|source| {
                    StylesheetError::Io {
                        path: self.dir.display().to_string(),
                        source,
                    }
                })? {
                    let path = entry.path();
                    if path.extension().is_some_and(|ext| ext == "css") {
                        paths.push(path);
                    }
                }
                paths.sort();

                for path in paths {
                    let href = format!("file://{}", path.display());
                    let rules = tokio::fs::read_to_string(&path)
                        .await
                        .map(|text| split_rules(&text))
                        .map_err(|source| StylesheetError::Io {
                            path: path.display().to_string(),
                            source,
                        });
                    sheets.push(Stylesheet {
                        href: Some(href),
                        rules,
                    });
                }
            }
            Err(e) => warn!(
                "Stylesheet directory {} is not readable: {e}",
                self.dir.display()
            ),
        }

        for href in &self.remote {
            sheets.push(Stylesheet {
                href: Some(href.clone()),
                rules: Err(StylesheetError::RulesUnavailable(href.clone())),
            });
        }

        Ok(sheets)
    }

    async fn fetch_text(&self, href: &str) -> Result<String, StylesheetError> {
        if let Some(path) = href.strip_prefix("file://") {
            return tokio::fs::read_to_string(path)
                .await
                .map_err(|source| StylesheetError::Io {
                    path: path.to_string(),
                    source,
                });
        }

        if href.starts_with("http://") || href.starts_with("https://") {
            let http_err = |source: reqwest::Error| StylesheetError::Http {
                href: href.to_string(),
                source,
            };
            return self
                .http
                .get(href)
                .timeout(FETCH_TIMEOUT)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(http_err)?
                .text()
                .await
                .map_err(http_err);
        }

        Err(StylesheetError::UnsupportedHref(href.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Collection
// ────────────────────────────────────────────────────────────────────────────

/// Concatenates the raw text of every known local stylesheet and the rules of every
/// accessible one, in sheet order. Never fails.
pub async fn collect_styles(source: &dyn StylesheetSource, local_names: &[String]) -> String {
    let sheets = match source.stylesheets().await {
        Ok(sheets) => sheets,
        Err(e) => {
            warn!("Could not enumerate stylesheets: {e}");
            return String::new();
        }
    };

    let mut css = String::new();
    for sheet in sheets {
        if let Some(href) = sheet
            .href
            .as_deref()
            .filter(|href| is_local_stylesheet(href, local_names))
        {
            match source.fetch_text(href).await {
                Ok(text) => {
                    css.push_str(&text);
                    css.push('\n');
                }
                Err(e) => warn!("Could not fetch stylesheet text: {e}"),
            }
        }

        match sheet.rules {
            Ok(rules) => {
                for rule in rules {
                    css.push_str(&rule);
                    css.push('\n');
                }
            }
            Err(e) => debug!("Could not access stylesheet rules: {e}"),
        }
    }
    css
}

/// True when the last path segment of `href` (query and fragment ignored) is one of `names`.
pub fn is_local_stylesheet(href: &str, names: &[String]) -> bool {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    names.iter().any(|name| name == file)
}

/// Splits stylesheet text into top-level rules. Comments are dropped; braces inside
/// strings do not count.
pub fn split_rules(css: &str) -> Vec<String> {
    let mut rules = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = css.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                current.push(c);
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    push_rule(&mut rules, &mut current);
                }
            }
            ';' if depth == 0 => {
                current.push(c);
                push_rule(&mut rules, &mut current);
            }
            _ => current.push(c),
        }
    }
    push_rule(&mut rules, &mut current);
    rules
}

fn push_rule(rules: &mut Vec<String>, current: &mut String) {
    let rule = current.trim();
    if !rule.is_empty() {
        rules.push(rule.to_string());
    }
    current.clear();
}
