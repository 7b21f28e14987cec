use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::Error;

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub html: HtmlConfig,
    pub links: LinksConfig,
    pub page: PageConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Wrap the output in `<html><body>`.
    pub standalone: bool,
    /// Class of the `<blockquote>` element around quoted groups.
    pub quote_class: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            quote_class: "block-quote".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub color: String,
    pub underline: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            color: "#1a4f8b".to_string(),
            underline: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct PageConfig {
    pub numbers: bool,
    /// Emit a table of contents before the first block.
    pub toc: bool,
}

impl Config {
    /// The configuration bundled with the crate.
    pub fn compiled_default() -> Self {
        Self::from_toml(DEFAULT_CONFIG).unwrap_or_default()
    }

    pub fn from_toml(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a TOML file, or return the compiled default if it
    /// is missing or invalid.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::compiled_default()
            }),
            Err(_) => Self::compiled_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bundled_default_matches_code_default() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_tables_keep_defaults() {
        let config = Config::from_toml("[html]\nstandalone = false\n[page]\nnumbers = true\n").unwrap();
        assert!(!config.html.standalone);
        assert_eq!(config.html.quote_class, "block-quote");
        assert!(config.page.numbers);
        assert!(!config.page.toc);
        assert_eq!(config.links, LinksConfig::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml("[html\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_file_falls_back() {
        let config = Config::load(Path::new("/nonexistent/mdconv.toml"));
        assert_eq!(config, Config::default());
    }
}
