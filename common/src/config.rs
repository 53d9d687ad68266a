use serde::{Deserialize, Serialize};
use slide_layout_protocol::TemplateSpec;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DOCS_URL_ENV: &str = "SLIDE_LAYOUT_DOCS_URL";
pub const INDENT_ENV: &str = "SLIDE_LAYOUT_INDENT";

/// Looked up relative to the working directory, in this order.
pub const LOCAL_CONFIG_PATHS: [&str; 2] = [
    ".slide-layout/config.toml",
    ".slide-layout/config.json",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

/// slide-layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Target of the Documentation command; the built-in link when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    /// Spaces per level when writing notebooks
    pub indent: usize,
    /// Give inserted cells an `id` on nbformat 4.5+ notebooks
    pub assign_cell_ids: bool,
    /// User layouts, merged over the built-in ones by id
    pub templates: Vec<TemplateSpec>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            documentation_url: None,
            indent: 1,
            assign_cell_ids: true,
            templates: Vec::new(),
        }
    }
}

impl LayoutConfig {
    /// `<config_dir>/slide-layout/config.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("slide-layout").join("config.toml"))
    }

    /// Load configuration from file. `.toml` files are TOML, anything else
    /// is JSON.
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// First candidate that exists and parses wins; unreadable candidates are
    /// logged and skipped.
    pub async fn load_with_fallback(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(path).await {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {e}", path.display());
                }
            }
        }

        tracing::debug!("Using default configuration");
        Self::default()
    }

    /// An explicit path must load. Otherwise the local files under `cwd`,
    /// then the user config file, then defaults. Environment overrides are
    /// applied last in every case.
    pub async fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path).await?,
            None => {
                let mut candidates: Vec<PathBuf> =
                    LOCAL_CONFIG_PATHS.iter().map(|p| cwd.join(p)).collect();
                candidates.extend(Self::user_config_path());
                Self::load_with_fallback(&candidates).await
            }
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DOCS_URL_ENV) {
            self.documentation_url = Some(url);
        }
        if let Some(value) = lookup(INDENT_ENV) {
            self.indent = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: INDENT_ENV,
                value,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_layout_protocol::CellType;

    #[tokio::test]
    async fn test_load_toml_with_templates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r###"
indent = 2

[[templates]]
id = "agenda"
label = "Agenda"

[[templates.cells]]
source = "## Agenda"
slide = "slide"

[[templates.cells]]
cell_type = "code"
source = "print('hi')"
"###,
        )
        .unwrap();

        let config = LayoutConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.indent, 2);
        assert!(config.assign_cell_ids);
        assert_eq!(config.templates.len(), 1);
        let cells = &config.templates[0].cells;
        assert_eq!(cells[0].cell_type, CellType::Markdown);
        assert_eq!(cells[0].slide.as_deref(), Some("slide"));
        assert_eq!(cells[1].cell_type, CellType::Code);
    }

    #[tokio::test]
    async fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"documentation_url": "https://example.com/docs"}"#).unwrap();

        let config = LayoutConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.documentation_url.as_deref(), Some("https://example.com/docs"));
        assert_eq!(config.indent, 1);
    }

    #[tokio::test]
    async fn test_fallback_skips_broken_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.json");
        std::fs::write(&broken, "indent = [").unwrap();
        std::fs::write(&good, r#"{"indent": 4}"#).unwrap();

        let candidates = vec![dir.path().join("missing.toml"), broken, good];
        let config = LayoutConfig::load_with_fallback(&candidates).await;
        assert_eq!(config.indent, 4);

        let config = LayoutConfig::load_with_fallback(&[]).await;
        assert_eq!(config, LayoutConfig::default());
    }

    #[tokio::test]
    async fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = LayoutConfig::load(Some(&missing), dir.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = LayoutConfig::default();
        config
            .apply_overrides(|var| match var {
                DOCS_URL_ENV => Some("https://docs.local/".to_string()),
                INDENT_ENV => Some(" 3 ".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.documentation_url.as_deref(), Some("https://docs.local/"));
        assert_eq!(config.indent, 3);

        let err = config
            .apply_overrides(|var| (var == INDENT_ENV).then(|| "wide".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(INDENT_ENV));
    }
}
