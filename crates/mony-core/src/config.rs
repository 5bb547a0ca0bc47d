//! Application configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Embedded defaults (compiled into the binary from `config/mony.toml`)
//! 2. An override file, if present: the explicit `--config` path, otherwise
//!    `~/.local/share/mony/config/mony.toml`
//!
//! Sections present in the override replace the embedded values; absent
//! sections keep them. The loaded config is immutable and is passed to the
//! importer and categorizer explicitly.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::import::ShortNameRule;
use crate::tasks::TaskCategory;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/mony.toml");

/// Values written on every imported income
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionConfig {
    pub category: String,
    pub payment_method: String,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            category: "Client Payment".to_string(),
            payment_method: "Bank Transfer".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. "info" or "mony_core=debug"
    pub level: Option<String>,
    /// Also append logs (without colors) to this file
    pub file: Option<PathBuf>,
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonyConfig {
    pub ingestion: IngestionConfig,
    /// Ordered client short-name rules (first match wins)
    pub clients: Vec<ShortNameRule>,
    /// Ordered task-list categories (first match wins)
    pub task_categories: Vec<TaskCategory>,
    pub task_fallback: TaskCategory,
    pub logging: LoggingConfig,
    pub source: ConfigSource,
}

impl Default for MonyConfig {
    fn default() -> Self {
        Self {
            ingestion: IngestionConfig::default(),
            clients: ["ioc", "aena", "cazatucasa", "bedfiles", "livgolf", "banco"]
                .into_iter()
                .map(|k| ShortNameRule::new(k, k))
                .collect(),
            task_categories: Vec::new(),
            task_fallback: TaskCategory::new("Other", "❓", Vec::<String>::new()),
            logging: LoggingConfig::default(),
            source: ConfigSource::Embedded,
        }
    }
}

impl MonyConfig {
    /// Load the embedded defaults, then apply the override file if one exists
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let config = Self::embedded()?;

        let path = match override_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        match path {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                debug!("Loading config override from {}", path.display());
                let mut config = parse_config(&content, config)?;
                config.source = ConfigSource::File(path);
                Ok(config)
            }
            _ => Ok(config),
        }
    }

    /// The compiled-in configuration only
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG, Self::default())
    }

    /// Parse TOML content over the compiled-in configuration
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content, Self::embedded()?)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("mony").join("config").join("mony.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    ingestion: Option<RawIngestion>,
    logging: Option<RawLogging>,
    clients: Option<Vec<RawClientRule>>,
    task_categories: Option<Vec<RawTaskCategory>>,
    task_fallback: Option<RawTaskFallback>,
}

#[derive(Debug, Deserialize)]
struct RawIngestion {
    category: Option<String>,
    payment_method: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLogging {
    level: Option<String>,
    file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawClientRule {
    keyword: String,
    short_name: String,
}

#[derive(Debug, Deserialize)]
struct RawTaskCategory {
    name: String,
    icon: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTaskFallback {
    name: Option<String>,
    icon: Option<String>,
}

/// Apply TOML content over a base configuration
fn parse_config(content: &str, base: MonyConfig) -> Result<MonyConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = base;

    if let Some(ingestion) = raw.ingestion {
        if let Some(category) = ingestion.category {
            config.ingestion.category = category;
        }
        if let Some(method) = ingestion.payment_method {
            config.ingestion.payment_method = method;
        }
    }

    if let Some(logging) = raw.logging {
        if logging.level.is_some() {
            config.logging.level = logging.level;
        }
        if logging.file.is_some() {
            config.logging.file = logging.file;
        }
    }

    if let Some(clients) = raw.clients {
        config.clients = clients
            .into_iter()
            .map(|rule| {
                if rule.keyword.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "Client rule for '{}' has an empty keyword",
                        rule.short_name
                    )));
                }
                Ok(ShortNameRule::new(&rule.keyword, &rule.short_name))
            })
            .collect::<Result<Vec<_>>>()?;
    }

    if let Some(categories) = raw.task_categories {
        config.task_categories = categories
            .into_iter()
            .map(|cat| {
                if cat.keywords.iter().any(|k| k.is_empty()) {
                    return Err(Error::Config(format!(
                        "Task category '{}' has an empty keyword",
                        cat.name
                    )));
                }
                let icon = cat.icon.unwrap_or_else(|| config.task_fallback.icon.clone());
                Ok(TaskCategory::new(&cat.name, &icon, cat.keywords))
            })
            .collect::<Result<Vec<_>>>()?;
    }

    if let Some(fallback) = raw.task_fallback {
        if let Some(name) = fallback.name {
            config.task_fallback.name = name;
        }
        if let Some(icon) = fallback.icon {
            config.task_fallback.icon = icon;
        }
    }

    Ok(config)
}
