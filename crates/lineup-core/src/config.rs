// Configuration loading and parsing (generator.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::model::player::PlayerPool;
use crate::spec::{CreditWindow, RoleRange, RoleRanges};

/// Config file name under `config/` (and `defaults/`).
pub const GENERATOR_FILE: &str = "generator.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled config
// ---------------------------------------------------------------------------

/// Generator defaults used to seed constraint specs and host scheduling.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub generation: GenerationDefaults,
    pub role_ranges: RoleRanges,
    pub credits: CreditSuggestion,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            generation: GenerationDefaults {
                max_attempts: 10_000,
                requested_team_count: 1,
                batch_size: 250,
                distinct_lineups: false,
            },
            role_ranges: RoleRanges::default(),
            credits: CreditSuggestion {
                suggestion_padding: 2.5,
                tight_padding: 1.5,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// generator.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire generator.toml file.
#[derive(Debug, Clone, Deserialize)]
struct GeneratorFile {
    generation: GenerationDefaults,
    role_ranges: RoleRangesSection,
    credits: CreditSuggestion,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationDefaults {
    pub max_attempts: usize,
    pub requested_team_count: usize,
    /// Attempts per batch between yields in cooperative runs.
    pub batch_size: usize,
    #[serde(default)]
    pub distinct_lineups: bool,
}

/// Role ranges as `[min, max]` pairs. Field names use UPPERCASE to match the
/// TOML keys (WK, BAT, ALL, BOW).
#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
struct RoleRangesSection {
    WK: [usize; 2],
    BAT: [usize; 2],
    ALL: [usize; 2],
    BOW: [usize; 2],
}

impl From<RoleRangesSection> for RoleRanges {
    fn from(s: RoleRangesSection) -> Self {
        RoleRanges {
            wk: RoleRange::new(s.WK[0], s.WK[1]),
            bat: RoleRange::new(s.BAT[0], s.BAT[1]),
            all: RoleRange::new(s.ALL[0], s.ALL[1]),
            bow: RoleRange::new(s.BOW[0], s.BOW[1]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreditSuggestion {
    pub suggestion_padding: f64,
    pub tight_padding: f64,
}

impl CreditSuggestion {
    /// Suggested credit window for a pool, using the tight padding if asked.
    pub fn window_for(&self, pool: &PlayerPool, tight: bool) -> Option<CreditWindow> {
        let padding = if tight {
            self.tight_padding
        } else {
            self.suggestion_padding
        };
        CreditWindow::suggested(pool, padding)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/generator.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<GeneratorConfig, ConfigError> {
    let path = base_dir.join("config").join(GENERATOR_FILE);
    let text = read_file(&path)?;
    let file: GeneratorFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = GeneratorConfig {
        generation: file.generation,
        role_ranges: file.role_ranges.into(),
        credits: file.credits,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/generator.toml` to `config/generator.toml` if the latter is
/// missing. Returns the written path, or `None` when a config already exists.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(GENERATOR_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(GENERATOR_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{GENERATOR_FILE} and no defaults/{GENERATOR_FILE} in {}",
                base_dir.display()
            ),
        });
    }

    if let Some(config_dir) = target.parent() {
        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create config directory: {e}"),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", source.display()),
    })?;

    info!(path = %target.display(), "Initialized generator config from defaults");
    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<GeneratorConfig, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &GeneratorConfig) -> Result<(), ConfigError> {
    let generation = &config.generation;
    let positive_fields: &[(&str, usize)] = &[
        ("generation.max_attempts", generation.max_attempts),
        ("generation.requested_team_count", generation.requested_team_count),
        ("generation.batch_size", generation.batch_size),
    ];
    for (name, val) in positive_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    config
        .role_ranges
        .validate()
        .map_err(|e| ConfigError::ValidationError {
            field: "role_ranges".into(),
            message: e.to_string(),
        })?;

    let credits = &config.credits;
    let padding_fields: &[(&str, f64)] = &[
        ("credits.suggestion_padding", credits.suggestion_padding),
        ("credits.tight_padding", credits.tight_padding),
    ];
    for (name, val) in padding_fields {
        if !val.is_finite() || *val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a non-negative number, got {val}"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
