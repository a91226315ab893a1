//! Game configuration loaded from `gomoku.toml`.
//!
//! Lookup order:
//! 1. Path in the `GOMOKU_CONFIG` environment variable
//! 2. `gomoku.toml` in the current directory
//! 3. `../gomoku.toml`
//!
//! Missing or broken files fall back to defaults. Environment overrides are
//! applied last: `GOMOKU_DIFFICULTY`, `GOMOKU_SEED`, `GOMOKU_ITERATIONS`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::Stone;
use crate::search::{Difficulty, MctsConfig};

/// Standard locations to search for gomoku.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &["gomoku.toml", "../gomoku.toml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level settings for a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Initial engine strength
    pub difficulty: Difficulty,
    /// Colour the human plays against the engine
    pub human_color: Stone,
    /// Search tuning; the budget is replaced by the difficulty's
    pub search: MctsConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        let difficulty = Difficulty::default();
        Self {
            difficulty,
            human_color: Stone::Black,
            search: MctsConfig::for_difficulty(difficulty),
        }
    }
}

/// Load the configuration from the first file found, then apply env overrides.
pub fn load_config() -> GameConfig {
    if let Ok(path) = std::env::var("GOMOKU_CONFIG") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Loading config from GOMOKU_CONFIG: {}", path.display());
            return load_or_default(&path);
        }
        warn!("GOMOKU_CONFIG={} not found, searching defaults", path.display());
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_or_default(path);
        }
    }

    debug!("No gomoku.toml found, using built-in defaults");
    apply_env_overrides(GameConfig::default())
}

/// Read and parse one config file. No env overrides.
pub fn load_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse TOML text into a config. A missing `[search]` budget follows the
/// configured difficulty.
pub fn parse_config(content: &str) -> Result<GameConfig, toml::de::Error> {
    let mut config: GameConfig = toml::from_str(content)?;
    let explicit_budget = toml::from_str::<toml::Table>(content)?
        .get("search")
        .and_then(|s| s.get("iterations"))
        .is_some();
    if !explicit_budget {
        config.search.iterations = config.difficulty.iterations();
    }
    Ok(config)
}

fn load_or_default(path: &Path) -> GameConfig {
    match load_from_path(path) {
        Ok(config) => apply_env_overrides(config),
        Err(e) => {
            warn!("{}, using defaults", e);
            apply_env_overrides(GameConfig::default())
        }
    }
}

/// Apply `GOMOKU_*` environment overrides.
pub fn apply_env_overrides(config: GameConfig) -> GameConfig {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides from any key lookup. Unparseable values are logged and ignored.
pub fn apply_overrides_from<F>(mut config: GameConfig, lookup: F) -> GameConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("GOMOKU_DIFFICULTY") {
        match Difficulty::parse(&v) {
            Some(difficulty) => {
                config.difficulty = difficulty;
                config.search.iterations = difficulty.iterations();
            }
            None => warn!("ignoring GOMOKU_DIFFICULTY={v:?}, expected easy|medium|hard"),
        }
    }
    if let Some(v) = lookup("GOMOKU_SEED") {
        match v.trim().parse() {
            Ok(seed) => config.search.seed = Some(seed),
            Err(_) => warn!("ignoring GOMOKU_SEED={v:?}, expected an unsigned integer"),
        }
    }
    if let Some(v) = lookup("GOMOKU_ITERATIONS") {
        match v.trim().parse() {
            Ok(n) => config.search.iterations = n,
            Err(_) => warn!("ignoring GOMOKU_ITERATIONS={v:?}, expected an unsigned integer"),
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.human_color, Stone::Black);
        assert_eq!(config.search.iterations, 1500);
    }

    #[test]
    fn test_parse_full_file() {
        let config = parse_config(
            r#"
            difficulty = "hard"
            human_color = "White"

            [search]
            exploration = 1.0
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.human_color, Stone::White);
        assert_eq!(config.search.exploration, 1.0);
        assert_eq!(config.search.seed, Some(42));
        assert_eq!(config.search.iterations, 3000);
        assert_eq!(config.search.rollout_depth, 50);
    }

    #[test]
    fn test_explicit_budget_wins_over_difficulty() {
        let config = parse_config(
            r#"
            difficulty = "easy"
            [search]
            iterations = 77
            "#,
        )
        .unwrap();
        assert_eq!(config.search.iterations, 77);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(parse_config("difficulty = ").is_err());
        assert!(parse_config("difficulty = \"impossible\"").is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_from_path(Path::new("/nonexistent/gomoku.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("gomoku.toml"));
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("gomoku-broken-{}.toml", std::process::id()));
        std::fs::write(&path, "[search\niterations = 5").unwrap();
        assert!(matches!(load_from_path(&path), Err(ConfigError::Parse { .. })));
        let config = load_or_default(&path);
        assert_eq!(config.search.exploration, MctsConfig::default().exploration);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_env_overrides() {
        let config = apply_overrides_from(
            GameConfig::default(),
            lookup(&[("GOMOKU_DIFFICULTY", "Easy"), ("GOMOKU_SEED", "9")]),
        );
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(config.search.iterations, 500);
        assert_eq!(config.search.seed, Some(9));
    }

    #[test]
    fn test_iterations_override_applies_after_difficulty() {
        let config = apply_overrides_from(
            GameConfig::default(),
            lookup(&[("GOMOKU_DIFFICULTY", "hard"), ("GOMOKU_ITERATIONS", "123")]),
        );
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.search.iterations, 123);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let config = apply_overrides_from(
            GameConfig::default(),
            lookup(&[
                ("GOMOKU_DIFFICULTY", "nightmare"),
                ("GOMOKU_SEED", "-1"),
                ("GOMOKU_ITERATIONS", "lots"),
            ]),
        );
        assert_eq!(config, GameConfig::default());
    }
}
