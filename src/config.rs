use std::path::Path;

use tracing::warn;

use crate::ai::{Difficulty, SearchConfig};
use crate::error::ConfigError;
use crate::game::{Controller, Player, Symbol};

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub players: PlayersConfig,
    pub search: SearchConfig,
    pub ui: UiConfig,
    pub arena: ArenaConfig,
}

/// Who controls a symbol, as written in the config file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ControllerKind {
    Human,
    Random,
    Heuristic,
    Minimax,
}

impl ControllerKind {
    pub fn controller(self) -> Controller {
        match self {
            ControllerKind::Human => Controller::Human,
            ControllerKind::Random => Controller::Computer(Difficulty::Random),
            ControllerKind::Heuristic => Controller::Computer(Difficulty::Heuristic),
            ControllerKind::Minimax => Controller::Computer(Difficulty::Minimax),
        }
    }
}

impl From<Difficulty> for ControllerKind {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Random => ControllerKind::Random,
            Difficulty::Heuristic => ControllerKind::Heuristic,
            Difficulty::Minimax => ControllerKind::Minimax,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayersConfig {
    pub x_name: String,
    pub o_name: String,
    pub x: ControllerKind,
    pub o: ControllerKind,
}

impl Default for PlayersConfig {
    fn default() -> Self {
        PlayersConfig {
            x_name: "Player".into(),
            o_name: "Computer".into(),
            x: ControllerKind::Human,
            o: ControllerKind::Minimax,
        }
    }
}

impl PlayersConfig {
    /// Build both players, X first.
    pub fn build(&self) -> (Player, Player) {
        (
            Player::new(self.x_name.clone(), Symbol::X, self.x.controller()),
            Player::new(self.o_name.clone(), Symbol::O, self.o.controller()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Pause before a computer player moves, in milliseconds.
    pub computer_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            computer_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub rounds: usize,
    /// Log progress every N rounds
    pub log_interval: usize,
    /// Rounds kept for rolling rates
    pub window: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            rounds: 100,
            log_interval: 10,
            window: 50,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.x_name.trim().is_empty() {
            return Err(ConfigError::Validation("players.x_name must not be empty".into()));
        }
        if self.players.o_name.trim().is_empty() {
            return Err(ConfigError::Validation("players.o_name must not be empty".into()));
        }
        if self.search.depth == 0 {
            return Err(ConfigError::Validation("search.depth must be >= 1".into()));
        }
        if self.search.time_budget_ms == Some(0) {
            return Err(ConfigError::Validation(
                "search.time_budget_ms must be > 0 when set".into(),
            ));
        }

        let weights = self.search.weights;
        if weights.two < 0 || weights.three < 0 || weights.win < 0 {
            return Err(ConfigError::Validation("search.weights must be >= 0".into()));
        }
        if weights.two > weights.three {
            return Err(ConfigError::Validation(
                "search.weights.two must be <= search.weights.three".into(),
            ));
        }
        if weights.three >= weights.win {
            return Err(ConfigError::Validation(
                "search.weights.three must be < search.weights.win".into(),
            ));
        }

        if self.arena.rounds == 0 {
            return Err(ConfigError::Validation("arena.rounds must be > 0".into()));
        }
        if self.arena.log_interval == 0 {
            return Err(ConfigError::Validation("arena.log_interval must be > 0".into()));
        }
        if self.arena.window == 0 {
            return Err(ConfigError::Validation("arena.window must be > 0".into()));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[players]
o = "heuristic"

[search]
depth = 4
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.players.o, ControllerKind::Heuristic);
        assert_eq!(config.search.depth, 4);
        // Other fields should be defaults
        assert_eq!(config.players.x, ControllerKind::Human);
        assert_eq!(config.search.weights.three, 20);
        assert_eq!(config.ui.computer_delay_ms, 1000);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_unknown_controller_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[players]\nx = \"expert\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_depth() {
        let mut config = AppConfig::default();
        config.search.depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_time_budget() {
        let mut config = AppConfig::default();
        config.search.time_budget_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_blank_name() {
        let mut config = AppConfig::default();
        config.players.o_name = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_weight() {
        let mut config = AppConfig::default();
        config.search.weights.two = -5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_two_above_three() {
        let mut config = AppConfig::default();
        config.search.weights.two = 30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_three_not_below_win() {
        let mut config = AppConfig::default();
        config.search.weights.three = 5000;
        assert!(config.validate().is_err());

        config.search.weights.three = config.search.weights.win;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_huge_partial_weight() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.toml");
        std::fs::write(&path, "[search.weights]\nthree = 2000000000\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_zero_rounds() {
        let mut config = AppConfig::default();
        config.arena.rounds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_log_interval() {
        let mut config = AppConfig::default();
        config.arena.log_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_window() {
        let mut config = AppConfig::default();
        config.arena.window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.search.depth, 6);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[players]
x_name = "Ada"
x = "random"

[arena]
rounds = 500
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.arena.rounds, 500);
        let (x, o) = config.players.build();
        assert_eq!(x.name(), "Ada");
        assert_eq!(x.difficulty(), Some(Difficulty::Random));
        // Others are defaults
        assert_eq!(o.name(), "Computer");
        assert_eq!(o.difficulty(), Some(Difficulty::Minimax));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[search]\ndepth = 0\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_controller_kind_matches_difficulty() {
        for difficulty in Difficulty::ALL {
            let kind = ControllerKind::from(difficulty);
            assert_eq!(kind.controller(), Controller::Computer(difficulty));
        }
        assert_eq!(ControllerKind::Human.controller(), Controller::Human);
    }
}
