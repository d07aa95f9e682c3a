//! Tunable profiles and typed configuration for the Digivice simulation.
//!
//! Every interval, probability, and amount the simulation reads lives in a
//! [`TunableProfile`]. Two base profiles exist: [`TunableProfile::production`]
//! for real play and [`TunableProfile::fast_iteration`] for development, where
//! minutes become seconds. The optional `digivice-config.yaml` picks a base
//! profile, overrides individual fields, and supplies the evolution table.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use digivice_types::{CheckCategory, EVOLUTION_GAUGE_FULL, LifeStage};
use serde::Deserialize;

use crate::evolution::EvolutionTable;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is out of its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

// ---------------------------------------------------------------------------
// Tunable profile
// ---------------------------------------------------------------------------

/// Evolution gauge gained per evolution check, by life stage.
///
/// Earlier stages grow faster: `stage_a > stage_b > stage_c`, and the
/// terminal `stage_d` contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GaugeIncrements {
    /// Gauge gained per check in `StageA`.
    pub stage_a: f64,
    /// Gauge gained per check in `StageB`.
    pub stage_b: f64,
    /// Gauge gained per check in `StageC`.
    pub stage_c: f64,
    /// Gauge gained per check in `StageD`.
    pub stage_d: f64,
}

impl GaugeIncrements {
    /// The increment for a life stage. Eggs never accumulate.
    pub const fn for_stage(&self, stage: LifeStage) -> f64 {
        match stage {
            LifeStage::Egg => 0.0,
            LifeStage::StageA => self.stage_a,
            LifeStage::StageB => self.stage_b,
            LifeStage::StageC => self.stage_c,
            LifeStage::StageD => self.stage_d,
        }
    }

    const fn all(&self) -> [(&'static str, f64); 4] {
        [
            ("stage_a", self.stage_a),
            ("stage_b", self.stage_b),
            ("stage_c", self.stage_c),
            ("stage_d", self.stage_d),
        ]
    }
}

impl Default for GaugeIncrements {
    fn default() -> Self {
        Self {
            stage_a: 10.0,
            stage_b: 5.0,
            stage_c: 2.5,
            stage_d: 0.0,
        }
    }
}

/// All interval lengths, probabilities, and amounts the simulation uses.
///
/// Intervals are in milliseconds of wall-clock time.
#[derive(Debug, Clone, PartialEq)]
pub struct TunableProfile {
    /// Time from egg creation to hatching.
    pub egg_hatch_timeout_ms: u64,
    /// Base interval between sickness rolls.
    pub sickness_check_interval_ms: u64,
    /// Sickness probability with a perfectly clean room.
    pub base_sickness_probability: f64,
    /// Extra sickness probability per unhygienic object.
    pub sickness_probability_per_unhygienic_object: f64,
    /// Base interval between stamina decrements.
    pub stamina_decrease_interval_ms: u64,
    /// Stamina lost per decrement.
    pub stamina_decrease_amount: u32,
    /// Base interval between evolution gauge checks.
    pub evolution_check_interval_ms: u64,
    /// Minimum stamina for the evolution gauge to grow.
    pub evolution_stamina_threshold: u32,
    /// Gauge gained per evolution check, by stage.
    pub evolution_gauge_increment: GaugeIncrements,
    /// How long stamina may sit at zero before the character dies.
    pub death_timeout_after_zero_stamina_ms: u64,
    /// Age at which uneaten food counts as unhygienic.
    pub stale_food_threshold_ms: u64,
    /// Maximum relative jitter applied to check intervals (0.1 = ±10%).
    pub jitter_ratio: f64,
}

/// One minute in milliseconds.
const MINUTE_MS: u64 = 60_000;

/// One hour in milliseconds.
const HOUR_MS: u64 = 60 * MINUTE_MS;

impl TunableProfile {
    /// The profile used for real play.
    pub fn production() -> Self {
        Self {
            egg_hatch_timeout_ms: 10 * MINUTE_MS,
            sickness_check_interval_ms: 30 * MINUTE_MS,
            base_sickness_probability: 0.05,
            sickness_probability_per_unhygienic_object: 0.01,
            stamina_decrease_interval_ms: HOUR_MS,
            stamina_decrease_amount: 1,
            evolution_check_interval_ms: 30 * MINUTE_MS,
            evolution_stamina_threshold: 4,
            evolution_gauge_increment: GaugeIncrements::default(),
            death_timeout_after_zero_stamina_ms: 12 * HOUR_MS,
            stale_food_threshold_ms: 6 * HOUR_MS,
            jitter_ratio: 0.1,
        }
    }

    /// A compressed profile for development: every duration is 60x shorter.
    pub fn fast_iteration() -> Self {
        Self {
            egg_hatch_timeout_ms: 10_000,
            sickness_check_interval_ms: 30_000,
            stamina_decrease_interval_ms: MINUTE_MS,
            evolution_check_interval_ms: 30_000,
            death_timeout_after_zero_stamina_ms: 12 * MINUTE_MS,
            stale_food_threshold_ms: 6 * MINUTE_MS,
            ..Self::production()
        }
    }

    /// Base interval for a periodic check category.
    pub const fn interval_for(&self, category: CheckCategory) -> u64 {
        match category {
            CheckCategory::Sickness => self.sickness_check_interval_ms,
            CheckCategory::Stamina => self.stamina_decrease_interval_ms,
            CheckCategory::Evolution => self.evolution_check_interval_ms,
        }
    }

    /// The secondary, half-length stamina interval after which a sick
    /// character loses an extra point.
    pub const fn sick_stamina_interval_ms(&self) -> u64 {
        self.stamina_decrease_interval_ms / 2
    }

    /// Check every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("egg_hatch_timeout_ms", self.egg_hatch_timeout_ms),
            ("sickness_check_interval_ms", self.sickness_check_interval_ms),
            ("stamina_decrease_interval_ms", self.stamina_decrease_interval_ms),
            ("evolution_check_interval_ms", self.evolution_check_interval_ms),
            (
                "death_timeout_after_zero_stamina_ms",
                self.death_timeout_after_zero_stamina_ms,
            ),
            ("stale_food_threshold_ms", self.stale_food_threshold_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(invalid(format!("{name} must be at least 1ms")));
            }
        }

        let probabilities = [
            ("base_sickness_probability", self.base_sickness_probability),
            (
                "sickness_probability_per_unhygienic_object",
                self.sickness_probability_per_unhygienic_object,
            ),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} must be within [0, 1], got {value}")));
            }
        }

        for (name, value) in self.evolution_gauge_increment.all() {
            if !value.is_finite() || value < 0.0 || value >= EVOLUTION_GAUGE_FULL {
                return Err(invalid(format!(
                    "evolution_gauge_increment.{name} must be within [0, {EVOLUTION_GAUGE_FULL}), got {value}"
                )));
            }
        }

        if !(0.0..1.0).contains(&self.jitter_ratio) {
            return Err(invalid(format!(
                "jitter_ratio must be within [0, 1), got {}",
                self.jitter_ratio
            )));
        }

        Ok(())
    }
}

impl Default for TunableProfile {
    fn default() -> Self {
        Self::production()
    }
}

const fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid { reason }
}

// ---------------------------------------------------------------------------
// Game rules (profile + tables)
// ---------------------------------------------------------------------------

/// Everything the transition engine needs besides the character itself.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRules {
    /// Interval lengths, probabilities, and amounts.
    pub profile: TunableProfile,
    /// Hatch and evolution weights, keyed by species.
    pub evolution: EvolutionTable,
    /// Species given to freshly laid eggs.
    pub egg_species: String,
}

impl GameRules {
    /// Build validated rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the profile or table is out of range.
    pub fn new(
        profile: TunableProfile,
        evolution: EvolutionTable,
        egg_species: String,
    ) -> Result<Self, ConfigError> {
        profile.validate()?;
        evolution.validate()?;
        Ok(Self {
            profile,
            evolution,
            egg_species,
        })
    }

    /// Production profile with the built-in evolution table.
    pub fn production() -> Self {
        Self {
            profile: TunableProfile::production(),
            evolution: EvolutionTable::default(),
            egg_species: default_egg_species(),
        }
    }
}

// ---------------------------------------------------------------------------
// File configuration
// ---------------------------------------------------------------------------

/// Which base profile a configuration starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// [`TunableProfile::production`].
    #[default]
    Production,
    /// [`TunableProfile::fast_iteration`].
    Fast,
}

impl ProfileKind {
    /// The base profile for this kind.
    pub fn base(self) -> TunableProfile {
        match self {
            Self::Production => TunableProfile::production(),
            Self::Fast => TunableProfile::fast_iteration(),
        }
    }
}

impl FromStr for ProfileKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "fast" | "fast_iteration" | "dev" => Ok(Self::Fast),
            other => Err(invalid(format!("unknown profile: {other}"))),
        }
    }
}

/// Per-field overrides applied on top of the base profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileOverrides {
    /// Overrides [`TunableProfile::egg_hatch_timeout_ms`].
    #[serde(default)]
    pub egg_hatch_timeout_ms: Option<u64>,
    /// Overrides [`TunableProfile::sickness_check_interval_ms`].
    #[serde(default)]
    pub sickness_check_interval_ms: Option<u64>,
    /// Overrides [`TunableProfile::base_sickness_probability`].
    #[serde(default)]
    pub base_sickness_probability: Option<f64>,
    /// Overrides [`TunableProfile::sickness_probability_per_unhygienic_object`].
    #[serde(default)]
    pub sickness_probability_per_unhygienic_object: Option<f64>,
    /// Overrides [`TunableProfile::stamina_decrease_interval_ms`].
    #[serde(default)]
    pub stamina_decrease_interval_ms: Option<u64>,
    /// Overrides [`TunableProfile::stamina_decrease_amount`].
    #[serde(default)]
    pub stamina_decrease_amount: Option<u32>,
    /// Overrides [`TunableProfile::evolution_check_interval_ms`].
    #[serde(default)]
    pub evolution_check_interval_ms: Option<u64>,
    /// Overrides [`TunableProfile::evolution_stamina_threshold`].
    #[serde(default)]
    pub evolution_stamina_threshold: Option<u32>,
    /// Overrides [`TunableProfile::evolution_gauge_increment`].
    #[serde(default)]
    pub evolution_gauge_increment: Option<GaugeIncrements>,
    /// Overrides [`TunableProfile::death_timeout_after_zero_stamina_ms`].
    #[serde(default)]
    pub death_timeout_after_zero_stamina_ms: Option<u64>,
    /// Overrides [`TunableProfile::stale_food_threshold_ms`].
    #[serde(default)]
    pub stale_food_threshold_ms: Option<u64>,
    /// Overrides [`TunableProfile::jitter_ratio`].
    #[serde(default)]
    pub jitter_ratio: Option<f64>,
}

impl ProfileOverrides {
    /// Write every set override into `profile`.
    pub fn apply_to(&self, profile: &mut TunableProfile) {
        if let Some(v) = self.egg_hatch_timeout_ms {
            profile.egg_hatch_timeout_ms = v;
        }
        if let Some(v) = self.sickness_check_interval_ms {
            profile.sickness_check_interval_ms = v;
        }
        if let Some(v) = self.base_sickness_probability {
            profile.base_sickness_probability = v;
        }
        if let Some(v) = self.sickness_probability_per_unhygienic_object {
            profile.sickness_probability_per_unhygienic_object = v;
        }
        if let Some(v) = self.stamina_decrease_interval_ms {
            profile.stamina_decrease_interval_ms = v;
        }
        if let Some(v) = self.stamina_decrease_amount {
            profile.stamina_decrease_amount = v;
        }
        if let Some(v) = self.evolution_check_interval_ms {
            profile.evolution_check_interval_ms = v;
        }
        if let Some(v) = self.evolution_stamina_threshold {
            profile.evolution_stamina_threshold = v;
        }
        if let Some(v) = self.evolution_gauge_increment {
            profile.evolution_gauge_increment = v;
        }
        if let Some(v) = self.death_timeout_after_zero_stamina_ms {
            profile.death_timeout_after_zero_stamina_ms = v;
        }
        if let Some(v) = self.stale_food_threshold_ms {
            profile.stale_food_threshold_ms = v;
        }
        if let Some(v) = self.jitter_ratio {
            profile.jitter_ratio = v;
        }
    }
}

/// Top-level configuration, mirroring `digivice-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Base profile.
    #[serde(default)]
    pub profile: ProfileKind,

    /// Field overrides on top of the base profile.
    #[serde(default)]
    pub overrides: ProfileOverrides,

    /// Hatch and evolution weights.
    #[serde(default)]
    pub evolution: EvolutionTable,

    /// Species for newly laid eggs.
    #[serde(default = "default_egg_species")]
    pub egg_species: String,

    /// Save file settings.
    #[serde(default)]
    pub save: SaveConfig,

    /// Foreground loop settings.
    #[serde(default)]
    pub live: LiveConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            profile: ProfileKind::default(),
            overrides: ProfileOverrides::default(),
            evolution: EvolutionTable::default(),
            egg_species: default_egg_species(),
            save: SaveConfig::default(),
            live: LiveConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `DIGIVICE_SAVE_PATH` overrides `save.path`
    /// - `DIGIVICE_PROFILE` overrides `profile`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if `DIGIVICE_PROFILE` names no profile.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override settings with environment variables when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `DIGIVICE_PROFILE` is unrecognised.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("DIGIVICE_SAVE_PATH") {
            self.save.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("DIGIVICE_PROFILE") {
            self.profile = val.parse()?;
        }
        Ok(())
    }

    /// The base profile with overrides applied, validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if any resulting value is out of range.
    pub fn resolve_profile(&self) -> Result<TunableProfile, ConfigError> {
        let mut profile = self.profile.base();
        self.overrides.apply_to(&mut profile);
        profile.validate()?;
        Ok(profile)
    }

    /// Assemble validated [`GameRules`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the profile or evolution table is invalid.
    pub fn rules(&self) -> Result<GameRules, ConfigError> {
        GameRules::new(
            self.resolve_profile()?,
            self.evolution.clone(),
            self.egg_species.clone(),
        )
    }
}

/// Save file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveConfig {
    /// Path of the JSON save file.
    #[serde(default = "default_save_path")]
    pub path: PathBuf,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            path: default_save_path(),
        }
    }
}

/// Foreground loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LiveConfig {
    /// Milliseconds between frames.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Wall-clock seconds to stay in the foreground (0 = until interrupted).
    #[serde(default)]
    pub run_seconds: u64,

    /// Seed for reproducible runs. A fresh OS seed is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            run_seconds: 0,
            seed: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_egg_species() -> String {
    "speckled_egg".to_owned()
}

fn default_save_path() -> PathBuf {
    PathBuf::from("digivice-save.json")
}

const fn default_frame_interval_ms() -> u64 {
    16
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn production_profile_is_valid() {
        let profile = TunableProfile::production();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.evolution_stamina_threshold, 4);
        assert_eq!(profile.sick_stamina_interval_ms(), 30 * MINUTE_MS);
    }

    #[test]
    fn fast_profile_is_sixty_times_shorter() {
        let prod = TunableProfile::production();
        let fast = TunableProfile::fast_iteration();
        assert!(fast.validate().is_ok());
        assert_eq!(fast.egg_hatch_timeout_ms * 60, prod.egg_hatch_timeout_ms);
        assert_eq!(
            fast.stamina_decrease_interval_ms * 60,
            prod.stamina_decrease_interval_ms
        );
        assert!((fast.base_sickness_probability - prod.base_sickness_probability).abs() < f64::EPSILON);
    }

    #[test]
    fn gauge_increments_decrease_by_stage() {
        let inc = GaugeIncrements::default();
        assert!(inc.for_stage(LifeStage::StageA) > inc.for_stage(LifeStage::StageB));
        assert!(inc.for_stage(LifeStage::StageB) > inc.for_stage(LifeStage::StageC));
        assert!(inc.for_stage(LifeStage::StageC) > inc.for_stage(LifeStage::StageD));
        assert!(inc.for_stage(LifeStage::StageD).abs() < f64::EPSILON);
        assert!(inc.for_stage(LifeStage::Egg).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let profile = TunableProfile {
            stamina_decrease_interval_ms: 0,
            ..TunableProfile::production()
        };
        assert!(matches!(profile.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn probability_above_one_is_rejected() {
        let profile = TunableProfile {
            base_sickness_probability: 1.5,
            ..TunableProfile::production()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn full_gauge_increment_is_rejected() {
        let profile = TunableProfile {
            evolution_gauge_increment: GaugeIncrements {
                stage_a: 100.0,
                ..GaugeIncrements::default()
            },
            ..TunableProfile::production()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn jitter_of_one_is_rejected() {
        let profile = TunableProfile {
            jitter_ratio: 1.0,
            ..TunableProfile::production()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn parse_empty_yaml_gives_defaults() {
        let config = GameConfig::parse_without_env("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.resolve_profile().unwrap(), TunableProfile::production());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
profile: fast
overrides:
  base_sickness_probability: 0.0
  jitter_ratio: 0.05
  evolution_gauge_increment:
    stage_a: 20.0
    stage_b: 10.0
    stage_c: 5.0
    stage_d: 0.0
evolution:
  blue_egg:
    tadling: 1.0
egg_species: blue_egg
save:
  path: "/tmp/pet.json"
live:
  frame_interval_ms: 33
  run_seconds: 5
  seed: 7
logging:
  level: debug
"#;
        let config = GameConfig::parse_without_env(yaml).unwrap();
        assert_eq!(config.profile, ProfileKind::Fast);
        assert_eq!(config.egg_species, "blue_egg");
        assert_eq!(config.save.path, PathBuf::from("/tmp/pet.json"));
        assert_eq!(config.live.frame_interval_ms, 33);
        assert_eq!(config.live.seed, Some(7));
        assert_eq!(config.logging.level, "debug");

        let profile = config.resolve_profile().unwrap();
        assert_eq!(profile.egg_hatch_timeout_ms, 10_000);
        assert!(profile.base_sickness_probability.abs() < f64::EPSILON);
        assert!((profile.jitter_ratio - 0.05).abs() < f64::EPSILON);
        assert!((profile.evolution_gauge_increment.stage_a - 20.0).abs() < f64::EPSILON);

        let rules = config.rules().unwrap();
        assert!(rules.evolution.candidates("blue_egg").is_some());
    }

    #[test]
    fn invalid_override_fails_resolution() {
        let yaml = "overrides:\n  jitter_ratio: 2.0\n";
        let config = GameConfig::parse_without_env(yaml).unwrap();
        assert!(config.resolve_profile().is_err());
    }

    #[test]
    fn profile_kind_from_str() {
        assert_eq!("fast".parse::<ProfileKind>().unwrap(), ProfileKind::Fast);
        assert_eq!(" Production ".parse::<ProfileKind>().unwrap(), ProfileKind::Production);
        assert!("turbo".parse::<ProfileKind>().is_err());
    }

    #[test]
    fn interval_for_maps_categories() {
        let profile = TunableProfile::production();
        assert_eq!(
            profile.interval_for(CheckCategory::Stamina),
            profile.stamina_decrease_interval_ms
        );
        assert_eq!(
            profile.interval_for(CheckCategory::Sickness),
            profile.sickness_check_interval_ms
        );
        assert_eq!(
            profile.interval_for(CheckCategory::Evolution),
            profile.evolution_check_interval_ms
        );
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("digivice-config.yaml");
        if path.exists() {
            let config = GameConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
