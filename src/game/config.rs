use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub stack: StackConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub roasting: RoastingConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Radius of the bun, in world units. Drop radii are fractions of it.
    pub distance_threshold: f32,
    pub flat_epsilon: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Sauce scores only when strictly between these particle counts.
    pub min_sauce_amount: u32,
    pub max_sauce_amount: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub max_orders: u32,
    /// Hell's Kitchen: overall score below this counts as a failure.
    pub min_required_quality: f32,
    pub dirtiness_threshold: f32,
    pub order_slots: usize,
    /// Seconds between attempts to pin a new order on the board.
    pub spawn_interval: f32,
    /// Standard mode stops issuing orders after this many. Hell's Kitchen
    /// ignores it.
    pub spawn_cap: u32,
    /// Fixed seed for order selection. Random when unset.
    pub order_seed: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub initial_seconds: f32,
    pub penalty_factor: f32,
    /// Base duration multiplier applied after every evaluation.
    pub shrink_factor: f32,
    pub warning_progress: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoastingConfig {
    pub burnt_seconds: f32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log every rejected contact at info level instead of debug.
    #[serde(default)]
    pub log_contacts: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 0.1,
            flat_epsilon: crate::geometry::FLAT_EPSILON,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_sauce_amount: 200,
            max_sauce_amount: 1000,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_orders: 5,
            min_required_quality: 0.7,
            dirtiness_threshold: 10.0,
            order_slots: 3,
            spawn_interval: 10.0,
            spawn_cap: 5,
            order_seed: None,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            initial_seconds: 10.0,
            penalty_factor: 0.6,
            shrink_factor: 0.9,
            warning_progress: 0.2,
        }
    }
}

impl Default for RoastingConfig {
    fn default() -> Self {
        Self { burnt_seconds: 10.0 }
    }
}

fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "burgerstack")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
}

impl EngineConfig {
    /// Load `settings.toml` from the platform config directory, falling back
    /// to defaults. Never writes anything.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("Could not determine config directory. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Failed to parse config {}: {e}. Using defaults.", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!("No config at {}. Using defaults.", path.display());
                Self::default()
            }
        }
    }
}
