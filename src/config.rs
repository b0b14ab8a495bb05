//! Game rules and tuning
//!
//! Read from LocalStorage on the web; read from the file named by
//! `FUNC_MATCH_CONFIG` on native hosts.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Round scoring: linear decay from `base_points` at zero elapsed time to
/// nothing at `time_cap_secs`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub base_points: u32,
    pub time_cap_secs: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_points: 1000,
            time_cap_secs: 300.0,
        }
    }
}

impl ScoringPolicy {
    /// Points for one answer
    pub fn points(&self, correct: bool, time_spent_secs: f64) -> u32 {
        if !correct {
            return 0;
        }
        let cap = self.time_cap_secs;
        let spent = time_spent_secs.max(0.0).min(cap);
        let points = (self.base_points as f64 * (1.0 - spent / cap)).round();
        points.max(0.0) as u32
    }
}

/// Equivalence check sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub domain_min: i32,
    pub domain_max: i32,
    /// Largest absolute difference still counted as agreement
    pub tolerance: f64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            domain_min: -5,
            domain_max: 5,
            tolerance: 1e-4,
        }
    }
}

/// Most domain points one check may sample
pub const MAX_SAMPLE_POINTS: i64 = 1_001;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rounds per game
    pub total_rounds: u32,
    pub scoring: ScoringPolicy,
    /// Elapsed-time ticker period (100 ms = 10 Hz)
    pub tick_interval_ms: u32,
    pub check: CheckConfig,
    /// Default toast lifetime
    pub toast_duration_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_rounds: 5,
            scoring: ScoringPolicy::default(),
            tick_interval_ms: 100,
            check: CheckConfig::default(),
            toast_duration_ms: 3000,
        }
    }
}

impl GameConfig {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "func_match_config";

    /// Environment variable naming a JSON config file (native only)
    pub const ENV_VAR: &'static str = "FUNC_MATCH_CONFIG";

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_rounds == 0 {
            return Err(GameError::InvalidSetting("total_rounds must be at least 1"));
        }
        if self.scoring.base_points as u64 * self.total_rounds as u64 > u32::MAX as u64 {
            return Err(GameError::InvalidSetting(
                "scoring.base_points times total_rounds must fit in a u32 score",
            ));
        }
        if !(self.scoring.time_cap_secs > 0.0) {
            return Err(GameError::InvalidSetting("scoring.time_cap_secs must be positive"));
        }
        if self.tick_interval_ms == 0 {
            return Err(GameError::InvalidSetting("tick_interval_ms must be positive"));
        }
        if self.check.domain_min > self.check.domain_max {
            return Err(GameError::InvalidSetting("check.domain_min exceeds check.domain_max"));
        }
        if self.check.domain_max as i64 - self.check.domain_min as i64 + 1 > MAX_SAMPLE_POINTS {
            return Err(GameError::InvalidSetting("check domain samples too many points"));
        }
        if !(self.check.tolerance >= 0.0) {
            return Err(GameError::InvalidSetting("check.tolerance must not be negative"));
        }
        Ok(())
    }

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Load config from the file named by `FUNC_MATCH_CONFIG`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default config");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path);
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring config {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read config {}: {}", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_flat_scoring_endpoints() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.points(true, 0.0), 1000);
        assert_eq!(policy.points(true, 150.0), 500);
        assert_eq!(policy.points(true, 300.0), 0);
        assert_eq!(policy.points(true, 1_000.0), 0);
        assert_eq!(policy.points(false, 0.0), 0);
    }

    #[test]
    fn test_negative_elapsed_counts_as_zero() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.points(true, -3.0), 1000);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = GameConfig::from_json(r#"{ "total_rounds": 3, "scoring": { "base_points": 300 } }"#)
            .unwrap();
        assert_eq!(config.total_rounds, 3);
        assert_eq!(config.scoring.base_points, 300);
        assert_eq!(config.scoring.time_cap_secs, 300.0);
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.check, CheckConfig::default());
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "total_rounds": 0 }"#),
            Err(GameError::InvalidSetting(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "check": { "domain_min": 3, "domain_max": 1 } }"#),
            Err(GameError::InvalidSetting(_))
        ));
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_score_overflow() {
        let config = GameConfig {
            scoring: ScoringPolicy {
                base_points: 3_000_000_000,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GameError::InvalidSetting(_))));

        // Largest base that still fits five perfect rounds
        let config = GameConfig {
            scoring: ScoringPolicy {
                base_points: u32::MAX / 5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_huge_domain() {
        let config = GameConfig {
            check: CheckConfig {
                domain_min: i32::MIN,
                domain_max: i32::MAX,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GameError::InvalidSetting(_))));

        let config = GameConfig {
            check: CheckConfig {
                domain_min: -500,
                domain_max: 500,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    proptest! {
        #[test]
        fn points_never_exceed_base(elapsed in -10.0f64..1000.0, base in 0u32..5000) {
            let policy = ScoringPolicy { base_points: base, time_cap_secs: 300.0 };
            let points = policy.points(true, elapsed);
            prop_assert!(points <= base);
            prop_assert_eq!(policy.points(false, elapsed), 0);
        }

        #[test]
        fn points_decay_with_time(a in 0.0f64..300.0, b in 0.0f64..300.0) {
            let policy = ScoringPolicy::default();
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(policy.points(true, early) >= policy.points(true, late));
        }
    }
}
