//! Balance configuration for an engine instance.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::constants::{
    CHALLENGE_POOL_SIZE, DEFAULT_COOLDOWN_SECS, DRINK_REWARD, MEDITATE_REWARD,
    MEDITATION_MINUTES_PER_SESSION, MIN_TASK_HYDRATION, MIN_TASK_STAMINA,
    REST_ANYWHERE_BELOW_STAMINA, STARTING_COINS,
};
use crate::reward::StreakMultiplier;
use crate::state::Area;

const MAX_CHALLENGE_POOL: usize = 8;

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum EngineConfigError {
    #[error("engine config JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("at least one area must start unlocked")]
    NoStartingAreas,
    #[error("start area {area} is not among the starting unlocked areas")]
    StartAreaLocked { area: Area },
    #[error("challenge pool size must be between 1 and {max} (got {value})")]
    ChallengePoolSize { max: usize, value: usize },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },
    #[error("streak multiplier must be finite and at least 1.0 (got {value:.2})")]
    StreakMultiplier { value: f64 },
}

/// Tunable rules for one engine instance. Missing JSON fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default = "EngineConfig::default_starting_coins")]
    pub starting_coins: u64,
    #[serde(default = "EngineConfig::default_starting_areas")]
    pub starting_areas: BTreeSet<Area>,
    #[serde(default = "EngineConfig::default_start_area")]
    pub start_area: Area,
    #[serde(default = "EngineConfig::default_challenge_pool_size")]
    pub challenge_pool_size: usize,
    #[serde(default = "EngineConfig::default_min_task_stamina")]
    pub min_task_stamina: u8,
    #[serde(default = "EngineConfig::default_min_task_hydration")]
    pub min_task_hydration: u8,
    #[serde(default = "EngineConfig::default_rest_anywhere_below")]
    pub rest_anywhere_below_stamina: u8,
    #[serde(default = "EngineConfig::default_cooldown_secs")]
    pub default_cooldown_secs: u32,
    #[serde(default = "EngineConfig::default_drink_reward")]
    pub drink_reward: u64,
    #[serde(default = "EngineConfig::default_meditate_reward")]
    pub meditate_reward: u64,
    #[serde(default = "EngineConfig::default_meditation_minutes")]
    pub meditation_minutes: u32,
    #[serde(default)]
    pub streak_multiplier: StreakMultiplier,
}

impl EngineConfig {
    const fn default_starting_coins() -> u64 {
        STARTING_COINS
    }

    fn default_starting_areas() -> BTreeSet<Area> {
        BTreeSet::from([Area::Cardio, Area::Strength])
    }

    const fn default_start_area() -> Area {
        Area::Cardio
    }

    const fn default_challenge_pool_size() -> usize {
        CHALLENGE_POOL_SIZE
    }

    const fn default_min_task_stamina() -> u8 {
        MIN_TASK_STAMINA
    }

    const fn default_min_task_hydration() -> u8 {
        MIN_TASK_HYDRATION
    }

    const fn default_rest_anywhere_below() -> u8 {
        REST_ANYWHERE_BELOW_STAMINA
    }

    const fn default_cooldown_secs() -> u32 {
        DEFAULT_COOLDOWN_SECS
    }

    const fn default_drink_reward() -> u64 {
        DRINK_REWARD
    }

    const fn default_meditate_reward() -> u64 {
        MEDITATE_REWARD
    }

    const fn default_meditation_minutes() -> u32 {
        MEDITATION_MINUTES_PER_SESSION
    }

    /// Parse a (possibly partial) JSON document over the defaults and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or violates an invariant.
    pub fn from_json(json: &str) -> Result<Self, EngineConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        if self.starting_areas.is_empty() {
            return Err(EngineConfigError::NoStartingAreas);
        }
        if !self.starting_areas.contains(&self.start_area) {
            return Err(EngineConfigError::StartAreaLocked {
                area: self.start_area,
            });
        }
        if !(1..=MAX_CHALLENGE_POOL).contains(&self.challenge_pool_size) {
            return Err(EngineConfigError::ChallengePoolSize {
                max: MAX_CHALLENGE_POOL,
                value: self.challenge_pool_size,
            });
        }
        for (field, value) in [
            ("minTaskStamina", self.min_task_stamina),
            ("minTaskHydration", self.min_task_hydration),
            ("restAnywhereBelowStamina", self.rest_anywhere_below_stamina),
        ] {
            if value > 100 {
                return Err(EngineConfigError::RangeViolation {
                    field,
                    min: 0,
                    max: 100,
                    value: u32::from(value),
                });
            }
        }
        if self.default_cooldown_secs == 0 {
            return Err(EngineConfigError::RangeViolation {
                field: "defaultCooldownSecs",
                min: 1,
                max: u32::MAX,
                value: 0,
            });
        }
        let factor = self.streak_multiplier.factor;
        if !factor.is_finite() || factor < 1.0 {
            return Err(EngineConfigError::StreakMultiplier { value: factor });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_coins: Self::default_starting_coins(),
            starting_areas: Self::default_starting_areas(),
            start_area: Self::default_start_area(),
            challenge_pool_size: Self::default_challenge_pool_size(),
            min_task_stamina: Self::default_min_task_stamina(),
            min_task_hydration: Self::default_min_task_hydration(),
            rest_anywhere_below_stamina: Self::default_rest_anywhere_below(),
            default_cooldown_secs: Self::default_cooldown_secs(),
            drink_reward: Self::default_drink_reward(),
            meditate_reward: Self::default_meditate_reward(),
            meditation_minutes: Self::default_meditation_minutes(),
            streak_multiplier: StreakMultiplier::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.starting_coins, 100);
        assert_eq!(config.challenge_pool_size, 3);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = EngineConfig::from_json(r#"{"startingCoins": 500, "drinkReward": 8}"#).unwrap();
        assert_eq!(config.starting_coins, 500);
        assert_eq!(config.drink_reward, 8);
        assert_eq!(config.meditate_reward, 10);
        assert_eq!(config, EngineConfig {
            starting_coins: 500,
            drink_reward: 8,
            ..EngineConfig::default()
        });
    }

    #[test]
    fn start_area_must_be_unlocked() {
        let err = EngineConfig::from_json(r#"{"startArea": "home"}"#).unwrap_err();
        assert!(matches!(
            err,
            EngineConfigError::StartAreaLocked { area: Area::Home }
        ));
    }

    #[test]
    fn rejects_bad_pool_and_multiplier() {
        let pool = EngineConfig {
            challenge_pool_size: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            pool.validate(),
            Err(EngineConfigError::ChallengePoolSize { value: 0, .. })
        ));

        let multiplier = EngineConfig {
            streak_multiplier: StreakMultiplier {
                threshold: 7,
                factor: 0.5,
            },
            ..EngineConfig::default()
        };
        assert!(matches!(
            multiplier.validate(),
            Err(EngineConfigError::StreakMultiplier { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            EngineConfig::from_json("{nope"),
            Err(EngineConfigError::Parse(_))
        ));
    }
}
