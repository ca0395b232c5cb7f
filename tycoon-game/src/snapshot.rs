//! Versioned persisted form of [`PlayerState`].
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::PlayerState;

pub const SNAPSHOT_VERSION: u32 = 1;

const fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot JSON could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("snapshot could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// What survives between sessions. Task pool, cooldowns and challenges do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(flatten)]
    pub player: PlayerState,
}

impl PlayerSnapshot {
    #[must_use]
    pub fn capture(player: &PlayerState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            player: player.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns [`SnapshotError::UnsupportedVersion`] for snapshots written by a newer engine.
    pub fn ensure_supported(&self) -> Result<(), SnapshotError> {
        if self.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(SnapshotError::Encode)
    }

    /// Decode and version-check a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or from an unsupported version.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json).map_err(SnapshotError::Decode)?;
        snapshot.ensure_supported()?;
        Ok(snapshot)
    }

    #[must_use]
    pub fn into_player(self) -> PlayerState {
        self.player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Area, CharacterState};
    use chrono::NaiveDate;

    fn sample() -> PlayerState {
        let mut player = PlayerState::new(420, [Area::Cardio, Area::Strength], Area::Strength);
        player.streak = 4;
        player.last_login = NaiveDate::from_ymd_opt(2024, 6, 10);
        player.owned_upgrades.insert("treadmill".to_string());
        player.stats.workouts_completed = 12;
        player.stats.coins_earned = 610;
        player.character = CharacterState::new(35, 60);
        player.character.accessories.insert("gloves".to_string());
        player.gym_level = 2;
        player
    }

    #[test]
    fn round_trip_preserves_persisted_fields() {
        let snapshot = PlayerSnapshot::capture(&sample());
        let json = snapshot.to_json().unwrap();
        let restored = PlayerSnapshot::from_json(&json).unwrap().into_player();

        let original = sample();
        assert_eq!(restored.coins, original.coins);
        assert_eq!(restored.streak, original.streak);
        assert_eq!(restored.last_login, original.last_login);
        assert_eq!(restored.owned_upgrades, original.owned_upgrades);
        assert_eq!(restored.unlocked_areas, original.unlocked_areas);
        assert_eq!(restored.stats, original.stats);
        assert_eq!(restored.character, original.character);
        assert_eq!(restored.gym_level, 2);
        assert_eq!(restored.current_area, Area::Cardio);
    }

    #[test]
    fn layout_uses_camel_case_and_skips_position() {
        let value = serde_json::to_value(PlayerSnapshot::capture(&sample())).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["lastLogin"], "2024-06-10");
        assert_eq!(value["ownedUpgrades"][0], "treadmill");
        assert_eq!(value["unlockedAreas"][1], "strength");
        assert_eq!(value["stats"]["coinsEarned"], 610);
        assert_eq!(value["gymLevel"], 2);
        assert!(value.get("currentArea").is_none());
    }

    #[test]
    fn stored_mood_is_rederived() {
        let json = r#"{
            "version": 1,
            "coins": 5,
            "character": {"stamina": 15, "hydration": 90, "mood": "energetic"}
        }"#;
        let player = PlayerSnapshot::from_json(json).unwrap().into_player();
        assert_eq!(player.character.mood().as_str(), "exhausted");
        assert_eq!(player.gym_level, 1);
    }

    #[test]
    fn newer_versions_are_rejected() {
        let json = r#"{"version": 9, "coins": 0}"#;
        assert!(matches!(
            PlayerSnapshot::from_json(json),
            Err(SnapshotError::UnsupportedVersion {
                found: 9,
                supported: 1
            })
        ));
        assert!(matches!(
            PlayerSnapshot::from_json("[]"),
            Err(SnapshotError::Decode(_))
        ));
    }
}
