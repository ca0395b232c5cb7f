use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_OUTFIT, MOOD_ENERGETIC_ABOVE, MOOD_EXHAUSTED_BELOW, MOOD_TIRED_BELOW,
    STARTING_GYM_LEVEL, VITALITY_MAX,
};

/// Thematic zone of the gym that scopes tasks and upgrades.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    #[default]
    Cardio,
    Strength,
    Wellness,
    Nutrition,
    Home,
    General,
}

impl Area {
    pub const ALL: &'static [Self] = &[
        Self::Cardio,
        Self::Strength,
        Self::Wellness,
        Self::Nutrition,
        Self::Home,
        Self::General,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cardio => "cardio",
            Self::Strength => "strength",
            Self::Wellness => "wellness",
            Self::Nutrition => "nutrition",
            Self::Home => "home",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Area {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|area| area.as_str() == s)
            .ok_or(())
    }
}

impl From<Area> for String {
    fn from(value: Area) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Character condition derived from stamina and hydration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Energetic,
    Normal,
    Tired,
    Exhausted,
}

impl Mood {
    /// Piecewise mood rule; exhaustion wins over tiredness, which wins over energy.
    #[must_use]
    pub const fn from_levels(stamina: u8, hydration: u8) -> Self {
        if stamina < MOOD_EXHAUSTED_BELOW || hydration < MOOD_EXHAUSTED_BELOW {
            Self::Exhausted
        } else if stamina < MOOD_TIRED_BELOW || hydration < MOOD_TIRED_BELOW {
            Self::Tired
        } else if stamina > MOOD_ENERGETIC_ABOVE && hydration > MOOD_ENERGETIC_ABOVE {
            Self::Energetic
        } else {
            Self::Normal
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Energetic => "energetic",
            Self::Normal => "normal",
            Self::Tired => "tired",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifetime statistics tracked for the stats panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub workouts_completed: u32,
    #[serde(default)]
    pub water_drank: u32,
    #[serde(default)]
    pub meditation_minutes: u32,
    #[serde(default)]
    pub coins_earned: u64,
    #[serde(default)]
    pub streak_record: u32,
    #[serde(default)]
    pub challenges_completed: u32,
}

/// Stamina, hydration, mood and wardrobe of the player's character.
///
/// Levels stay inside `[0, 100]` and the mood is recomputed whenever they
/// change; neither can be written directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CharacterRecord")]
pub struct CharacterState {
    stamina: u8,
    hydration: u8,
    mood: Mood,
    pub outfit: String,
    pub accessories: BTreeSet<String>,
}

impl CharacterState {
    /// Build a character with clamped levels and the default outfit.
    #[must_use]
    pub fn new(stamina: u8, hydration: u8) -> Self {
        Self::default().with_levels(stamina, hydration)
    }

    /// Copy of this character with new levels; mood follows the levels.
    #[must_use]
    pub fn with_levels(&self, stamina: u8, hydration: u8) -> Self {
        let stamina = stamina.min(vitality_max());
        let hydration = hydration.min(vitality_max());
        Self {
            stamina,
            hydration,
            mood: Mood::from_levels(stamina, hydration),
            outfit: self.outfit.clone(),
            accessories: self.accessories.clone(),
        }
    }

    #[must_use]
    pub const fn stamina(&self) -> u8 {
        self.stamina
    }

    #[must_use]
    pub const fn hydration(&self) -> u8 {
        self.hydration
    }

    #[must_use]
    pub const fn mood(&self) -> Mood {
        self.mood
    }

    #[must_use]
    pub fn owns_accessory(&self, accessory_id: &str) -> bool {
        self.accessories.contains(accessory_id)
    }
}

impl Default for CharacterState {
    fn default() -> Self {
        let full = vitality_max();
        Self {
            stamina: full,
            hydration: full,
            mood: Mood::from_levels(full, full),
            outfit: DEFAULT_OUTFIT.to_string(),
            accessories: BTreeSet::new(),
        }
    }
}

fn vitality_max() -> u8 {
    u8::try_from(VITALITY_MAX).unwrap_or(u8::MAX)
}

/// Wire form of [`CharacterState`]; any stored mood is discarded and re-derived.
#[derive(Deserialize)]
struct CharacterRecord {
    stamina: u8,
    hydration: u8,
    #[serde(default = "default_outfit")]
    outfit: String,
    #[serde(default)]
    accessories: BTreeSet<String>,
}

fn default_outfit() -> String {
    DEFAULT_OUTFIT.to_string()
}

impl From<CharacterRecord> for CharacterState {
    fn from(record: CharacterRecord) -> Self {
        let base = Self {
            outfit: record.outfit,
            accessories: record.accessories,
            ..Self::default()
        };
        base.with_levels(record.stamina, record.hydration)
    }
}

/// The player's long-lived progression state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub coins: u64,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_login: Option<NaiveDate>,
    #[serde(default)]
    pub owned_upgrades: BTreeSet<String>,
    #[serde(default)]
    pub unlocked_areas: BTreeSet<Area>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub character: CharacterState,
    #[serde(default = "default_gym_level")]
    pub gym_level: u8,
    /// Where the character currently stands; resets every session.
    #[serde(skip)]
    pub current_area: Area,
}

const fn default_gym_level() -> u8 {
    STARTING_GYM_LEVEL
}

impl PlayerState {
    /// Fresh profile with the given starting balance and unlocked areas.
    #[must_use]
    pub fn new(coins: u64, unlocked_areas: impl IntoIterator<Item = Area>, start: Area) -> Self {
        Self {
            coins,
            streak: 0,
            last_login: None,
            owned_upgrades: BTreeSet::new(),
            unlocked_areas: unlocked_areas.into_iter().collect(),
            stats: Stats::default(),
            character: CharacterState::default(),
            gym_level: STARTING_GYM_LEVEL,
            current_area: start,
        }
    }

    #[must_use]
    pub fn owns_upgrade(&self, upgrade_id: &str) -> bool {
        self.owned_upgrades.contains(upgrade_id)
    }

    #[must_use]
    pub fn is_unlocked(&self, area: Area) -> bool {
        self.unlocked_areas.contains(&area)
    }

    /// Coins missing to afford `cost`, or `None` when affordable.
    #[must_use]
    pub fn shortfall(&self, cost: u64) -> Option<u64> {
        (self.coins < cost).then(|| cost - self.coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_follows_piecewise_rule() {
        assert_eq!(Mood::from_levels(15, 90), Mood::Exhausted);
        assert_eq!(Mood::from_levels(90, 19), Mood::Exhausted);
        assert_eq!(Mood::from_levels(39, 90), Mood::Tired);
        assert_eq!(Mood::from_levels(50, 50), Mood::Normal);
        assert_eq!(Mood::from_levels(70, 90), Mood::Normal);
        assert_eq!(Mood::from_levels(80, 80), Mood::Energetic);
    }

    #[test]
    fn character_levels_clamp_and_rederive_mood() {
        let character = CharacterState::new(250, 10);
        assert_eq!(character.stamina(), 100);
        assert_eq!(character.hydration(), 10);
        assert_eq!(character.mood(), Mood::Exhausted);
    }

    #[test]
    fn stored_mood_is_ignored_on_load() {
        let json = r#"{"stamina":50,"hydration":50,"mood":"energetic","outfit":"pro","accessories":["gloves"]}"#;
        let character: CharacterState = serde_json::from_str(json).unwrap();
        assert_eq!(character.mood(), Mood::Normal);
        assert_eq!(character.outfit, "pro");
        assert!(character.owns_accessory("gloves"));
    }

    #[test]
    fn area_parses_from_tag() {
        assert_eq!("home".parse::<Area>(), Ok(Area::Home));
        assert!("moon".parse::<Area>().is_err());
        assert_eq!(String::from(Area::Nutrition), "nutrition");
    }

    #[test]
    fn shortfall_reports_missing_coins() {
        let player = PlayerState::new(100, [Area::Cardio], Area::Cardio);
        assert_eq!(player.shortfall(150), Some(50));
        assert_eq!(player.shortfall(100), None);
    }
}
