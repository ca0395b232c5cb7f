//! Static content: task templates, upgrades, challenges, wardrobe and messages.
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;
use thiserror::Error;

use crate::challenge::{ChallengeKind, DailyChallenge};
use crate::clock::start_of_next_day;
use crate::rng::{DrawStream, RandomSource};
use crate::state::{Area, Difficulty};

const EMBEDDED_CATALOG: &str = include_str!("../assets/catalog.json");

/// Template a task instance is stamped from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub title: String,
    pub description: String,
    pub reward: u32,
    pub difficulty: Difficulty,
    /// Cooldown in seconds; the engine default applies when absent.
    #[serde(default)]
    pub cooldown: Option<u32>,
    #[serde(default)]
    pub animation: Option<String>,
}

/// A concrete, displayable task with a unique identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInstance {
    pub id: String,
    pub title: String,
    pub description: String,
    pub area: Area,
    pub reward: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub cooldown_secs: Option<u32>,
    /// Presentation hint only.
    #[serde(default)]
    pub animation: Option<String>,
}

impl TaskInstance {
    #[must_use]
    pub fn cooldown_or(&self, default_secs: u32) -> u32 {
        self.cooldown_secs.unwrap_or(default_secs)
    }
}

/// Permanent gym upgrade. Ownership lives on the player, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub area: Area,
    pub cost: u64,
    #[serde(default)]
    pub boost_pct: Option<u32>,
    #[serde(default)]
    pub unlock_area: Option<Area>,
    #[serde(default)]
    pub visual_level: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeTemplate {
    pub title: String,
    pub description: String,
    pub target_amount: u32,
    pub reward: u64,
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
}

/// Outfit or accessory listed in the customization shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub cost: u64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotivationalMessage {
    pub text: String,
    #[serde(default)]
    pub area: Option<Area>,
    #[serde(default)]
    pub activity: Option<String>,
}

/// Structural problems that make a catalog unusable.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no task templates for area {area}")]
    MissingTasks { area: Area },
    #[error("duplicate upgrade id {id}")]
    DuplicateUpgrade { id: String },
    #[error("duplicate shop item id {id}")]
    DuplicateShopItem { id: String },
    #[error("challenge {title} has a zero target")]
    ZeroChallengeTarget { title: String },
    #[error("catalog has no challenge templates")]
    NoChallenges,
    #[error("catalog has no motivational messages")]
    NoMessages,
}

/// Container for all static content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    tasks: BTreeMap<Area, Vec<TaskTemplate>>,
    upgrades: Vec<UpgradeDef>,
    challenges: Vec<ChallengeTemplate>,
    #[serde(default)]
    outfits: Vec<ShopItem>,
    #[serde(default)]
    accessories: Vec<ShopItem>,
    messages: Vec<MotivationalMessage>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the content is structurally invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The content shipped with the engine, parsed once.
    ///
    /// # Panics
    ///
    /// Panics if the embedded asset is invalid, which is a build defect.
    #[must_use]
    pub fn embedded() -> &'static Self {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(|| Self::from_json(EMBEDDED_CATALOG).expect("valid embedded catalog"))
    }

    /// Check the invariants the draw functions rely on.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for area in Area::ALL {
            if self.tasks.get(area).is_none_or(Vec::is_empty) {
                return Err(CatalogError::MissingTasks { area: *area });
            }
        }
        let mut seen = HashSet::new();
        for upgrade in &self.upgrades {
            if !seen.insert(upgrade.id.as_str()) {
                return Err(CatalogError::DuplicateUpgrade {
                    id: upgrade.id.clone(),
                });
            }
        }
        for items in [&self.outfits, &self.accessories] {
            let mut seen = HashSet::new();
            for item in items {
                if !seen.insert(item.id.as_str()) {
                    return Err(CatalogError::DuplicateShopItem {
                        id: item.id.clone(),
                    });
                }
            }
        }
        if self.challenges.is_empty() {
            return Err(CatalogError::NoChallenges);
        }
        if let Some(bad) = self.challenges.iter().find(|c| c.target_amount == 0) {
            return Err(CatalogError::ZeroChallengeTarget {
                title: bad.title.clone(),
            });
        }
        if self.messages.is_empty() {
            return Err(CatalogError::NoMessages);
        }
        Ok(())
    }

    /// Stamp a fresh task for `area` with a never-before-seen identifier.
    pub fn draw_task<R: RandomSource>(&self, area: Area, rng: &mut R) -> TaskInstance {
        let templates = self.task_templates(area);
        let template = &templates[rng.pick_index(DrawStream::Task, templates.len())];
        TaskInstance {
            id: rng.mint_id(),
            title: template.title.clone(),
            description: template.description.clone(),
            area,
            reward: template.reward,
            difficulty: template.difficulty,
            cooldown_secs: template.cooldown,
            animation: template.animation.clone(),
        }
    }

    /// Fresh challenge expiring at the start of the next calendar day in `now`'s offset.
    pub fn draw_challenge<R: RandomSource>(
        &self,
        now: DateTime<FixedOffset>,
        rng: &mut R,
    ) -> DailyChallenge {
        let index = rng.pick_index(DrawStream::Challenge, self.challenges.len());
        let template = &self.challenges[index];
        DailyChallenge {
            id: rng.mint_id(),
            title: template.title.clone(),
            description: template.description.clone(),
            target_amount: template.target_amount,
            current_amount: 0,
            reward: template.reward,
            kind: template.kind,
            completed: false,
            expires_at: start_of_next_day(now),
        }
    }

    /// Random encouragement, narrowed to the area and activity when matches exist.
    pub fn pick_message<R: RandomSource>(
        &self,
        area: Option<Area>,
        activity: Option<&str>,
        rng: &mut R,
    ) -> &str {
        let specific: Vec<&MotivationalMessage> = match (area, activity) {
            (Some(area), Some(activity)) => self
                .messages
                .iter()
                .filter(|m| m.area == Some(area) && m.activity.as_deref() == Some(activity))
                .collect(),
            _ => Vec::new(),
        };
        let pool = if specific.is_empty() {
            let by_area: Vec<&MotivationalMessage> = area
                .map(|area| self.messages.iter().filter(|m| m.area == Some(area)).collect())
                .unwrap_or_default();
            if by_area.is_empty() {
                self.messages.iter().collect()
            } else {
                by_area
            }
        } else {
            specific
        };
        let index = rng.pick_index(DrawStream::Message, pool.len());
        pool.get(index).map_or("", |m| m.text.as_str())
    }

    #[must_use]
    pub fn task_templates(&self, area: Area) -> &[TaskTemplate] {
        self.tasks.get(&area).map_or(&[], Vec::as_slice)
    }

    /// Upgrades in catalog order.
    #[must_use]
    pub fn upgrades(&self) -> &[UpgradeDef] {
        &self.upgrades
    }

    #[must_use]
    pub fn upgrade(&self, upgrade_id: &str) -> Option<&UpgradeDef> {
        self.upgrades.iter().find(|u| u.id == upgrade_id)
    }

    #[must_use]
    pub fn challenge_templates(&self) -> &[ChallengeTemplate] {
        &self.challenges
    }

    #[must_use]
    pub fn outfits(&self) -> &[ShopItem] {
        &self.outfits
    }

    #[must_use]
    pub fn outfit(&self, outfit_id: &str) -> Option<&ShopItem> {
        self.outfits.iter().find(|o| o.id == outfit_id)
    }

    #[must_use]
    pub fn accessories(&self) -> &[ShopItem] {
        &self.accessories
    }

    #[must_use]
    pub fn accessory(&self, accessory_id: &str) -> Option<&ShopItem> {
        self.accessories.iter().find(|a| a.id == accessory_id)
    }

    #[must_use]
    pub fn messages(&self) -> &[MotivationalMessage] {
        &self.messages
    }
}
