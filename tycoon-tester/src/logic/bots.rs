use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tycoon_game::constants::DEFAULT_OUTFIT;
use tycoon_game::{Area, Clock, TaskInstance, UpgradeDef};

use crate::logic::simulation::SimEngine;

/// One step a bot wants to take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotAction {
    CompleteTask(String),
    DrinkWater,
    Meditate,
    Rest,
    SelectArea(Area),
    BuyUpgrade(String),
    BuyAccessory(String),
    BuyOutfit(String),
    /// Nothing worth doing right now; let time pass.
    Wait,
}

impl BotAction {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CompleteTask(_) => "complete-task",
            Self::DrinkWater => "drink-water",
            Self::Meditate => "meditate",
            Self::Rest => "rest",
            Self::SelectArea(_) => "select-area",
            Self::BuyUpgrade(_) => "buy-upgrade",
            Self::BuyAccessory(_) => "buy-accessory",
            Self::BuyOutfit(_) => "buy-outfit",
            Self::Wait => "wait",
        }
    }
}

/// Decision interface for automated players.
pub trait PlayerBot {
    fn name(&self) -> &'static str;

    fn next_action(&mut self, engine: &SimEngine) -> BotAction;
}

#[derive(Debug, Error)]
#[error("unknown bot '{0}' (expected grinder, balanced or saver)")]
pub struct UnknownBot(String);

/// Built-in play styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotStrategy {
    Grinder,
    Balanced,
    Saver,
}

impl BotStrategy {
    pub const ALL: &'static [Self] = &[Self::Grinder, Self::Balanced, Self::Saver];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Grinder => "grinder",
            Self::Balanced => "balanced",
            Self::Saver => "saver",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Grinder => "Works every ready task, spends on reward boosts",
            Self::Balanced => "Keeps vitality healthy, unlocks areas, shops for gear",
            Self::Saver => "Works and hydrates but never spends a coin",
        }
    }

    #[must_use]
    pub fn create_bot(self, seed: u64) -> Box<dyn PlayerBot> {
        match self {
            Self::Grinder => Box::new(GrinderBot),
            Self::Balanced => Box::new(BalancedBot::new(seed)),
            Self::Saver => Box::new(SaverBot),
        }
    }
}

impl fmt::Display for BotStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BotStrategy {
    type Err = UnknownBot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownBot(s.to_string()))
    }
}

struct GrinderBot;
struct SaverBot;

struct BalancedBot {
    rng: ChaCha20Rng,
}

impl BalancedBot {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

const BALANCED_COIN_RESERVE: u64 = 50;
const BALANCED_COMFORT_LEVEL: u8 = 40;

impl PlayerBot for GrinderBot {
    fn name(&self) -> &'static str {
        "Grinder"
    }

    fn next_action(&mut self, engine: &SimEngine) -> BotAction {
        let character = engine.character();
        let config = engine.config();
        if character.hydration() < config.min_task_hydration.saturating_add(15) {
            return BotAction::DrinkWater;
        }
        if character.stamina() < config.rest_anywhere_below_stamina {
            return BotAction::Rest;
        }
        if let Some(task) = ready_tasks(engine).into_iter().max_by_key(|task| task.reward) {
            return BotAction::CompleteTask(task.id.clone());
        }
        let coins = engine.state().coins;
        affordable_upgrades(engine, coins)
            .filter(|upgrade| upgrade.boost_pct.is_some())
            .min_by_key(|upgrade| upgrade.cost)
            .map_or(BotAction::Wait, |upgrade| {
                BotAction::BuyUpgrade(upgrade.id.clone())
            })
    }
}

impl PlayerBot for BalancedBot {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn next_action(&mut self, engine: &SimEngine) -> BotAction {
        let state = engine.state();
        let character = engine.character();
        if character.hydration() < BALANCED_COMFORT_LEVEL {
            return BotAction::DrinkWater;
        }
        if character.stamina() < BALANCED_COMFORT_LEVEL {
            if state.current_area == Area::Home
                || character.stamina() < engine.config().rest_anywhere_below_stamina
            {
                return BotAction::Rest;
            }
            if state.is_unlocked(Area::Home) {
                return BotAction::SelectArea(Area::Home);
            }
            return BotAction::Meditate;
        }

        let ready = ready_tasks(engine);
        if !ready.is_empty() {
            let pick = self.rng.gen_range(0..ready.len());
            return BotAction::CompleteTask(ready[pick].id.clone());
        }

        let budget = state.coins.saturating_sub(BALANCED_COIN_RESERVE);
        let unlock = affordable_upgrades(engine, budget)
            .filter(|upgrade| upgrade.unlock_area.is_some())
            .min_by_key(|upgrade| upgrade.cost);
        let boost = || {
            affordable_upgrades(engine, budget)
                .filter(|upgrade| upgrade.boost_pct.is_some())
                .min_by_key(|upgrade| upgrade.cost)
        };
        if let Some(upgrade) = unlock.or_else(boost) {
            return BotAction::BuyUpgrade(upgrade.id.clone());
        }
        if let Some(item) = engine
            .catalog()
            .accessories()
            .iter()
            .filter(|item| !character.owns_accessory(&item.id) && item.cost <= budget)
            .min_by_key(|item| item.cost)
        {
            return BotAction::BuyAccessory(item.id.clone());
        }
        if character.outfit == DEFAULT_OUTFIT
            && let Some(item) = engine
                .catalog()
                .outfits()
                .iter()
                .filter(|item| item.cost > 0 && item.cost <= budget)
                .min_by_key(|item| item.cost)
        {
            return BotAction::BuyOutfit(item.id.clone());
        }
        BotAction::Wait
    }
}

impl PlayerBot for SaverBot {
    fn name(&self) -> &'static str {
        "Saver"
    }

    fn next_action(&mut self, engine: &SimEngine) -> BotAction {
        let character = engine.character();
        if character.hydration() < 20 {
            return BotAction::DrinkWater;
        }
        if character.stamina() < engine.config().rest_anywhere_below_stamina {
            return BotAction::Rest;
        }
        if character.stamina() < 30 {
            return BotAction::Meditate;
        }
        ready_tasks(engine)
            .first()
            .map_or(BotAction::Wait, |task| BotAction::CompleteTask(task.id.clone()))
    }
}

/// Pool tasks whose cooldown has lapsed.
fn ready_tasks(engine: &SimEngine) -> Vec<&TaskInstance> {
    let now = engine.clock().now();
    engine
        .tasks()
        .iter()
        .filter(|task| !engine.cooldowns().is_on_cooldown(&task.id, now))
        .collect()
}

fn affordable_upgrades(engine: &SimEngine, budget: u64) -> impl Iterator<Item = &UpgradeDef> {
    let state = engine.state();
    engine
        .catalog()
        .upgrades()
        .iter()
        .filter(move |upgrade| upgrade.cost <= budget && !state.owns_upgrade(&upgrade.id))
}
