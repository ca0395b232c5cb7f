use chrono::{Duration, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use tycoon_game::{
    ActionOutcome, ActionResult, Catalog, Clock, EngineConfig, ManualClock, Rejection,
    SeededSource, Stats, TycoonEngine,
};

use crate::logic::bots::{BotAction, BotStrategy, PlayerBot};
use crate::logic::invariants::{self, Probe};

/// Engine flavour every bot plays against.
pub type SimEngine = TycoonEngine<SeededSource, ManualClock>;

const ACTION_SECS: i64 = 5;
const MORNING_HOUR: i64 = 8;

/// Configuration for a simulation session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: BotStrategy,
    pub days: u32,
    pub steps_per_day: u32,
    pub wait_secs: i64,
    /// Skip every Nth day entirely, breaking the login streak.
    pub skip_every: Option<u32>,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(strategy: BotStrategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            days: 14,
            steps_per_day: 150,
            wait_secs: 30,
            skip_every: None,
        }
    }

    #[must_use]
    pub const fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    #[must_use]
    pub const fn with_skip_every(mut self, skip_every: Option<u32>) -> Self {
        self.skip_every = skip_every;
        self
    }

    const fn skips(&self, day: u32) -> bool {
        match self.skip_every {
            Some(every) if every > 0 => day > 0 && day % every == 0,
            _ => false,
        }
    }
}

/// Rejections seen during a run, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionTally {
    pub insufficient_energy: u32,
    pub on_cooldown: u32,
    pub insufficient_funds: u32,
    pub area_locked: u32,
    pub rest_not_permitted: u32,
    pub already_owned: u32,
    pub not_found: u32,
}

impl RejectionTally {
    pub fn record(&mut self, rejection: &Rejection) {
        let slot = match rejection {
            Rejection::InsufficientEnergy => &mut self.insufficient_energy,
            Rejection::OnCooldown { .. } => &mut self.on_cooldown,
            Rejection::InsufficientFunds { .. } => &mut self.insufficient_funds,
            Rejection::AreaLocked { .. } => &mut self.area_locked,
            Rejection::RestNotPermittedHere => &mut self.rest_not_permitted,
            Rejection::AlreadyOwned { .. } => &mut self.already_owned,
            Rejection::NotFound { .. } => &mut self.not_found,
        };
        *slot = slot.saturating_add(1);
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.insufficient_energy
            + self.on_cooldown
            + self.insufficient_funds
            + self.area_locked
            + self.rest_not_permitted
            + self.already_owned
            + self.not_found
    }
}

/// End-of-run figures for one bot on one seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: BotStrategy,
    pub days_played: u32,
    pub actions_taken: u32,
    pub final_coins: u64,
    pub final_streak: u32,
    pub gym_level: u8,
    pub upgrades_owned: usize,
    pub unlocked_areas: usize,
    pub stats: Stats,
    pub rejections: RejectionTally,
    pub violations: Vec<String>,
}

/// Deterministic harness driving one bot through a number of simulated days.
pub struct SimulationSession {
    engine: SimEngine,
    clock: ManualClock,
    bot: Box<dyn PlayerBot>,
    config: SimulationConfig,
    rejections: RejectionTally,
    violations: Vec<String>,
    actions_taken: u32,
    days_played: u32,
}

impl SimulationSession {
    #[must_use]
    pub fn new(config: SimulationConfig, engine_config: EngineConfig) -> Self {
        let clock = ManualClock::at_midnight(start_date());
        clock.advance(Duration::hours(MORNING_HOUR));
        let engine = TycoonEngine::new(
            engine_config,
            Catalog::embedded().clone(),
            SeededSource::from_user_seed(config.seed),
            clock.clone(),
        );
        Self {
            engine,
            clock,
            bot: config.strategy.create_bot(config.seed),
            config,
            rejections: RejectionTally::default(),
            violations: Vec::new(),
            actions_taken: 0,
            days_played: 0,
        }
    }

    #[must_use]
    pub fn run(mut self) -> SimulationSummary {
        debug!(
            "{} bot playing {} days on seed {}",
            self.bot.name(),
            self.config.days,
            self.config.seed
        );
        for day in 0..self.config.days {
            if self.config.skips(day) {
                debug!("seed {} skipping day {day}", self.config.seed);
            } else {
                self.play_day(day);
            }
            self.advance_to_next_morning();
        }
        self.into_summary()
    }

    fn play_day(&mut self, day: u32) {
        let before = self.engine.state().clone();
        let login = self.engine.start_session();
        let found = invariants::check_login(&before, &self.engine, login);
        self.record_violations(day, "start-session", found);

        for _ in 0..self.config.steps_per_day {
            let action = self.bot.next_action(&self.engine);
            if action == BotAction::Wait {
                self.clock.advance(Duration::seconds(self.config.wait_secs));
                self.engine.tick_now();
                continue;
            }

            let probe = Probe::capture(&self.engine);
            let result = self.apply(&action);
            self.actions_taken = self.actions_taken.saturating_add(1);
            if let Err(rejection) = &result {
                debug!("{} rejected: {rejection}", action.label());
                self.rejections.record(rejection);
            }
            let found = invariants::check_action(&probe, &self.engine, &result);
            self.record_violations(day, action.label(), found);

            self.clock.advance(Duration::seconds(ACTION_SECS));
            self.engine.tick_now();
        }
        self.days_played = self.days_played.saturating_add(1);
    }

    fn apply(&mut self, action: &BotAction) -> ActionResult {
        match action {
            BotAction::CompleteTask(task_id) => self.engine.complete_task(task_id),
            BotAction::DrinkWater => Ok(self.engine.drink_water()),
            BotAction::Meditate => Ok(self.engine.meditate()),
            BotAction::Rest => self.engine.rest_character(),
            BotAction::SelectArea(area) => self.engine.select_area(*area),
            BotAction::BuyUpgrade(upgrade_id) => self.engine.purchase_upgrade(upgrade_id),
            BotAction::BuyAccessory(accessory_id) => self.engine.buy_accessory(accessory_id),
            BotAction::BuyOutfit(outfit_id) => self.engine.buy_outfit(outfit_id),
            BotAction::Wait => Ok(ActionOutcome::default()),
        }
    }

    fn record_violations(&mut self, day: u32, label: &str, found: Vec<String>) {
        self.violations.extend(
            found
                .into_iter()
                .map(|violation| format!("day {} {label}: {violation}", day + 1)),
        );
    }

    fn advance_to_next_morning(&self) {
        let Some(tomorrow) = self.clock.today().succ_opt() else {
            return;
        };
        let morning = ManualClock::at_midnight(tomorrow).now() + Duration::hours(MORNING_HOUR);
        self.clock.set(morning);
    }

    fn into_summary(self) -> SimulationSummary {
        let state = self.engine.state();
        SimulationSummary {
            seed: self.config.seed,
            strategy: self.config.strategy,
            days_played: self.days_played,
            actions_taken: self.actions_taken,
            final_coins: state.coins,
            final_streak: state.streak,
            gym_level: state.gym_level,
            upgrades_owned: state.owned_upgrades.len(),
            unlocked_areas: state.unlocked_areas.len(),
            stats: state.stats,
            rejections: self.rejections,
            violations: self.violations,
        }
    }
}

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid start date")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(strategy: BotStrategy, seed: u64, days: u32) -> SimulationSummary {
        SimulationSession::new(
            SimulationConfig::new(strategy, seed).with_days(days),
            EngineConfig::default(),
        )
        .run()
    }

    #[test]
    fn every_bot_plays_clean_week() {
        for &strategy in BotStrategy::ALL {
            let summary = run(strategy, 1337, 7);
            assert!(
                summary.violations.is_empty(),
                "{strategy}: {:?}",
                summary.violations
            );
            assert_eq!(summary.days_played, 7);
            assert_eq!(summary.final_streak, 7);
            assert!(summary.stats.workouts_completed > 0);
        }
    }

    #[test]
    fn saver_never_spends() {
        let summary = run(BotStrategy::Saver, 7, 5);
        assert_eq!(summary.upgrades_owned, 0);
        assert_eq!(summary.rejections.insufficient_funds, 0);
        assert!(summary.final_coins > 100);
    }

    #[test]
    fn skipped_days_break_the_streak() {
        let summary = SimulationSession::new(
            SimulationConfig::new(BotStrategy::Grinder, 3)
                .with_days(6)
                .with_skip_every(Some(3)),
            EngineConfig::default(),
        )
        .run();
        assert_eq!(summary.days_played, 5);
        assert_eq!(summary.final_streak, 2);
        assert_eq!(summary.stats.streak_record, 3);
    }

    #[test]
    fn same_seed_replays_identically() {
        let first = run(BotStrategy::Balanced, 99, 4);
        let second = run(BotStrategy::Balanced, 99, 4);
        assert_eq!(first.final_coins, second.final_coins);
        assert_eq!(first.stats, second.stats);
        assert_eq!(first.rejections, second.rejections);
    }
}
