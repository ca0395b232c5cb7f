//! Progression engine: owns the player and composes every subsystem per action.
mod notice;
mod outcome;

pub use notice::{NoticeBoard, NoticeListener, SubscriptionId};
pub use outcome::{ActionOutcome, Rejection, TickReport};

use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use log::{debug, info, warn};

use crate::SnapshotStorage;
use crate::catalog::{Catalog, TaskInstance};
use crate::challenge::{self, ChallengeKind, ChallengePool, CompletionSet, DailyChallenge};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::constants::{
    NOTICE_ACCESSORY, NOTICE_OUTFIT, NOTICE_REST, NOTICE_STREAK_RESET, NOTICE_WELCOME,
    WATER_PROGRESS_PER_DRINK, WORKOUT_PROGRESS_PER_TASK,
};
use crate::cooldown::CooldownMap;
use crate::reward::compute_reward;
use crate::rng::{RandomSource, SeededSource};
use crate::snapshot::PlayerSnapshot;
use crate::state::{Area, CharacterState, PlayerState};
use crate::streak::{LoginOutcome, check_login};
use crate::vitality::{VitalityAction, apply_action};

/// Result of a player action that can be refused.
pub type ActionResult = Result<ActionOutcome, Rejection>;

/// Single-writer container for one player's progression.
///
/// Every operation either applies all of its effects or none of them. The
/// task pool, cooldowns and challenges are session-scoped and rebuilt on load.
#[derive(Debug)]
pub struct TycoonEngine<R = SeededSource, C = SystemClock> {
    catalog: Catalog,
    config: EngineConfig,
    player: PlayerState,
    tasks: Vec<TaskInstance>,
    cooldowns: CooldownMap,
    challenges: ChallengePool,
    notices: NoticeBoard,
    rng: R,
    clock: C,
}

impl<R: RandomSource, C: Clock> TycoonEngine<R, C> {
    /// Engine for a brand-new profile.
    ///
    /// # Panics
    ///
    /// Panics if the configuration or catalog is structurally invalid.
    #[must_use]
    pub fn new(config: EngineConfig, catalog: Catalog, rng: R, clock: C) -> Self {
        let player = PlayerState::new(
            config.starting_coins,
            config.starting_areas.iter().copied(),
            config.start_area,
        );
        Self::assemble(player, config, catalog, rng, clock)
    }

    /// Engine resuming a persisted profile with a fresh task pool.
    ///
    /// # Panics
    ///
    /// Panics if the configuration or catalog is structurally invalid.
    #[must_use]
    pub fn from_snapshot(
        snapshot: PlayerSnapshot,
        config: EngineConfig,
        catalog: Catalog,
        rng: R,
        clock: C,
    ) -> Self {
        let mut player = snapshot.player;
        player.owned_upgrades.retain(|upgrade_id| {
            let known = catalog.upgrade(upgrade_id).is_some();
            if !known {
                warn!("dropping unknown upgrade {upgrade_id} from snapshot");
            }
            known
        });
        if player.unlocked_areas.is_empty() {
            warn!("snapshot has no unlocked areas; restoring the starting set");
            player.unlocked_areas.clone_from(&config.starting_areas);
        }
        player.current_area = if player.is_unlocked(config.start_area) {
            config.start_area
        } else {
            player
                .unlocked_areas
                .first()
                .copied()
                .unwrap_or(config.start_area)
        };
        Self::assemble(player, config, catalog, rng, clock)
    }

    fn assemble(
        player: PlayerState,
        config: EngineConfig,
        catalog: Catalog,
        mut rng: R,
        clock: C,
    ) -> Self {
        config.validate().expect("valid engine config");
        catalog.validate().expect("valid catalog");
        let tasks = player
            .unlocked_areas
            .iter()
            .map(|&area| catalog.draw_task(area, &mut rng))
            .collect();
        Self {
            catalog,
            config,
            player,
            tasks,
            cooldowns: CooldownMap::new(),
            challenges: ChallengePool::new(),
            notices: NoticeBoard::new(),
            rng,
            clock,
        }
    }

    /// Restore a saved profile from `storage`. Returns `Ok(None)` when the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage fails or the snapshot version is unsupported.
    pub fn load_from<S>(
        storage: &S,
        slot: &str,
        config: EngineConfig,
        catalog: Catalog,
        rng: R,
        clock: C,
    ) -> anyhow::Result<Option<Self>>
    where
        S: SnapshotStorage,
        S::Error: Into<anyhow::Error>,
    {
        let Some(snapshot) = storage.load_snapshot(slot).map_err(Into::into)? else {
            return Ok(None);
        };
        snapshot
            .ensure_supported()
            .with_context(|| format!("loading snapshot slot {slot}"))?;
        Ok(Some(Self::from_snapshot(
            snapshot, config, catalog, rng, clock,
        )))
    }

    /// Persist the current profile into `slot`.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the snapshot cannot be written.
    pub fn save_to<S: SnapshotStorage>(&self, storage: &S, slot: &str) -> Result<(), S::Error> {
        storage.save_snapshot(slot, &self.snapshot())
    }

    /// Daily check-in plus challenge refresh. Safe to call repeatedly; only the
    /// first call on a calendar day changes the streak or pays a bonus.
    pub fn start_session(&mut self) -> LoginOutcome {
        let now = self.clock.now();
        let today = self.clock.today();
        let first_login = self.player.last_login.is_none();
        let login = check_login(self.player.last_login, self.player.streak, today);
        let notice = match login {
            LoginOutcome::Continued { streak, bonus } => {
                self.player.streak = streak;
                self.player.coins = self.player.coins.saturating_add(bonus);
                info!("streak continued: {streak} days, bonus {bonus}");
                Some(format!(
                    "Daily streak: {streak} days! You earned {bonus} bonus coins!"
                ))
            }
            LoginOutcome::Reset { streak } => {
                self.player.streak = streak;
                info!("streak reset on {today}");
                let text = if first_login {
                    NOTICE_WELCOME
                } else {
                    NOTICE_STREAK_RESET
                };
                Some(text.to_string())
            }
            LoginOutcome::AlreadyCheckedIn { .. } => None,
        };
        self.player.last_login = Some(today);
        self.player.stats.streak_record = self.player.stats.streak_record.max(self.player.streak);
        self.refresh_challenges(now);
        self.notices.publish(notice.as_deref());
        login
    }

    /// Complete the pooled task `task_id`.
    ///
    /// Checked in order: cooldown, pool membership, energy. A completed task's
    /// identifier stays on cooldown after it leaves the pool, so a repeat
    /// attempt reports the cooldown rather than a missing task.
    pub fn complete_task(&mut self, task_id: &str) -> ActionResult {
        let now = self.clock.now();
        if self.cooldowns.is_on_cooldown(task_id, now) {
            let remaining_seconds = self.cooldowns.remaining_seconds(task_id, now);
            return self.reject(Rejection::OnCooldown { remaining_seconds });
        }
        let Some(slot) = self.tasks.iter().position(|task| task.id == task_id) else {
            return self.reject(Rejection::NotFound {
                id: task_id.to_string(),
            });
        };
        if !self.has_energy_for_task() {
            return self.reject(Rejection::InsufficientEnergy);
        }

        let task = self.tasks[slot].clone();
        let owned = self
            .catalog
            .upgrades()
            .iter()
            .filter(|upgrade| self.player.owns_upgrade(&upgrade.id));
        let reward = compute_reward(
            task.reward,
            task.area,
            owned,
            self.player.streak,
            self.config.streak_multiplier,
        );

        self.player.character = apply_action(&self.player.character, VitalityAction::Workout);
        let expiry = self.cooldowns.set(
            &task.id,
            task.cooldown_or(self.config.default_cooldown_secs),
            now,
        );
        self.player.stats.workouts_completed = self.player.stats.workouts_completed.saturating_add(1);
        self.credit_earned(reward);
        debug!(
            "task {} ({}) paid {reward}, cooldown until {expiry}",
            task.id, task.title
        );

        let replacement = self.catalog.draw_task(task.area, &mut self.rng);
        let replacement_id = replacement.id.clone();
        self.tasks[slot] = replacement;

        let message = self
            .catalog
            .pick_message(Some(task.area), task.animation.as_deref(), &mut self.rng)
            .to_string();
        let mut outcome = ActionOutcome {
            coins_credited: reward,
            replacement_task: Some(replacement_id),
            notice: Some(message),
            ..ActionOutcome::default()
        };
        let completions = challenge::report_progress(
            &mut self.challenges,
            ChallengeKind::Workout,
            WORKOUT_PROGRESS_PER_TASK,
            now,
        );
        self.pay_completions(completions, &mut outcome);
        Ok(self.commit(outcome))
    }

    /// Buy a catalog upgrade, unlocking its area and raising the gym tier if it carries one.
    pub fn purchase_upgrade(&mut self, upgrade_id: &str) -> ActionResult {
        let Some(upgrade) = self.catalog.upgrade(upgrade_id).cloned() else {
            return self.reject(Rejection::NotFound {
                id: upgrade_id.to_string(),
            });
        };
        if self.player.owns_upgrade(&upgrade.id) {
            return self.reject(Rejection::AlreadyOwned { id: upgrade.id });
        }
        if let Some(shortfall) = self.player.shortfall(upgrade.cost) {
            return self.reject(Rejection::InsufficientFunds { shortfall });
        }

        self.player.coins -= upgrade.cost;
        self.player.owned_upgrades.insert(upgrade.id.clone());
        if let Some(tier) = upgrade.visual_level {
            self.player.gym_level = self.player.gym_level.max(tier);
        }
        if let Some(area) = upgrade.unlock_area {
            self.unlock_area(area);
        }
        info!("purchased upgrade {} for {}", upgrade.id, upgrade.cost);

        let mut outcome = ActionOutcome::with_notice(format!("You purchased {}!", upgrade.name));
        outcome.coins_debited = upgrade.cost;
        Ok(self.commit(outcome))
    }

    /// Equip `outfit_id` for `cost` coins. Outfits are single-equipped and never refunded.
    pub fn purchase_outfit(&mut self, outfit_id: &str, cost: u64) -> ActionResult {
        if let Some(shortfall) = self.player.shortfall(cost) {
            return self.reject(Rejection::InsufficientFunds { shortfall });
        }
        self.player.coins -= cost;
        self.player.character.outfit = outfit_id.to_string();
        debug!("equipped outfit {outfit_id} for {cost}");

        let mut outcome = ActionOutcome::with_notice(NOTICE_OUTFIT);
        outcome.coins_debited = cost;
        Ok(self.commit(outcome))
    }

    /// Add `accessory_id` to the character for `cost` coins.
    pub fn purchase_accessory(&mut self, accessory_id: &str, cost: u64) -> ActionResult {
        if self.player.character.owns_accessory(accessory_id) {
            return self.reject(Rejection::AlreadyOwned {
                id: accessory_id.to_string(),
            });
        }
        if let Some(shortfall) = self.player.shortfall(cost) {
            return self.reject(Rejection::InsufficientFunds { shortfall });
        }
        self.player.coins -= cost;
        self.player
            .character
            .accessories
            .insert(accessory_id.to_string());
        debug!("bought accessory {accessory_id} for {cost}");

        let mut outcome = ActionOutcome::with_notice(NOTICE_ACCESSORY);
        outcome.coins_debited = cost;
        Ok(self.commit(outcome))
    }

    /// [`Self::purchase_outfit`] at the catalog price.
    pub fn buy_outfit(&mut self, outfit_id: &str) -> ActionResult {
        match self.catalog.outfit(outfit_id).map(|item| item.cost) {
            Some(cost) => self.purchase_outfit(outfit_id, cost),
            None => self.reject(Rejection::NotFound {
                id: outfit_id.to_string(),
            }),
        }
    }

    /// [`Self::purchase_accessory`] at the catalog price.
    pub fn buy_accessory(&mut self, accessory_id: &str) -> ActionResult {
        match self.catalog.accessory(accessory_id).map(|item| item.cost) {
            Some(cost) => self.purchase_accessory(accessory_id, cost),
            None => self.reject(Rejection::NotFound {
                id: accessory_id.to_string(),
            }),
        }
    }

    pub fn drink_water(&mut self) -> ActionOutcome {
        let now = self.clock.now();
        let reward = self.config.drink_reward;
        self.player.character = apply_action(&self.player.character, VitalityAction::Drink);
        self.player.coins = self.player.coins.saturating_add(reward);
        self.player.stats.water_drank = self.player.stats.water_drank.saturating_add(1);

        let mut outcome = ActionOutcome::with_notice(format!(
            "You drank water! +{reward} coins for staying hydrated!"
        ));
        outcome.coins_credited = reward;
        let completions = challenge::report_progress(
            &mut self.challenges,
            ChallengeKind::Water,
            WATER_PROGRESS_PER_DRINK,
            now,
        );
        self.pay_completions(completions, &mut outcome);
        self.commit(outcome)
    }

    pub fn meditate(&mut self) -> ActionOutcome {
        let now = self.clock.now();
        let reward = self.config.meditate_reward;
        let minutes = self.config.meditation_minutes;
        self.player.character = apply_action(&self.player.character, VitalityAction::Meditate);
        self.player.coins = self.player.coins.saturating_add(reward);
        self.player.stats.meditation_minutes =
            self.player.stats.meditation_minutes.saturating_add(minutes);

        let message = self
            .catalog
            .pick_message(Some(Area::Wellness), Some("meditate"), &mut self.rng)
            .to_string();
        let mut outcome = ActionOutcome::with_notice(message);
        outcome.coins_credited = reward;
        let completions = challenge::report_progress(
            &mut self.challenges,
            ChallengeKind::Meditation,
            minutes,
            now,
        );
        self.pay_completions(completions, &mut outcome);
        self.commit(outcome)
    }

    /// Rest is allowed at home, or anywhere once stamina is critically low.
    pub fn rest_character(&mut self) -> ActionResult {
        let at_home = self.player.current_area == Area::Home;
        let exhausted = self.player.character.stamina() < self.config.rest_anywhere_below_stamina;
        if !at_home && !exhausted {
            return self.reject(Rejection::RestNotPermittedHere);
        }
        self.player.character = apply_action(&self.player.character, VitalityAction::Rest);
        Ok(self.commit(ActionOutcome::with_notice(NOTICE_REST)))
    }

    /// Idle drain for hosts that simulate time passing.
    pub fn passive_decay(&mut self) -> ActionOutcome {
        self.player.character =
            apply_action(&self.player.character, VitalityAction::PassiveTime);
        self.commit(ActionOutcome::default())
    }

    pub fn select_area(&mut self, area: Area) -> ActionResult {
        if !self.player.is_unlocked(area) {
            return self.reject(Rejection::AreaLocked { area });
        }
        self.player.current_area = area;
        Ok(self.commit(ActionOutcome::default()))
    }

    /// Periodic maintenance: prune expired cooldowns and top up the challenge pool.
    pub fn tick(&mut self, now: DateTime<FixedOffset>) -> TickReport {
        let cooldowns_cleared = self.cooldowns.sweep(now);
        let challenges = self.refresh_challenges(now);
        TickReport {
            cooldowns_cleared,
            challenges,
        }
    }

    /// [`Self::tick`] at the engine clock's current instant.
    pub fn tick_now(&mut self) -> TickReport {
        let now = self.clock.now();
        self.tick(now)
    }

    #[must_use]
    pub const fn state(&self) -> &PlayerState {
        &self.player
    }

    #[must_use]
    pub const fn character(&self) -> &CharacterState {
        &self.player.character
    }

    /// Persisted subset of the current state.
    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot::capture(&self.player)
    }

    #[must_use]
    pub fn tasks(&self) -> &[TaskInstance] {
        &self.tasks
    }

    #[must_use]
    pub fn task(&self, task_id: &str) -> Option<&TaskInstance> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    #[must_use]
    pub fn challenges(&self) -> &[DailyChallenge] {
        &self.challenges
    }

    #[must_use]
    pub const fn cooldowns(&self) -> &CooldownMap {
        &self.cooldowns
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notices.latest()
    }

    pub fn clear_notice(&mut self) {
        self.notices.clear();
    }

    pub fn subscribe(&mut self, listener: NoticeListener) -> SubscriptionId {
        self.notices.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notices.unsubscribe(id)
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub const fn rng(&self) -> &R {
        &self.rng
    }

    fn has_energy_for_task(&self) -> bool {
        let character = &self.player.character;
        character.stamina() >= self.config.min_task_stamina
            && character.hydration() >= self.config.min_task_hydration
    }

    fn unlock_area(&mut self, area: Area) {
        if !self.player.unlocked_areas.insert(area) {
            return;
        }
        let task = self.catalog.draw_task(area, &mut self.rng);
        let slot = self.tasks.partition_point(|existing| existing.area < area);
        self.tasks.insert(slot, task);
        info!("unlocked area {area}");
    }

    fn refresh_challenges(&mut self, now: DateTime<FixedOffset>) -> challenge::RefreshReport {
        challenge::refresh(
            &mut self.challenges,
            now,
            self.config.challenge_pool_size,
            &self.catalog,
            &mut self.rng,
        )
    }

    /// Credit a reward that counts toward lifetime earnings.
    fn credit_earned(&mut self, amount: u64) {
        self.player.coins = self.player.coins.saturating_add(amount);
        self.player.stats.coins_earned = self.player.stats.coins_earned.saturating_add(amount);
    }

    /// Pay completed challenges directly; payouts never report further progress.
    fn pay_completions(&mut self, completions: CompletionSet, outcome: &mut ActionOutcome) {
        for completion in &completions {
            self.credit_earned(completion.reward);
            self.player.stats.challenges_completed =
                self.player.stats.challenges_completed.saturating_add(1);
            outcome.coins_credited = outcome.coins_credited.saturating_add(completion.reward);
            outcome.notice = Some(format!(
                "Challenge completed: {}! +{} coins!",
                completion.title, completion.reward
            ));
            info!(
                "challenge {} completed, paid {}",
                completion.challenge_id, completion.reward
            );
        }
        outcome.completions = completions;
    }

    fn commit(&mut self, outcome: ActionOutcome) -> ActionOutcome {
        self.notices.publish(outcome.notice.as_deref());
        outcome
    }

    fn reject(&mut self, rejection: Rejection) -> ActionResult {
        debug!("action rejected: {rejection:?}");
        let notice = rejection.to_string();
        self.notices.publish(Some(&notice));
        Err(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::rng::ScriptedSource;
    use chrono::{Duration, NaiveDate};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn engine_with(
        config: EngineConfig,
        picks: &[usize],
    ) -> (TycoonEngine<ScriptedSource, ManualClock>, ManualClock) {
        let clock = ManualClock::at_midnight(day(10));
        clock.advance(Duration::hours(9));
        let mut engine = TycoonEngine::new(
            config,
            Catalog::embedded().clone(),
            ScriptedSource::new(picks.iter().copied()),
            clock.clone(),
        );
        engine.start_session();
        (engine, clock)
    }

    fn engine() -> (TycoonEngine<ScriptedSource, ManualClock>, ManualClock) {
        engine_with(EngineConfig::default(), &[0])
    }

    fn rich() -> EngineConfig {
        EngineConfig {
            starting_coins: 5_000,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn fresh_engine_pools_one_task_per_unlocked_area() {
        let (engine, _) = engine();
        let areas: Vec<Area> = engine.tasks().iter().map(|task| task.area).collect();
        assert_eq!(areas, vec![Area::Cardio, Area::Strength]);
        assert_eq!(engine.challenges().len(), 3);
        assert_eq!(engine.state().coins, 100);
        assert_eq!(engine.state().streak, 1);
        assert_eq!(engine.notice(), Some(NOTICE_WELCOME));
    }

    #[test]
    fn completing_a_task_pays_and_starts_cooldown() {
        let (mut engine, _) = engine();
        let task_id = engine.tasks()[0].id.clone();
        let outcome = engine.complete_task(&task_id).unwrap();

        assert_eq!(outcome.coins_credited, 30);
        assert_eq!(engine.state().coins, 130);
        assert_eq!(engine.state().stats.workouts_completed, 1);
        assert_eq!(engine.state().stats.coins_earned, 30);
        assert_eq!(engine.character().stamina(), 85);
        assert_eq!(engine.character().hydration(), 90);

        let replacement = outcome.replacement_task.unwrap();
        assert_ne!(replacement, task_id);
        assert_eq!(engine.task(&replacement).unwrap().area, Area::Cardio);
        assert!(engine.task(&task_id).is_none());

        let again = engine.complete_task(&task_id).unwrap_err();
        assert_eq!(
            again,
            Rejection::OnCooldown {
                remaining_seconds: 60
            }
        );
        assert_eq!(engine.state().coins, 130);
        assert_eq!(
            engine.notice(),
            Some("This task is on cooldown. Available in 60 seconds.")
        );
    }

    #[test]
    fn exhausted_character_cannot_work_out() {
        let (mut engine, _) = engine();
        engine.player.character = CharacterState::new(9, 100);
        let before = engine.state().clone();
        let task_id = engine.tasks()[0].id.clone();

        assert_eq!(
            engine.complete_task(&task_id),
            Err(Rejection::InsufficientEnergy)
        );
        assert_eq!(engine.state(), &before);
        assert!(engine.cooldowns().is_empty());
    }

    #[test]
    fn unknown_task_is_not_found() {
        let (mut engine, _) = engine();
        assert_eq!(
            engine.complete_task("missing"),
            Err(Rejection::NotFound {
                id: "missing".to_string()
            })
        );
    }

    #[test]
    fn task_without_cooldown_uses_configured_default() {
        let (mut engine, clock) = engine_with(EngineConfig::default(), &[1]);
        assert_eq!(engine.tasks()[0].cooldown_secs, Some(90));
        engine.tasks[0].cooldown_secs = None;
        let task_id = engine.tasks()[0].id.clone();
        let started = clock.now();

        engine.complete_task(&task_id).unwrap();
        assert_eq!(
            engine.cooldowns().expiry(&task_id),
            Some(started + Duration::seconds(60))
        );
        assert_eq!(
            engine.complete_task(&task_id),
            Err(Rejection::OnCooldown {
                remaining_seconds: 60
            })
        );
    }

    #[test]
    fn unknown_task_is_not_found_even_when_exhausted() {
        let (mut engine, _) = engine();
        engine.player.character = CharacterState::new(9, 5);
        let before = engine.state().clone();

        assert_eq!(
            engine.complete_task("missing"),
            Err(Rejection::NotFound {
                id: "missing".to_string()
            })
        );
        assert_eq!(engine.state(), &before);
        assert!(engine.cooldowns().is_empty());
    }

    #[test]
    fn workout_challenges_pay_once_when_target_reached() {
        let (mut engine, _) = engine();
        let mut last = ActionOutcome::default();
        for _ in 0..3 {
            let task_id = engine.tasks()[0].id.clone();
            last = engine.complete_task(&task_id).unwrap();
        }
        assert_eq!(last.completions.len(), 3);
        assert_eq!(last.coins_credited, 30 + 150);
        assert_eq!(
            last.notice.as_deref(),
            Some("Challenge completed: Cardio Master! +50 coins!")
        );
        assert_eq!(engine.state().stats.challenges_completed, 3);
        assert_eq!(engine.state().stats.coins_earned, 90 + 150);

        engine.player.character = CharacterState::new(100, 100);
        let task_id = engine.tasks()[0].id.clone();
        let next = engine.complete_task(&task_id).unwrap();
        assert!(next.completions.is_empty());
        assert_eq!(engine.state().stats.challenges_completed, 3);
    }

    #[test]
    fn upgrade_requires_funds() {
        let (mut engine, _) = engine();
        assert_eq!(
            engine.purchase_upgrade("treadmill"),
            Err(Rejection::InsufficientFunds { shortfall: 50 })
        );
        assert_eq!(engine.state().coins, 100);
        assert!(!engine.state().owns_upgrade("treadmill"));
    }

    #[test]
    fn unlocking_upgrade_adds_area_and_task() {
        let (mut engine, _) = engine_with(rich(), &[0]);
        let outcome = engine.purchase_upgrade("juicebar").unwrap();
        assert_eq!(outcome.coins_debited, 300);
        assert!(engine.state().is_unlocked(Area::Nutrition));
        let areas: Vec<Area> = engine.tasks().iter().map(|task| task.area).collect();
        assert_eq!(areas, vec![Area::Cardio, Area::Strength, Area::Nutrition]);

        assert_eq!(
            engine.purchase_upgrade("juicebar"),
            Err(Rejection::AlreadyOwned {
                id: "juicebar".to_string()
            })
        );
        assert_eq!(engine.state().coins, 4_700);
    }

    #[test]
    fn visual_tier_only_rises() {
        let (mut engine, _) = engine_with(rich(), &[0]);
        engine.purchase_upgrade("pool").unwrap();
        assert_eq!(engine.state().gym_level, 2);
        engine.purchase_upgrade("lighting").unwrap();
        assert_eq!(engine.state().gym_level, 2);
    }

    #[test]
    fn owned_boost_raises_task_reward() {
        let (mut engine, _) = engine_with(rich(), &[0]);
        engine.purchase_upgrade("treadmill").unwrap();
        let task_id = engine.tasks()[0].id.clone();
        assert_eq!(engine.complete_task(&task_id).unwrap().coins_credited, 36);
    }

    #[test]
    fn accessories_accumulate_and_outfits_replace() {
        let (mut engine, _) = engine_with(rich(), &[0]);
        engine.buy_accessory("headband").unwrap();
        engine.buy_accessory("gloves").unwrap();
        assert_eq!(
            engine.buy_accessory("headband"),
            Err(Rejection::AlreadyOwned {
                id: "headband".to_string()
            })
        );
        assert_eq!(engine.character().accessories.len(), 2);

        engine.buy_outfit("sporty").unwrap();
        engine.buy_outfit("pro").unwrap();
        assert_eq!(engine.character().outfit, "pro");
        assert_eq!(engine.state().coins, 5_000 - 100 - 200 - 200 - 500);

        assert!(matches!(
            engine.buy_outfit("cape"),
            Err(Rejection::NotFound { .. })
        ));
    }

    #[test]
    fn drinking_and_meditating_pay_fixed_rewards() {
        let (mut engine, _) = engine();
        engine.player.character = CharacterState::new(50, 50);
        let drink = engine.drink_water();
        assert_eq!(drink.coins_credited, 5);
        assert_eq!(
            drink.notice.as_deref(),
            Some("You drank water! +5 coins for staying hydrated!")
        );
        assert_eq!(engine.character().hydration(), 75);

        let calm = engine.meditate();
        assert_eq!(calm.coins_credited, 10);
        assert_eq!(engine.character().stamina(), 60);
        assert_eq!(engine.state().coins, 115);
        assert_eq!(engine.state().stats.water_drank, 1);
        assert_eq!(engine.state().stats.meditation_minutes, 5);
        assert_eq!(engine.state().stats.coins_earned, 0);
    }

    #[test]
    fn hydration_challenges_complete_on_fifth_drink() {
        let (mut engine, _) = engine_with(EngineConfig::default(), &[2]);
        for _ in 0..4 {
            assert!(engine.drink_water().completions.is_empty());
        }
        let fifth = engine.drink_water();
        assert_eq!(fifth.completions.len(), 3);
        assert_eq!(fifth.coins_credited, 5 + 120);
        assert_eq!(engine.state().coins, 100 + 25 + 120);
    }

    #[test]
    fn rest_only_at_home_or_when_spent() {
        let (mut engine, _) = engine_with(rich(), &[0]);
        assert_eq!(
            engine.rest_character(),
            Err(Rejection::RestNotPermittedHere)
        );

        engine.player.character = CharacterState::new(19, 80);
        engine.rest_character().unwrap();
        assert_eq!(engine.character().stamina(), 49);

        assert_eq!(
            engine.select_area(Area::Home),
            Err(Rejection::AreaLocked { area: Area::Home })
        );
        engine.purchase_upgrade("homearea").unwrap();
        engine.select_area(Area::Home).unwrap();
        engine.rest_character().unwrap();
        assert_eq!(engine.character().stamina(), 79);
    }

    #[test]
    fn passive_decay_drains_without_notice() {
        let (mut engine, _) = engine();
        engine.clear_notice();
        let outcome = engine.passive_decay();
        assert_eq!(outcome.notice, None);
        assert_eq!(engine.character().stamina(), 98);
        assert_eq!(engine.character().hydration(), 97);
        assert_eq!(engine.notice(), None);
    }

    #[test]
    fn session_start_is_idempotent_within_a_day() {
        let (mut engine, clock) = engine();
        assert_eq!(
            engine.start_session(),
            LoginOutcome::AlreadyCheckedIn { streak: 1 }
        );
        assert_eq!(engine.state().coins, 100);

        clock.advance(Duration::days(1));
        assert_eq!(
            engine.start_session(),
            LoginOutcome::Continued {
                streak: 2,
                bonus: 10
            }
        );
        assert_eq!(engine.state().coins, 110);
        assert_eq!(engine.start_session().streak(), 2);
        assert_eq!(engine.state().coins, 110);

        clock.advance(Duration::days(3));
        assert_eq!(engine.start_session(), LoginOutcome::Reset { streak: 1 });
        assert_eq!(engine.state().stats.streak_record, 2);
        assert_eq!(engine.notice(), Some(NOTICE_STREAK_RESET));
    }

    #[test]
    fn tick_sweeps_cooldowns_and_replaces_expired_challenges() {
        let (mut engine, clock) = engine();
        let task_id = engine.tasks()[0].id.clone();
        engine.complete_task(&task_id).unwrap();
        let first_ids: Vec<String> = engine.challenges().iter().map(|c| c.id.clone()).collect();

        clock.advance(Duration::seconds(30));
        assert_eq!(engine.tick_now().cooldowns_cleared, 0);
        clock.advance(Duration::seconds(30));
        let report = engine.tick_now();
        assert_eq!(report.cooldowns_cleared, 1);
        assert_eq!(report.challenges.drawn, 0);

        clock.advance(Duration::days(1));
        let report = engine.tick_now();
        assert_eq!(report.challenges.expired, 3);
        assert_eq!(report.challenges.drawn, 3);
        assert!(
            engine
                .challenges()
                .iter()
                .all(|c| !first_ids.contains(&c.id) && c.current_amount == 0)
        );
    }

    #[test]
    fn listeners_hear_rejections_and_successes() {
        let (mut engine, _) = engine();
        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&heard);
        engine.subscribe(Box::new(move |notice| {
            sink.borrow_mut().push(notice.unwrap_or_default().to_string());
        }));

        let _ = engine.purchase_upgrade("treadmill");
        engine.drink_water();
        assert_eq!(
            *heard.borrow(),
            vec![
                "Not enough coins! You need 50 more coins.".to_string(),
                "You drank water! +5 coins for staying hydrated!".to_string(),
            ]
        );
    }
}
