//! Post-operation checks run after every simulated step.
use tycoon_game::{ActionResult, Area, Clock, LoginOutcome, Mood, PlayerState};

use crate::logic::simulation::SimEngine;

/// Engine state captured before an action.
#[derive(Debug, Clone)]
pub struct Probe {
    player: PlayerState,
    task_ids: Vec<String>,
    cooldowns: usize,
    challenge_progress: Vec<(String, u32, bool)>,
}

impl Probe {
    #[must_use]
    pub fn capture(engine: &SimEngine) -> Self {
        Self {
            player: engine.state().clone(),
            task_ids: engine.tasks().iter().map(|task| task.id.clone()).collect(),
            cooldowns: engine.cooldowns().len(),
            challenge_progress: challenge_progress(engine),
        }
    }
}

fn challenge_progress(engine: &SimEngine) -> Vec<(String, u32, bool)> {
    engine
        .challenges()
        .iter()
        .map(|c| (c.id.clone(), c.current_amount, c.completed))
        .collect()
}

/// Structural invariants that must hold at every quiescent point.
#[must_use]
pub fn check_state(engine: &SimEngine) -> Vec<String> {
    let mut violations = Vec::new();
    let state = engine.state();
    let character = engine.character();

    if character.stamina() > 100 || character.hydration() > 100 {
        violations.push(format!(
            "vitality out of range: stamina {} hydration {}",
            character.stamina(),
            character.hydration()
        ));
    }
    let expected_mood = Mood::from_levels(character.stamina(), character.hydration());
    if character.mood() != expected_mood {
        violations.push(format!(
            "mood {} does not match levels (expected {expected_mood})",
            character.mood()
        ));
    }

    let pool_areas: Vec<Area> = engine.tasks().iter().map(|task| task.area).collect();
    let unlocked: Vec<Area> = state.unlocked_areas.iter().copied().collect();
    if pool_areas != unlocked {
        violations.push(format!(
            "task pool areas {pool_areas:?} differ from unlocked areas {unlocked:?}"
        ));
    }

    let now = engine.clock().now();
    for challenge in engine.challenges() {
        if challenge.current_amount > challenge.target_amount {
            violations.push(format!(
                "challenge {} overshot: {}/{}",
                challenge.id, challenge.current_amount, challenge.target_amount
            ));
        }
        if challenge.completed != (challenge.current_amount >= challenge.target_amount) {
            violations.push(format!(
                "challenge {} completion flag disagrees with progress",
                challenge.id
            ));
        }
        if challenge.is_expired(now) {
            violations.push(format!("challenge {} is expired but pooled", challenge.id));
        }
    }
    if engine.challenges().len() > engine.config().challenge_pool_size {
        violations.push(format!(
            "challenge pool holds {} (max {})",
            engine.challenges().len(),
            engine.config().challenge_pool_size
        ));
    }
    if state.stats.streak_record < state.streak {
        violations.push(format!(
            "best streak {} below current streak {}",
            state.stats.streak_record, state.streak
        ));
    }
    violations
}

/// Checks tying an action's reported outcome to the observed state change.
#[must_use]
pub fn check_action(before: &Probe, engine: &SimEngine, result: &ActionResult) -> Vec<String> {
    let mut violations = check_state(engine);
    let after = engine.state();

    match result {
        Err(rejection) => {
            if after != &before.player {
                violations.push(format!("rejected ({rejection}) but player state changed"));
            }
            let task_ids: Vec<&str> = engine.tasks().iter().map(|t| t.id.as_str()).collect();
            if task_ids != before.task_ids.iter().map(String::as_str).collect::<Vec<_>>() {
                violations.push(format!("rejected ({rejection}) but task pool changed"));
            }
            if engine.cooldowns().len() != before.cooldowns {
                violations.push(format!("rejected ({rejection}) but cooldowns changed"));
            }
            if challenge_progress(engine) != before.challenge_progress {
                violations.push(format!("rejected ({rejection}) but challenges changed"));
            }
            let expected = rejection.to_string();
            if engine.notice() != Some(expected.as_str()) {
                violations.push(format!("rejection notice missing for {rejection:?}"));
            }
        }
        Ok(outcome) => {
            let expected = i128::from(before.player.coins) + i128::from(outcome.coins_credited)
                - i128::from(outcome.coins_debited);
            if i128::from(after.coins) != expected {
                violations.push(format!(
                    "coins {} but outcome implies {expected}",
                    after.coins
                ));
            }
            if after.stats.coins_earned < before.player.stats.coins_earned {
                violations.push("lifetime earnings decreased".to_string());
            }
            let paid = after
                .stats
                .challenges_completed
                .saturating_sub(before.player.stats.challenges_completed);
            if usize::try_from(paid).unwrap_or(usize::MAX) != outcome.completions.len() {
                violations.push(format!(
                    "{} completions reported but {paid} challenges counted",
                    outcome.completions.len()
                ));
            }
        }
    }
    violations
}

/// Checks for a session start.
#[must_use]
pub fn check_login(before: &PlayerState, engine: &SimEngine, login: LoginOutcome) -> Vec<String> {
    let mut violations = check_state(engine);
    let after = engine.state();

    if after.coins != before.coins.saturating_add(login.bonus()) {
        violations.push(format!(
            "login {login:?} moved coins from {} to {}",
            before.coins, after.coins
        ));
    }
    if after.streak != login.streak() {
        violations.push(format!(
            "streak {} disagrees with login {login:?}",
            after.streak
        ));
    }
    if after.last_login != Some(engine.clock().today()) {
        violations.push("last login not stamped with today".to_string());
    }
    if engine.challenges().len() != engine.config().challenge_pool_size {
        violations.push(format!(
            "session started with {} challenges",
            engine.challenges().len()
        ));
    }
    violations
}
