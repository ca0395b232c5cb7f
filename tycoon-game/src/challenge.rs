//! Daily challenge lifecycle: progress, completion and expiry.
use chrono::{DateTime, FixedOffset};
use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::catalog::Catalog;
use crate::constants::CHALLENGE_POOL_SIZE;
use crate::rng::RandomSource;

/// Inline storage for the active challenge set.
pub type ChallengePool = SmallVec<[DailyChallenge; CHALLENGE_POOL_SIZE]>;

/// Completions emitted by a single progress report.
pub type CompletionSet = SmallVec<[ChallengeCompletion; CHALLENGE_POOL_SIZE]>;

/// What kind of player activity advances a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    Workout,
    Water,
    Meditation,
    Streak,
}

impl ChallengeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workout => "workout",
            Self::Water => "water",
            Self::Meditation => "meditation",
            Self::Streak => "streak",
        }
    }
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle position of a challenge at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeStatus {
    Active,
    /// Reward already paid; terminal.
    Completed,
    /// Ran out of time without completing; terminal, no reward.
    Expired,
}

/// A time-boxed secondary objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyChallenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target_amount: u32,
    pub current_amount: u32,
    pub reward: u64,
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    pub completed: bool,
    pub expires_at: DateTime<FixedOffset>,
}

impl DailyChallenge {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<FixedOffset>) -> bool {
        self.expires_at <= now
    }

    #[must_use]
    pub fn status(&self, now: DateTime<FixedOffset>) -> ChallengeStatus {
        if self.completed {
            ChallengeStatus::Completed
        } else if self.is_expired(now) {
            ChallengeStatus::Expired
        } else {
            ChallengeStatus::Active
        }
    }

    /// Amount still needed before completion.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.target_amount.saturating_sub(self.current_amount)
    }
}

/// Emitted once, on the transition into [`ChallengeStatus::Completed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeCompletion {
    pub challenge_id: String,
    pub title: String,
    pub reward: u64,
}

/// Outcome of a pool refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshReport {
    pub expired: usize,
    pub drawn: usize,
}

/// Add `amount` to every active challenge of `kind`, capping at the target.
///
/// Returns one completion per challenge that crossed its target in this call;
/// challenges that were already completed are never reported again.
pub fn report_progress(
    pool: &mut ChallengePool,
    kind: ChallengeKind,
    amount: u32,
    now: DateTime<FixedOffset>,
) -> CompletionSet {
    let mut completions = CompletionSet::new();
    if amount == 0 {
        return completions;
    }
    for challenge in pool.iter_mut() {
        if challenge.kind != kind || challenge.status(now) != ChallengeStatus::Active {
            continue;
        }
        challenge.current_amount = challenge
            .current_amount
            .saturating_add(amount)
            .min(challenge.target_amount);
        if challenge.current_amount >= challenge.target_amount {
            challenge.completed = true;
            debug!(
                "challenge {} ({}) completed, reward {}",
                challenge.id, challenge.title, challenge.reward
            );
            completions.push(ChallengeCompletion {
                challenge_id: challenge.id.clone(),
                title: challenge.title.clone(),
                reward: challenge.reward,
            });
        }
    }
    completions
}

/// Drop expired challenges and draw fresh ones until the pool holds `target_size`.
pub fn refresh<R: RandomSource>(
    pool: &mut ChallengePool,
    now: DateTime<FixedOffset>,
    target_size: usize,
    catalog: &Catalog,
    rng: &mut R,
) -> RefreshReport {
    let before = pool.len();
    pool.retain(|challenge| !challenge.is_expired(now));
    let expired = before - pool.len();

    let mut drawn = 0;
    while pool.len() < target_size {
        pool.push(catalog.draw_challenge(now, rng));
        drawn += 1;
    }
    if expired > 0 || drawn > 0 {
        debug!("challenge pool refreshed: {expired} expired, {drawn} drawn");
    }
    RefreshReport { expired, drawn }
}
