use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::challenge::{CompletionSet, RefreshReport};
use crate::state::Area;

/// Why a player action was refused. The display text is the user-facing notice.
///
/// A rejected action leaves every piece of engine state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    #[error("You're too exhausted! Rest or drink water first.")]
    InsufficientEnergy,
    #[error("This task is on cooldown. Available in {remaining_seconds} seconds.")]
    OnCooldown { remaining_seconds: u64 },
    #[error("Not enough coins! You need {shortfall} more coins.")]
    InsufficientFunds { shortfall: u64 },
    #[error("You need to unlock the {area} area first!")]
    AreaLocked { area: Area },
    #[error("You can only rest in the home area, unless you're very tired.")]
    RestNotPermittedHere,
    #[error("You already own that.")]
    AlreadyOwned { id: String },
    #[error("Nothing called \"{id}\" is available.")]
    NotFound { id: String },
}

/// Effects of an accepted player action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Coins added to the balance, including challenge payouts.
    pub coins_credited: u64,
    pub coins_debited: u64,
    /// Challenges completed (and paid) by this action.
    pub completions: CompletionSet,
    /// Identifier of the task drawn to replace a completed one.
    pub replacement_task: Option<String>,
    pub notice: Option<String>,
}

impl ActionOutcome {
    pub(crate) fn with_notice(notice: impl Into<String>) -> Self {
        Self {
            notice: Some(notice.into()),
            ..Self::default()
        }
    }
}

/// Work done by one maintenance tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub cooldowns_cleared: usize,
    pub challenges: RefreshReport,
}
