//! Gym Tycoon Engine
//!
//! Platform-agnostic progression core for a single-player gym tycoon: tasks,
//! vitality, coins, upgrades, daily challenges and login streaks.
//! This crate has no UI, audio or persistence backend of its own.

pub mod catalog;
pub mod challenge;
pub mod clock;
pub mod config;
pub mod constants;
pub mod cooldown;
pub mod engine;
pub mod numbers;
pub mod reward;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod streak;
pub mod vitality;

// Re-export commonly used types
pub use catalog::{
    Catalog, CatalogError, ChallengeTemplate, MotivationalMessage, ShopItem, TaskInstance,
    TaskTemplate, UpgradeDef,
};
pub use challenge::{
    ChallengeCompletion, ChallengeKind, ChallengePool, ChallengeStatus, CompletionSet,
    DailyChallenge, RefreshReport,
};
pub use clock::{Clock, ManualClock, SystemClock, start_of_next_day};
pub use config::{EngineConfig, EngineConfigError};
pub use cooldown::CooldownMap;
pub use engine::{
    ActionOutcome, ActionResult, NoticeBoard, NoticeListener, Rejection, SubscriptionId,
    TickReport, TycoonEngine,
};
pub use reward::{StreakMultiplier, compute_reward};
pub use rng::{DrawStream, RandomSource, ScriptedSource, SeededSource};
pub use snapshot::{PlayerSnapshot, SNAPSHOT_VERSION, SnapshotError};
pub use state::{Area, CharacterState, Difficulty, Mood, PlayerState, Stats};
pub use streak::{LoginOutcome, check_login, streak_bonus};
pub use vitality::{VitalityAction, apply_action};

/// Persistence backend for player snapshots.
/// Platform-specific implementations should provide this
pub trait SnapshotStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a snapshot into `slot`, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be saved.
    fn save_snapshot(&self, slot: &str, snapshot: &PlayerSnapshot) -> Result<(), Self::Error>;

    /// Load the snapshot stored in `slot`
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded.
    fn load_snapshot(&self, slot: &str) -> Result<Option<PlayerSnapshot>, Self::Error>;

    /// Delete a saved snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be deleted.
    fn delete_snapshot(&self, slot: &str) -> Result<(), Self::Error>;
}
