//! Centralized balance and tuning constants for the Gym Tycoon progression engine.
//!
//! These values define the deterministic economy and vitality math. Runtime
//! overrides go through [`crate::config::EngineConfig`]; the constants here are
//! its defaults and the fixed rules that are not tunable at all.

// Vitality ------------------------------------------------------------------
pub const VITALITY_MIN: i32 = 0;
pub const VITALITY_MAX: i32 = 100;

pub const WORKOUT_STAMINA_DELTA: i32 = -15;
pub const WORKOUT_HYDRATION_DELTA: i32 = -10;
pub const DRINK_HYDRATION_DELTA: i32 = 25;
pub const REST_STAMINA_DELTA: i32 = 30;
pub const MEDITATE_STAMINA_DELTA: i32 = 10;
pub const PASSIVE_STAMINA_DELTA: i32 = -2;
pub const PASSIVE_HYDRATION_DELTA: i32 = -3;

/// Either level strictly below this is exhausting.
pub const MOOD_EXHAUSTED_BELOW: u8 = 20;
/// Either level strictly below this is tiring.
pub const MOOD_TIRED_BELOW: u8 = 40;
/// Both levels strictly above this are energizing.
pub const MOOD_ENERGETIC_ABOVE: u8 = 70;

// Economy -------------------------------------------------------------------
pub const STARTING_COINS: u64 = 100;
pub const DRINK_REWARD: u64 = 5;
pub const MEDITATE_REWARD: u64 = 10;
pub const MEDITATION_MINUTES_PER_SESSION: u32 = 5;
pub const STREAK_MULTIPLIER_THRESHOLD: u32 = 7;
pub const STREAK_REWARD_MULTIPLIER: f64 = 1.5;

// Streak bonuses ------------------------------------------------------------
pub const STREAK_BONUS_SHORT_PER_DAY: u64 = 5;
pub const STREAK_BONUS_SHORT_CAP: u64 = 50;
pub const STREAK_BONUS_LONG_PER_DAY: u64 = 10;
pub const STREAK_BONUS_LONG_CAP: u64 = 100;

// Task gating ---------------------------------------------------------------
pub const MIN_TASK_STAMINA: u8 = 10;
pub const MIN_TASK_HYDRATION: u8 = 10;
pub const REST_ANYWHERE_BELOW_STAMINA: u8 = 20;
pub const DEFAULT_COOLDOWN_SECS: u32 = 60;

// Challenges ----------------------------------------------------------------
pub const CHALLENGE_POOL_SIZE: usize = 3;
pub const WORKOUT_PROGRESS_PER_TASK: u32 = 1;
pub const WATER_PROGRESS_PER_DRINK: u32 = 1;

// Character -----------------------------------------------------------------
pub const DEFAULT_OUTFIT: &str = "default";
pub const STARTING_GYM_LEVEL: u8 = 1;

// Notification text ---------------------------------------------------------
pub(crate) const NOTICE_REST: &str = "You took some time to rest and recover stamina.";
pub(crate) const NOTICE_OUTFIT: &str = "New outfit equipped!";
pub(crate) const NOTICE_ACCESSORY: &str = "New accessory equipped!";
pub(crate) const NOTICE_STREAK_RESET: &str = "Welcome back! You've started a new streak.";
pub(crate) const NOTICE_WELCOME: &str = "Welcome to your gym! Your streak starts today.";
