//! Daily-login streak state machine.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{
    STREAK_BONUS_LONG_CAP, STREAK_BONUS_LONG_PER_DAY, STREAK_BONUS_SHORT_CAP,
    STREAK_BONUS_SHORT_PER_DAY, STREAK_MULTIPLIER_THRESHOLD,
};

/// Result of checking a login against the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoginOutcome {
    /// Logged in the day after the previous login.
    Continued { streak: u32, bonus: u64 },
    /// First login ever, or at least one day was skipped.
    Reset { streak: u32 },
    /// Already logged in today; nothing changes.
    AlreadyCheckedIn { streak: u32 },
}

impl LoginOutcome {
    #[must_use]
    pub const fn streak(self) -> u32 {
        match self {
            Self::Continued { streak, .. }
            | Self::Reset { streak }
            | Self::AlreadyCheckedIn { streak } => streak,
        }
    }

    #[must_use]
    pub const fn bonus(self) -> u64 {
        match self {
            Self::Continued { bonus, .. } => bonus,
            Self::Reset { .. } | Self::AlreadyCheckedIn { .. } => 0,
        }
    }
}

/// Coins paid for reaching `streak` consecutive days.
#[must_use]
pub fn streak_bonus(streak: u32) -> u64 {
    let days = u64::from(streak);
    if streak >= STREAK_MULTIPLIER_THRESHOLD {
        (days * STREAK_BONUS_LONG_PER_DAY).min(STREAK_BONUS_LONG_CAP)
    } else {
        (days * STREAK_BONUS_SHORT_PER_DAY).min(STREAK_BONUS_SHORT_CAP)
    }
}

/// Classify a login on `today` given the previous login date and streak.
///
/// Granularity is the calendar day, not a rolling 24 hours.
#[must_use]
pub fn check_login(last_login: Option<NaiveDate>, streak: u32, today: NaiveDate) -> LoginOutcome {
    match last_login {
        Some(last) if last == today => LoginOutcome::AlreadyCheckedIn { streak },
        Some(last) if today.pred_opt() == Some(last) => {
            let streak = streak.saturating_add(1);
            LoginOutcome::Continued {
                streak,
                bonus: streak_bonus(streak),
            }
        }
        _ => LoginOutcome::Reset { streak: 1 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn consecutive_day_continues_with_bonus() {
        assert_eq!(
            check_login(Some(day(9)), 3, day(10)),
            LoginOutcome::Continued {
                streak: 4,
                bonus: 20
            }
        );
    }

    #[test]
    fn long_streaks_use_the_larger_bonus() {
        assert_eq!(check_login(Some(day(9)), 6, day(10)).bonus(), 70);
        assert_eq!(streak_bonus(12), 100);
        assert_eq!(streak_bonus(6), 30);
        assert_eq!(streak_bonus(11), 100);
    }

    #[test]
    fn gap_or_first_login_resets() {
        assert_eq!(
            check_login(Some(day(7)), 5, day(10)),
            LoginOutcome::Reset { streak: 1 }
        );
        assert_eq!(check_login(None, 0, day(10)), LoginOutcome::Reset { streak: 1 });
    }

    #[test]
    fn same_day_is_a_no_op() {
        let outcome = check_login(Some(day(10)), 5, day(10));
        assert_eq!(outcome, LoginOutcome::AlreadyCheckedIn { streak: 5 });
        assert_eq!(outcome.bonus(), 0);
    }

    #[test]
    fn month_boundary_counts_as_consecutive() {
        let last = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(check_login(Some(last), 1, today).streak(), 2);
    }
}
