//! Coin payout arithmetic for completed tasks.
use serde::{Deserialize, Serialize};

use crate::catalog::UpgradeDef;
use crate::constants::{STREAK_MULTIPLIER_THRESHOLD, STREAK_REWARD_MULTIPLIER};
use crate::numbers::round_half_up_to_u64;
use crate::state::Area;

/// Late multiplier applied to task payouts once a login streak is long enough.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreakMultiplier {
    pub threshold: u32,
    pub factor: f64,
}

impl Default for StreakMultiplier {
    fn default() -> Self {
        Self {
            threshold: STREAK_MULTIPLIER_THRESHOLD,
            factor: STREAK_REWARD_MULTIPLIER,
        }
    }
}

/// Payout for a task in `area` worth `base_reward`.
///
/// Every owned upgrade for the same area that carries a boost multiplies the
/// reward by `1 + boost/100`; the streak multiplier is applied last, then the
/// result is rounded half-up.
#[must_use]
pub fn compute_reward<'a>(
    base_reward: u32,
    area: Area,
    owned_upgrades: impl IntoIterator<Item = &'a UpgradeDef>,
    streak: u32,
    multiplier: StreakMultiplier,
) -> u64 {
    let mut reward = f64::from(base_reward);
    for upgrade in owned_upgrades {
        if upgrade.area != area {
            continue;
        }
        if let Some(boost) = upgrade.boost_pct {
            reward *= 1.0 + f64::from(boost) / 100.0;
        }
    }
    if streak >= multiplier.threshold {
        reward *= multiplier.factor;
    }
    round_half_up_to_u64(reward)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upgrade(id: &str, area: Area, boost: Option<u32>) -> UpgradeDef {
        UpgradeDef {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            area,
            cost: 100,
            boost_pct: boost,
            unlock_area: None,
            visual_level: None,
        }
    }

    #[test]
    fn treadmill_boosts_cardio() {
        let owned = [upgrade("treadmill", Area::Cardio, Some(20))];
        let rules = StreakMultiplier::default();
        assert_eq!(compute_reward(30, Area::Cardio, &owned, 0, rules), 36);
        assert_eq!(compute_reward(30, Area::Cardio, &owned, 7, rules), 54);
    }

    #[test]
    fn other_areas_and_boostless_upgrades_do_not_apply() {
        let owned = [
            upgrade("weights", Area::Strength, Some(25)),
            upgrade("pool", Area::Cardio, None),
        ];
        let rules = StreakMultiplier::default();
        assert_eq!(compute_reward(30, Area::Cardio, &owned, 6, rules), 30);
    }

    #[test]
    fn stacked_boosts_are_order_independent() {
        let a = upgrade("a", Area::Wellness, Some(15));
        let b = upgrade("b", Area::Wellness, Some(40));
        let rules = StreakMultiplier::default();
        let forward = compute_reward(35, Area::Wellness, [&a, &b], 9, rules);
        let backward = compute_reward(35, Area::Wellness, [&b, &a], 9, rules);
        assert_eq!(forward, backward);
        // 35 * 1.15 * 1.4 * 1.5 = 84.525
        assert_eq!(forward, 85);
    }

    #[test]
    fn zero_base_pays_nothing() {
        let none: [UpgradeDef; 0] = [];
        let rules = StreakMultiplier::default();
        assert_eq!(compute_reward(0, Area::Home, &none, 30, rules), 0);
    }
}
