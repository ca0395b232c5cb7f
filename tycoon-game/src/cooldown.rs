//! Per-task cooldown bookkeeping.
use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::numbers::ceil_duration_to_secs;

/// Task identifier mapped to the instant its cooldown ends.
///
/// Absence of an entry means the task is available.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CooldownMap(BTreeMap<String, DateTime<FixedOffset>>);

impl CooldownMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_on_cooldown(&self, task_id: &str, now: DateTime<FixedOffset>) -> bool {
        self.0.get(task_id).is_some_and(|expiry| now < *expiry)
    }

    /// Whole seconds until the task is available again, rounded up; 0 when available.
    #[must_use]
    pub fn remaining_seconds(&self, task_id: &str, now: DateTime<FixedOffset>) -> u64 {
        self.0
            .get(task_id)
            .map_or(0, |expiry| ceil_duration_to_secs(*expiry - now))
    }

    /// Start (or restart) the cooldown for `task_id`. Returns the expiry.
    pub fn set(
        &mut self,
        task_id: &str,
        duration_secs: u32,
        now: DateTime<FixedOffset>,
    ) -> DateTime<FixedOffset> {
        let expiry = now + Duration::seconds(i64::from(duration_secs));
        self.0.insert(task_id.to_string(), expiry);
        expiry
    }

    /// Remove every entry whose expiry is at or before `now`. Returns how many were removed.
    pub fn sweep(&mut self, now: DateTime<FixedOffset>) -> usize {
        let before = self.0.len();
        self.0.retain(|_, expiry| *expiry > now);
        before - self.0.len()
    }

    #[must_use]
    pub fn expiry(&self, task_id: &str) -> Option<DateTime<FixedOffset>> {
        self.0.get(task_id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DateTime<FixedOffset>)> {
        self.0.iter().map(|(id, expiry)| (id.as_str(), *expiry))
    }
}
