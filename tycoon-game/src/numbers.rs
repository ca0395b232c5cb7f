//! Numeric conversion helpers centralizing safe numeric casts.

use chrono::Duration;
use num_traits::cast::cast;

use crate::constants::{VITALITY_MAX, VITALITY_MIN};

/// Round a non-negative f64 half-up into a `u64`, returning 0 for negative or NaN values.
#[must_use]
pub fn round_half_up_to_u64(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    let rounded = (value + 0.5).floor().min(max);
    cast::<f64, u64>(rounded).unwrap_or(u64::MAX)
}

/// Whole seconds in a span, rounded up at full precision. Non-positive spans are 0.
#[must_use]
pub fn ceil_duration_to_secs(span: Duration) -> u64 {
    if span <= Duration::zero() {
        return 0;
    }
    let whole = span.num_seconds();
    let partial = i64::from(span - Duration::seconds(whole) > Duration::zero());
    u64::try_from(whole.saturating_add(partial)).unwrap_or(u64::MAX)
}

/// Apply a signed delta to a vitality level and clamp into `[0, 100]`.
#[must_use]
pub fn apply_vitality_delta(level: u8, delta: i32) -> u8 {
    let next = (i32::from(level) + delta).clamp(VITALITY_MIN, VITALITY_MAX);
    u8::try_from(next).unwrap_or(u8::MAX)
}
