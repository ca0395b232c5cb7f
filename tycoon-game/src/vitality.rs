//! Stamina/hydration simulation.
use serde::{Deserialize, Serialize};

use crate::constants::{
    DRINK_HYDRATION_DELTA, MEDITATE_STAMINA_DELTA, PASSIVE_HYDRATION_DELTA,
    PASSIVE_STAMINA_DELTA, REST_STAMINA_DELTA, WORKOUT_HYDRATION_DELTA, WORKOUT_STAMINA_DELTA,
};
use crate::numbers::apply_vitality_delta;
use crate::state::CharacterState;

/// Something the character does (or time passing) that moves vitality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalityAction {
    Workout,
    Drink,
    Rest,
    Meditate,
    PassiveTime,
}

impl VitalityAction {
    pub const ALL: &'static [Self] = &[
        Self::Workout,
        Self::Drink,
        Self::Rest,
        Self::Meditate,
        Self::PassiveTime,
    ];

    /// Pre-clamp `(stamina, hydration)` deltas.
    #[must_use]
    pub const fn deltas(self) -> (i32, i32) {
        match self {
            Self::Workout => (WORKOUT_STAMINA_DELTA, WORKOUT_HYDRATION_DELTA),
            Self::Drink => (0, DRINK_HYDRATION_DELTA),
            Self::Rest => (REST_STAMINA_DELTA, 0),
            Self::Meditate => (MEDITATE_STAMINA_DELTA, 0),
            Self::PassiveTime => (PASSIVE_STAMINA_DELTA, PASSIVE_HYDRATION_DELTA),
        }
    }
}

/// Apply `action` to a copy of `character`, clamping levels and re-deriving mood.
#[must_use]
pub fn apply_action(character: &CharacterState, action: VitalityAction) -> CharacterState {
    let (stamina_delta, hydration_delta) = action.deltas();
    character.with_levels(
        apply_vitality_delta(character.stamina(), stamina_delta),
        apply_vitality_delta(character.hydration(), hydration_delta),
    )
}
