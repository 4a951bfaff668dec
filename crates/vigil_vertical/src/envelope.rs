//! # Reference Gravity Envelope
//!
//! Named tolerance constants describing the imprecision band of the
//! reference physics model around standard gravity, plus the stateless
//! classifiers built on them.
//!
//! **CRITICAL:** These values gate the false-positive rate of every
//! vertical check. They are empirical, not derived; do not "correct"
//! them, and never duplicate one inline at a call site.

use vigil_core::move_record::{MoveHistory, MoveRecord};
use vigil_core::state::EntityVerticalState;

// =============================================================================
// GRAVITY TOLERANCE BAND
// =============================================================================

/// Upper bound of per-tick gravity as the reference model observes it.
pub const GRAVITY_MAX: f64 = 0.0834;

/// Lower bound of per-tick gravity.
pub const GRAVITY_MIN: f64 = 0.0624;

/// Width of the gravity tolerance band.
pub const GRAVITY_SPAN: f64 = GRAVITY_MAX - GRAVITY_MIN;

/// Commonly observed sub-step gravity artifact.
pub const GRAVITY_ODD: f64 = 0.05;

// =============================================================================
// MEDIUM FRICTION
// =============================================================================

/// Vertical friction multiplier in air.
pub const FRICTION_MEDIUM_AIR: f64 = 0.98;

/// Vertical friction multiplier in water.
pub const FRICTION_MEDIUM_WATER: f64 = 0.89;

/// Vertical friction multiplier in lava.
pub const FRICTION_MEDIUM_LAVA: f64 = 0.535;

// =============================================================================
// GLIDE DESCENT SIGNATURE
// =============================================================================

/// Minimum (most positive) displacement of a glide-descent tick.
pub const GLIDE_DESCEND_PHASE_MIN: f64 = -GRAVITY_MAX - GRAVITY_SPAN;

/// Largest accepted speed-up between two glide-descent ticks.
pub const GLIDE_DESCEND_GAIN_MAX_NEG: f64 = -GRAVITY_MAX;

/// Largest accepted slow-down between two glide-descent ticks.
pub const GLIDE_DESCEND_GAIN_MAX_POS: f64 = GRAVITY_ODD / 1.95;

// =============================================================================
// SPECIAL-CASE SPEEDS
// =============================================================================

/// Fastest friction-consistent descent while leaving a berry bush.
pub const BUSH_SPEED_DESCEND: f64 = -0.09;

/// Displacement magnitude of the host teleport-to-air artifact.
pub const TELEPORT_HOP_DIST: f64 = 0.01;

/// Base vertical speed while actively swimming.
pub const SWIM_BASE_SPEED_V: f64 = 0.215;

/// Base vertical speed in water on hosts without the swimming mechanic.
pub const SWIM_BASE_SPEED_V_LEGACY: f64 = 0.185;

/// Base vertical swimming speed for the given host capability.
#[must_use]
pub const fn swim_base_speed_vertical(swimming: bool) -> f64 {
    if swimming {
        SWIM_BASE_SPEED_V
    } else {
        SWIM_BASE_SPEED_V_LEGACY
    }
}

// =============================================================================
// CLASSIFIERS
// =============================================================================

/// True if `y_distance` is consistent with continued free-fall from
/// `last_y_distance` under the given vertical friction.
///
/// The expected displacement is `last * friction - GRAVITY_MIN`; the
/// accepted band is `(expected - GRAVITY_SPAN - extra_gravity,
/// expected + extra_gravity]`, and the displacement must strictly
/// decrease.
#[must_use]
pub fn falling_envelope(
    y_distance: f64,
    last_y_distance: f64,
    friction: f64,
    extra_gravity: f64,
) -> bool {
    if y_distance >= last_y_distance {
        return false;
    }
    let friction_distance = last_y_distance * friction - GRAVITY_MIN;
    y_distance <= friction_distance + extra_gravity
        && y_distance > friction_distance - GRAVITY_SPAN - extra_gravity
}

/// True if the decrease from the friction-expected displacement lies
/// within `[min_gravity, max_gravity]`, both scaled by
/// `speed_multiplier`.
#[must_use]
pub fn enough_friction_envelope(
    this_move: &MoveRecord,
    last_move: &MoveRecord,
    friction: f64,
    min_gravity: f64,
    max_gravity: f64,
    speed_multiplier: f64,
) -> bool {
    let expected = last_move.y_distance * friction;
    let decrease = expected - this_move.y_distance;
    decrease >= min_gravity * speed_multiplier && decrease <= max_gravity * speed_multiplier
}

/// Recognizes the gliding-descent speed signature: two sufficiently fast
/// descending ticks whose difference stays inside the glide gain band.
#[must_use]
pub fn glide_vertical_gain_envelope(y_distance: f64, previous_y_distance: f64) -> bool {
    y_distance < GLIDE_DESCEND_PHASE_MIN
        && previous_y_distance < GLIDE_DESCEND_PHASE_MIN
        && y_distance > previous_y_distance + GLIDE_DESCEND_GAIN_MAX_NEG
        && y_distance < previous_y_distance + GLIDE_DESCEND_GAIN_MAX_POS
}

/// A move leaving liquid without ground contact and without a direct
/// rejoin, where the preceding move entered from outside the liquid.
#[must_use]
pub fn splash_move(move_record: &MoveRecord, other_move: &MoveRecord) -> bool {
    !move_record.touched_ground
        && move_record.from.in_liquid
        && !move_record.to.reset_cond
        && !other_move.touched_ground
        && !other_move.from.in_liquid
        && !other_move.to.reset_cond
}

/// Like [`splash_move`], but accepting the transition in either
/// direction and ignoring reset classifications.
#[must_use]
pub fn splash_move_non_strict(move_record: &MoveRecord, other_move: &MoveRecord) -> bool {
    !move_record.touched_ground
        && !other_move.touched_ground
        && (move_record.from.in_liquid && !other_move.from.in_liquid
            || !move_record.from.in_liquid && other_move.from.in_liquid)
}

/// True if either endpoint of the move is inside a liquid.
#[must_use]
pub const fn in_liquid(move_record: &MoveRecord) -> bool {
    move_record.from.in_liquid || move_record.to.in_liquid
}

/// True if the move starts inside and ends outside a liquid.
#[must_use]
pub const fn leaving_liquid(move_record: &MoveRecord) -> bool {
    move_record.from.in_liquid && !move_record.to.in_liquid
}

/// True if the move is fully airborne: no ground contact and neither
/// endpoint on ground or under a reset classification.
#[must_use]
pub const fn in_air(move_record: &MoveRecord) -> bool {
    !move_record.touched_ground
        && !move_record.from.on_ground_or_reset_cond()
        && !move_record.to.on_ground_or_reset_cond()
}

/// Recognizes the tower-climbing artifact: the first airborne move after
/// a workaround-detected ground contact starts slightly above the block
/// top, so the follow-up move overshoots the lift-off gain.
#[must_use]
pub fn tower_jump_overshoot(
    y_distance: f64,
    max_jump_gain: f64,
    this_move: &MoveRecord,
    last_move: &MoveRecord,
    history: &MoveHistory,
    state: &EntityVerticalState,
) -> bool {
    let second_past = history.second_past();
    (state.jump_phase == 1 && last_move.touched_ground_workaround
        || state.jump_phase == 2
            && in_air(last_move)
            && second_past.to_is_valid
            && second_past.touched_ground_workaround)
        && in_air(this_move)
        && last_move.y_distance < max_jump_gain
        && last_move.y_distance > max_jump_gain * 0.67
        && falling_envelope(
            y_distance,
            max_jump_gain,
            state.last_friction_vertical,
            GRAVITY_SPAN,
        )
}

/// Recognizes the host teleport-to-air artifact: a near-zero hop with a
/// known set back, seen right after certain host-side teleports.
#[must_use]
pub fn skip_teleport_artifact(
    this_move: &MoveRecord,
    last_move: &MoveRecord,
    state: &EntityVerticalState,
) -> bool {
    last_move.to_is_valid
        && state.has_set_back()
        && this_move.y_distance.abs() < TELEPORT_HOP_DIST
        && last_move.y_distance.abs() < TELEPORT_HOP_DIST
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::move_record::LocationSnapshot;

    fn move_with(y_distance: f64) -> MoveRecord {
        MoveRecord {
            y_distance,
            to_is_valid: true,
            ..MoveRecord::default()
        }
    }

    #[test]
    fn test_falling_envelope_accepts_friction_fall() {
        // Expected: -0.5 * 0.98 - 0.0624 = -0.5524.
        assert!(falling_envelope(-0.5524, -0.5, FRICTION_MEDIUM_AIR, 0.0));
        // Upper boundary is inclusive.
        assert!(falling_envelope(-0.5524 + 0.0, -0.5, FRICTION_MEDIUM_AIR, 0.0));
        // Not decreasing at all.
        assert!(!falling_envelope(-0.4, -0.5, FRICTION_MEDIUM_AIR, 0.0));
        // Far below the band.
        assert!(!falling_envelope(-0.7, -0.5, FRICTION_MEDIUM_AIR, 0.0));
    }

    #[test]
    fn test_falling_envelope_lower_bound_is_strict() {
        let expected = -0.5 * FRICTION_MEDIUM_AIR - GRAVITY_MIN;
        let lower = expected - GRAVITY_SPAN;
        assert!(!falling_envelope(lower, -0.5, FRICTION_MEDIUM_AIR, 0.0));
        assert!(falling_envelope(lower + 1e-9, -0.5, FRICTION_MEDIUM_AIR, 0.0));
    }

    #[test]
    fn test_enough_friction_envelope_band() {
        let last = move_with(0.4);
        // Expected after lava friction: 0.4 * 0.535 = 0.214.
        let this = move_with(0.214 - 3.0 * GRAVITY_MAX);
        assert!(enough_friction_envelope(
            &this,
            &last,
            FRICTION_MEDIUM_LAVA,
            0.0,
            2.0 * GRAVITY_MAX,
            4.0
        ));

        let too_fast = move_with(0.214 - 9.0 * GRAVITY_MAX);
        assert!(!enough_friction_envelope(
            &too_fast,
            &last,
            FRICTION_MEDIUM_LAVA,
            0.0,
            2.0 * GRAVITY_MAX,
            4.0
        ));
    }

    #[test]
    fn test_glide_gain_envelope() {
        assert!(glide_vertical_gain_envelope(-0.21, -0.22));
        // Not descending fast enough.
        assert!(!glide_vertical_gain_envelope(-0.05, -0.22));
        // Speeding up beyond the band.
        assert!(!glide_vertical_gain_envelope(-0.40, -0.22));
    }

    #[test]
    fn test_splash_move_classifiers() {
        let leaving = MoveRecord {
            from: LocationSnapshot {
                in_liquid: true,
                extra_properties_valid: true,
                ..LocationSnapshot::default()
            },
            to_is_valid: true,
            ..MoveRecord::default()
        };
        let entering = MoveRecord {
            to_is_valid: true,
            ..MoveRecord::default()
        };

        assert!(splash_move(&leaving, &entering));
        assert!(splash_move_non_strict(&leaving, &entering));
        assert!(splash_move_non_strict(&entering, &leaving));
        assert!(!splash_move(&entering, &leaving));

        let grounded = MoveRecord {
            touched_ground: true,
            ..leaving
        };
        assert!(!splash_move(&grounded, &entering));
    }

    #[test]
    fn test_liquid_and_air_classifiers() {
        let mut record = move_with(-0.1);
        assert!(in_air(&record));
        assert!(!in_liquid(&record));

        record.from.in_liquid = true;
        assert!(in_liquid(&record));
        assert!(leaving_liquid(&record));

        record.to.in_liquid = true;
        assert!(!leaving_liquid(&record));

        record.to.on_ground = true;
        assert!(!in_air(&record));
    }

    #[test]
    fn test_teleport_artifact_requires_set_back() {
        let this = move_with(0.005);
        let last = move_with(-0.004);
        let mut state = EntityVerticalState::new();

        assert!(!skip_teleport_artifact(&this, &last, &state));
        state.set_back_y = Some(64.0);
        assert!(skip_teleport_artifact(&this, &last, &state));

        let big = move_with(0.2);
        assert!(!skip_teleport_artifact(&big, &last, &state));
    }
}
