//! # The Exemption Cascade
//!
//! Ordered predicate groups deciding whether an observed vertical
//! displacement that deviates from the reference model matches a
//! recognized environment-induced deviation (liquids, bounce blocks,
//! obstructed headroom, glide states, velocity effects, ...).
//!
//! ## Evaluation contract
//!
//! Each entry point evaluates an ordered list of clauses and stops at the
//! first match. Clauses are partitioned by *situation*; ordering is a
//! performance concern, except where a clause requests a state edit, in
//! which case it is evaluated before any clause assuming the edit has not
//! happened.
//!
//! Every clause is total: missing history degrades to "does not apply",
//! and "not exempt" is the universal default. Evaluation itself is pure;
//! the public entry points apply at most the one [`StateEdit`] requested
//! by the first matching clause, then report the verdict.

use vigil_core::config::CheckConfig;
use vigil_core::envelope::LiftOffEnvelope;
use vigil_core::move_record::MoveHistory;
use vigil_core::state::EntityVerticalState;
use vigil_core::velocity::VelocityFlags;
use vigil_core::workarounds::WorkaroundId;

use crate::envelope::{
    enough_friction_envelope, falling_envelope, glide_vertical_gain_envelope, in_air, in_liquid,
    leaving_liquid, skip_teleport_artifact, splash_move, splash_move_non_strict,
    swim_base_speed_vertical, tower_jump_overshoot, BUSH_SPEED_DESCEND, FRICTION_MEDIUM_LAVA,
    GRAVITY_MAX, GRAVITY_MIN, GRAVITY_ODD, GRAVITY_SPAN,
};

/// Per-call numeric inputs computed by the movement pipeline.
#[derive(Clone, Copy, Debug)]
pub struct MoveInput {
    /// Observed vertical displacement this tick.
    pub y_distance: f64,
    /// Observed minus reference-allowed displacement; negative means the
    /// move fell short of the model, positive means it exceeded it.
    pub y_dist_diff_ex: f64,
    /// Tick-over-tick displacement change (current minus previous).
    pub y_dist_change: f64,
    /// Reference-allowed displacement for this tick.
    pub allowed_distance: f64,
    /// Nominal lift-off gain for the current envelope and jump boost.
    pub max_jump_gain: f64,
    /// Whether the allowed-distance model is in its strict band.
    pub strict_v_dist_rel: bool,
    /// Destination carries a reset/landing classification.
    pub reset_to: bool,
    /// Source carries a reset classification.
    pub reset_from: bool,
    /// Source snapshot is on ground.
    pub from_on_ground: bool,
    /// Destination snapshot is on ground.
    pub to_on_ground: bool,
    /// Wall-clock time in milliseconds, for timer comparisons.
    pub now_ms: u64,
}

/// Environment probes only the host world model can answer.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostSignals {
    /// Entity is currently riptiding.
    pub riptiding: bool,
    /// Host supports the swimming mechanic.
    pub swimming_supported: bool,
    /// Entity is actively swimming.
    pub swimming: bool,
    /// Extra block state value at the source block (0 when none).
    pub from_block_data: u8,
    /// Destination is on ground within a `GRAVITY_MIN` margin below.
    pub to_on_ground_within_gravity_min: bool,
    /// Source is on ground within `|y_distance| + 0.001` below.
    pub from_on_ground_coarse: bool,
    /// Destination is above a stairs block.
    pub to_above_stairs: bool,
    /// A liquid column sits half a block below the destination.
    pub to_above_liquid_column: bool,
}

/// State mutation requested by a matching clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateEdit {
    /// Pin the jump phase to zero (bounce/slime interaction).
    PinFrictionPhase,
    /// Clear the keep-friction marker.
    ClearKeepFriction,
    /// Clear the keep-friction marker and pin the jump phase.
    ClearKeepFrictionAndPin,
}

/// Details of a matched clause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuleMatch {
    /// The rate-tracked workaround branch that fired, if any.
    pub workaround: Option<WorkaroundId>,
    /// The state edit to apply, if any.
    pub edit: Option<StateEdit>,
}

/// Result of evaluating one predicate group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleOutcome {
    /// No clause applied.
    NoMatch,
    /// A clause applied; the move is exempt.
    Match(RuleMatch),
}

const fn exempt() -> RuleOutcome {
    RuleOutcome::Match(RuleMatch {
        workaround: None,
        edit: None,
    })
}

const fn exempt_via(workaround: WorkaroundId) -> RuleOutcome {
    RuleOutcome::Match(RuleMatch {
        workaround: Some(workaround),
        edit: None,
    })
}

const fn exempt_edit(edit: StateEdit) -> RuleOutcome {
    RuleOutcome::Match(RuleMatch {
        workaround: None,
        edit: Some(edit),
    })
}

/// Applies the outcome of a predicate group: records the workaround use,
/// performs at most one state edit, and returns the verdict.
fn settle(rule: &'static str, outcome: RuleOutcome, state: &mut EntityVerticalState) -> bool {
    match outcome {
        RuleOutcome::NoMatch => false,
        RuleOutcome::Match(rule_match) => {
            if let Some(id) = rule_match.workaround {
                state.workarounds.use_workaround(id);
            }
            match rule_match.edit {
                Some(StateEdit::PinFrictionPhase) => state.set_friction_jump_phase(),
                Some(StateEdit::ClearKeepFriction) => state.clear_keep_friction_tick(),
                Some(StateEdit::ClearKeepFrictionAndPin) => {
                    state.clear_keep_friction_tick();
                    state.set_friction_jump_phase();
                }
                None => {}
            }
            tracing::trace!(rule, workaround = ?rule_match.workaround, "vertical move exempted");
            true
        }
    }
}

// =============================================================================
// PRE-SCAN (skip the whole sub-check sequence on match)
// =============================================================================

/// Vertical envelope transitions checked before the displacement-deviation
/// check; a match skips the entire sub-check sequence for this tick.
///
/// Covers zero-gravity volumes (cobweb-like), repeated zero displacement
/// near the set back, and the first zero-displacement tick after a
/// bounce interaction.
pub fn pre_scan_exemption(
    input: &MoveInput,
    history: &MoveHistory,
    state: &mut EntityVerticalState,
) -> bool {
    let outcome = eval_pre_scan(input, history, state);
    settle("pre_scan", outcome, state)
}

fn eval_pre_scan(
    input: &MoveInput,
    history: &MoveHistory,
    state: &EntityVerticalState,
) -> RuleOutcome {
    let this_move = history.current();
    let last_move = history.last();
    let y_distance = input.y_distance;
    let above_set_back = this_move.to.y - state.set_back_y();

    // Zero-gravity volume, early jump phase.
    if state.lift_off_envelope == LiftOffEnvelope::NoJump && state.jump_phase < 60 {
        if last_move.to_is_valid && last_move.y_distance < 0.0 {
            // Switch to zero displacement on an early jump phase.
            if y_distance == 0.0
                && last_move.y_distance < -GRAVITY_ODD / 3.0
                && last_move.y_distance > -GRAVITY_MIN
            {
                return exempt_via(WorkaroundId::WebZeroV1);
            }
            // Decrease too few.
            if input.y_dist_change < -GRAVITY_MIN / 3.0 && input.y_dist_change > -GRAVITY_MAX {
                return exempt_via(WorkaroundId::WebMicroGravity1);
            }
            // Keep negative displacement (likely an entity height issue).
            if input.y_dist_change == 0.0
                && last_move.y_distance > -GRAVITY_MAX
                && last_move.y_distance < -GRAVITY_ODD / 3.0
            {
                return exempt_via(WorkaroundId::WebMicroGravity2);
            }
        }
        // Keep zero displacement on first falling, horizontally
        // near-stationary, within two units above the set back.
        if y_distance == 0.0
            && state.zero_v_dist_repeat > 0
            && state.zero_v_dist_repeat < 10
            && this_move.h_distance < 0.125
            && last_move.h_distance < 0.125
            && above_set_back < 0.0
            && above_set_back > -2.0
        {
            return exempt_via(WorkaroundId::WebZeroV2);
        }
    }

    // Bounce lift: direction change at the apex keeps displacement at
    // zero for exactly one tick.
    if y_distance == 0.0
        && state.zero_v_dist_repeat == 1
        && (state.is_velocity_jump_phase()
            || state.has_set_back() && above_set_back < 1.35 && above_set_back > 0.0)
    {
        return exempt_via(WorkaroundId::SlimeZeroJump);
    }

    RuleOutcome::NoMatch
}

// =============================================================================
// BOUNCE RECOGNITION
// =============================================================================

/// Searches the velocity ledger for a bounce-origin entry matching the
/// current or previous displacement; pins the friction jump phase on
/// match.
pub fn bounce_recognition(
    y_distance: f64,
    history: &MoveHistory,
    state: &mut EntityVerticalState,
) -> bool {
    let outcome = eval_bounce(y_distance, history, state);
    settle("bounce_recognition", outcome, state)
}

fn eval_bounce(y_distance: f64, history: &MoveHistory, state: &EntityVerticalState) -> RuleOutcome {
    if let Some(entry) = state.vertical_velocity.peek(y_distance, 0, 4) {
        if entry.has_flag(VelocityFlags::ORIGIN_BLOCK_BOUNCE) {
            return exempt_edit(StateEdit::PinFrictionPhase);
        }
    }
    // Fall back to the previous tick's displacement.
    if let Some(entry) = state.vertical_velocity.peek(history.last().y_distance, 0, 4) {
        if entry.has_flag(VelocityFlags::ORIGIN_BLOCK_BOUNCE) {
            return exempt_edit(StateEdit::PinFrictionPhase);
        }
    }
    RuleOutcome::NoMatch
}

// =============================================================================
// SLOPE AFTER LIFT-OFF
// =============================================================================

/// Odd displacement decrease on the first tick after lift-off, below the
/// envelope's maximum jump height.
pub fn slope_after_lift_off(
    input: &MoveInput,
    history: &MoveHistory,
    state: &mut EntityVerticalState,
) -> bool {
    let outcome = eval_slope(input, history, state);
    settle("slope_after_lift_off", outcome, state)
}

fn eval_slope(
    input: &MoveInput,
    history: &MoveHistory,
    state: &EntityVerticalState,
) -> RuleOutcome {
    let this_move = history.current();
    let last_move = history.last();
    let y_distance = input.y_distance;

    if state.jump_phase != 1
        || input.y_dist_diff_ex.abs() >= 2.0 * GRAVITY_SPAN
        || last_move.y_distance <= 0.0
        || y_distance >= last_move.y_distance
        || this_move.to.y - state.set_back_y()
            > state.lift_off_envelope.max_jump_height(state.jump_amplifier)
    {
        return RuleOutcome::NoMatch;
    }

    // Decrease more after lost-ground cases with more displacement than a
    // normal lift-off.
    if last_move.y_distance > input.max_jump_gain
        && last_move.y_distance < 1.1 * input.max_jump_gain
    {
        return exempt_via(WorkaroundId::SlopeLostGround);
    }
    // Decrease more after going through liquid, with a normal ground
    // envelope.
    if last_move.y_distance > 0.5 * input.max_jump_gain
        && last_move.y_distance < 0.84 * input.max_jump_gain
        && last_move.y_distance - y_distance <= GRAVITY_MAX + GRAVITY_SPAN
    {
        return exempt_via(WorkaroundId::SlopeLiquidPass);
    }
    RuleOutcome::NoMatch
}

// =============================================================================
// LIQUID TRANSITION
// =============================================================================

/// Jump after leaving a liquid near ground, or jumping through liquid.
/// Applies during jump phase 1 or 2 only.
pub fn liquid_transition(
    input: &MoveInput,
    history: &MoveHistory,
    state: &mut EntityVerticalState,
) -> bool {
    let outcome = eval_liquid(input, history, state);
    settle("liquid_transition", outcome, state)
}

#[allow(clippy::similar_names)]
fn eval_liquid(
    input: &MoveInput,
    history: &MoveHistory,
    state: &EntityVerticalState,
) -> RuleOutcome {
    if state.jump_phase != 1 && state.jump_phase != 2 {
        return RuleOutcome::NoMatch;
    }
    let this_move = history.current();
    let last_move = history.last();
    let y_distance = input.y_distance;
    let y_dist_diff_ex = input.y_dist_diff_ex;
    let envelope = state.lift_off_envelope;

    // Falling slightly too fast (velocity or medium transition).
    if y_dist_diff_ex < 0.0
        && (envelope != LiftOffEnvelope::Normal || state.is_velocity_jump_phase())
        && (falling_envelope(
            y_distance,
            last_move.y_distance,
            state.last_friction_vertical,
            GRAVITY_ODD / 2.0,
        )
            // Moving out of lava with velocity.
            || last_move.from.extra_properties_valid
                && last_move.from.in_lava
                && enough_friction_envelope(
                    this_move,
                    last_move,
                    FRICTION_MEDIUM_LAVA,
                    0.0,
                    2.0 * GRAVITY_MAX,
                    4.0,
                ))
    {
        return exempt();
    }

    // Jump or decrease falling speed after a small gain, non-normal
    // envelope.
    if envelope != LiftOffEnvelope::Normal
        && y_dist_diff_ex > 0.0
        && y_distance > last_move.y_distance
        && y_distance < 0.84 * input.max_jump_gain
        && last_move.y_distance >= -GRAVITY_MAX - GRAVITY_MIN
        && last_move.y_distance < GRAVITY_MAX + GRAVITY_SPAN
    {
        return exempt();
    }

    // Moving out of water somehow.
    if envelope == LiftOffEnvelope::LimitLiquid || envelope == LiftOffEnvelope::LimitNearGround {
        // Too few decrease on the first moves out of water, ascending.
        if last_move.y_distance > 0.0
            && y_distance < last_move.y_distance - GRAVITY_MAX
            && y_dist_diff_ex > 0.0
            && y_dist_diff_ex < GRAVITY_MAX + GRAVITY_ODD
        {
            return exempt();
        }
        // Odd decrease as if still in water, moving out of it downwards.
        if last_move.y_distance < -2.0 * GRAVITY_MAX
            && state.jump_phase == 1
            && y_distance < -GRAVITY_MAX
            && y_distance > last_move.y_distance
            && (y_distance - last_move.y_distance * state.last_friction_vertical).abs()
                < GRAVITY_MAX
        {
            return exempt();
        }
        // Falling too slow, keeping roughly gravity-once speed.
        if state.jump_phase == 1
            && last_move.y_distance < -GRAVITY_ODD
            && last_move.y_distance > -GRAVITY_MAX - GRAVITY_MIN
            && (last_move.y_distance - y_distance).abs() < GRAVITY_SPAN
            && (y_distance < last_move.y_distance || y_distance < GRAVITY_MIN)
        {
            return exempt();
        }
        // Falling slightly too slow.
        if y_dist_diff_ex > 0.0 {
            // Around zero displacement.
            if last_move.y_distance > -2.0 * GRAVITY_MAX - GRAVITY_ODD
                && y_distance < last_move.y_distance
                && last_move.y_distance - y_distance < GRAVITY_MAX
                && last_move.y_distance - y_distance > GRAVITY_MIN / 4.0
            {
                return exempt();
            }
            // Moving out of liquid with velocity.
            if y_distance > 0.0
                && state.jump_phase == 1
                && y_dist_diff_ex < 4.0 * GRAVITY_MAX
                && y_distance < last_move.y_distance - GRAVITY_MAX
                && state.is_velocity_jump_phase()
            {
                return exempt();
            }
        }
    }
    RuleOutcome::NoMatch
}

// =============================================================================
// GRAVITY ANOMALY
// =============================================================================

/// Exemption around where gravity hits hardest, including head
/// obstruction. Called with varying preconditions, so it performs a full
/// envelope check itself. Needs valid last move data.
pub fn gravity_anomaly(
    input: &MoveInput,
    history: &MoveHistory,
    signals: &HostSignals,
    state: &mut EntityVerticalState,
) -> bool {
    let outcome = eval_gravity(input, history, signals, state);
    settle("gravity_anomaly", outcome, state)
}

// One clause per observed interaction; splitting the catalog would hide
// the evaluation order.
#[allow(clippy::too_many_lines)]
fn eval_gravity(
    input: &MoveInput,
    history: &MoveHistory,
    signals: &HostSignals,
    state: &EntityVerticalState,
) -> RuleOutcome {
    let this_move = history.current();
    let last_move = history.last();
    let y_distance = input.y_distance;
    let y_dist_change = input.y_dist_change;

    // Any envelope near zero displacement.
    if y_distance > -2.0 * GRAVITY_MAX - GRAVITY_MIN && y_distance < 2.0 * GRAVITY_MAX + GRAVITY_MIN
    {
        // Too big a chunk of change, but within reasonable bounds.
        if last_move.y_distance < 3.0 * GRAVITY_MAX + GRAVITY_MIN
            && y_dist_change < -GRAVITY_MIN
            && y_dist_change > -2.5 * GRAVITY_MAX - GRAVITY_MIN
        {
            return exempt();
        }
        // Transition to zero displacement, ascending.
        if last_move.y_distance > GRAVITY_ODD / 2.0
            && last_move.y_distance < GRAVITY_MIN
            && y_distance == 0.0
        {
            return exempt();
        }
        // Displacement inversion near zero.
        if last_move.y_distance <= GRAVITY_MAX + GRAVITY_MIN
            && last_move.y_distance > GRAVITY_ODD
            && y_distance < GRAVITY_ODD
            && y_distance > -2.0 * GRAVITY_MAX - GRAVITY_ODD / 2.0
        {
            return exempt();
        }
        // Head is obstructed.
        if last_move.y_distance >= 0.0
            && y_distance < GRAVITY_ODD
            && (this_move.head_obstructed || last_move.head_obstructed)
        {
            return exempt();
        }
        // Breaking the block underneath.
        if last_move.y_distance < 0.0
            && last_move.to.extra_properties_valid
            && last_move.to.on_ground
            && y_distance >= -GRAVITY_MAX - GRAVITY_SPAN
            && y_distance <= GRAVITY_MIN
        {
            return exempt();
        }
        // Slope with bounce blocks, also near ground.
        if last_move.y_distance < -GRAVITY_MAX
            && y_dist_change < -GRAVITY_ODD / 2.0
            && y_dist_change > -GRAVITY_MIN
        {
            return exempt();
        }
        // Near ground (bounce block).
        if last_move.y_distance == 0.0
            && y_distance < -GRAVITY_ODD / 2.5
            && y_distance > -GRAVITY_MIN
            && signals.to_on_ground_within_gravity_min
        {
            return exempt();
        }
        // Start to fall after touching ground somehow, possibly too slow.
        if (last_move.touched_ground || last_move.to.reset_cond)
            && last_move.y_distance <= GRAVITY_MIN
            && last_move.y_distance >= -GRAVITY_MAX
            && y_distance < last_move.y_distance - GRAVITY_SPAN
            && y_distance < GRAVITY_ODD
            && y_distance > last_move.y_distance - GRAVITY_MAX
        {
            return exempt();
        }
    }

    // With velocity.
    if state.is_velocity_jump_phase() {
        // Near-zero inversion with bounce blocks.
        if last_move.y_distance > GRAVITY_ODD
            && last_move.y_distance < GRAVITY_MAX + GRAVITY_MIN
            && y_distance <= -last_move.y_distance
            && y_distance > -last_move.y_distance - GRAVITY_MAX - GRAVITY_ODD
        {
            return exempt();
        }
        // Odd mini-decrease in a dirty phase.
        if last_move.y_distance < -0.204
            && y_distance > -0.26
            && y_dist_change > -GRAVITY_MIN
            && y_dist_change < -GRAVITY_ODD / 4.0
        {
            return exempt();
        }
        // Lots of decrease near zero.
        if last_move.y_distance < -GRAVITY_ODD
            && last_move.y_distance > -GRAVITY_MIN
            && y_distance > -2.0 * GRAVITY_MAX - 2.0 * GRAVITY_MIN
            && y_distance < -GRAVITY_MAX
        {
            return exempt();
        }
        // Odd decrease, less near zero.
        if y_dist_change > -GRAVITY_MIN
            && y_dist_change < -GRAVITY_ODD
            && last_move.y_distance < 0.5
            && last_move.y_distance > 0.4
        {
            return exempt();
        }
        // Small decrease after a high edge.
        if last_move.y_distance == 0.0 && y_distance > -GRAVITY_MIN && y_distance < -GRAVITY_ODD {
            return exempt();
        }
        // Too small but decent decrease moving up, marginal violation.
        if input.y_dist_diff_ex > 0.0
            && input.y_dist_diff_ex < 0.01
            && y_distance > GRAVITY_MAX
            && y_distance < last_move.y_distance - GRAVITY_MAX
        {
            return exempt();
        }
    }

    // Small distance to the set back: near-ground small decrease.
    if state.has_set_back()
        && (state.set_back_y() - this_move.from.y).abs() < 1.0
        && last_move.y_distance > GRAVITY_MAX
        && last_move.y_distance < 3.0 * GRAVITY_MAX
        && y_dist_change > -GRAVITY_MIN
        && y_dist_change < -GRAVITY_ODD
    {
        return exempt();
    }

    // Jump-effect specific band.
    if state.jump_amplifier > 0.0
        && last_move.y_distance < GRAVITY_MAX + GRAVITY_MIN / 2.0
        && last_move.y_distance > -2.0 * GRAVITY_MAX - 0.5 * GRAVITY_MIN
        && y_distance > -2.0 * GRAVITY_MAX - 2.0 * GRAVITY_MIN
        && y_distance < GRAVITY_MIN
        && y_dist_change < -GRAVITY_SPAN
    {
        return exempt();
    }

    // Another near-zero displacement case, without ground contact.
    if last_move.y_distance > -GRAVITY_MAX
        && last_move.y_distance < GRAVITY_MIN
        && !(last_move.touched_ground
            || last_move.to.extra_properties_valid && last_move.to.on_ground_or_reset_cond())
        && y_distance < last_move.y_distance - GRAVITY_MIN / 2.0
        && y_distance > last_move.y_distance - GRAVITY_MAX - 0.5 * GRAVITY_MIN
    {
        return exempt();
    }

    // Reduced jumping envelope.
    if state.lift_off_envelope != LiftOffEnvelope::Normal {
        // Wild-card: allow half gravity near zero displacement, excluded
        // for limit envelopes with non-trivial displacement or extra
        // block state data.
        if !(state.lift_off_envelope.is_limit()
            && (y_distance.abs() > 0.1 || signals.from_block_data > 3))
            && last_move.y_distance > -10.0 * GRAVITY_ODD / 2.0
            && last_move.y_distance < 10.0 * GRAVITY_ODD
            && y_distance < last_move.y_distance - GRAVITY_MIN / 2.0
            && y_distance > last_move.y_distance - GRAVITY_MAX
        {
            return exempt();
        }
        if !state.lift_off_envelope.is_limit()
            && last_move.y_distance < GRAVITY_MAX + GRAVITY_SPAN
            && last_move.y_distance > GRAVITY_ODD
            && y_distance > 0.4 * GRAVITY_ODD
            && y_distance - last_move.y_distance < -GRAVITY_ODD / 2.0
        {
            return exempt();
        }
        // Damaged in liquid.
        if last_move.y_distance < 0.2
            && last_move.y_distance >= 0.0
            && y_distance > -0.2
            && y_distance < 2.0 * GRAVITY_MIN
        {
            return exempt();
        }
        // Reset condition.
        if last_move.y_distance > 0.4 * GRAVITY_ODD
            && last_move.y_distance < GRAVITY_MIN
            && y_distance == 0.0
        {
            return exempt();
        }
        // Too small decrease right after lift-off.
        if state.jump_phase == 1
            && last_move.y_distance > -GRAVITY_ODD
            && last_move.y_distance <= GRAVITY_MAX + GRAVITY_SPAN
            && (y_distance - last_move.y_distance).abs() < 0.0114
        {
            return exempt();
        }
        // Any leaving-liquid move keeping its distance once.
        if state.jump_phase == 1
            && y_distance.abs() <= swim_base_speed_vertical(signals.swimming)
            && y_distance == last_move.y_distance
        {
            return exempt();
        }
    }
    RuleOutcome::NoMatch
}

// =============================================================================
// MULTI-TICK FRICTION
// =============================================================================

/// Odd ascending or slightly-descending behavior that only the trend over
/// two past moves explains (splash transitions, lava exits, velocity into
/// water). Needs two valid past moves.
pub fn multi_tick_friction(
    input: &MoveInput,
    history: &MoveHistory,
    state: &mut EntityVerticalState,
) -> bool {
    let outcome = eval_multi_tick_friction(input, history, state);
    settle("multi_tick_friction", outcome, state)
}

fn eval_multi_tick_friction(
    input: &MoveInput,
    history: &MoveHistory,
    state: &EntityVerticalState,
) -> RuleOutcome {
    let this_move = history.current();
    let last_move = history.last();
    let past_move = history.second_past();
    if !last_move.to.extra_properties_valid
        || !past_move.to_is_valid
        || !past_move.to.extra_properties_valid
    {
        return RuleOutcome::NoMatch;
    }
    let y_distance = input.y_distance;

    // First move into air, moving out of liquid.
    if (state.lift_off_envelope == LiftOffEnvelope::LimitNearGround
        || state.lift_off_envelope == LiftOffEnvelope::LimitLiquid)
        && state.jump_phase == 1
        && in_air(this_move)
    {
        // Towards ascending rather.
        if past_move.y_distance > last_move.y_distance - GRAVITY_MAX
            && last_move.y_distance > y_distance + GRAVITY_MAX
            && last_move.y_distance > 0.0
        {
            // Odd speed decrease bumping into a block sideways, having
            // moved through water.
            if input.y_dist_diff_ex < 0.0
                && splash_move(last_move, past_move)
                && (y_distance > last_move.y_distance / 5.0
                    || y_distance > -GRAVITY_MAX
                        && (past_move.y_distance - last_move.y_distance
                            - (last_move.y_distance - this_move.y_distance))
                            .abs()
                            < GRAVITY_MAX)
            {
                return exempt();
            }
            // Almost keep speed (gravity only), moving out of lava with
            // high velocity.
            if in_liquid(past_move)
                && leaving_liquid(last_move)
                && last_move.y_distance > 4.0 * GRAVITY_MAX
                && y_distance < last_move.y_distance - GRAVITY_MAX
                && y_distance > last_move.y_distance - 2.0 * GRAVITY_MAX
                && (last_move.y_distance - past_move.y_distance).abs() > 4.0 * GRAVITY_MAX
            {
                return exempt();
            }
        }
        // Less strict, descending rather: actual speed decrease due to
        // water.
        if past_move.y_distance < 0.0
            && last_move.y_distance - GRAVITY_MAX < y_distance
            && y_distance < 0.7 * last_move.y_distance
            && (past_move.y_distance + last_move.y_distance).abs() > 2.5
            && (splash_move(last_move, past_move) && past_move.y_distance > last_move.y_distance
                || in_liquid(past_move)
                    && leaving_liquid(last_move)
                    && past_move.y_distance * 0.7 > last_move.y_distance)
        {
            return exempt();
        }
        // Strong decrease after roughly keeping speed (hold direction
        // with velocity, descending).
        if y_distance < -0.5
            && past_move.y_distance < y_distance
            && last_move.y_distance < y_distance
            && (past_move.y_distance - last_move.y_distance).abs() < GRAVITY_ODD
            && y_distance < last_move.y_distance * 0.67
            && y_distance > last_move.y_distance * state.last_friction_vertical - GRAVITY_MIN
            && (splash_move_non_strict(last_move, past_move)
                || in_liquid(past_move) && leaving_liquid(last_move))
        {
            return exempt();
        }
    }

    // Normal envelope: velocity very fast into water above.
    if state.lift_off_envelope == LiftOffEnvelope::Normal
        && state.jump_phase == 1
        && in_air(this_move)
        && (splash_move_non_strict(last_move, past_move)
            || in_liquid(past_move) && leaving_liquid(last_move))
        && y_distance < last_move.y_distance - GRAVITY_MAX
        && y_distance > last_move.y_distance - 2.0 * GRAVITY_MAX
        && ((last_move.y_distance - past_move.y_distance).abs() > 4.0 * GRAVITY_MAX
            || past_move.y_distance > 3.0
                && last_move.y_distance > 3.0
                && (last_move.y_distance - past_move.y_distance).abs() < 2.0 * GRAVITY_MAX)
    {
        return exempt();
    }
    RuleOutcome::NoMatch
}

// =============================================================================
// FAST FALL
// =============================================================================

/// Exemptions for negative displacement falling faster than the model
/// allows.
pub fn fast_fall_exemptions(
    input: &MoveInput,
    history: &MoveHistory,
    signals: &HostSignals,
    config: &CheckConfig,
    state: &mut EntityVerticalState,
) -> bool {
    let outcome = eval_fast_fall(input, history, signals, config, state);
    settle("fast_fall", outcome, state)
}

fn eval_fast_fall(
    input: &MoveInput,
    history: &MoveHistory,
    signals: &HostSignals,
    config: &CheckConfig,
    state: &EntityVerticalState,
) -> RuleOutcome {
    let this_move = history.current();
    let last_move = history.last();
    let y_distance = input.y_distance;

    // Disregard not falling faster at some point: the reference constants
    // do not match the client exactly at high fall speed.
    if y_distance < -3.0
        && last_move.y_distance < -3.0
        && input.y_dist_diff_ex.abs() < 5.0 * GRAVITY_MAX
    {
        return exempt();
    }
    // Moving onto ground allows a shorter move.
    if input.reset_to
        && (input.y_dist_diff_ex > -GRAVITY_SPAN
            || !input.from_on_ground && !this_move.touched_ground && input.y_dist_change >= 0.0)
    {
        return exempt();
    }
    // Mirrored hit-ground case for excess displacement.
    if y_distance > last_move.y_distance - GRAVITY_MAX - GRAVITY_SPAN
        && (input.reset_to || this_move.touched_ground)
    {
        return exempt();
    }
    // Stairs and other cases moving off ground or ground-to-ground.
    if input.reset_from
        && y_distance >= -0.5
        && (y_distance > -0.31
            || (input.reset_to || signals.to_above_stairs) && last_move.y_distance < 0.0)
    {
        return exempt();
    }
    // Liquid-limited displacement inversion.
    if state.lift_off_envelope == LiftOffEnvelope::LimitLiquid
        && state.jump_phase == 1
        && last_move.to_is_valid
        && last_move.from.in_liquid
        && !(last_move.to.extra_properties_valid && last_move.to.in_liquid)
        && !input.reset_from
        && input.reset_to
        && last_move.y_distance > 0.0
        && last_move.y_distance < 0.5 * GRAVITY_ODD
        && y_distance < 0.0
        && (y_distance.abs() - last_move.y_distance).abs() < GRAVITY_SPAN / 2.0
    {
        return exempt();
    }
    // Head was blocked, thus a faster decrease than expected.
    if y_distance <= 0.0
        && y_distance > -GRAVITY_MAX - GRAVITY_SPAN
        && (this_move.head_obstructed
            || last_move.to_is_valid && last_move.head_obstructed && last_move.y_distance >= 0.0)
    {
        return exempt();
    }
    // Riptide grace window.
    if signals.riptiding || state.time_riptiding + config.riptide_grace_ms > input.now_ms {
        return exempt();
    }
    // False positives when breaking a block below too fast.
    if signals.swimming_supported
        && (state.jump_phase == 3
            && last_move.y_distance < -0.139
            && y_distance > -0.1
            && y_distance < 0.005
            || y_distance < -0.288
                && y_distance > -0.32
                && last_move.y_distance > -0.1
                && last_move.y_distance < 0.005)
    {
        return exempt();
    }
    // Active glide boost grace period.
    if state.fireworks_boost_duration > 0
        && state.keep_friction_tick < 0
        && last_move.to_is_valid
        && y_distance - last_move.y_distance > -0.7
    {
        return exempt_edit(StateEdit::ClearKeepFriction);
    }
    RuleOutcome::NoMatch
}

// =============================================================================
// SHORT MOVE
// =============================================================================

/// Exemptions for positive displacement falling short of the model
/// (negative deviation).
pub fn short_move_exemptions(
    input: &MoveInput,
    history: &MoveHistory,
    state: &mut EntityVerticalState,
) -> bool {
    let outcome = eval_short_move(input, history, state);
    settle("short_move", outcome, state)
}

fn eval_short_move(
    input: &MoveInput,
    history: &MoveHistory,
    state: &EntityVerticalState,
) -> RuleOutcome {
    let this_move = history.current();
    let last_move = history.last();
    let y_distance = input.y_distance;

    // Allow jumping less high unless within the strict envelope.
    if !input.strict_v_dist_rel
        || input.y_dist_diff_ex.abs() <= GRAVITY_SPAN
        || input.allowed_distance <= 0.2
    {
        return exempt();
    }
    // Too strong a decrease with velocity, liquid-aware ratio.
    if y_distance > 0.0
        && last_move.to_is_valid
        && last_move.y_distance > y_distance
        && last_move.y_distance - y_distance
            <= last_move.y_distance / if last_move.from.in_liquid { 1.76 } else { 4.0 }
        && state.is_velocity_jump_phase()
    {
        return exempt();
    }
    // Head is blocked, thus a shorter move.
    if this_move.head_obstructed
        || last_move.to_is_valid && last_move.head_obstructed && last_move.y_distance >= 0.0
    {
        return exempt();
    }
    // Bounce/knockback-sourced displacement in a bounded band during
    // early jump phases.
    if this_move.y_distance < 1.0
        && this_move.y_distance > 0.9
        && last_move.y_distance >= 1.5
        && state.jump_phase <= 2
        && last_move.ver_vel_used.is_some_and(|entry| {
            entry.has_flag(
                VelocityFlags::ORIGIN_BLOCK_MOVE.union(VelocityFlags::ORIGIN_BLOCK_BOUNCE),
            )
        })
    {
        return exempt();
    }
    // Active glide boost grace period.
    if state.fireworks_boost_duration > 0 && state.keep_friction_tick < 0 && last_move.to_is_valid
    {
        return exempt_edit(StateEdit::ClearKeepFriction);
    }
    RuleOutcome::NoMatch
}

// =============================================================================
// OUT OF ENVELOPE
// =============================================================================

/// Exemptions for moves longer than the model allows (positive
/// deviation). Needs last move data.
pub fn out_of_envelope_exemptions(
    input: &MoveInput,
    history: &MoveHistory,
    signals: &HostSignals,
    config: &CheckConfig,
    state: &mut EntityVerticalState,
) -> bool {
    let outcome = eval_out_of_envelope(input, history, signals, config, state);
    settle("out_of_envelope", outcome, state)
}

fn eval_out_of_envelope(
    input: &MoveInput,
    history: &MoveHistory,
    signals: &HostSignals,
    config: &CheckConfig,
    state: &EntityVerticalState,
) -> RuleOutcome {
    let this_move = history.current();
    let last_move = history.last();
    let y_distance = input.y_distance;

    // Coarse ground-distance workaround for descending moves.
    if y_distance < 0.0
        && last_move.y_distance < 0.0
        && input.y_dist_change > -GRAVITY_MAX
        && (signals.from_on_ground_coarse || signals.to_above_liquid_column)
    {
        return exempt();
    }
    // Special jump (water/edges/assume-ground), too small a decrease.
    if input.y_dist_diff_ex < GRAVITY_MIN / 2.0
        && state.jump_phase == 1
        && this_move.to.y - state.set_back_y()
            <= state.lift_off_envelope.max_jump_height(state.jump_amplifier)
        && last_move.y_distance <= input.max_jump_gain
        && y_distance > -GRAVITY_MAX
        && y_distance < last_move.y_distance
        && last_move.y_distance - y_distance > GRAVITY_ODD / 3.0
    {
        return exempt();
    }
    // Odd decrease with water.
    if input.y_dist_diff_ex < GRAVITY_MIN
        && state.jump_phase == 1
        && state.lift_off_envelope != LiftOffEnvelope::Normal
        && last_move.from.extra_properties_valid
        && last_move.from.in_liquid
        && last_move.y_distance < -GRAVITY_ODD / 2.0
        && last_move.y_distance > -GRAVITY_MAX - GRAVITY_SPAN
        && y_distance < last_move.y_distance - 0.001
    {
        return exempt();
    }
    // Tower-climbing artifact: the second move overshoots because the
    // first started slightly above the block top.
    if input.y_dist_diff_ex < 0.025
        && tower_jump_overshoot(
            y_distance,
            input.max_jump_gain,
            this_move,
            last_move,
            history,
            state,
        )
    {
        return exempt();
    }
    // Riptide grace window.
    if signals.riptiding || state.time_riptiding + config.riptide_grace_ms > input.now_ms {
        return exempt();
    }
    // Bed-exit grace window.
    if state.bed_leave_time + config.bed_leave_grace_ms > input.now_ms && y_distance < 0.45 {
        return exempt();
    }
    // Climbing while submerged is handled by the liquid checks.
    if last_move.from.in_liquid && last_move.from.on_climbable {
        return exempt();
    }
    // Ascending after descending, explained by a bounce-origin velocity.
    if y_distance > 0.0 && last_move.y_distance < 0.0 {
        if let RuleOutcome::Match(_) = eval_bounce(y_distance, history, state) {
            return RuleOutcome::Match(RuleMatch {
                workaround: Some(WorkaroundId::SlimeZeroJump),
                edit: Some(StateEdit::PinFrictionPhase),
            });
        }
    }
    // False positives when breaking blocks below too fast.
    if signals.swimming_supported
        && (state.jump_phase == 7 && y_distance < -0.02 && y_distance > -0.2
            || state.jump_phase == 3
                && last_move.y_distance < -0.139
                && y_distance > -0.1
                && y_distance < 0.005
            || y_distance < -0.288
                && y_distance > -0.32
                && last_move.y_distance > -0.1
                && last_move.y_distance < 0.005)
    {
        return exempt();
    }
    // Armed keep-friction marker: transitioning from a different move
    // model. Always exempt; the marker is either converted into a
    // friction jump-phase pin or cleared.
    if state.keep_friction_tick < 0 {
        if last_move.to_is_valid {
            if y_distance < 0.4 && last_move.y_distance == y_distance {
                return exempt_edit(StateEdit::ClearKeepFrictionAndPin);
            }
            return exempt();
        }
        return exempt_edit(StateEdit::ClearKeepFriction);
    }
    RuleOutcome::NoMatch
}

// =============================================================================
// SET BACK DISTANCE
// =============================================================================

/// Exemptions from the set-back distance check (total vertical distance
/// to the safe anchor rather than tick-over-tick displacement).
pub fn set_back_distance_exemptions(
    input: &MoveInput,
    history: &MoveHistory,
    signals: &HostSignals,
    config: &CheckConfig,
    total_violation: f64,
    state: &mut EntityVerticalState,
) -> bool {
    let outcome =
        eval_set_back_distance(input, history, signals, config, total_violation, state);
    settle("set_back_distance", outcome, state)
}

fn eval_set_back_distance(
    input: &MoveInput,
    history: &MoveHistory,
    signals: &HostSignals,
    config: &CheckConfig,
    total_violation: f64,
    state: &EntityVerticalState,
) -> RuleOutcome {
    let this_move = history.current();
    let last_move = history.last();
    let y_distance = input.y_distance;

    // Legitimate step on a ground-to-ground transition.
    if (input.from_on_ground || this_move.touched_ground_workaround || last_move.touched_ground)
        && input.to_on_ground
        && y_distance <= config.step_height
    {
        return exempt();
    }
    // Host teleport-to-air artifact.
    if skip_teleport_artifact(this_move, last_move, state) {
        return exempt();
    }
    // Riptide grace window.
    if signals.riptiding || state.time_riptiding + config.riptide_grace_ms > input.now_ms {
        return exempt();
    }
    // Waterlogged blocks keep the violation small under a liquid
    // envelope.
    if total_violation < config.set_back_liquid_tolerance
        && state.lift_off_envelope == LiftOffEnvelope::LimitLiquid
    {
        return exempt();
    }
    // Exiting a berry bush with friction-consistent descent is
    // recognized here but deliberately does not short-circuit; the
    // observed source falls through to not-exempt at this point.
    let _berry_bush_exit = last_move.from.in_berry_bush
        && !this_move.from.in_berry_bush
        && y_distance < -GRAVITY_MIN
        && y_distance > BUSH_SPEED_DESCEND;
    RuleOutcome::NoMatch
}

// =============================================================================
// GLIDE ANOMALY
// =============================================================================

/// Odd behavior with or after gliding: falling too slowly on two
/// descending moves. Available as an independent rule; not wired into
/// [`junction`].
#[must_use]
pub fn glide_anomaly(input: &MoveInput, history: &MoveHistory) -> bool {
    let this_move = history.current();
    let last_move = history.last();
    let past_move = history.second_past();

    if this_move.y_distance >= 0.0 || last_move.y_distance >= 0.0 || input.y_dist_diff_ex <= 0.0 {
        return false;
    }
    let y_dist_change = this_move.y_distance - last_move.y_distance;
    // Two-tick deceleration pattern summing near zero.
    if y_dist_change < 0.0 && past_move.to_is_valid && past_move.y_distance < 0.0 {
        let last_y_dist_change = last_move.y_distance - past_move.y_distance;
        if last_y_dist_change < 0.0
            && (y_dist_change + last_y_dist_change).abs() > GRAVITY_ODD / 2.0
        {
            return true;
        }
    }
    // Glide-descent signature, independent of the trend.
    glide_vertical_gain_envelope(this_move.y_distance, last_move.y_distance)
}

// =============================================================================
// JUNCTION
// =============================================================================

/// The entry point used by the main per-tick deviation check: evaluates
/// the in-air rule groups in order and reports exempt on the first match.
pub fn junction(
    input: &MoveInput,
    history: &MoveHistory,
    signals: &HostSignals,
    state: &mut EntityVerticalState,
) -> bool {
    // Jump after leaving a liquid near ground.
    if liquid_transition(input, history, state) {
        return true;
    }
    // Starting to fall / gravity effects.
    if gravity_anomaly(input, history, signals, state) {
        return true;
    }
    // Odd decrease after lift-off.
    if (input.y_dist_diff_ex > 0.0 || input.y_distance >= 0.0)
        && slope_after_lift_off(input, history, state)
    {
        return true;
    }
    // Behavior only the trend over two past moves explains.
    if multi_tick_friction(input, history, state) {
        return true;
    }
    // Jumping out of a berry bush with bush friction still applied.
    let this_move = history.current();
    let last_move = history.last();
    if last_move.from.in_berry_bush
        && !this_move.from.in_berry_bush
        && input.y_distance < -GRAVITY_MIN
        && input.y_distance > BUSH_SPEED_DESCEND
    {
        tracing::trace!(rule = "berry_bush_exit", "vertical move exempted");
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::move_record::{LocationSnapshot, MoveRecord};
    use vigil_core::velocity::VelocityEntry;

    fn input(y_distance: f64, y_dist_diff_ex: f64, y_dist_change: f64) -> MoveInput {
        MoveInput {
            y_distance,
            y_dist_diff_ex,
            y_dist_change,
            allowed_distance: y_distance - y_dist_diff_ex,
            max_jump_gain: 0.42,
            strict_v_dist_rel: true,
            reset_to: false,
            reset_from: false,
            from_on_ground: false,
            to_on_ground: false,
            now_ms: 100_000,
        }
    }

    fn valid_move(y_distance: f64) -> MoveRecord {
        MoveRecord {
            y_distance,
            to_is_valid: true,
            from: LocationSnapshot {
                extra_properties_valid: true,
                ..LocationSnapshot::default()
            },
            to: LocationSnapshot {
                extra_properties_valid: true,
                ..LocationSnapshot::default()
            },
            ..MoveRecord::default()
        }
    }

    fn history_of(past: f64, last: f64, current: f64) -> MoveHistory {
        let mut history = MoveHistory::new();
        history.push(valid_move(past));
        history.push(valid_move(last));
        history.push(valid_move(current));
        history
    }

    #[test]
    fn test_bounce_recognition_pins_friction_phase() {
        let mut state = EntityVerticalState::new();
        state.jump_phase = 4;
        state.vertical_velocity.add(VelocityEntry::new(
            0.5,
            VelocityFlags::ORIGIN_BLOCK_BOUNCE,
            2,
            1,
        ));
        let history = history_of(0.0, -0.2, 0.5);

        assert!(bounce_recognition(0.5, &history, &mut state));
        assert_eq!(state.jump_phase, 0);
        assert!(state.friction_jump_phase);
    }

    #[test]
    fn test_bounce_recognition_requires_bounce_origin() {
        let mut state = EntityVerticalState::new();
        state
            .vertical_velocity
            .add(VelocityEntry::new(0.5, VelocityFlags::ORIGIN_BLOCK_MOVE, 2, 1));
        let history = history_of(0.0, -0.2, 0.5);

        assert!(!bounce_recognition(0.5, &history, &mut state));
        assert!(!state.friction_jump_phase);
    }

    #[test]
    fn test_bounce_recognition_falls_back_to_last_displacement() {
        let mut state = EntityVerticalState::new();
        state.vertical_velocity.add(VelocityEntry::new(
            -0.2,
            VelocityFlags::ORIGIN_BLOCK_BOUNCE,
            2,
            1,
        ));
        let history = history_of(0.0, -0.2, 0.5);

        assert!(bounce_recognition(0.5, &history, &mut state));
    }

    #[test]
    fn test_pre_scan_counts_workaround_usage() {
        let mut state = EntityVerticalState::new();
        state.lift_off_envelope = LiftOffEnvelope::NoJump;
        state.jump_phase = 5;
        let history = history_of(0.0, -0.06, 0.0);

        let call = input(0.0, 0.0, 0.06);
        assert!(pre_scan_exemption(&call, &history, &mut state));
        assert_eq!(state.workarounds.count(WorkaroundId::WebZeroV1), 1);
        assert_eq!(state.workarounds.count(WorkaroundId::WebZeroV2), 0);
    }

    #[test]
    fn test_short_move_tolerance_boundary_is_inclusive() {
        let mut state = EntityVerticalState::new();
        let history = history_of(0.0, 0.3, 0.2);

        // |deviation| == GRAVITY_SPAN is within tolerance.
        let mut call = input(0.2, -GRAVITY_SPAN, -0.1);
        call.allowed_distance = 0.5;
        assert!(short_move_exemptions(&call, &history, &mut state));

        // Just beyond the tolerance, with nothing else applying.
        let mut call = input(0.2, -GRAVITY_SPAN - 1e-9, -0.1);
        call.allowed_distance = 0.5;
        assert!(!short_move_exemptions(&call, &history, &mut state));
    }

    #[test]
    fn test_short_move_non_strict_envelope_is_lenient() {
        let mut state = EntityVerticalState::new();
        let history = history_of(0.0, 0.3, 0.2);
        let mut call = input(0.2, -0.3, -0.1);
        call.strict_v_dist_rel = false;
        call.allowed_distance = 0.5;
        assert!(short_move_exemptions(&call, &history, &mut state));
    }

    #[test]
    fn test_out_of_envelope_keep_friction_converts_marker() {
        let mut state = EntityVerticalState::new();
        state.keep_friction_tick = -1;
        state.jump_phase = 5;
        let history = history_of(0.3, 0.3, 0.3);

        // Small unchanged displacement arms the pin and clears the marker.
        let call = input(0.3, 0.1, 0.0);
        assert!(out_of_envelope_exemptions(
            &call,
            &history,
            &HostSignals::default(),
            &CheckConfig::default(),
            &mut state
        ));
        assert_eq!(state.keep_friction_tick, 0);
        assert!(state.friction_jump_phase);
        assert_eq!(state.jump_phase, 0);
    }

    #[test]
    fn test_out_of_envelope_keep_friction_exempts_without_pin() {
        let mut state = EntityVerticalState::new();
        state.keep_friction_tick = -1;
        let history = history_of(0.3, 0.5, 0.3);

        // Displacement changed: still exempt, marker stays armed.
        let call = input(0.3, 0.1, -0.2);
        assert!(out_of_envelope_exemptions(
            &call,
            &history,
            &HostSignals::default(),
            &CheckConfig::default(),
            &mut state
        ));
        assert_eq!(state.keep_friction_tick, -1);
        assert!(!state.friction_jump_phase);
    }

    #[test]
    fn test_set_back_step_respects_config() {
        let mut state = EntityVerticalState::new();
        let mut history = history_of(0.0, 0.0, 0.5);
        history.current_mut().touched_ground_workaround = true;

        let mut call = input(0.5, 0.1, 0.5);
        call.to_on_ground = true;
        let config = CheckConfig::default();
        assert!(set_back_distance_exemptions(
            &call, &history, &HostSignals::default(), &config, 1.0, &mut state
        ));

        let tight = CheckConfig {
            step_height: 0.4,
            ..CheckConfig::default()
        };
        assert!(!set_back_distance_exemptions(
            &call, &history, &HostSignals::default(), &tight, 1.0, &mut state
        ));
    }

    fn bush_exit_history() -> MoveHistory {
        let mut history = MoveHistory::new();
        history.push(valid_move(0.0));
        let mut last = valid_move(-0.07);
        last.from.in_berry_bush = true;
        history.push(last);
        history.push(valid_move(-0.07));
        history
    }

    #[test]
    fn test_set_back_berry_bush_exit_falls_through() {
        let mut state = EntityVerticalState::new();
        let history = bush_exit_history();

        // The bush-exit condition holds but the rule still reports
        // not-exempt.
        let call = input(-0.07, 0.2, 0.0);
        assert!(!set_back_distance_exemptions(
            &call,
            &history,
            &HostSignals::default(),
            &CheckConfig::default(),
            1.0,
            &mut state
        ));
    }

    #[test]
    fn test_junction_recognizes_berry_bush_exit() {
        let mut state = EntityVerticalState::new();
        state.jump_phase = 4;
        let history = bush_exit_history();

        let call = input(-0.07, 0.2, 0.0);
        assert!(junction(&call, &history, &HostSignals::default(), &mut state));
    }

    #[test]
    fn test_glide_anomaly_two_tick_deceleration() {
        let history = history_of(-0.3, -0.4, -0.45);
        let call = input(-0.45, 0.1, -0.05);
        // Sum of the two decreases is 0.15 > GRAVITY_ODD / 2.
        assert!(glide_anomaly(&call, &history));
    }

    #[test]
    fn test_glide_anomaly_requires_descending_moves() {
        let history = history_of(-0.3, 0.1, -0.45);
        let call = input(-0.45, 0.1, -0.55);
        assert!(!glide_anomaly(&call, &history));
    }
}
