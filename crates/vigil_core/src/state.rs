//! Per-entity vertical tracking state.
//!
//! One instance per tracked entity, owned exclusively by that entity's
//! tracking context. The vertical checks receive it by exclusive
//! reference; the only mutations they perform are the narrow, documented
//! ones (friction jump-phase pin, keep-friction clear, workaround
//! counting). Everything else is maintained by the simulation
//! collaborator between check invocations.

use crate::envelope::LiftOffEnvelope;
use crate::velocity::VelocityLedger;
use crate::workarounds::WorkaroundSet;

/// Vertical tracking state for one entity.
#[derive(Clone, Debug)]
pub struct EntityVerticalState {
    /// Ticks since the entity last stood on a non-reset surface.
    pub jump_phase: u32,
    /// Whether the jump phase was pinned by a bounce/slime interaction
    /// rather than a normal landing.
    pub friction_jump_phase: bool,
    /// Classification of the surface/medium the entity left.
    pub lift_off_envelope: LiftOffEnvelope,
    /// Last-applied vertical friction multiplier.
    pub last_friction_vertical: f64,
    /// Last known safe vertical anchor.
    pub set_back_y: Option<f64>,
    /// Active jump-boost effect level (0.0 when none).
    pub jump_amplifier: f64,
    /// Consecutive ticks with zero vertical displacement.
    pub zero_v_dist_repeat: u32,
    /// Whether an externally applied velocity effect is active for the
    /// current jump phase.
    pub velocity_jump_phase: bool,
    /// Pending externally applied vertical velocity effects.
    pub vertical_velocity: VelocityLedger,
    /// Wall-clock time (ms) of the last riptide activation.
    pub time_riptiding: u64,
    /// Remaining firework-boost ticks (glide acceleration).
    pub fireworks_boost_duration: i32,
    /// Keep-friction marker; negative while armed after a move-model
    /// transition, zero once cleared.
    pub keep_friction_tick: i32,
    /// Wall-clock time (ms) the entity left a bed.
    pub bed_leave_time: u64,
    /// Usage counters for the rate-tracked exemption branches.
    pub workarounds: WorkaroundSet,
}

impl Default for EntityVerticalState {
    fn default() -> Self {
        Self {
            jump_phase: 0,
            friction_jump_phase: false,
            lift_off_envelope: LiftOffEnvelope::Unknown,
            // The collaborator sets the medium friction each tick; until
            // then, no friction is assumed.
            last_friction_vertical: 1.0,
            set_back_y: None,
            jump_amplifier: 0.0,
            zero_v_dist_repeat: 0,
            velocity_jump_phase: false,
            vertical_velocity: VelocityLedger::new(),
            time_riptiding: 0,
            fireworks_boost_duration: 0,
            keep_friction_tick: 0,
            bed_leave_time: 0,
            workarounds: WorkaroundSet::default(),
        }
    }
}

impl EntityVerticalState {
    /// Creates a fresh state for a newly tracked entity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a safe vertical anchor is known.
    #[must_use]
    pub const fn has_set_back(&self) -> bool {
        self.set_back_y.is_some()
    }

    /// The safe vertical anchor, or `0.0` when none was recorded yet.
    /// Callers that must distinguish absence use [`Self::has_set_back`].
    #[must_use]
    pub fn set_back_y(&self) -> f64 {
        self.set_back_y.unwrap_or(0.0)
    }

    /// True if an externally applied velocity effect is active for the
    /// current jump phase.
    #[must_use]
    pub const fn is_velocity_jump_phase(&self) -> bool {
        self.velocity_jump_phase
    }

    /// Pins the jump phase to zero without requiring ground contact.
    ///
    /// Applied when a bounce/slime interaction resets the expected speed;
    /// idempotent once applied.
    pub fn set_friction_jump_phase(&mut self) {
        self.friction_jump_phase = true;
        self.jump_phase = 0;
    }

    /// Resets the jump phase on a confirmed landing.
    pub fn reset_jump_phase(&mut self) {
        self.jump_phase = 0;
        self.friction_jump_phase = false;
    }

    /// Advances the jump phase by one airborne tick.
    pub fn advance_jump_phase(&mut self) {
        self.jump_phase = self.jump_phase.saturating_add(1);
    }

    /// Clears the keep-friction marker.
    pub fn clear_keep_friction_tick(&mut self) {
        self.keep_friction_tick = 0;
    }

    /// Updates the consecutive zero-displacement counter for this tick.
    pub fn track_zero_v_dist(&mut self, y_distance: f64) {
        if y_distance == 0.0 {
            self.zero_v_dist_repeat = self.zero_v_dist_repeat.saturating_add(1);
        } else {
            self.zero_v_dist_repeat = 0;
        }
    }
}
