//! Lift-off envelope classification.
//!
//! Classifies the surface or medium an entity last left, which bounds the
//! achievable jump gain and height and the gravity tolerance the vertical
//! checks apply. Set by the simulation collaborator at landing/lift-off
//! transitions only; the checks read it but never change it.

/// Extra jump gain granted per level of an active jump-boost effect.
const JUMP_AMPLIFIER_GAIN: f64 = 0.1;

/// Extra jump height granted by the first level of a jump-boost effect.
const JUMP_AMPLIFIER_HEIGHT_BASE: f64 = 0.6;

/// Classification of the maximum achievable jump for the surface left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LiftOffEnvelope {
    /// Normal ground lift-off.
    #[default]
    Normal,
    /// Lift-off out of a liquid body (strongly limited).
    LimitLiquid,
    /// Lift-off out of a liquid near ground (weakly limited).
    LimitNearGround,
    /// No jump possible at all (cobweb-like volumes).
    NoJump,
    /// Not yet classified.
    Unknown,
}

impl LiftOffEnvelope {
    const fn base_jump_gain(self) -> f64 {
        match self {
            Self::Normal | Self::LimitNearGround => 0.42,
            Self::LimitLiquid => 0.1,
            Self::NoJump | Self::Unknown => 0.0,
        }
    }

    const fn base_jump_height(self) -> f64 {
        match self {
            Self::Normal | Self::LimitNearGround => 1.35,
            Self::LimitLiquid => 0.27,
            Self::NoJump | Self::Unknown => 0.0,
        }
    }

    const fn base_jump_phase(self) -> u32 {
        match self {
            Self::Normal | Self::LimitNearGround => 6,
            Self::LimitLiquid => 3,
            Self::NoJump | Self::Unknown => 0,
        }
    }

    /// Maximum vertical gain of a single lift-off under this envelope.
    #[must_use]
    pub fn max_jump_gain(self, jump_amplifier: f64) -> f64 {
        if jump_amplifier > 0.0 {
            self.base_jump_gain() + JUMP_AMPLIFIER_GAIN * jump_amplifier
        } else {
            self.base_jump_gain()
        }
    }

    /// Maximum height above the lift-off point under this envelope.
    #[must_use]
    pub fn max_jump_height(self, jump_amplifier: f64) -> f64 {
        if jump_amplifier > 0.0 {
            self.base_jump_height() + JUMP_AMPLIFIER_HEIGHT_BASE + (jump_amplifier - 1.0)
        } else {
            self.base_jump_height()
        }
    }

    /// Maximum number of ascending jump-phase ticks under this envelope.
    #[must_use]
    pub fn max_jump_phase(self, jump_amplifier: f64) -> u32 {
        let base = self.base_jump_phase();
        if jump_amplifier > 0.0 {
            let scaled = f64::from(base) * (1.0 + jump_amplifier);
            scaled as u32
        } else {
            base
        }
    }

    /// True for the liquid-limited envelopes.
    #[must_use]
    pub const fn is_limit(self) -> bool {
        matches!(self, Self::LimitLiquid | Self::LimitNearGround)
    }
}
