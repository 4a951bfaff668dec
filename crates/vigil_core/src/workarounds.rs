//! Workaround usage tracking.
//!
//! Every rate-tracked exemption branch is tagged with a [`WorkaroundId`].
//! When a branch fires, its counter is incremented, so diagnostics can
//! tell *which* exemption kept a move from being flagged and how often it
//! applies for a given entity.

/// Number of tracked workaround branches.
const WORKAROUND_COUNT: usize = 7;

/// Identifier of a rate-tracked exemption branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkaroundId {
    /// Zero displacement on early jump phase inside a zero-gravity volume.
    WebZeroV1,
    /// Displacement decreased too little inside a zero-gravity volume.
    WebMicroGravity1,
    /// Negative displacement held steady inside a zero-gravity volume.
    WebMicroGravity2,
    /// Repeated zero displacement while horizontally near-stationary.
    WebZeroV2,
    /// First zero-displacement tick after a bounce interaction.
    SlimeZeroJump,
    /// Overshoot band after a lost-ground lift-off.
    SlopeLostGround,
    /// Decrease band after passing through liquid on lift-off.
    SlopeLiquidPass,
}

impl WorkaroundId {
    const fn index(self) -> usize {
        match self {
            Self::WebZeroV1 => 0,
            Self::WebMicroGravity1 => 1,
            Self::WebMicroGravity2 => 2,
            Self::WebZeroV2 => 3,
            Self::SlimeZeroJump => 4,
            Self::SlopeLostGround => 5,
            Self::SlopeLiquidPass => 6,
        }
    }
}

/// Per-entity usage counters for the tracked workaround branches.
#[derive(Clone, Debug, Default)]
pub struct WorkaroundSet {
    counts: [u32; WORKAROUND_COUNT],
}

impl WorkaroundSet {
    /// Creates a set with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: [0; WORKAROUND_COUNT],
        }
    }

    /// Records one use of the given branch and reports whether the branch
    /// may apply. All branches are always available in this subsystem;
    /// the counting is the diagnostic output.
    pub fn use_workaround(&mut self, id: WorkaroundId) -> bool {
        self.counts[id.index()] = self.counts[id.index()].saturating_add(1);
        true
    }

    /// Number of times the given branch has fired since the last reset.
    #[must_use]
    pub const fn count(&self, id: WorkaroundId) -> u32 {
        self.counts[id.index()]
    }

    /// Resets all counters.
    pub fn reset(&mut self) {
        self.counts = [0; WORKAROUND_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_counts_per_branch() {
        let mut set = WorkaroundSet::new();
        assert!(set.use_workaround(WorkaroundId::WebZeroV1));
        assert!(set.use_workaround(WorkaroundId::WebZeroV1));
        assert!(set.use_workaround(WorkaroundId::SlimeZeroJump));

        assert_eq!(set.count(WorkaroundId::WebZeroV1), 2);
        assert_eq!(set.count(WorkaroundId::SlimeZeroJump), 1);
        assert_eq!(set.count(WorkaroundId::SlopeLostGround), 0);
    }

    #[test]
    fn test_reset_clears_counters() {
        let mut set = WorkaroundSet::new();
        set.use_workaround(WorkaroundId::WebMicroGravity1);
        set.reset();
        assert_eq!(set.count(WorkaroundId::WebMicroGravity1), 0);
    }
}
