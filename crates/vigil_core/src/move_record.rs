//! Per-tick move records and the rolling move history.
//!
//! The simulation collaborator creates one [`MoveRecord`] per tick and
//! pushes it into the entity's [`MoveHistory`]. The vertical checks read
//! the current move plus up to two past moves; a past move that was never
//! recorded is returned as an invalid record instead of failing.

use crate::velocity::VelocityEntry;

/// A position snapshot with its environment classification.
///
/// Fine-grained flags (`in_liquid`, `on_ground`, ...) are only meaningful
/// when `extra_properties_valid` is set; call sites that depend on them
/// for *past* moves gate on that flag explicitly, mirroring how the
/// records are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocationSnapshot {
    /// Vertical coordinate.
    pub y: f64,
    /// Whether the fine-grained flags below were computed.
    pub extra_properties_valid: bool,
    /// Inside a liquid (water or lava).
    pub in_liquid: bool,
    /// Inside lava.
    pub in_lava: bool,
    /// Standing on ground.
    pub on_ground: bool,
    /// On a climbable surface.
    pub on_climbable: bool,
    /// Inside a berry bush volume.
    pub in_berry_bush: bool,
    /// Headroom obstructed by a block above.
    pub head_obstructed: bool,
    /// The environment forces a reset classification (e.g. cobweb).
    pub reset_cond: bool,
}

impl LocationSnapshot {
    /// True if the snapshot is on ground or carries a reset classification.
    #[must_use]
    pub const fn on_ground_or_reset_cond(&self) -> bool {
        self.on_ground || self.reset_cond
    }
}

/// One recorded move: the displacement of a single simulated tick plus
/// the environment flags of both endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveRecord {
    /// Observed vertical displacement for this tick.
    pub y_distance: f64,
    /// Observed horizontal displacement for this tick.
    pub h_distance: f64,
    /// Snapshot of the move's origin.
    pub from: LocationSnapshot,
    /// Snapshot of the move's destination.
    pub to: LocationSnapshot,
    /// Confirmed ground contact during the move.
    pub touched_ground: bool,
    /// Looser heuristic variant of ground contact.
    pub touched_ground_workaround: bool,
    /// Head obstruction seen during the move.
    pub head_obstructed: bool,
    /// The velocity ledger entry consumed to explain this move, if any.
    pub ver_vel_used: Option<VelocityEntry>,
    /// Whether `to` was fully computed (false for provisional records).
    pub to_is_valid: bool,
}

impl MoveRecord {
    /// A record standing in for a move that was never made.
    ///
    /// All flags are unset and `to_is_valid` is false, so every clause
    /// that requires the move reports "does not apply".
    #[must_use]
    pub fn invalid() -> Self {
        Self::default()
    }
}

/// Depth of the rolling move window (current move plus past moves).
pub const HISTORY_DEPTH: usize = 4;

/// Fixed-depth rolling window of move records.
///
/// Index 0 is the current move; pushing evicts the oldest entry.
#[derive(Clone, Debug, Default)]
pub struct MoveHistory {
    moves: [MoveRecord; HISTORY_DEPTH],
}

impl MoveHistory {
    /// Creates an empty history; all slots report invalid moves.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the record for the current tick, evicting the oldest.
    pub fn push(&mut self, record: MoveRecord) {
        self.moves.rotate_right(1);
        self.moves[0] = record;
    }

    /// The current tick's move.
    #[must_use]
    pub const fn current(&self) -> &MoveRecord {
        &self.moves[0]
    }

    /// Mutable access to the current move, for the velocity-consumption
    /// acknowledgement performed by the simulation collaborator.
    pub fn current_mut(&mut self) -> &mut MoveRecord {
        &mut self.moves[0]
    }

    /// The previous tick's move.
    #[must_use]
    pub const fn last(&self) -> &MoveRecord {
        &self.moves[1]
    }

    /// The second-previous tick's move.
    #[must_use]
    pub const fn second_past(&self) -> &MoveRecord {
        &self.moves[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(y_distance: f64) -> MoveRecord {
        MoveRecord {
            y_distance,
            to_is_valid: true,
            ..MoveRecord::default()
        }
    }

    #[test]
    fn test_empty_history_reports_invalid_moves() {
        let history = MoveHistory::new();
        assert!(!history.current().to_is_valid);
        assert!(!history.last().to_is_valid);
        assert!(!history.second_past().to_is_valid);
    }

    #[test]
    fn test_push_shifts_window() {
        let mut history = MoveHistory::new();
        history.push(record(0.42));
        history.push(record(0.33));
        history.push(record(0.25));

        assert_eq!(history.current().y_distance, 0.25);
        assert_eq!(history.last().y_distance, 0.33);
        assert_eq!(history.second_past().y_distance, 0.42);
    }

    #[test]
    fn test_oldest_entry_is_evicted() {
        let mut history = MoveHistory::new();
        for i in 0..6 {
            history.push(record(f64::from(i)));
        }
        assert_eq!(history.current().y_distance, 5.0);
        assert_eq!(history.second_past().y_distance, 3.0);
    }

    #[test]
    fn test_ground_or_reset_cond() {
        let mut snapshot = LocationSnapshot::default();
        assert!(!snapshot.on_ground_or_reset_cond());
        snapshot.reset_cond = true;
        assert!(snapshot.on_ground_or_reset_cond());
        snapshot.reset_cond = false;
        snapshot.on_ground = true;
        assert!(snapshot.on_ground_or_reset_cond());
    }
}
