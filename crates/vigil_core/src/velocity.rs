//! The velocity ledger: externally applied vertical velocity.
//!
//! When the simulation applies vertical velocity to an entity from the
//! outside (a bounce block, a forced block move, knockback), it queues an
//! entry here. The vertical checks only *peek* the ledger to explain an
//! otherwise-anomalous displacement; consumption bookkeeping is performed
//! by the simulation collaborator after a match.

/// Tolerance for matching a ledger entry against an observed displacement.
pub const VELOCITY_TOLERANCE: f64 = 0.0625;

/// Origin flags for a velocity entry, tagged by cause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VelocityFlags(u32);

impl VelocityFlags {
    /// No origin information.
    pub const NONE: Self = Self(0);
    /// Velocity originated from a bounce block (slime-like).
    pub const ORIGIN_BLOCK_BOUNCE: Self = Self(1);
    /// Velocity originated from a forced block move (piston-like).
    pub const ORIGIN_BLOCK_MOVE: Self = Self(1 << 1);

    /// Combines two flag sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True if any of the given flags is set.
    #[must_use]
    pub const fn contains_any(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

/// One queued vertical velocity effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityEntry {
    /// Vertical component of the applied velocity.
    pub vertical: f64,
    /// Origin of the velocity.
    pub flags: VelocityFlags,
    /// Remaining uses before the entry is evicted.
    pub act_count: u32,
    /// Tick at which the entry was queued, for expiry.
    pub tick: u64,
}

impl VelocityEntry {
    /// Creates a new entry.
    #[must_use]
    pub const fn new(vertical: f64, flags: VelocityFlags, act_count: u32, tick: u64) -> Self {
        Self {
            vertical,
            flags,
            act_count,
            tick,
        }
    }

    /// True if any of the given origin flags is set on this entry.
    #[must_use]
    pub const fn has_flag(&self, flags: VelocityFlags) -> bool {
        self.flags.contains_any(flags)
    }
}

/// Short-lived FIFO queue of pending vertical velocity effects.
#[derive(Clone, Debug, Default)]
pub struct VelocityLedger {
    entries: Vec<VelocityEntry>,
}

impl VelocityLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Queues a new velocity effect.
    pub fn add(&mut self, entry: VelocityEntry) {
        self.entries.push(entry);
    }

    /// Looks up the first entry whose vertical component matches `amount`
    /// within [`VELOCITY_TOLERANCE`] and whose remaining-use count lies in
    /// `min_act..=max_act`. Does not mutate the ledger.
    #[must_use]
    pub fn peek(&self, amount: f64, min_act: u32, max_act: u32) -> Option<&VelocityEntry> {
        self.entries.iter().find(|entry| {
            (entry.vertical - amount).abs() <= VELOCITY_TOLERANCE
                && entry.act_count >= min_act
                && entry.act_count <= max_act
        })
    }

    /// Consumes one use of the first entry matching `amount`, returning a
    /// copy of the entry as consumed. Entries reaching zero remaining uses
    /// are evicted. Called by the simulation collaborator, not the checks.
    pub fn consume(&mut self, amount: f64) -> Option<VelocityEntry> {
        let index = self.entries.iter().position(|entry| {
            (entry.vertical - amount).abs() <= VELOCITY_TOLERANCE && entry.act_count > 0
        })?;
        let consumed = {
            let entry = &mut self.entries[index];
            entry.act_count -= 1;
            *entry
        };
        if consumed.act_count == 0 {
            self.entries.remove(index);
        }
        Some(consumed)
    }

    /// Evicts entries queued more than `max_age` ticks ago.
    pub fn tick_expire(&mut self, now: u64, max_age: u64) {
        self.entries
            .retain(|entry| now.saturating_sub(entry.tick) <= max_age);
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no effects are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
