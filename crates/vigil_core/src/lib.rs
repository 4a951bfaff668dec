//! # VIGIL Core - The Data Model
//!
//! Per-entity movement tracking state consumed by the vertical checks:
//!
//! - **Move records**: one record per simulated tick, kept in a short
//!   rolling history (current move plus the preceding moves).
//! - **Velocity ledger**: externally applied vertical velocity (bounce,
//!   forced block moves), queried by magnitude with tolerance.
//! - **Entity state**: jump phase tracker, lift-off envelope, timers and
//!   the set-back anchor.
//!
//! ## Architecture Rules
//!
//! 1. **One state instance per entity** - No sharing between entities;
//!    the checks receive an exclusive reference.
//! 2. **No allocations per tick** - The history is a fixed ring, the
//!    ledger stays tiny.
//! 3. **Missing history never panics** - Absent past moves are reported
//!    as invalid records.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod move_record;
pub mod state;
pub mod velocity;
pub mod workarounds;

pub use config::CheckConfig;
pub use envelope::LiftOffEnvelope;
pub use error::{ConfigError, CoreResult};
pub use move_record::{LocationSnapshot, MoveHistory, MoveRecord};
pub use state::EntityVerticalState;
pub use velocity::{VelocityEntry, VelocityFlags, VelocityLedger, VELOCITY_TOLERANCE};
pub use workarounds::{WorkaroundId, WorkaroundSet};
