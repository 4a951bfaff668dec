//! # VIGIL Vertical - The Exemption Cascade
//!
//! Decides, once per simulated tick, whether an entity's observed
//! vertical displacement is consistent with the reference gravity model
//! or matches a recognized environment-induced deviation.
//!
//! The crate is split into two layers:
//!
//! - [`envelope`]: the named tolerance constants of the reference model
//!   and the stateless classifiers built on them.
//! - [`rules`]: the ordered exemption groups evaluated over the rolling
//!   move history, and the [`rules::junction`] entry point combining
//!   them.
//!
//! ## Architecture Rules
//!
//! 1. **First match wins** - Each rule group short-circuits on its first
//!    applicable clause; "not exempt" is the universal default.
//! 2. **Pure evaluation, explicit edits** - Clause evaluation never
//!    mutates; a matching clause *requests* at most one state edit, which
//!    the entry point applies.
//! 3. **No panics on missing history** - Absent past moves degrade to
//!    "does not apply", never to an error.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod envelope;
pub mod rules;

pub use rules::{HostSignals, MoveInput, RuleMatch, RuleOutcome, StateEdit};
