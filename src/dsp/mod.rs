//! Envelope math and the tick-driven state machine.
//!
//! Nothing in here touches hardware or blocks. Curves are built on note
//! events; the tick path only indexes into them, so the engine can sit
//! directly inside a timer callback.

/// Attack/decay and release table construction.
pub mod curve;
/// ADSR state machine advanced one sample per tick.
pub mod envelope;
/// Shape parameters and their validation.
pub mod params;

pub use curve::{attack_decay_for, build_attack_decay, build_release, Curve};
pub use envelope::{EnvelopeEngine, EnvelopePhase};
pub use params::{EnvelopeParameters, ParameterError, Stage};
