//! Shared state types for UI communication

use std::time::Duration;

use adsr_cv::{
    dsp::{EnvelopeParameters, EnvelopePhase},
    io::PitchCv,
};

/// Static state handed to the UI once at startup
#[derive(Clone, Copy, Debug)]
pub struct ScopeInit {
    /// Timer period of the voice thread
    pub tick_period: Duration,
    /// Shape the voice starts with
    pub parameters: EnvelopeParameters,
    /// Pitch CV calibration for the note readout
    pub pitch: PitchCv,
    /// Note played by the gate key
    pub note: u8,
}

/// Per-tick update from the timer thread (Copy, no allocations)
#[derive(Clone, Copy, Debug)]
pub struct VoiceUpdate {
    pub phase: EnvelopePhase,
    pub level: u16,
    pub gate: bool,
    pub note: Option<u8>,
}

impl Default for VoiceUpdate {
    fn default() -> Self {
        Self {
            phase: EnvelopePhase::Idle,
            level: 0,
            gate: false,
            note: None,
        }
    }
}
