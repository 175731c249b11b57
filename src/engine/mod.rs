//! Timing and configuration around the envelope.
//!
//! The engine is period-agnostic: it counts ticks, and the [`TimerDriver`]
//! decides how long a tick is. [`EngineConfig`] gathers the knobs a device
//! is built with.

pub mod runner;
pub mod timer;

use std::time::Duration;

pub use runner::{spawn_voice, spawn_voice_with, VoiceThread};
pub use timer::{CountedTimer, PeriodicTimer, StopHandle, TickControl, TimerDriver};

use crate::{dsp::params::EnvelopeParameters, DEFAULT_FULL_SCALE};

/// Default envelope timer period.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(2);
/// Default capacity of the voice control queue.
pub const DEFAULT_QUEUE_SIZE: usize = 64;

/// Startup configuration for one envelope voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Time between ticks
    pub tick_period: Duration,
    /// Capacity of the event queue between the MIDI side and the timer side
    pub queue_size: usize,
    /// Shape used until the first parameter update (carries full scale)
    pub parameters: EnvelopeParameters,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            queue_size: DEFAULT_QUEUE_SIZE,
            parameters: EnvelopeParameters::default(),
        }
    }

    /// Set the timer period (zero is bumped to one microsecond)
    pub fn tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period.max(Duration::from_micros(1));
        self
    }

    /// Set the output ceiling, clamping the sustain level to it
    pub fn full_scale(mut self, full_scale: u16) -> Self {
        self.parameters = self.parameters.with_full_scale(full_scale);
        self
    }

    /// Set the control queue capacity (at least one slot)
    pub fn queue_size(mut self, size: usize) -> Self {
        self.queue_size = size.max(1);
        self
    }

    /// Set the initial envelope shape
    pub fn parameters(mut self, parameters: EnvelopeParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Ticks per second at the configured period.
    pub fn tick_rate(&self) -> f64 {
        1.0 / self.tick_period.as_secs_f64()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_hardware() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_period, Duration::from_millis(2));
        assert_eq!(config.parameters.full_scale(), DEFAULT_FULL_SCALE);
        assert!((config.tick_rate() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn lowering_full_scale_clamps_sustain() {
        let config = EngineConfig::default().full_scale(1000);
        assert_eq!(config.parameters.full_scale(), 1000);
        assert_eq!(config.parameters.sustain_level(), 1000);
    }

    #[test]
    fn degenerate_values_are_bumped() {
        let config = EngineConfig::default()
            .queue_size(0)
            .tick_period(Duration::ZERO)
            .full_scale(0);
        assert_eq!(config.queue_size, 1);
        assert!(config.tick_period > Duration::ZERO);
        assert_eq!(config.parameters.full_scale(), 1);
    }
}
