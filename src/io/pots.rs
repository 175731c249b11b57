//! Front-panel potentiometers as a parameter source.
//!
//! Four pots sit on an MCP3008 10-bit ADC. The voice reads them on every
//! note-on, so turning a knob changes the next note, never the one in flight.

use tracing::warn;

use crate::dsp::params::{EnvelopeParameters, ParameterError};

/// Highest raw reading of a 10-bit ADC channel.
pub const ADC_MAX: u16 = 1023;

/// Supplies fresh envelope parameters before each trigger.
pub trait ParameterSource: Send {
    fn read(&mut self, full_scale: u16) -> Result<EnvelopeParameters, ParameterError>;
}

/// A fixed parameter set is its own source.
impl ParameterSource for EnvelopeParameters {
    fn read(&mut self, _full_scale: u16) -> Result<EnvelopeParameters, ParameterError> {
        Ok(*self)
    }
}

/// Raw ADC readings for the four ADSR pots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PotReadings {
    pub attack: u16,
    pub decay: u16,
    pub sustain: u16,
    pub release: u16,
}

impl PotReadings {
    /// Scale raw readings to envelope units.
    ///
    /// Lengths are `raw / 4` ticks (0..=255), the sustain level is `raw * 4`
    /// codes clamped to `full_scale`.
    pub fn to_parameters(&self, full_scale: u16) -> Result<EnvelopeParameters, ParameterError> {
        let raw = |v: u16| v.min(ADC_MAX);
        let sustain = (raw(self.sustain) * 4).min(full_scale);

        EnvelopeParameters::new(
            u32::from(raw(self.attack) / 4),
            u32::from(raw(self.decay) / 4),
            sustain,
            u32::from(raw(self.release) / 4),
            full_scale,
        )
    }
}

/// One raw reading per ADC channel.
pub trait AdcChannels {
    fn read_channel(&mut self, channel: u8) -> u16;
}

/// Which ADC channel each pot is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PotChannels {
    pub attack: u8,
    pub decay: u8,
    pub sustain: u8,
    pub release: u8,
}

impl Default for PotChannels {
    fn default() -> Self {
        Self {
            attack: 7,
            decay: 6,
            sustain: 5,
            release: 4,
        }
    }
}

/// The four ADSR pots read through an ADC.
pub struct PotBank<A> {
    adc: A,
    channels: PotChannels,
}

impl<A: AdcChannels> PotBank<A> {
    pub fn new(adc: A) -> Self {
        Self::with_channels(adc, PotChannels::default())
    }

    pub fn with_channels(adc: A, channels: PotChannels) -> Self {
        Self { adc, channels }
    }

    pub fn sample(&mut self) -> PotReadings {
        PotReadings {
            attack: self.adc.read_channel(self.channels.attack),
            decay: self.adc.read_channel(self.channels.decay),
            sustain: self.adc.read_channel(self.channels.sustain),
            release: self.adc.read_channel(self.channels.release),
        }
    }
}

impl<A: AdcChannels + Send> ParameterSource for PotBank<A> {
    fn read(&mut self, full_scale: u16) -> Result<EnvelopeParameters, ParameterError> {
        let readings = self.sample();
        readings.to_parameters(full_scale).inspect_err(|err| {
            warn!(?readings, %err, "rejected potentiometer readings");
        })
    }
}
