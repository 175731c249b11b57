//! Envelope shape parameters and their validation.
//!
//! Lengths are counted in ticks, levels in DAC codes. Everything that reaches
//! the engine has already passed through [`EnvelopeParameters::new`] (or
//! [`EnvelopeParameters::from_signed`]), so the tick path never has to check
//! ranges again.

use std::fmt;

use crate::DEFAULT_FULL_SCALE;

/// Which envelope segment a length belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    Attack,
    Decay,
    Release,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Attack => write!(f, "attack"),
            Stage::Decay => write!(f, "decay"),
            Stage::Release => write!(f, "release"),
        }
    }
}

/// Rejected parameter sets. The previous parameters stay in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Sustain level is above the output ceiling
    SustainAboveFullScale { sustain: u16, full_scale: u16 },
    /// Full scale must be at least 1
    ZeroFullScale,
    /// A length was supplied as a negative number
    NegativeLength { stage: Stage, value: i64 },
    /// A level was supplied as a negative number
    NegativeLevel { value: i64 },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::SustainAboveFullScale {
                sustain,
                full_scale,
            } => write!(
                f,
                "sustain level {} exceeds full scale {}",
                sustain, full_scale
            ),
            ParameterError::ZeroFullScale => write!(f, "full scale must be positive"),
            ParameterError::NegativeLength { stage, value } => {
                write!(f, "{} length must not be negative (got {})", stage, value)
            }
            ParameterError::NegativeLevel { value } => {
                write!(f, "level must not be negative (got {})", value)
            }
        }
    }
}

impl std::error::Error for ParameterError {}

/// The four ADSR controls plus the output ceiling.
///
/// Invariant: `sustain_level <= full_scale` and `full_scale > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvelopeParameters {
    attack_length: u32,
    decay_length: u32,
    sustain_level: u16,
    release_length: u32,
    full_scale: u16,
}

impl EnvelopeParameters {
    pub fn new(
        attack_length: u32,
        decay_length: u32,
        sustain_level: u16,
        release_length: u32,
        full_scale: u16,
    ) -> Result<Self, ParameterError> {
        if full_scale == 0 {
            return Err(ParameterError::ZeroFullScale);
        }
        if sustain_level > full_scale {
            return Err(ParameterError::SustainAboveFullScale {
                sustain: sustain_level,
                full_scale,
            });
        }

        Ok(Self {
            attack_length,
            decay_length,
            sustain_level,
            release_length,
            full_scale,
        })
    }

    /// Validate values coming from a signed source (ADC arithmetic, UI
    /// counters). Negative lengths and levels are rejected rather than
    /// wrapped.
    pub fn from_signed(
        attack_length: i64,
        decay_length: i64,
        sustain_level: i64,
        release_length: i64,
        full_scale: i64,
    ) -> Result<Self, ParameterError> {
        let attack = signed_length(Stage::Attack, attack_length)?;
        let decay = signed_length(Stage::Decay, decay_length)?;
        let release = signed_length(Stage::Release, release_length)?;

        if full_scale <= 0 {
            return Err(ParameterError::ZeroFullScale);
        }
        if sustain_level < 0 {
            return Err(ParameterError::NegativeLevel {
                value: sustain_level,
            });
        }

        let full_scale = u16::try_from(full_scale).unwrap_or(u16::MAX);
        if sustain_level > i64::from(full_scale) {
            return Err(ParameterError::SustainAboveFullScale {
                sustain: u16::try_from(sustain_level).unwrap_or(u16::MAX),
                full_scale,
            });
        }

        // sustain_level <= full_scale <= u16::MAX at this point
        Self::new(attack, decay, sustain_level as u16, release, full_scale)
    }

    pub fn attack_length(&self) -> u32 {
        self.attack_length
    }

    pub fn decay_length(&self) -> u32 {
        self.decay_length
    }

    pub fn sustain_level(&self) -> u16 {
        self.sustain_level
    }

    pub fn release_length(&self) -> u32 {
        self.release_length
    }

    pub fn full_scale(&self) -> u16 {
        self.full_scale
    }

    /// Copy with a different attack length.
    pub fn with_attack(self, attack_length: u32) -> Self {
        Self {
            attack_length,
            ..self
        }
    }

    /// Copy with a different decay length.
    pub fn with_decay(self, decay_length: u32) -> Self {
        Self {
            decay_length,
            ..self
        }
    }

    /// Copy with a different sustain level, clamped to full scale.
    pub fn with_sustain(self, sustain_level: u16) -> Self {
        Self {
            sustain_level: sustain_level.min(self.full_scale),
            ..self
        }
    }

    /// Copy with a different output ceiling (at least 1); the sustain level
    /// is clamped to it.
    pub fn with_full_scale(self, full_scale: u16) -> Self {
        let full_scale = full_scale.max(1);
        Self {
            full_scale,
            sustain_level: self.sustain_level.min(full_scale),
            ..self
        }
    }

    /// Copy with a different release length.
    pub fn with_release(self, release_length: u32) -> Self {
        Self {
            release_length,
            ..self
        }
    }
}

impl Default for EnvelopeParameters {
    fn default() -> Self {
        Self {
            attack_length: 30,
            decay_length: 20,
            sustain_level: 1500,
            release_length: 40,
            full_scale: DEFAULT_FULL_SCALE,
        }
    }
}

fn signed_length(stage: Stage, value: i64) -> Result<u32, ParameterError> {
    if value < 0 {
        return Err(ParameterError::NegativeLength { stage, value });
    }
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}
