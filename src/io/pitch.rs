//! MIDI note to 1V/octave pitch CV.
//!
//! The DAC is referenced to the USB supply, which is nominally 5V but in
//! practice somewhere between 4.5V and 5.5V. A calibration trim pot selects
//! the real reference so one semitone lands on 83.33mV.

use crate::DAC_MAX;

/// Millivolts per semitone at 1V/octave.
const SEMITONE_MV: f32 = 83.33;
/// Lowest reference voltage the calibration range covers.
const VREF_MIN: f32 = 4.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchCv {
    /// MIDI note that maps to 0V.
    pub lowest_note: u8,
    /// Raw 16-bit calibration reading; 0 = 4.5V reference, 65535 ≈ 5.5V.
    pub calibration: u16,
}

impl PitchCv {
    pub fn new(lowest_note: u8, calibration: u16) -> Self {
        Self {
            lowest_note,
            calibration,
        }
    }

    /// Reference voltage selected by the calibration reading.
    pub fn reference_voltage(&self) -> f32 {
        VREF_MIN + f32::from(self.calibration) / 65536.0
    }

    /// DAC code for `note`. Note 0 and notes below `lowest_note` give 0V.
    pub fn note_to_dac(&self, note: u8) -> u16 {
        if note == 0 {
            return 0;
        }

        let codes_per_mv = 4096.0 / self.reference_voltage() / 1000.0;
        let semitone = SEMITONE_MV * codes_per_mv;
        let code = (f32::from(note) - f32::from(self.lowest_note)) * semitone;

        if code <= 0.0 {
            0
        } else {
            (code as u32).min(u32::from(DAC_MAX)) as u16
        }
    }
}

impl Default for PitchCv {
    fn default() -> Self {
        Self::new(40, 0)
    }
}
