/*
Precomputed Envelope Curves
===========================

The engine does no arithmetic on the tick path. Each note-on builds the whole
attack/decay ramp up front and each note-off builds the release ramp; the
timer callback then only walks an index through a table.


Vocabulary
----------

  curve        An immutable table of DAC codes, one per tick. Never empty.

  full scale   The ceiling of the output range (4000 codes by default, a little
               under the 4095 the 12-bit DAC can take).

  truncation   Every sample is the exact rational value rounded toward zero.
               All values are non-negative, so this is a floor.


Attack/Decay
------------

    full ┐       ╱╲
         │      ╱  ╲
         │     ╱    ╲
     sus │    ╱      ╲___  (sustain is held by the engine, not stored)
         │   ╱
       0 └──╱──────────────→ tick
            |attack|decay|

  attack[i] = i * full / attack_len                       i in 0..attack_len
  decay[i]  = full + i * (sustain - full) / decay_len     i in 0..decay_len

Both ramps exclude their end point: the peak is the first decay sample and the
sustain level is what the engine emits once the table runs out. A segment
shorter than two ticks collapses to a single held value (full scale for the
attack, the sustain level for the decay), so the table is never shorter than
two samples.


Release
-------

  release[i] = start + i * (0 - start) / (release_len - 1)   i in 0..release_len

The release ramp includes both end points, so the last sample is exactly zero
no matter what level the note was released from. A release shorter than two
ticks is the single sample [0].
*/

use crate::dsp::params::{EnvelopeParameters, ParameterError};

/// An immutable run of output samples for one envelope segment.
///
/// Always holds at least one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve {
    samples: Box<[u16]>,
}

impl Curve {
    /// A one-sample curve holding `value`.
    pub fn hold(value: u16) -> Self {
        Self {
            samples: Box::new([value]),
        }
    }

    fn from_vec(samples: Vec<u16>) -> Self {
        debug_assert!(!samples.is_empty());
        Self {
            samples: samples.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Curves are never empty; provided for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u16> {
        self.samples.get(index).copied()
    }

    pub fn first(&self) -> u16 {
        self.samples[0]
    }

    pub fn last(&self) -> u16 {
        self.samples[self.samples.len() - 1]
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.samples
    }
}

/// Build the attack ramp followed by the decay ramp.
///
/// Length is `max(attack_length, 1) + max(decay_length, 1)`. A sustain level
/// above `full_scale` is rejected; every sample of the result lies in
/// `0..=full_scale`.
pub fn build_attack_decay(
    attack_length: u32,
    decay_length: u32,
    sustain_level: u16,
    full_scale: u16,
) -> Result<Curve, ParameterError> {
    if sustain_level > full_scale {
        return Err(ParameterError::SustainAboveFullScale {
            sustain: sustain_level,
            full_scale,
        });
    }
    Ok(attack_decay(attack_length, decay_length, sustain_level, full_scale))
}

/// Attack/decay table for a parameter set that has already been validated.
pub fn attack_decay_for(params: &EnvelopeParameters) -> Curve {
    attack_decay(
        params.attack_length(),
        params.decay_length(),
        params.sustain_level(),
        params.full_scale(),
    )
}

// Caller guarantees sustain_level <= full_scale
fn attack_decay(
    attack_length: u32,
    decay_length: u32,
    sustain_level: u16,
    full_scale: u16,
) -> Curve {
    let attack = attack_length as usize;
    let decay = decay_length as usize;
    let mut samples = Vec::with_capacity(attack.max(1) + decay.max(1));

    if attack_length < 2 {
        samples.push(full_scale);
    } else {
        let full = u64::from(full_scale);
        let steps = u64::from(attack_length);
        samples.extend((0..steps).map(|i| (i * full / steps) as u16));
    }

    if decay_length < 2 {
        samples.push(sustain_level);
    } else {
        let full = u64::from(full_scale);
        let drop = full - u64::from(sustain_level);
        let steps = u64::from(decay_length);
        // floor(full - i*drop/steps) == full - ceil(i*drop/steps)
        samples.extend((0..steps).map(|i| (full - (i * drop).div_ceil(steps)) as u16));
    }

    Curve::from_vec(samples)
}

/// Build a release ramp from `start_level` down to exactly zero.
pub fn build_release(start_level: u16, release_length: u32) -> Curve {
    if release_length < 2 {
        return Curve::hold(0);
    }

    let start = u64::from(start_level);
    let span = u64::from(release_length - 1);
    let samples = (0..u64::from(release_length))
        .map(|i| (start - (i * start).div_ceil(span)) as u16)
        .collect();

    Curve::from_vec(samples)
}
