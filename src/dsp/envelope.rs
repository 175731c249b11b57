use tracing::{debug, trace};

use crate::dsp::{
    curve::{attack_decay_for, build_release, Curve},
    params::{EnvelopeParameters, ParameterError},
};

/*
Tick-Driven ADSR Envelope
=========================

This module implements the envelope that drives the CV output DAC. Unlike an
audio-rate envelope it has no notion of seconds: one call to `tick()` is one
step along the shape, and the timer that calls it decides how long a step
lasts.


Vocabulary
----------

  tick        One invocation of the periodic timer callback. Every tick
              produces exactly one output sample.

  level       The last sample the engine emitted, in DAC codes
              (0..=full_scale).

  phase       Where the state machine is: Idle, AttackDecay, Sustain,
              Release or Done.

  cursor      Index into the table the current phase is walking.


The State Machine
-----------------

    ┌──────┐ trigger ┌─────────────┐ table done ┌─────────┐
    │ Idle │ ──────→ │ AttackDecay │ ─────────→ │ Sustain │
    └──────┘         └─────────────┘            └─────────┘
                       ↑    │ release                │ release
               trigger │    ↓                        ↓
                     ┌──────┐  last sample   ┌─────────┐
                     │ Done │ ←───────────── │ Release │
                     └──────┘                └─────────┘

trigger() is accepted from every phase and always restarts the attack/decay
table from index 0 (monophonic retrigger). release() only acts in AttackDecay
and Sustain; in the other phases there is nothing to release.


Release Start Level
-------------------

Release ramps down from whatever level the output was at when the key went
up, not from the sustain level. Releasing halfway up the attack therefore
falls from that point instead of jumping to the sustain level first.

The first Release tick always emits that captured level. For a release of two
or more ticks this is just the first entry of the table. A release shorter
than two ticks still gets that one tick at the captured level, followed by the
single zero sample, so the output never jumps to zero on the same tick the key
was released.


Timing
------

trigger() and release() only rewrite state; they never emit. The change is
observed on the next tick(). Moving from AttackDecay into Sustain happens on
the tick that emits the last table entry, so Sustain does not cost an extra
tick.
*/

/// The current phase of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopePhase {
    Idle,        // No note has been played yet, output 0
    AttackDecay, // Walking the precomputed attack/decay table
    Sustain,     // Holding the sustain level while the key is down
    Release,     // Walking the release table down to 0
    Done,        // Release finished, output 0 until the next trigger
}

pub struct EnvelopeEngine {
    // Latest accepted parameters; read on trigger() and release()
    params: EnvelopeParameters,
    // Sustain level of the note in flight (snapshot taken at trigger)
    sustain_level: u16,

    phase: EnvelopePhase,
    cursor: usize,
    level: u16,

    attack_decay: Option<Curve>,
    release: Option<Curve>,
    release_start: u16,
}

impl EnvelopeEngine {
    pub fn new(params: EnvelopeParameters) -> Self {
        Self {
            params,
            sustain_level: params.sustain_level(),
            phase: EnvelopePhase::Idle,
            cursor: 0,
            level: 0,
            attack_decay: None,
            release: None,
            release_start: 0,
        }
    }

    /// Validate and store a new parameter set.
    ///
    /// Takes effect on the next trigger() (release length on the next
    /// release()). On error nothing changes.
    pub fn set_parameters(
        &mut self,
        attack_length: u32,
        decay_length: u32,
        sustain_level: u16,
        release_length: u32,
        full_scale: u16,
    ) -> Result<(), ParameterError> {
        let params = EnvelopeParameters::new(
            attack_length,
            decay_length,
            sustain_level,
            release_length,
            full_scale,
        )?;
        self.update_parameters(params);
        Ok(())
    }

    /// Store an already validated parameter set.
    pub fn update_parameters(&mut self, params: EnvelopeParameters) {
        debug!(?params, "envelope parameters updated");
        self.params = params;
    }

    /// Start (or restart) the note from the top of a fresh attack/decay table.
    pub fn trigger(&mut self) {
        let p = self.params;
        let curve = attack_decay_for(&p);
        debug!(from = ?self.phase, samples = curve.len(), "envelope triggered");

        self.attack_decay = Some(curve);
        self.release = None;
        self.sustain_level = p.sustain_level();
        self.cursor = 0;
        self.phase = EnvelopePhase::AttackDecay;
    }

    /// Begin the release from the current output level.
    pub fn release(&mut self) {
        if !matches!(
            self.phase,
            EnvelopePhase::AttackDecay | EnvelopePhase::Sustain
        ) {
            return;
        }

        let start = self.level;
        let curve = build_release(start, self.params.release_length());
        debug!(from = ?self.phase, start, samples = curve.len(), "envelope released");

        self.release = Some(curve);
        self.release_start = start;
        self.cursor = 0;
        self.phase = EnvelopePhase::Release;
    }

    /// Advance by one tick and return the sample to write out.
    pub fn tick(&mut self) -> u16 {
        let sample = match self.phase {
            EnvelopePhase::Idle | EnvelopePhase::Done => 0,

            EnvelopePhase::AttackDecay => match &self.attack_decay {
                Some(curve) => {
                    let sample = curve.get(self.cursor).unwrap_or(self.sustain_level);
                    self.cursor += 1;
                    if self.cursor >= curve.len() {
                        self.enter(EnvelopePhase::Sustain);
                    }
                    sample
                }
                None => {
                    self.enter(EnvelopePhase::Sustain);
                    self.sustain_level
                }
            },

            EnvelopePhase::Sustain => self.sustain_level,

            EnvelopePhase::Release => match &self.release {
                Some(curve) => {
                    let last = curve.len() - 1;
                    let sample = if self.cursor == 0 {
                        self.release_start
                    } else {
                        curve.as_slice()[self.cursor.min(last)]
                    };

                    // A one-sample table still spends one tick at the start level
                    if self.cursor >= last.max(1) {
                        self.enter(EnvelopePhase::Done);
                    } else {
                        self.cursor += 1;
                    }
                    sample
                }
                None => {
                    self.enter(EnvelopePhase::Done);
                    0
                }
            },
        };

        self.level = sample;
        sample
    }

    /// Fill `out` with consecutive ticks.
    pub fn render(&mut self, out: &mut [u16]) {
        for sample in out.iter_mut() {
            *sample = self.tick();
        }
    }

    fn enter(&mut self, phase: EnvelopePhase) {
        trace!(from = ?self.phase, to = ?phase, "envelope phase change");
        self.phase = phase;
    }

    /// Back to Idle with the output at zero. Parameters are kept.
    pub fn reset(&mut self) {
        self.phase = EnvelopePhase::Idle;
        self.cursor = 0;
        self.level = 0;
        self.attack_decay = None;
        self.release = None;
        self.release_start = 0;
    }

    /// True while a note is sounding (attack, decay, sustain or release).
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, EnvelopePhase::Idle | EnvelopePhase::Done)
    }

    pub fn phase(&self) -> EnvelopePhase {
        self.phase
    }

    /// Position inside the table of the current phase.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The last sample emitted by tick().
    pub fn level(&self) -> u16 {
        self.level
    }

    pub fn parameters(&self) -> &EnvelopeParameters {
        &self.params
    }

    pub fn attack_decay_curve(&self) -> Option<&Curve> {
        self.attack_decay.as_ref()
    }

    pub fn release_curve(&self) -> Option<&Curve> {
        self.release.as_ref()
    }
}

impl Default for EnvelopeEngine {
    fn default() -> Self {
        Self::new(EnvelopeParameters::default())
    }
}
