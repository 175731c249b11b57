//! Gate and pitch CV outputs driven by note events.
//!
//! The envelope DAC is written every tick; these only change when a note
//! starts or stops, so the voice writes them from its message handler.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::io::{pitch::PitchCv, sink::OutputSink};

/// A digital gate line (GPIO pin, LED, scope indicator).
pub trait GateOutput: Send {
    fn set_gate(&mut self, high: bool);
}

/// Share the gate level with another thread.
impl GateOutput for Arc<AtomicBool> {
    fn set_gate(&mut self, high: bool) {
        self.store(high, Ordering::Relaxed);
    }
}

/// Pitch DAC plus gate line, updated on note-on and note-off.
pub struct NoteOutputs {
    pitch: PitchCv,
    pitch_sink: Option<Box<dyn OutputSink + Send>>,
    gate: Option<Box<dyn GateOutput>>,
}

impl NoteOutputs {
    pub fn new(pitch: PitchCv) -> Self {
        Self {
            pitch,
            pitch_sink: None,
            gate: None,
        }
    }

    /// Where pitch codes go, typically a `DacSink` at [`PITCH_DAC_ADDR`].
    ///
    /// [`PITCH_DAC_ADDR`]: crate::io::dac::PITCH_DAC_ADDR
    pub fn pitch_sink(mut self, sink: impl OutputSink + Send + 'static) -> Self {
        self.pitch_sink = Some(Box::new(sink));
        self
    }

    pub fn gate(mut self, gate: impl GateOutput + 'static) -> Self {
        self.gate = Some(Box::new(gate));
        self
    }

    pub fn calibration(&self) -> &PitchCv {
        &self.pitch
    }

    /// Pitch first, then gate, so the note never opens on the old pitch.
    pub fn note_on(&mut self, note: u8) {
        if let Some(sink) = self.pitch_sink.as_mut() {
            sink.write(self.pitch.note_to_dac(note));
        }
        if let Some(gate) = self.gate.as_mut() {
            gate.set_gate(true);
        }
    }

    /// Drop the gate; the pitch CV holds its last value through the release.
    pub fn note_off(&mut self) {
        if let Some(gate) = self.gate.as_mut() {
            gate.set_gate(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_on_writes_pitch_then_raises_gate() {
        let pitch = PitchCv::default();
        let gate = Arc::new(AtomicBool::new(false));
        let mut outputs = NoteOutputs::new(pitch).gate(gate.clone());

        outputs.note_on(52);
        assert!(gate.load(Ordering::Relaxed));
        outputs.note_off();
        assert!(!gate.load(Ordering::Relaxed));
    }

    #[test]
    fn missing_outputs_are_skipped() {
        let mut outputs = NoteOutputs::new(PitchCv::default());
        outputs.note_on(60);
        outputs.note_off();
        assert_eq!(outputs.calibration(), &PitchCv::default());
    }
}
