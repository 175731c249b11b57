use tracing::{debug, warn};

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, RingBuffer};

#[cfg(feature = "rtrb")]
use crate::synth::handle::VoiceHandle;
use crate::{
    dsp::{
        envelope::{EnvelopeEngine, EnvelopePhase},
        params::EnvelopeParameters,
    },
    engine::EngineConfig,
    io::{gate::NoteOutputs, pots::ParameterSource, sink::OutputSink},
    synth::message::{MessageReceiver, VoiceMessage},
};

/// The single voice of the converter: one envelope, one gate, one note.
///
/// All note events reach the voice through its receiver and are applied at
/// the start of a tick, so the timer callback never sees a half-finished
/// trigger or release.
pub struct MonoVoice<R> {
    engine: EnvelopeEngine,
    rx: R,
    source: Option<Box<dyn ParameterSource>>,
    outputs: Option<NoteOutputs>,
    full_scale: u16,
    gate: bool,
    note: Option<u8>,
    velocity: u8,
}

impl<R: MessageReceiver> MonoVoice<R> {
    pub fn new(params: EnvelopeParameters, rx: R) -> Self {
        Self {
            engine: EnvelopeEngine::new(params),
            rx,
            source: None,
            outputs: None,
            full_scale: params.full_scale(),
            gate: false,
            note: None,
            velocity: 0,
        }
    }

    pub fn from_config(config: &EngineConfig, rx: R) -> Self {
        Self::new(config.parameters, rx)
    }

    /// Read parameters from `source` on every note-on.
    pub fn with_parameter_source(mut self, source: impl ParameterSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Drive pitch CV and gate from note events.
    pub fn with_note_outputs(mut self, outputs: NoteOutputs) -> Self {
        self.outputs = Some(outputs);
        self
    }

    /// Apply pending events, advance the envelope one tick and write the
    /// sample to `sink`.
    pub fn tick(&mut self, sink: &mut impl OutputSink) -> u16 {
        while let Some(msg) = self.rx.pop() {
            self.handle(msg);
        }

        let sample = self.engine.tick();
        sink.write(sample);
        sample
    }

    fn handle(&mut self, msg: VoiceMessage) {
        match msg {
            VoiceMessage::NoteOn { note, velocity } => {
                self.refresh_parameters();
                self.gate = true;
                self.note = Some(note);
                self.velocity = velocity;
                if let Some(outputs) = self.outputs.as_mut() {
                    outputs.note_on(note);
                }
                self.engine.trigger();
            }
            VoiceMessage::NoteOff { note } => {
                // A late note-off from a key that was already replaced must
                // not cut the sounding note
                if self.note == Some(note) {
                    self.close_gate();
                } else {
                    debug!(note, current = ?self.note, "ignoring stale note off");
                }
            }
            VoiceMessage::SetParameters(params) => {
                self.full_scale = params.full_scale();
                self.engine.update_parameters(params);
            }
            VoiceMessage::AllNotesOff => self.close_gate(),
        }
    }

    fn close_gate(&mut self) {
        self.gate = false;
        if let Some(outputs) = self.outputs.as_mut() {
            outputs.note_off();
        }
        self.engine.release();
    }

    fn refresh_parameters(&mut self) {
        let Some(source) = self.source.as_mut() else {
            return;
        };

        match source.read(self.full_scale) {
            Ok(params) => self.engine.update_parameters(params),
            Err(err) => warn!(%err, "keeping previous envelope parameters"),
        }
    }

    /// True while the key is held.
    pub fn gate(&self) -> bool {
        self.gate
    }

    /// Last note played; kept through the release so pitch CV does not jump.
    pub fn note(&self) -> Option<u8> {
        self.note
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn phase(&self) -> EnvelopePhase {
        self.engine.phase()
    }

    pub fn level(&self) -> u16 {
        self.engine.level()
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_active()
    }

    pub fn engine(&self) -> &EnvelopeEngine {
        &self.engine
    }
}

#[cfg(feature = "rtrb")]
impl MonoVoice<Consumer<VoiceMessage>> {
    /// Build a voice together with the handle that feeds it.
    pub fn with_queue(config: &EngineConfig) -> (Self, VoiceHandle) {
        let (tx, rx) = RingBuffer::<VoiceMessage>::new(config.queue_size);
        let voice = Self::from_config(config, rx);
        let handle = VoiceHandle::new(tx, config.parameters.full_scale());
        (voice, handle)
    }
}
