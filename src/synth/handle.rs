use std::fmt;

use rtrb::Producer;
use tracing::{debug, warn};

use crate::{
    dsp::params::{EnvelopeParameters, ParameterError},
    synth::message::VoiceMessage,
};

/// Why an event could not be handed to the voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleError {
    /// The control queue is full; the tick thread is not draining it
    QueueFull,
    /// The parameter set was rejected before it was queued
    InvalidParameter(ParameterError),
}

impl fmt::Display for HandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleError::QueueFull => write!(f, "voice control queue is full"),
            HandleError::InvalidParameter(err) => write!(f, "invalid parameter: {}", err),
        }
    }
}

impl std::error::Error for HandleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandleError::InvalidParameter(err) => Some(err),
            HandleError::QueueFull => None,
        }
    }
}

impl From<ParameterError> for HandleError {
    fn from(err: ParameterError) -> Self {
        HandleError::InvalidParameter(err)
    }
}

/// Event-side end of a voice: MIDI input, UI, or anything else that is not
/// the timer callback.
pub struct VoiceHandle {
    tx: Producer<VoiceMessage>,
    full_scale: u16,
}

impl VoiceHandle {
    pub(crate) fn new(tx: Producer<VoiceMessage>, full_scale: u16) -> Self {
        Self { tx, full_scale }
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), HandleError> {
        self.send(VoiceMessage::NoteOn { note, velocity })
    }

    pub fn note_off(&mut self, note: u8) -> Result<(), HandleError> {
        self.send(VoiceMessage::NoteOff { note })
    }

    pub fn all_notes_off(&mut self) -> Result<(), HandleError> {
        self.send(VoiceMessage::AllNotesOff)
    }

    /// Validate the shape against the voice's full scale and queue it.
    /// Invalid sets never reach the voice.
    pub fn set_parameters(
        &mut self,
        attack_length: u32,
        decay_length: u32,
        sustain_level: u16,
        release_length: u32,
    ) -> Result<(), HandleError> {
        let params = EnvelopeParameters::new(
            attack_length,
            decay_length,
            sustain_level,
            release_length,
            self.full_scale,
        )?;
        self.update_parameters(params)
    }

    /// Queue an already validated parameter set (may change full scale).
    pub fn update_parameters(&mut self, params: EnvelopeParameters) -> Result<(), HandleError> {
        self.send(VoiceMessage::SetParameters(params))?;
        self.full_scale = params.full_scale();
        Ok(())
    }

    /// Route a decoded message (e.g. from [`midi_to_message`]).
    ///
    /// [`midi_to_message`]: crate::io::converter::midi_to_message
    pub fn send(&mut self, msg: VoiceMessage) -> Result<(), HandleError> {
        match self.tx.push(msg) {
            Ok(()) => {
                debug!(?msg, "queued voice message");
                Ok(())
            }
            Err(_) => {
                warn!(?msg, "voice control queue full, message dropped");
                Err(HandleError::QueueFull)
            }
        }
    }

    pub fn full_scale(&self) -> u16 {
        self.full_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dsp::envelope::EnvelopePhase, engine::EngineConfig, synth::voice::MonoVoice,
    };

    #[test]
    fn events_flow_through_the_queue() {
        let config = EngineConfig::default();
        let (mut voice, mut handle) = MonoVoice::with_queue(&config);
        let mut out = Vec::<u16>::new();

        handle.note_on(60, 100).unwrap();
        voice.tick(&mut out);
        assert_eq!(voice.phase(), EnvelopePhase::AttackDecay);

        handle.note_off(60).unwrap();
        voice.tick(&mut out);
        assert_eq!(voice.phase(), EnvelopePhase::Release);
    }

    #[test]
    fn invalid_parameters_are_rejected_before_queueing() {
        let config = EngineConfig::default();
        let (mut voice, mut handle) = MonoVoice::with_queue(&config);

        let err = handle.set_parameters(1, 1, 4001, 1).unwrap_err();
        assert!(matches!(
            err,
            HandleError::InvalidParameter(ParameterError::SustainAboveFullScale { .. })
        ));

        voice.tick(&mut Vec::<u16>::new());
        assert_eq!(*voice.engine().parameters(), config.parameters);
    }

    #[test]
    fn full_queue_reports_an_error() {
        let config = EngineConfig::default().queue_size(2);
        let (_voice, mut handle) = MonoVoice::with_queue(&config);
        handle.note_on(60, 1).unwrap();
        handle.note_off(60).unwrap();
        assert_eq!(handle.note_on(62, 1), Err(HandleError::QueueFull));
    }
}
