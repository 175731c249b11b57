use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::dsp::params::EnvelopeParameters;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VoiceMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    SetParameters(EnvelopeParameters),
    AllNotesOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<VoiceMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<VoiceMessage> {
    fn pop(&mut self) -> Option<VoiceMessage> {
        Consumer::pop(self).ok()
    }
}

impl MessageReceiver for VecDeque<VoiceMessage> {
    fn pop(&mut self) -> Option<VoiceMessage> {
        self.pop_front()
    }
}
