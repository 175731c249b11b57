use crate::{io::midi::MidiEvent, synth::message::VoiceMessage};

/// MIDI CC 123, "All Notes Off".
pub const CC_ALL_NOTES_OFF: u8 = 123;

pub fn midi_to_message(midi: MidiEvent, channel_filter: u8) -> Option<VoiceMessage> {
    match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } if channel == channel_filter => Some(VoiceMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::NoteOff { channel, key, .. } if channel == channel_filter => {
            Some(VoiceMessage::NoteOff { note: key })
        }
        MidiEvent::ControlChange {
            channel,
            controller: CC_ALL_NOTES_OFF,
            ..
        } if channel == channel_filter => Some(VoiceMessage::AllNotesOff),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_events_on_the_selected_channel_pass() {
        let on = MidiEvent::NoteOn {
            channel: 0,
            key: 60,
            velocity: 100,
        };
        assert_eq!(
            midi_to_message(on, 0),
            Some(VoiceMessage::NoteOn {
                note: 60,
                velocity: 100
            })
        );

        let off = MidiEvent::NoteOff {
            channel: 0,
            key: 60,
            velocity: 64,
        };
        assert_eq!(midi_to_message(off, 0), Some(VoiceMessage::NoteOff { note: 60 }));
    }

    #[test]
    fn other_channels_are_filtered() {
        let on = MidiEvent::NoteOn {
            channel: 3,
            key: 60,
            velocity: 100,
        };
        assert_eq!(midi_to_message(on, 0), None);
    }

    #[test]
    fn all_notes_off_controller_maps_to_release() {
        let cc = MidiEvent::ControlChange {
            channel: 1,
            controller: CC_ALL_NOTES_OFF,
            value: 0,
        };
        assert_eq!(midi_to_message(cc, 1), Some(VoiceMessage::AllNotesOff));

        let other = MidiEvent::ControlChange {
            channel: 1,
            controller: 74,
            value: 10,
        };
        assert_eq!(midi_to_message(other, 1), None);
    }

    #[test]
    fn clock_is_ignored() {
        assert_eq!(midi_to_message(MidiEvent::RealTime(0xF8), 0), None);
    }
}
