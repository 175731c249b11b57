//! Serial MIDI decoding.
//!
//! Bytes arrive one at a time from the UART at 31250 baud. The parser keeps
//! just enough state to reassemble channel messages, including running
//! status, and hands back one [`MidiEvent`] per complete message.

/// A decoded MIDI message. Channels are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
    /// System real-time byte (clock, start, continue, stop, ...)
    RealTime(u8),
}

/// Byte-at-a-time MIDI stream decoder with running status.
#[derive(Debug, Default)]
pub struct MidiParser {
    running_status: Option<u8>,
    data: [u8; 2],
    received: usize,
}

impl MidiParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte from the wire. Returns an event once a message is
    /// complete.
    pub fn feed(&mut self, byte: u8) -> Option<MidiEvent> {
        match byte {
            // Real-time bytes may appear anywhere, even between data bytes
            0xF8..=0xFF => Some(MidiEvent::RealTime(byte)),

            // System common and sysex cancel running status
            0xF0..=0xF7 => {
                self.running_status = None;
                self.received = 0;
                None
            }

            0x80..=0xEF => {
                self.running_status = Some(byte);
                self.received = 0;
                None
            }

            _ => {
                let status = self.running_status?;
                self.data[self.received] = byte;
                self.received += 1;

                if self.received < data_len(status) {
                    return None;
                }

                self.received = 0;
                decode(status, self.data)
            }
        }
    }

    /// Feed a slice of bytes and collect every completed event.
    pub fn feed_all(&mut self, bytes: &[u8]) -> Vec<MidiEvent> {
        bytes.iter().filter_map(|&b| self.feed(b)).collect()
    }
}

fn data_len(status: u8) -> usize {
    match status & 0xF0 {
        0xC0 | 0xD0 => 1,
        _ => 2,
    }
}

fn decode(status: u8, data: [u8; 2]) -> Option<MidiEvent> {
    let channel = status & 0x0F;
    let [d1, d2] = data;

    match status & 0xF0 {
        0x80 => Some(MidiEvent::NoteOff {
            channel,
            key: d1,
            velocity: d2,
        }),
        // Note on with velocity 0 is the common shorthand for note off
        0x90 if d2 == 0 => Some(MidiEvent::NoteOff {
            channel,
            key: d1,
            velocity: 0,
        }),
        0x90 => Some(MidiEvent::NoteOn {
            channel,
            key: d1,
            velocity: d2,
        }),
        0xB0 => Some(MidiEvent::ControlChange {
            channel,
            controller: d1,
            value: d2,
        }),
        0xC0 => Some(MidiEvent::ProgramChange {
            channel,
            program: d1,
        }),
        0xE0 => {
            let raw = (u16::from(d2) << 7) | u16::from(d1);
            Some(MidiEvent::PitchBend {
                channel,
                value: raw as i16 - 8192,
            })
        }
        // Aftertouch and channel pressure are not used
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_note_on_and_off() {
        let mut parser = MidiParser::new();
        let events = parser.feed_all(&[0x90, 60, 100, 0x80, 60, 64]);
        assert_eq!(
            events,
            vec![
                MidiEvent::NoteOn {
                    channel: 0,
                    key: 60,
                    velocity: 100
                },
                MidiEvent::NoteOff {
                    channel: 0,
                    key: 60,
                    velocity: 64
                },
            ]
        );
    }

    #[test]
    fn running_status_reuses_last_status_byte() {
        let mut parser = MidiParser::new();
        let events = parser.feed_all(&[0x92, 60, 100, 64, 90, 60, 0]);
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[1],
            MidiEvent::NoteOn {
                channel: 2,
                key: 64,
                velocity: 90
            }
        );
        // velocity 0 under running status is a note off
        assert_eq!(
            events[2],
            MidiEvent::NoteOff {
                channel: 2,
                key: 60,
                velocity: 0
            }
        );
    }

    #[test]
    fn realtime_bytes_do_not_break_messages() {
        let mut parser = MidiParser::new();
        let events = parser.feed_all(&[0x90, 60, 0xF8, 100]);
        assert_eq!(
            events,
            vec![
                MidiEvent::RealTime(0xF8),
                MidiEvent::NoteOn {
                    channel: 0,
                    key: 60,
                    velocity: 100
                },
            ]
        );
    }

    #[test]
    fn data_without_status_is_dropped() {
        let mut parser = MidiParser::new();
        assert!(parser.feed_all(&[60, 100]).is_empty());
    }

    #[test]
    fn sysex_cancels_running_status() {
        let mut parser = MidiParser::new();
        let events = parser.feed_all(&[0x90, 60, 100, 0xF0, 0x7E, 0x01, 0xF7, 62, 100]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn program_change_takes_one_data_byte() {
        let mut parser = MidiParser::new();
        let events = parser.feed_all(&[0xC1, 5, 6]);
        assert_eq!(
            events,
            vec![
                MidiEvent::ProgramChange {
                    channel: 1,
                    program: 5
                },
                MidiEvent::ProgramChange {
                    channel: 1,
                    program: 6
                },
            ]
        );
    }

    #[test]
    fn pitch_bend_is_centred_on_zero() {
        let mut parser = MidiParser::new();
        assert_eq!(
            parser.feed_all(&[0xE0, 0x00, 0x40]),
            vec![MidiEvent::PitchBend {
                channel: 0,
                value: 0
            }]
        );
        assert_eq!(
            parser.feed_all(&[0xE0, 0x00, 0x00]),
            vec![MidiEvent::PitchBend {
                channel: 0,
                value: -8192
            }]
        );
    }
}
