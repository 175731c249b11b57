// Purpose - external interfaces, format conversions

pub mod converter;
pub mod dac;
pub mod gate;
pub mod midi;
pub mod pitch;
pub mod pots;
pub mod sink;

pub use converter::midi_to_message;
pub use dac::{encode_dac_frame, DacBus, DacSink, ENVELOPE_DAC_ADDR, PITCH_DAC_ADDR};
pub use gate::{GateOutput, NoteOutputs};
pub use midi::{MidiEvent, MidiParser};
pub use pitch::PitchCv;
pub use pots::{AdcChannels, ParameterSource, PotBank, PotReadings};
pub use sink::OutputSink;
