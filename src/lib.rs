pub mod dsp; // Curve tables and the envelope state machine
pub mod engine; // Timer drivers and configuration
pub mod io; // MIDI, potentiometers, pitch CV and DAC output
pub mod synth; // Monophonic voice and its control queue

/// Default output ceiling in DAC codes.
pub const DEFAULT_FULL_SCALE: u16 = 4000;
/// Highest code a 12-bit DAC accepts.
pub const DAC_MAX: u16 = 4095;
