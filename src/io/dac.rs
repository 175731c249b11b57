//! MCP4725 12-bit I2C DAC output.
//!
//! The envelope and the pitch CV each have their own DAC on the bus. Values
//! are sent with the two-byte fast-write command.

use std::fmt;

use tracing::{trace, warn};

use crate::{io::sink::OutputSink, DAC_MAX};

/// Bus address of the envelope DAC.
pub const ENVELOPE_DAC_ADDR: u8 = 0x60;
/// Bus address of the pitch CV DAC.
pub const PITCH_DAC_ADDR: u8 = 0x62;

/// Fast-write frame for `value`, high byte first.
pub fn encode_dac_frame(value: u16) -> [u8; 2] {
    let value = value.min(DAC_MAX);
    [((value >> 8) & 0xFF) as u8, (value & 0xFF) as u8]
}

/// Minimal I2C write access.
pub trait DacBus {
    type Error: fmt::Debug;

    fn write_to(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Writes each envelope sample to a DAC.
///
/// Bus errors are counted and logged; the tick path never sees them.
pub struct DacSink<B> {
    bus: B,
    address: u8,
    errors: u64,
}

impl<B: DacBus> DacSink<B> {
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, ENVELOPE_DAC_ADDR)
    }

    pub fn with_address(bus: B, address: u8) -> Self {
        Self {
            bus,
            address,
            errors: 0,
        }
    }

    /// Failed writes since construction.
    pub fn errors(&self) -> u64 {
        self.errors
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }
}

impl<B: DacBus> OutputSink for DacSink<B> {
    fn write(&mut self, sample: u16) {
        let frame = encode_dac_frame(sample);
        if let Err(err) = self.bus.write_to(self.address, &frame) {
            self.errors += 1;
            // Only the first failure is loud; a dead bus would flood the log
            if self.errors == 1 {
                warn!(address = self.address, ?err, "DAC write failed");
            } else {
                trace!(address = self.address, ?err, errors = self.errors, "DAC write failed");
            }
        }
    }
}
