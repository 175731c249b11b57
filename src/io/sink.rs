//! Where envelope samples go after each tick.

#[cfg(feature = "rtrb")]
use rtrb::Producer;

/// Receives one sample per tick, in tick order.
pub trait OutputSink {
    fn write(&mut self, sample: u16);
}

/// Record every sample (offline renders, tests).
impl OutputSink for Vec<u16> {
    fn write(&mut self, sample: u16) {
        self.push(sample);
    }
}

/// Feed a scope or another thread. Samples are dropped while the ring is
/// full; the reader only ever sees a gap, never a stale value.
#[cfg(feature = "rtrb")]
impl OutputSink for Producer<u16> {
    fn write(&mut self, sample: u16) {
        let _ = self.push(sample);
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn write(&mut self, sample: u16) {
        (**self).write(sample)
    }
}

impl<A: OutputSink, B: OutputSink> OutputSink for (A, B) {
    fn write(&mut self, sample: u16) {
        self.0.write(sample);
        self.1.write(sample);
    }
}
