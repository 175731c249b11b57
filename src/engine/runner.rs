//! Run a voice on its own timer thread.

use std::{
    io,
    thread::{self, JoinHandle},
};

use tracing::debug;

use crate::{
    engine::timer::{StopHandle, TickControl, TimerDriver},
    io::sink::OutputSink,
    synth::{message::MessageReceiver, voice::MonoVoice},
};

/// A voice ticking on a background thread.
pub struct VoiceThread<R, S> {
    stop: StopHandle,
    join: JoinHandle<(MonoVoice<R>, S)>,
}

impl<R, S> VoiceThread<R, S> {
    /// Stop the timer, wait for the thread and hand back the voice and sink.
    pub fn stop(self) -> thread::Result<(MonoVoice<R>, S)> {
        self.stop.stop();
        self.join.join()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Move `voice` and `sink` onto a named thread driven by `timer`.
pub fn spawn_voice<R, T, S>(voice: MonoVoice<R>, timer: T, sink: S) -> io::Result<VoiceThread<R, S>>
where
    R: MessageReceiver + Send + 'static,
    T: TimerDriver + Send + 'static,
    S: OutputSink + Send + 'static,
{
    spawn_voice_with(voice, timer, sink, |_, _| {})
}

/// Like [`spawn_voice`], calling `on_tick` with the voice and the sample it
/// just produced after every tick.
pub fn spawn_voice_with<R, T, S, F>(
    mut voice: MonoVoice<R>,
    mut timer: T,
    mut sink: S,
    mut on_tick: F,
) -> io::Result<VoiceThread<R, S>>
where
    R: MessageReceiver + Send + 'static,
    T: TimerDriver + Send + 'static,
    S: OutputSink + Send + 'static,
    F: FnMut(&MonoVoice<R>, u16) + Send + 'static,
{
    let stop = StopHandle::new();
    let flag = stop.clone();

    let join = thread::Builder::new()
        .name("envelope-timer".into())
        .spawn(move || {
            debug!(period = ?timer.period(), "voice thread running");
            timer.run(&mut || {
                if flag.is_stopped() {
                    return TickControl::Stop;
                }
                let sample = voice.tick(&mut sink);
                on_tick(&voice, sample);
                TickControl::Continue
            });
            (voice, sink)
        })?;

    Ok(VoiceThread { stop, join })
}
