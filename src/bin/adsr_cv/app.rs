//! CvScope - wires the voice thread, the control queue and the UI together

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use rtrb::RingBuffer;
use tracing::info;

use adsr_cv::{
    engine::{spawn_voice_with, EngineConfig, PeriodicTimer},
    io::PitchCv,
    synth::MonoVoice,
};

use super::ui::{ScopeInit, UiApp, VoiceUpdate, VIS_BUFFER_SIZE};

/// Main application builder
pub struct CvScope {
    config: EngineConfig,
    pitch: PitchCv,
    note: u8,
}

impl CvScope {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            pitch: PitchCv::default(),
            note: 60,
        }
    }

    /// Pitch CV calibration used for the note readout
    pub fn pitch(mut self, pitch: PitchCv) -> Self {
        self.pitch = pitch;
        self
    }

    /// MIDI note played by the gate key
    pub fn note(mut self, note: u8) -> Self {
        self.note = note.min(127);
        self
    }

    /// Run the application (takes over the terminal until quit)
    pub fn run(self) -> EyreResult<()> {
        let (voice, handle) = MonoVoice::with_queue(&self.config);
        let (sample_tx, sample_rx) = RingBuffer::<u16>::new(VIS_BUFFER_SIZE * 4);
        let (mut state_tx, state_rx) = RingBuffer::<VoiceUpdate>::new(256);

        info!(
            period = ?self.config.tick_period,
            full_scale = self.config.parameters.full_scale(),
            "starting envelope scope"
        );

        let timer = PeriodicTimer::new(self.config.tick_period);
        let ticker = spawn_voice_with(voice, timer, sample_tx, move |voice, level| {
            // The UI only needs the latest state; drop when it lags
            let _ = state_tx.push(VoiceUpdate {
                phase: voice.phase(),
                level,
                gate: voice.gate(),
                note: voice.note(),
            });
        })
        .wrap_err("failed to spawn envelope timer thread")?;

        let init = ScopeInit {
            tick_period: self.config.tick_period,
            parameters: self.config.parameters,
            pitch: self.pitch,
            note: self.note,
        };

        let mut terminal = ratatui::init();
        let result = UiApp::new(handle, sample_rx, state_rx, init).run(&mut terminal);
        ratatui::restore();

        if ticker.stop().is_err() {
            tracing::error!("envelope timer thread panicked");
        }

        result
    }
}
