//! TUI module for adsr_cv
//!
//! Shows the envelope output as it is generated and lets the keyboard stand
//! in for the MIDI input and the front-panel pots.

mod panel;
mod scope;
pub mod state;

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use tracing::warn;

use adsr_cv::{dsp::EnvelopeParameters, synth::VoiceHandle};

pub use state::{ScopeInit, VoiceUpdate};

use panel::render_panel;
use scope::{render_scope, render_shape};

/// Samples kept for the scope trace
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Step sizes for the knob keys
const LENGTH_STEP: u32 = 5;
const MAX_LENGTH: u32 = 255;
const SUSTAIN_STEP: u16 = 100;

/// UI application state
pub struct UiApp {
    /// Control queue into the voice
    handle: VoiceHandle,
    /// Ring buffer receiver for envelope samples
    sample_rx: Consumer<u16>,
    /// Ring buffer receiver for voice state
    state_rx: Consumer<VoiceUpdate>,
    init: ScopeInit,
    /// Knob settings as last sent to the voice
    params: EnvelopeParameters,
    /// Latest voice state
    current: VoiceUpdate,
    /// Sample history for the scope
    samples: Vec<u16>,
    /// Whether the gate key is held down (toggled)
    gate: bool,
    /// Whether the app should quit
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        handle: VoiceHandle,
        sample_rx: Consumer<u16>,
        state_rx: Consumer<VoiceUpdate>,
        init: ScopeInit,
    ) -> Self {
        Self {
            handle,
            sample_rx,
            state_rx,
            params: init.parameters,
            init,
            current: VoiceUpdate::default(),
            samples: vec![0; VIS_BUFFER_SIZE],
            gate: false,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_samples();
            self.poll_state();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        if self.gate {
            let _ = self.handle.note_off(self.init.note);
        }
        Ok(())
    }

    /// Append new samples, keeping the last VIS_BUFFER_SIZE
    fn poll_samples(&mut self) {
        let before = self.samples.len();
        while let Ok(sample) = self.sample_rx.pop() {
            self.samples.push(sample);
        }

        if self.samples.len() > before && self.samples.len() > VIS_BUFFER_SIZE {
            let excess = self.samples.len() - VIS_BUFFER_SIZE;
            self.samples.drain(0..excess);
        }
    }

    /// Keep only the latest voice state
    fn poll_state(&mut self) {
        while let Ok(update) = self.state_rx.pop() {
            self.current = update;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let p = self.params;
        let next = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char(' ') => {
                self.toggle_gate();
                return;
            }
            KeyCode::Char('a') => p.with_attack(p.attack_length().saturating_sub(LENGTH_STEP)),
            KeyCode::Char('A') => p.with_attack(step_up(p.attack_length())),
            KeyCode::Char('d') => p.with_decay(p.decay_length().saturating_sub(LENGTH_STEP)),
            KeyCode::Char('D') => p.with_decay(step_up(p.decay_length())),
            KeyCode::Char('s') => p.with_sustain(p.sustain_level().saturating_sub(SUSTAIN_STEP)),
            KeyCode::Char('S') => p.with_sustain(p.sustain_level().saturating_add(SUSTAIN_STEP)),
            KeyCode::Char('r') => p.with_release(p.release_length().saturating_sub(LENGTH_STEP)),
            KeyCode::Char('R') => p.with_release(step_up(p.release_length())),
            _ => return,
        };

        if next != p {
            match self.handle.update_parameters(next) {
                Ok(()) => self.params = next,
                Err(err) => warn!(%err, "parameter change dropped"),
            }
        }
    }

    fn toggle_gate(&mut self) {
        let note = self.init.note;
        let sent = if self.gate {
            self.handle.note_off(note)
        } else {
            self.handle.note_on(note, 100)
        };

        match sent {
            Ok(()) => self.gate = !self.gate,
            Err(err) => warn!(%err, "gate change dropped"),
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Status panel
                Constraint::Min(8),    // Scope
                Constraint::Length(8), // Shape preview
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        render_panel(frame, rows[0], &self.init, &self.params, &self.current);
        render_scope(frame, rows[1], &self.samples, self.params.full_scale());
        render_shape(frame, rows[2], &self.params);

        let help = Paragraph::new(" [Space] Gate  [a/A] Attack  [d/D] Decay  [s/S] Sustain  [r/R] Release  [Q] Quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[3]);
    }
}

fn step_up(length: u32) -> u32 {
    (length + LENGTH_STEP).min(MAX_LENGTH)
}
