//! Status panel - knob values, phase, gate and CV readouts

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use adsr_cv::dsp::{EnvelopeParameters, EnvelopePhase};

use super::{ScopeInit, VoiceUpdate};

/// Render the status panel
pub fn render_panel(
    frame: &mut Frame,
    area: Rect,
    init: &ScopeInit,
    params: &EnvelopeParameters,
    update: &VoiceUpdate,
) {
    let block = Block::default().title(" adsr_cv ").borders(Borders::ALL);

    let tick_ms = init.tick_period.as_secs_f64() * 1000.0;
    let (gate_symbol, gate_color) = if update.gate {
        ("● GATE", Color::Green)
    } else {
        ("○ gate", Color::DarkGray)
    };
    let pitch = update.note.map_or(0, |n| init.pitch.note_to_dac(n));

    let knobs = Line::from(vec![
        Span::styled(
            format!(
                " A {:>3}  D {:>3}  S {:>4}  R {:>3}  ",
                params.attack_length(),
                params.decay_length(),
                params.sustain_level(),
                params.release_length()
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("tick {:.1}ms  full scale {}", tick_ms, params.full_scale()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let status = Line::from(vec![
        Span::styled(format!(" {}  ", gate_symbol), Style::default().fg(gate_color)),
        Span::styled(
            format!("{:<12}", phase_name(update.phase)),
            Style::default().fg(phase_color(update.phase)),
        ),
        Span::styled(
            format!("level {:>4}  ", update.level),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("pitch CV {:>4}", pitch),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(vec![knobs, status]).block(block);
    frame.render_widget(paragraph, area);
}

fn phase_name(phase: EnvelopePhase) -> &'static str {
    match phase {
        EnvelopePhase::Idle => "idle",
        EnvelopePhase::AttackDecay => "attack/decay",
        EnvelopePhase::Sustain => "sustain",
        EnvelopePhase::Release => "release",
        EnvelopePhase::Done => "done",
    }
}

fn phase_color(phase: EnvelopePhase) -> Color {
    match phase {
        EnvelopePhase::Idle | EnvelopePhase::Done => Color::DarkGray,
        EnvelopePhase::AttackDecay => Color::LightRed,
        EnvelopePhase::Sustain => Color::LightGreen,
        EnvelopePhase::Release => Color::LightYellow,
    }
}
