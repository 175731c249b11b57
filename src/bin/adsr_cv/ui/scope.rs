//! Oscilloscope and shape preview widgets

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use adsr_cv::dsp::EnvelopeParameters;

/// Ticks the preview spends on the sustain plateau
const PREVIEW_SUSTAIN_TICKS: f64 = 40.0;

/// Render the scrolling output trace
pub fn render_scope(frame: &mut Frame, area: Rect, samples: &[u16], full_scale: u16) {
    let block = Block::default().title(" Output ").borders(Borders::ALL);

    let data: Vec<(f64, f64)> = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as f64, f64::from(s)))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, samples.len().max(1) as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, f64::from(full_scale)])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

/// Render the ideal envelope outline for the current knob settings
pub fn render_shape(frame: &mut Frame, area: Rect, params: &EnvelopeParameters) {
    let block = Block::default().title(" Shape ").borders(Borders::ALL);
    let points = shape_points(params);
    let width = points.last().map_or(1.0, |&(x, _)| x.max(1.0));

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Yellow))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(Axis::default().bounds([0.0, width]))
        .y_axis(Axis::default().bounds([0.0, f64::from(params.full_scale())]));

    frame.render_widget(chart, area);
}

fn shape_points(params: &EnvelopeParameters) -> [(f64, f64); 5] {
    let attack = f64::from(params.attack_length());
    let decay = f64::from(params.decay_length());
    let release = f64::from(params.release_length());
    let full = f64::from(params.full_scale());
    let sustain = f64::from(params.sustain_level());

    let peak = attack;
    let knee = peak + decay;
    let hold = knee + PREVIEW_SUSTAIN_TICKS;

    [
        (0.0, 0.0),
        (peak, full),
        (knee, sustain),
        (hold, sustain),
        (hold + release, 0.0),
    ]
}
