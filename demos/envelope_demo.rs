/// Demonstrates the envelope on a real timer thread
/// Plays one note through attack, decay, sustain and release
use std::{thread, time::Duration};

use adsr_cv::{
    dsp::EnvelopeParameters,
    engine::{spawn_voice, EngineConfig, PeriodicTimer},
    synth::MonoVoice,
};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== ADSR Envelope Demo ===\n");

    let params = EnvelopeParameters::new(10, 10, 1500, 20, 4000)?;
    let config = EngineConfig::default()
        .tick_period(Duration::from_millis(2))
        .parameters(params);

    println!("Envelope parameters (in ticks of {:?}):", config.tick_period);
    println!("  Attack:  {}", params.attack_length());
    println!("  Decay:   {}", params.decay_length());
    println!("  Sustain: {} / {}", params.sustain_level(), params.full_scale());
    println!("  Release: {}\n", params.release_length());

    let (voice, mut handle) = MonoVoice::with_queue(&config);
    let timer = PeriodicTimer::new(config.tick_period);
    let running = spawn_voice(voice, timer, Vec::<u16>::new())?;

    handle.note_on(60, 100)?;
    thread::sleep(Duration::from_millis(100));
    handle.note_off(60)?;
    thread::sleep(Duration::from_millis(80));

    let (voice, samples) = running
        .stop()
        .map_err(|_| color_eyre::eyre::eyre!("envelope timer thread panicked"))?;

    println!("Rendered {} ticks, final phase {:?}\n", samples.len(), voice.phase());
    for (i, chunk) in samples.chunks(10).enumerate() {
        let row: Vec<String> = chunk.iter().map(|s| format!("{:>4}", s)).collect();
        println!("  {:>4}: {}", i * 10, row.join(" "));
    }
    Ok(())
}
