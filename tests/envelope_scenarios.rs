use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use adsr_cv::{
    dsp::{build_attack_decay, build_release, EnvelopeEngine, EnvelopeParameters, EnvelopePhase},
    engine::{spawn_voice, CountedTimer, EngineConfig},
    io::{
        midi_to_message, DacBus, DacSink, MidiParser, NoteOutputs, PitchCv, PotReadings,
        ENVELOPE_DAC_ADDR, PITCH_DAC_ADDR,
    },
    synth::{MonoVoice, VoiceMessage},
};

fn engine(attack: u32, decay: u32, sustain: u16, release: u32) -> EnvelopeEngine {
    EnvelopeEngine::new(EnvelopeParameters::new(attack, decay, sustain, release, 4000).unwrap())
}

#[test]
fn four_step_attack_holds_sustain_until_release() {
    let mut env = engine(4, 0, 1000, 0);
    env.trigger();

    let attack: Vec<u16> = (0..4).map(|_| env.tick()).collect();
    assert_eq!(attack, vec![0, 1000, 2000, 3000]);

    for _ in 0..100 {
        assert_eq!(env.tick(), 1000);
    }

    env.release();
    assert_eq!(env.tick(), 1000);
    assert_eq!(env.tick(), 0);
    assert_eq!(env.phase(), EnvelopePhase::Done);
}

#[test]
fn instant_attack_and_decay() {
    let mut env = engine(0, 0, 2500, 10);
    env.trigger();
    assert_eq!(env.tick(), 4000);
    assert_eq!(env.tick(), 2500);
    assert_eq!(env.tick(), 2500);
}

#[test]
fn attack_decay_table_is_emitted_sample_for_sample() {
    let params = EnvelopeParameters::new(30, 20, 1500, 40, 4000).unwrap();
    let expected = build_attack_decay(30, 20, 1500, 4000).unwrap();
    let mut env = EnvelopeEngine::new(params);
    env.trigger();

    for (n, &sample) in expected.as_slice().iter().enumerate() {
        assert_eq!(env.tick(), sample, "tick {}", n);
    }
    assert_eq!(env.phase(), EnvelopePhase::Sustain);
    assert_eq!(env.tick(), 1500);
}

#[test]
fn full_note_release_matches_release_table() {
    let mut env = engine(5, 5, 1200, 16);
    env.trigger();
    for _ in 0..20 {
        env.tick();
    }
    env.release();

    let expected = build_release(1200, 16);
    let got: Vec<u16> = (0..16).map(|_| env.tick()).collect();
    assert_eq!(got, expected.as_slice());
    assert_eq!(env.phase(), EnvelopePhase::Done);
}

#[test]
fn midi_bytes_drive_a_voice_end_to_end() {
    let mut parser = MidiParser::new();
    let mut queue = VecDeque::new();
    for event in parser.feed_all(&[0x90, 60, 100]) {
        if let Some(msg) = midi_to_message(event, 0) {
            queue.push_back(msg);
        }
    }

    let params = EnvelopeParameters::new(0, 0, 1000, 2, 4000).unwrap();
    let mut voice = MonoVoice::new(params, queue);
    let mut out = Vec::<u16>::new();
    voice.tick(&mut out);
    voice.tick(&mut out);
    assert_eq!(out, vec![4000, 1000]);
    assert_eq!(voice.note(), Some(60));
}

#[test]
fn pots_feed_the_next_note() {
    let pots = PotReadings {
        attack: 16,
        decay: 0,
        sustain: 250,
        release: 8,
    }
    .to_parameters(4000)
    .unwrap();

    let mut queue = VecDeque::new();
    queue.push_back(VoiceMessage::NoteOn {
        note: 64,
        velocity: 90,
    });
    let voice = MonoVoice::new(EnvelopeParameters::default(), queue).with_parameter_source(pots);

    let thread = spawn_voice(voice, CountedTimer::new(6), Vec::<u16>::new()).unwrap();
    while !thread.is_finished() {
        std::thread::yield_now();
    }
    let (_, samples) = thread.stop().unwrap();
    // attack 16/4 = 4 ticks, sustain 250*4 = 1000
    assert_eq!(samples, vec![0, 1000, 2000, 3000, 1000, 1000]);
}

#[derive(Default)]
struct Bus(Vec<[u8; 2]>);

impl DacBus for Bus {
    type Error = ();

    fn write_to(&mut self, _address: u8, bytes: &[u8]) -> Result<(), ()> {
        self.0.push([bytes[0], bytes[1]]);
        Ok(())
    }
}

#[test]
fn every_tick_reaches_the_dac() {
    let config = EngineConfig::default()
        .parameters(EnvelopeParameters::new(2, 0, 4000, 0, 4000).unwrap());
    let (mut voice, mut handle) = MonoVoice::with_queue(&config);
    let mut dac = DacSink::new(Bus::default());

    handle.note_on(60, 100).unwrap();
    for _ in 0..4 {
        voice.tick(&mut dac);
    }

    let frames = dac.into_bus().0;
    assert_eq!(frames, vec![[0x00, 0x00], [0x07, 0xD0], [0x0F, 0xA0], [0x0F, 0xA0]]);
}

/// One I2C bus shared by the envelope and pitch DACs.
#[derive(Clone, Default)]
struct SharedBus(Arc<Mutex<Vec<(u8, [u8; 2])>>>);

impl SharedBus {
    fn take(&self) -> Vec<(u8, [u8; 2])> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl DacBus for SharedBus {
    type Error = ();

    fn write_to(&mut self, address: u8, bytes: &[u8]) -> Result<(), ()> {
        self.0.lock().unwrap().push((address, [bytes[0], bytes[1]]));
        Ok(())
    }
}

#[test]
fn note_events_reach_the_pitch_dac_and_gate() {
    let bus = SharedBus::default();
    let gate = Arc::new(AtomicBool::new(false));
    let outputs = NoteOutputs::new(PitchCv::default())
        .pitch_sink(DacSink::with_address(bus.clone(), PITCH_DAC_ADDR))
        .gate(gate.clone());

    let config = EngineConfig::default()
        .parameters(EnvelopeParameters::new(2, 0, 4000, 0, 4000).unwrap());
    let (voice, mut handle) = MonoVoice::with_queue(&config);
    let mut voice = voice.with_note_outputs(outputs);
    let mut dac = DacSink::new(bus.clone());

    handle.note_on(52, 100).unwrap();
    voice.tick(&mut dac);
    assert!(gate.load(Ordering::Relaxed));
    // 910 = 0x038E: one octave above the lowest note on a 4.5V reference
    assert_eq!(
        bus.take(),
        vec![(PITCH_DAC_ADDR, [0x03, 0x8E]), (ENVELOPE_DAC_ADDR, [0x00, 0x00])]
    );

    handle.note_off(52).unwrap();
    voice.tick(&mut dac);
    assert!(!gate.load(Ordering::Relaxed));
    // pitch holds through the release; only the envelope DAC is written
    assert!(bus.take().iter().all(|&(addr, _)| addr == ENVELOPE_DAC_ADDR));
}
