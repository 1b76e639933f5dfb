use tactical_audio::{
    io::{OfflineHandle, OfflineHost},
    synth::Fixed,
    voices::Effect,
    AudioEngine, EngineConfig,
};

const SAMPLE_RATE: u32 = 48_000;
/// One look-ahead interval of audio
const TICK_FRAMES: usize = SAMPLE_RATE as usize / 40;

fn offline_engine(seed: u64) -> (AudioEngine<OfflineHost>, OfflineHandle) {
    let (host, handle) = OfflineHost::new(SAMPLE_RATE);
    let config = EngineConfig::new().seed(seed).manual_scheduling();
    let mut engine = AudioEngine::with_random(host, config, Box::new(Fixed(0.5)));
    assert!(engine.init());
    (engine, handle)
}

/// Render `seconds` of audio, pumping the scheduler between blocks the way
/// the timer thread would.
fn play(engine: &mut AudioEngine<OfflineHost>, handle: &OfflineHandle, seconds: f64) -> Vec<f32> {
    let blocks = (seconds * SAMPLE_RATE as f64) as usize / TICK_FRAMES;
    let mut out = Vec::with_capacity(blocks * TICK_FRAMES);
    for _ in 0..blocks {
        engine.pump();
        out.extend(handle.render(TICK_FRAMES));
    }
    out
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

#[test]
fn backing_track_is_audible_and_bounded() {
    for screen in ["map", "sector", "ethos"] {
        let (mut engine, handle) = offline_engine(1);
        engine.set_screen(screen);
        engine.start_bgm();

        let samples = play(&mut engine, &handle, 4.0);
        assert!(samples.iter().all(|s| s.is_finite()), "{screen}: non-finite output");
        assert!(peak(&samples) <= 1.0, "{screen}: clipped");
        assert!(peak(&samples) > 0.001, "{screen}: silent");
    }
}

#[test]
fn every_effect_renders() {
    for effect in Effect::ALL {
        let (mut engine, handle) = offline_engine(2);
        engine.play_effect(effect);

        let samples = handle.render(SAMPLE_RATE as usize * 2);
        assert!(samples.iter().all(|s| s.is_finite()));
        assert!(peak(&samples) <= 1.0, "{effect} clipped");
        assert!(peak(&samples) > 0.0005, "{effect} is silent");
        assert_eq!(handle.active_voices(), 0, "{effect} never finished");
    }
}

#[test]
fn mute_fades_the_whole_mix() {
    let (mut engine, handle) = offline_engine(3);
    engine.start_bgm();
    engine.play_effect(Effect::Boot);
    assert!(engine.toggle_mute());

    let samples = play(&mut engine, &handle, 3.0);
    let tail = &samples[samples.len() / 2..];
    assert!(peak(tail) < 1e-4, "muted output peaked at {}", peak(tail));

    engine.toggle_mute();
    let samples = play(&mut engine, &handle, 3.0);
    assert!(peak(&samples[samples.len() / 2..]) > 0.001);
}

#[test]
fn same_seed_renders_identically() {
    let render = || {
        let (mut engine, handle) = offline_engine(42);
        engine.start_bgm();
        engine.play_effect(Effect::Boot);
        play(&mut engine, &handle, 2.0)
    };
    assert_eq!(render(), render());
}

#[test]
fn voices_are_released_after_stop() {
    let (mut engine, handle) = offline_engine(4);
    engine.start_bgm();
    play(&mut engine, &handle, 2.0);
    assert!(handle.active_voices() > 0);

    engine.stop_bgm();
    // Longest backing voice is the 2.5 s pad
    handle.render(SAMPLE_RATE as usize * 3);
    assert_eq!(handle.active_voices(), 0);
}
