use std::{thread, time::Duration};

use tactical_audio::{
    graph::GraphRenderer,
    io::{OfflineHandle, OfflineHost},
    synth::Fixed,
    AudioEngine, AudioHost, EngineConfig, EngineError, Theme,
};

const SAMPLE_RATE: u32 = 48_000;

fn offline_engine() -> (AudioEngine<OfflineHost>, OfflineHandle) {
    let (host, handle) = OfflineHost::new(SAMPLE_RATE);
    let config = EngineConfig::new().seed(7).manual_scheduling();
    (AudioEngine::with_random(host, config, Box::new(Fixed(0.5))), handle)
}

fn seconds(s: f64) -> usize {
    (s * SAMPLE_RATE as f64) as usize
}

/// Host for a machine without audio output
struct NoAudio {
    attempts: usize,
}

impl AudioHost for NoAudio {
    fn sample_rate(&mut self) -> Result<u32, EngineError> {
        self.attempts += 1;
        Err(EngineError::NoOutputDevice)
    }

    fn attach(&mut self, _renderer: GraphRenderer) -> Result<(), EngineError> {
        unreachable!("attach after a failed sample rate query")
    }
}

#[test]
fn init_twice_builds_one_graph() {
    let (mut engine, handle) = offline_engine();
    assert_eq!(engine.bus_count(), 0);

    assert!(engine.init());
    assert!(engine.init());

    assert_eq!(engine.bus_count(), 3);
    assert_eq!(handle.attach_count(), 1);
    assert_eq!(handle.bus_count(), 3);
}

#[test]
fn calls_before_init_schedule_nothing() {
    let (mut engine, handle) = offline_engine();

    assert!(!engine.toggle_mute());
    engine.start_bgm();
    engine.play_effect_named("boot");
    engine.stop_bgm();
    assert_eq!(engine.pump(), 0);

    let status = engine.status();
    assert!(!status.live && !status.playing && !status.muted);
    assert_eq!(status.voices, 0);
    assert_eq!(handle.attach_count(), 0);

    // Nothing was queued while uninitialised
    engine.init();
    handle.render(64);
    assert_eq!(handle.active_voices(), 0);
    assert!(!engine.is_playing());
}

#[test]
fn toggle_mute_twice_returns_to_unmuted() {
    let (mut engine, handle) = offline_engine();
    engine.init();

    assert!(engine.toggle_mute());
    assert!(engine.is_muted());
    assert!(!engine.toggle_mute());
    assert!(!engine.is_muted());

    handle.render(seconds(0.1));
    let gain = handle.master_gain_at(2.0).unwrap_or_default();
    assert!((gain - 0.6).abs() < 1e-3, "master settled at {gain}");
}

#[test]
fn mute_state_follows_the_queued_ramp() {
    let (host, handle) = OfflineHost::new(SAMPLE_RATE);
    let config = EngineConfig {
        command_capacity: 1,
        ..EngineConfig::new().seed(7).manual_scheduling()
    };
    let mut engine = AudioEngine::with_random(host, config, Box::new(Fixed(0.5)));
    engine.init();

    assert!(engine.toggle_mute());
    // Queue is full until the renderer drains it, so the unmute is dropped
    assert!(engine.toggle_mute());
    assert!(engine.is_muted());

    handle.render(seconds(0.3));
    let gain = handle.master_gain_at(0.3).unwrap_or(1.0);
    assert!(gain < 0.1, "muted engine still at {gain}");

    assert!(!engine.toggle_mute());
    assert!(!engine.is_muted());
}

#[test]
fn unsupported_host_leaves_engine_inert() {
    let mut engine = AudioEngine::new(NoAudio { attempts: 0 }, EngineConfig::new().manual_scheduling());

    assert!(!engine.init());
    assert!(!engine.init());
    assert_eq!(engine.host().attempts, 1);

    assert!(!engine.is_live());
    assert_eq!(engine.bus_count(), 0);
    assert!(!engine.toggle_mute());
    engine.start_bgm();
    engine.play_effect_named("click");
    assert_eq!(engine.pump(), 0);
    assert!(!engine.status().playing);
}

#[test]
fn first_step_lands_after_the_start_delay() {
    let (mut engine, handle) = offline_engine();
    engine.init();
    engine.start_bgm();
    assert!(engine.is_playing());

    // First step sits at 0.1 s, exactly on the look-ahead horizon
    assert_eq!(engine.pump(), 0);

    handle.render(seconds(0.05));
    assert_eq!(engine.pump(), 1);

    // Opening bar 0, step 0: pad, kick, closed hat, sub-bass
    handle.render(1);
    assert_eq!(handle.active_voices(), 4);
    assert_eq!(engine.status().voices, 4);
    assert_eq!(engine.status().chord, Some("Cmaj7"));
}

#[test]
fn start_bgm_is_ignored_while_playing() {
    let (mut engine, handle) = offline_engine();
    engine.init();
    engine.start_bgm();
    engine.start_bgm();
    assert_eq!(handle.resume_count(), 1);
}

#[test]
fn stop_bgm_stops_scheduling() {
    let (mut engine, handle) = offline_engine();
    engine.init();
    engine.start_bgm();

    handle.render(seconds(0.5));
    assert!(engine.pump() > 0);

    engine.stop_bgm();
    assert!(!engine.is_playing());
    handle.render(seconds(0.5));
    assert_eq!(engine.pump(), 0);
}

#[test]
fn theme_selected_before_init_is_kept() {
    let (mut engine, _handle) = offline_engine();
    engine.set_screen("ethos");
    assert_eq!(engine.status().theme, Theme::Cinematic);

    engine.init();
    let status = engine.status();
    assert_eq!(status.theme, Theme::Cinematic);
    assert_eq!(status.tempo, 60.0);
}

#[test]
fn unknown_effects_are_ignored() {
    let (mut engine, _handle) = offline_engine();
    engine.init();

    engine.play_effect_named("hack_win");
    engine.play_effect_named("self-destruct");
    assert_eq!(engine.status().voices, 1);
}

#[test]
fn dispose_releases_the_output_for_good() {
    let (mut engine, handle) = offline_engine();
    engine.init();
    engine.start_bgm();
    engine.dispose();

    assert!(!handle.is_attached());
    assert!(!engine.init());
    assert_eq!(engine.bus_count(), 0);
    assert_eq!(handle.attach_count(), 1);
}

#[test]
fn scheduler_thread_keeps_up_with_the_clock() {
    let (host, handle) = OfflineHost::new(SAMPLE_RATE);
    let config = EngineConfig::new()
        .seed(3)
        .lookahead_interval(Duration::from_millis(5));
    let mut engine = AudioEngine::new(host, config);
    engine.init();
    engine.start_bgm();

    handle.render(seconds(1.0));
    thread::sleep(Duration::from_millis(200));

    let status = engine.status();
    assert!(status.voices > 0);
    // 90 BPM: one step every 1/6 s, so the first second holds 6 steps
    assert!(status.step >= 6, "scheduler only reached step {}", status.step);

    engine.stop_bgm();
    let voices = engine.status().voices;
    handle.render(seconds(1.0));
    thread::sleep(Duration::from_millis(50));
    assert_eq!(engine.status().voices, voices);
}
