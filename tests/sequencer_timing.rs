use tactical_audio::{
    sequencing::{step_duration, Event, Hit, Note, Position, Progression, Sequencer, Theme},
    synth::Fixed,
};

fn run(seq: &mut Sequencer, steps: usize, unit: f32) -> Vec<Note> {
    let mut rng = Fixed(unit);
    let mut notes = Vec::new();
    for _ in 0..steps {
        seq.schedule_step(&mut rng, &mut notes);
    }
    notes
}

fn pads(notes: &[Note]) -> Vec<(u64, u8)> {
    notes
        .iter()
        .filter(|n| matches!(n.event, Event::Pad(_)))
        .map(|n| (n.bar, n.step))
        .collect()
}

#[test]
fn step_duration_is_a_sixteenth_of_a_beat() {
    for tempo in [30.0, 60.0, 80.0, 90.0, 120.0, 133.0, 200.0] {
        assert_eq!(step_duration(tempo), 0.25 * 60.0 / tempo);
    }

    let mut seq = Sequencer::new(Theme::Cinematic.progression());
    run(&mut seq, 4, 0.5);
    assert!((seq.position().next_note_time - 4.0 * 0.25).abs() < 1e-12);
}

#[test]
fn bar_advances_once_per_sixteen_steps() {
    let mut seq = Sequencer::new(Theme::Ambient.progression());
    for i in 1..=160u64 {
        run(&mut seq, 1, 0.5);
        assert_eq!(seq.position().bar, i / 16);
        assert_eq!(u64::from(seq.position().step), i % 16);
    }
}

#[test]
fn thirty_two_steps_from_bar_one() {
    let mut seq = Sequencer::with_position(
        Theme::Action.progression(),
        Position {
            bar: 1,
            ..Position::default()
        },
    );
    assert_eq!(seq.tempo(), 120.0);

    let notes = run(&mut seq, 32, 0.5);
    assert_eq!(seq.position().bar, 3);
    assert_eq!(seq.position().chord_index, 0);
    assert!(pads(&notes).is_empty());

    // Bar 3 passes without a change, bar 4 brings one
    let notes = run(&mut seq, 16, 0.5);
    assert!(pads(&notes).is_empty());
    let notes = run(&mut seq, 1, 0.5);
    assert_eq!(pads(&notes), [(4, 0)]);
    assert_eq!(seq.position().chord_index, 1);
}

#[test]
fn chords_change_only_on_step_zero_of_every_fourth_bar() {
    let mut seq = Sequencer::default();
    let notes = run(&mut seq, 16 * 20, 0.5);
    let changes = pads(&notes);

    assert_eq!(changes, [(0, 0), (4, 0), (8, 0), (12, 0), (16, 0)]);
    // Opening progression has four chords: five changes wrap back to index 1
    assert_eq!(seq.position().chord_index, 1);
}

#[test]
fn action_bar_dispatch_log() {
    let mut seq = Sequencer::with_position(
        Theme::Action.progression(),
        Position {
            bar: 1,
            ..Position::default()
        },
    );
    let notes = run(&mut seq, 16, 0.5);

    let steps_with = |wanted: Hit| -> Vec<u8> {
        notes
            .iter()
            .filter(|n| n.event == Event::Hit(wanted))
            .map(|n| n.step)
            .collect()
    };

    assert_eq!(steps_with(Hit::Kick), [0, 4, 8, 12]);
    assert_eq!(steps_with(Hit::Hat { open: true }), [2, 6, 10, 14]);
    assert!(steps_with(Hit::Hat { open: false }).is_empty());

    // D drone root is 36.71 Hz
    let bass: Vec<(u8, f32)> = notes
        .iter()
        .filter_map(|n| match n.event {
            Event::Hit(Hit::SubBass { freq }) => Some((n.step, freq)),
            _ => None,
        })
        .collect();
    assert_eq!(bass.len(), 8);
    for (step, freq) in bass {
        let expected = if step % 4 == 0 { 36.71 / 2.0 } else { 36.71 };
        assert!((freq - expected).abs() < 1e-4, "step {step}: {freq} Hz");
    }
}

#[test]
fn notes_carry_their_exact_step_time() {
    let mut seq = Sequencer::new(Theme::Action.progression());
    seq.start(2.0, 0.1);
    let notes = run(&mut seq, 16, 0.5);

    for note in notes {
        let expected = 2.1 + f64::from(note.step) * 0.125;
        assert!((note.time - expected).abs() < 1e-9);
    }
}

#[test]
fn theme_change_keeps_chord_lookups_in_bounds() {
    let progressions = [
        Progression::opening(),
        Theme::Ambient.progression(),
        Theme::Action.progression(),
        Theme::Cinematic.progression(),
    ];

    for from in progressions {
        for to in Theme::ALL {
            for warmup in [0, 5, 16, 64, 77, 300] {
                let mut seq = Sequencer::new(from);
                run(&mut seq, warmup, 0.3);
                let bar = seq.position().bar;

                seq.set_theme(to);
                let pos = seq.position();
                assert_eq!((pos.step, pos.chord_index), (0, 0));
                assert_eq!(pos.bar, bar);

                for _ in 0..200 {
                    run(&mut seq, 1, 0.3);
                    assert!(seq.current_chord().is_some());
                    assert!(seq.position().chord_index < to.chords().len());
                }
            }
        }
    }
}

#[test]
fn drain_leaves_next_note_past_the_horizon() {
    let mut seq = Sequencer::default();
    seq.start(0.0, 0.1);
    let mut rng = Fixed(0.5);
    let mut notes = Vec::new();

    let mut last = seq.position().next_note_time;
    let mut now = 0.0;
    while now < 10.0 {
        seq.drain_due(now + 0.1, &mut rng, &mut notes);
        let next = seq.position().next_note_time;
        assert!(next >= last);
        assert!(next >= now + 0.1);
        last = next;
        // A throttled timer: sometimes 25 ms, sometimes a whole second
        now += if (now * 10.0) as u32 % 7 == 0 { 1.0 } else { 0.025 };
    }

    let times: Vec<f64> = notes.iter().map(|n| n.time).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}
