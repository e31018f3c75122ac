//! VAD state machine scenario tests.
//!
//! Covers:
//! - the acceptance scenarios (silence, confirmed start, confirmed stop,
//!   silence blip while recording)
//! - determinism over arbitrary (level, now) sequences
//! - the single-utterance-in-flight guarantee
//! - debounce minimums with no intervening contradicting sample

use std::time::{Duration, Instant};

use voxbridge_foundation::{Clock, TestClock};
use voxbridge_vad::{VadConfig, VadEvent, VadState, VadStateMachine};

const TICK: Duration = Duration::from_millis(50);

/// Drive the machine with one level per tick at 50 ms spacing, collecting
/// every emitted event with its tick index.
fn run(vad: &mut VadStateMachine, clock: &TestClock, levels: &[f32]) -> Vec<(usize, VadEvent)> {
    let mut events = Vec::new();
    for (i, &level) in levels.iter().enumerate() {
        clock.advance(TICK);
        if let Some(event) = vad.evaluate(level, clock.now()) {
            events.push((i, event));
        }
    }
    events
}

// ─── Acceptance scenarios ────────────────────────────────────────────

#[test]
fn scenario_a_pure_silence_emits_nothing() {
    let clock = TestClock::new();
    let mut vad = VadStateMachine::new(VadConfig::default());

    let events = run(&mut vad, &clock, &[0.0; 10]);
    assert!(events.is_empty());
    assert_eq!(vad.current_state(), VadState::Idle);
}

#[test]
fn scenario_b_sustained_speech_starts_exactly_once() {
    let clock = TestClock::new();
    let mut vad = VadStateMachine::new(VadConfig::default());

    // 40 held for 600 ms of 50 ms ticks.
    let events = run(&mut vad, &clock, &[40.0; 12]);

    let starts: Vec<_> = events
        .iter()
        .filter(|(_, e)| matches!(e, VadEvent::StartUtterance { .. }))
        .collect();
    assert_eq!(starts.len(), 1);

    // Timer armed at tick 0; elapsed first exceeds 500 ms at tick 11
    // (550 ms after arming).
    assert_eq!(starts[0].0, 11);
    assert_eq!(vad.current_state(), VadState::Recording);
}

#[test]
fn scenario_c_sustained_silence_stops_exactly_once() {
    let clock = TestClock::new();
    let mut vad = VadStateMachine::new(VadConfig::default());

    run(&mut vad, &clock, &[40.0; 12]);
    assert_eq!(vad.current_state(), VadState::Recording);

    // 10 held for 2100 ms.
    let events = run(&mut vad, &clock, &[10.0; 42]);

    let stops: Vec<_> = events
        .iter()
        .filter(|(_, e)| matches!(e, VadEvent::StopUtterance { .. }))
        .collect();
    assert_eq!(stops.len(), 1);
    assert_eq!(vad.current_state(), VadState::Idle);
}

#[test]
fn scenario_d_short_silence_while_recording_does_not_stop() {
    let clock = TestClock::new();
    let mut vad = VadStateMachine::new(VadConfig::default());

    run(&mut vad, &clock, &[40.0; 12]);
    assert_eq!(vad.current_state(), VadState::Recording);

    // 1000 ms of silence, then speech again.
    let mut levels = vec![10.0; 20];
    levels.extend(vec![40.0; 4]);
    let events = run(&mut vad, &clock, &levels);

    assert!(events
        .iter()
        .all(|(_, e)| !matches!(e, VadEvent::StopUtterance { .. })));
    assert_eq!(vad.current_state(), VadState::Recording);
}

// ─── Properties ──────────────────────────────────────────────────────

#[test]
fn identical_input_sequences_produce_identical_event_sequences() {
    let levels: Vec<f32> = (0..200)
        .map(|i| match i % 7 {
            0 | 1 => 45.0,
            2 => 28.0,
            3 | 4 => 40.0,
            _ => 5.0,
        })
        .collect();

    let run_once = || {
        let clock = TestClock::new();
        let mut vad = VadStateMachine::new(VadConfig::default());
        run(&mut vad, &clock, &levels)
            .into_iter()
            .map(|(i, e)| (i, matches!(e, VadEvent::StartUtterance { .. })))
            .collect::<Vec<_>>()
    };

    assert_eq!(run_once(), run_once());
}

#[test]
fn no_start_without_full_uninterrupted_speech_run() {
    let clock = TestClock::new();
    let mut vad = VadStateMachine::new(VadConfig::default());

    // Every 450 ms run is broken by a quiet tick; none reaches 500 ms.
    let mut levels = Vec::new();
    for _ in 0..20 {
        levels.extend(vec![40.0; 9]);
        levels.push(0.0);
    }

    let events = run(&mut vad, &clock, &levels);
    assert!(events.is_empty());
    assert_eq!(vad.metrics().utterances_started, 0);
}

#[test]
fn no_stop_without_full_uninterrupted_silence_run() {
    let clock = TestClock::new();
    let mut vad = VadStateMachine::new(VadConfig::default());

    run(&mut vad, &clock, &[40.0; 12]);

    // 1950 ms silence runs each broken by one loud tick.
    let mut levels = Vec::new();
    for _ in 0..5 {
        levels.extend(vec![10.0; 39]);
        levels.push(40.0);
    }

    let events = run(&mut vad, &clock, &levels);
    assert!(events.is_empty());
    assert_eq!(vad.current_state(), VadState::Recording);
}

#[test]
fn stop_never_emitted_outside_a_recording_state() {
    let clock = TestClock::new();
    let mut vad = VadStateMachine::new(VadConfig::default());

    // Long silence from Idle can never produce a stop.
    let events = run(&mut vad, &clock, &[0.0; 100]);
    assert!(events.is_empty());
}

#[test]
fn starts_and_stops_strictly_alternate() {
    let clock = TestClock::new();
    let mut vad = VadStateMachine::new(VadConfig::default());

    // Two utterances back to back.
    let mut levels = Vec::new();
    levels.extend(vec![40.0; 20]); // first utterance
    levels.extend(vec![5.0; 45]); // confirmed stop
    levels.extend(vec![40.0; 20]); // second utterance
    levels.extend(vec![5.0; 45]);

    let events = run(&mut vad, &clock, &levels);

    let mut expecting_start = true;
    for (_, event) in &events {
        match event {
            VadEvent::StartUtterance { .. } => {
                assert!(expecting_start, "nested StartUtterance");
                expecting_start = false;
            }
            VadEvent::StopUtterance { .. } => {
                assert!(!expecting_start, "StopUtterance with no active utterance");
                expecting_start = true;
            }
        }
    }
    assert_eq!(events.len(), 4);
    assert_eq!(vad.metrics().utterances_started, 2);
    assert_eq!(vad.metrics().utterances_completed, 2);
}

#[test]
fn event_timestamps_match_the_confirming_tick() {
    let clock = TestClock::new();
    let mut vad = VadStateMachine::new(VadConfig::default());

    let before = clock.now();
    let events = run(&mut vad, &clock, &[40.0; 12]);
    let (_, VadEvent::StartUtterance { at }) = events[0] else {
        panic!("expected StartUtterance");
    };
    assert_eq!(at, before + TICK * 12);
}
