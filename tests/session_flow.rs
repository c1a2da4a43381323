//! End-to-end session flow: frames, taps, records and score keeping.

use pyramid_builder::persistence::{MemoryStore, ScoreStore};
use pyramid_builder::remote::NullRemote;
use pyramid_builder::sim::{
    EffectKind, GameEvent, GamePhase, Session, SpawnSide, SpawnSource, StackEngine, TickInput, tick,
};
use pyramid_builder::{ScoreKeeper, Tuning};

fn session(width: f32) -> Session {
    let tuning = Tuning {
        initial_width: width,
        ..Tuning::default()
    };
    Session::new(StackEngine::with_tuning(
        tuning,
        SpawnSource::scripted(vec![SpawnSide::Left]),
    ))
}

/// Idle until the moving block sits over the top block, then tap
fn perfect_tap(session: &mut Session) -> Vec<GameEvent> {
    for _ in 0..1000 {
        let engine = session.engine();
        if engine.offset().abs() <= 0.5 {
            return tick(session, &TickInput::tap());
        }
        tick(session, &TickInput::default());
    }
    panic!("moving block never reached the top block");
}

#[test]
fn record_is_announced_once_when_best_is_passed() {
    let mut session = session(60.0);
    session.set_best(2);
    tick(&mut session, &TickInput::start());

    let mut records = Vec::new();
    for _ in 0..5 {
        for event in perfect_tap(&mut session) {
            if let GameEvent::NewRecord { score } = event {
                records.push(score);
            }
        }
    }
    assert_eq!(records, vec![3]);
    assert!(
        session
            .effects()
            .iter()
            .any(|e| e.kind == EffectKind::NewRecord)
    );
}

#[test]
fn popups_can_be_disabled_without_losing_events() {
    let mut session = session(60.0).with_effects(false);
    tick(&mut session, &TickInput::start());
    let events = perfect_tap(&mut session);
    assert!(events.iter().any(|e| matches!(e, GameEvent::Perfect { .. })));
    assert!(session.effects().is_empty());
}

#[test]
fn turning_popups_off_clears_showing_ones() {
    let mut session = session(60.0);
    tick(&mut session, &TickInput::start());
    perfect_tap(&mut session);
    assert_eq!(session.effects().len(), 1);

    session.set_effects(false);
    assert!(session.effects().is_empty());
    perfect_tap(&mut session);
    assert!(session.effects().is_empty());

    session.set_effects(true);
    perfect_tap(&mut session);
    assert_eq!(session.effects().len(), 1);
}

#[test]
fn full_run_updates_score_keeper() {
    let store = MemoryStore::default();
    let mut keeper = ScoreKeeper::open(&store, NullRemote);
    let mut session = session(20.0);
    session.set_best(keeper.best());
    tick(&mut session, &TickInput::start());

    for _ in 0..3 {
        for event in perfect_tap(&mut session) {
            if let GameEvent::Placed(block) = event {
                keeper.observe_score(block.index);
            }
        }
    }
    assert_eq!(store.load().unwrap().unwrap().best, 3);

    // Tap while the fresh 20-wide block is still near the left edge: a miss
    let events = tick(&mut session, &TickInput::tap());
    assert_eq!(events, vec![GameEvent::GameOver { score: 3 }]);
    assert_eq!(session.phase(), GamePhase::GameOver);

    let stats = session.stats();
    assert_eq!(stats.perfect_drops, 3);
    assert_eq!(keeper.finish_run(session.score(), stats.perfect_drops, 0.0), Some(1));

    // The next run has to beat 3
    session.set_best(keeper.best());
    tick(&mut session, &TickInput::start());
    assert_eq!(session.score(), 0);
    assert_eq!(session.snapshot().stack.len(), 1);
}
