mod support;

use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use eclipse_typing::console::InputBuffer;
use eclipse_typing::runtime::{FixedTicker, GameEvent, Runner, TestEventSource};
use eclipse_typing::{
    BoundedWordSource, DifficultyCurve, EngineState, RoundEngine, TickOutcome, WordList,
};
use support::ScriptedWords;

fn key(c: char) -> GameEvent {
    GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn enter() -> GameEvent {
    GameEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
}

/// A tiny version of the binary's loop.
fn drive<E, W>(
    runner: &mut Runner<E, FixedTicker>,
    engine: &mut RoundEngine<W>,
    input: &mut InputBuffer,
    max_steps: u32,
    mut done: impl FnMut(&RoundEngine<W>) -> bool,
) where
    E: eclipse_typing::runtime::GameEventSource,
    W: eclipse_typing::WordSource,
{
    for _ in 0..max_steps {
        match runner.step() {
            GameEvent::Tick => {
                if let Some(stamp) = engine.clock_stamp() {
                    if let Ok(TickOutcome::TimedOut(_)) = engine.on_tick(stamp, input.as_str()) {
                        input.clear();
                    }
                }
            }
            GameEvent::Resize => {}
            GameEvent::Key(key) => match key.code {
                KeyCode::Enter => {
                    let typed = input.take();
                    let _ = engine.submit(&typed);
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            },
        }
        if done(engine) {
            break;
        }
    }
}

#[test]
fn headless_typing_flow_levels_up() {
    let mut engine = RoundEngine::new(ScriptedWords::new(&["hola", "adios"]));
    engine.start_session().unwrap();

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(50)),
    );
    for c in "hola".chars() {
        tx.send(key(c)).unwrap();
    }
    tx.send(enter()).unwrap();

    let mut input = InputBuffer::default();
    drive(&mut runner, &mut engine, &mut input, 100, |e| {
        e.session().level() == 2
    });

    assert_eq!(engine.session().level(), 2);
    assert_eq!(engine.session().current_word(), "adios");
    assert_eq!(engine.session().mistakes(), 0);
}

#[test]
fn headless_timed_round_expires_and_scores_partial_input() {
    let curve = DifficultyCurve {
        base_time: 3,
        floor: 1,
        ..DifficultyCurve::default()
    };
    let mut engine = RoundEngine::with_curve(ScriptedWords::new(&["sol", "mar"]), curve);
    engine.start_session().unwrap();

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    tx.send(key('s')).unwrap();

    let mut input = InputBuffer::default();
    drive(&mut runner, &mut engine, &mut input, 200, |e| {
        e.session().mistakes() == 1
    });

    assert_eq!(engine.session().mistakes(), 1);
    assert_eq!(engine.session().level(), 1);
    assert_eq!(engine.session().current_word(), "mar");
    assert_eq!(input.as_str(), "");
}

#[test]
fn headless_session_runs_out_of_mistakes() {
    let curve = DifficultyCurve {
        base_time: 1,
        floor: 1,
        ..DifficultyCurve::default()
    };
    let list = WordList::from_words("pair", ["uno", "dos"]).with_seed(3);
    let source = BoundedWordSource::spawn(list, Duration::from_secs(1));
    let mut engine = RoundEngine::with_curve(source, curve);
    engine.start_session().unwrap();

    let (_tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(2)),
    );

    let mut input = InputBuffer::default();
    drive(&mut runner, &mut engine, &mut input, 500, |e| {
        e.state() == EngineState::Ended
    });

    assert_eq!(engine.state(), EngineState::Ended);
    assert_eq!(engine.session().mistakes(), 4);
    assert_eq!(engine.clock_stamp(), None);
}
