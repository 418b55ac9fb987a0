use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use proktor::bank::{Question, Section, SectionKind};
use proktor::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use proktor::session::{Mode, Session, TimingMode};

// Headless integration using the internal runtime + Session without a TTY.
// Drives a minimal test flow through Runner/TestEventSource, mapping key
// events to session operations the way the binary's key handler does.

const TICK_MS: u64 = 250;

fn tiny_sections() -> Vec<Section> {
    let question = |id: &str, correct: usize| Question {
        context: "A short argument.".into(),
        prompt: "Which one follows?".into(),
        options: vec!["one".into(), "two".into(), "three".into(), "four".into()],
        correct,
        id: id.into(),
    };
    vec![
        Section {
            kind: SectionKind::LogicalReasoning,
            questions: vec![question("a_1", 1), question("a_2", 0)],
        },
        Section {
            kind: SectionKind::LogicalReasoning,
            questions: vec![question("b_1", 2)],
        },
    ]
}

fn drive(session: &mut Session, ev: AppEvent) {
    match ev {
        AppEvent::Tick => session.on_tick(TICK_MS),
        AppEvent::Resize => {}
        AppEvent::Key(key) => match key.code {
            KeyCode::Enter if session.gate().is_open() => session.confirm(),
            KeyCode::Esc if session.gate().is_open() => session.dismiss(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                session.select_answer(c.to_digit(10).unwrap() as usize)
            }
            KeyCode::Right => session.next_question(),
            KeyCode::Left => session.prev_question(),
            _ => {}
        },
    }
}

#[test]
fn headless_session_flow_completes() {
    let mut session = Session::new();
    session.start(tiny_sections(), TimingMode::Strict, 60);

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let runner = Runner::new(es, ticker);

    // Answer both questions of section one, advance, answer the last, finish.
    for code in [
        KeyCode::Char('1'), // select option 1 on q1
        KeyCode::Right,
        KeyCode::Char('0'), // select option 0 on q2
        KeyCode::Right,     // opens the advance prompt
        KeyCode::Enter,     // confirm: into section 2
        KeyCode::Char('2'),
    ] {
        tx.send(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap();
    }

    for _ in 0..100u32 {
        drive(&mut session, runner.step());
        if session.section_idx() == 1
            && session.sheet().get(1, 0).and_then(|s| s.selected).is_some()
        {
            break;
        }
    }

    assert_eq!(session.section_idx(), 1);
    assert_eq!(session.sheet().get(0, 0).unwrap().selected, Some(1));
    assert_eq!(session.sheet().get(0, 1).unwrap().selected, Some(0));
    assert_eq!(session.sheet().get(1, 0).unwrap().selected, Some(2));
    assert!(session.timer().remaining_secs() <= 60, "ticks were processed");
}

#[test]
fn headless_strict_expiry_forces_the_section_over() {
    let mut session = Session::new();
    session.start(tiny_sections(), TimingMode::Strict, 1);

    let (_tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(2));
    let runner = Runner::new(es, ticker);

    // No key events queued: every step times out into a Tick.
    for _ in 0..10u32 {
        drive(&mut session, runner.step());
        if session.gate().is_open() {
            break;
        }
    }
    assert!(session.gate().is_open(), "expiry should open the forced prompt");
    assert!(session.gate().current().unwrap().forced);

    // Dismissing a forced prompt still advances.
    session.dismiss();
    assert_eq!(session.section_idx(), 1);
    assert_eq!(session.timer().remaining_secs(), 1, "fresh clock for section two");
}

#[test]
fn headless_flexible_expiry_runs_into_overtime() {
    let mut session = Session::new();
    session.start(tiny_sections(), TimingMode::Flexible, 1);

    let (_tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(2));
    let runner = Runner::new(es, ticker);

    let mut fired = 0u32;
    for _ in 0..40u32 {
        let was_open = session.gate().is_open();
        drive(&mut session, runner.step());
        if session.gate().is_open() && !was_open {
            fired += 1;
            session.dismiss();
        }
    }

    assert_eq!(fired, 1, "expiry must fire exactly once while in overtime");
    assert!(session.timer().is_overtime());
    assert_eq!(session.mode(), Mode::Running);
}
