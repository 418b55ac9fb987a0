// End-to-end state machine scenarios against the library surface, including
// the review/scoring path over a freshly sampled bank.

use assert_matches::assert_matches;

use proktor::bank::{self, Question, Section, SectionKind, TestType};
use proktor::score::{self, Verdict};
use proktor::session::{Mode, Session, TimingMode};

fn scenario_sections() -> Vec<Section> {
    // One section, three questions, correct indices [1, 0, 2].
    let question = |id: &str, correct: usize| Question {
        context: "ctx".into(),
        prompt: "p".into(),
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct,
        id: id.into(),
    };
    vec![Section {
        kind: SectionKind::LogicalReasoning,
        questions: vec![question("s_1", 1), question("s_2", 0), question("s_3", 2)],
    }]
}

#[test]
fn scoring_scenario_matches_the_review_dashboard() {
    let mut session = Session::new();
    session.start(scenario_sections(), TimingMode::Flexible, 60);

    // Select [1, 1, none] and finish.
    session.select_answer(1);
    session.next_question();
    session.select_answer(1);
    session.request_end_test();
    session.confirm();
    assert_matches!(session.mode(), Mode::Review);

    let section = &session.sections()[0];
    assert_eq!(score::section_score(section, session.sheet(), 0), 1);
    assert_eq!(score::section_percent(section, session.sheet(), 0), 33);

    session.toggle_full_review();
    assert_matches!(session.mode(), Mode::FullReview);

    let report = score::full_report(session.sections(), session.sheet());
    let rows = &report[0].rows;
    assert_eq!(rows[0].verdict, Verdict::Correct);
    assert_eq!(rows[1].verdict, Verdict::Incorrect);
    assert_eq!(score::option_letter(rows[1].correct), 'A');
    assert_eq!(rows[2].verdict, Verdict::Skipped);
    assert_eq!(score::option_letter(rows[2].correct), 'C');
}

#[test]
fn full_test_session_runs_all_four_sections() {
    let sections = bank::load_questions(TestType::Full).unwrap();
    assert_eq!(sections.len(), 4);

    let mut session = Session::new();
    session.start(sections, TimingMode::Strict, 3);

    // Let every section expire; the forced prompt advances each time.
    for visited in 0..4 {
        assert_eq!(session.section_idx(), visited);
        assert_matches!(session.mode(), Mode::Running);
        session.on_tick(3_000);
        assert!(session.gate().is_open());
        session.confirm();
    }

    assert_matches!(session.mode(), Mode::Review);
    assert_eq!(session.section_idx(), 0);
    assert_eq!(session.question_idx(), 0);
}

#[test]
fn answers_persist_across_section_advances_and_into_review() {
    let sections = bank::load_questions(TestType::Full).unwrap();
    let first_len = sections[0].len();

    let mut session = Session::new();
    session.start(sections, TimingMode::Flexible, 60);

    session.select_answer(0);
    session.toggle_flag();
    session.request_end_section();
    session.confirm();
    assert_eq!(session.section_idx(), 1);

    session.select_answer(1);
    session.request_end_test();
    session.confirm();

    assert_eq!(session.sheet().get(0, 0).unwrap().selected, Some(0));
    assert!(session.sheet().get(0, 0).unwrap().flagged);
    assert_eq!(session.sheet().get(1, 0).unwrap().selected, Some(1));
    assert_eq!(session.sheet().section(0).len(), first_len, "sheet never resized");
}

#[test]
fn review_walks_every_question_of_every_section() {
    let sections = bank::load_questions(TestType::Full).unwrap();
    let total: usize = sections.iter().map(|s| s.len()).sum();

    let mut session = Session::new();
    session.start(sections, TimingMode::Strict, 60);
    session.request_end_test();
    session.confirm();

    let mut visited = 1;
    loop {
        let before = (session.section_idx(), session.question_idx());
        session.next_question();
        if (session.section_idx(), session.question_idx()) == before {
            break;
        }
        visited += 1;
    }
    assert_eq!(visited, total);

    // And all the way back.
    loop {
        let before = (session.section_idx(), session.question_idx());
        session.prev_question();
        if (session.section_idx(), session.question_idx()) == before {
            break;
        }
    }
    assert_eq!((session.section_idx(), session.question_idx()), (0, 0));
}

#[test]
fn quitting_mid_test_discards_the_sampled_sections() {
    let mut session = Session::new();
    session.start(bank::load_questions(TestType::Rc).unwrap(), TimingMode::Strict, 60);
    session.select_answer(2);

    session.request_quit();
    session.confirm();
    assert_matches!(session.mode(), Mode::Menu);
    assert!(session.sections().is_empty());

    // A new session starts clean.
    session.start(bank::load_questions(TestType::Ar).unwrap(), TimingMode::Strict, 60);
    assert_eq!(session.sheet().get(0, 0).unwrap().selected, None);
}
