pub mod answers;
pub mod bank;
pub mod config;
pub mod confirm;
pub mod error;
pub mod runtime;
pub mod score;
pub mod session;
pub mod timer;
pub mod ui;

use crate::bank::TestType;
use crate::config::{Config, ConfigStore, FileConfigStore};
use crate::error::BankError;
use crate::runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner};
use crate::session::{Mode, Session, TimingMode};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

const TICK_RATE_MS: u64 = 250;

/// terminal proctor for timed multiple-choice practice tests
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal proctor for timed practice tests: sectioned multiple-choice questions under a countdown, with strict or flexible timing, answer elimination, flagging, and a scored review."
)]
pub struct Cli {
    /// test type to start immediately, skipping the menu
    #[clap(short = 't', long, value_enum)]
    test_type: Option<TestTypeArg>,

    /// timing mode for the session
    #[clap(short = 'm', long, value_enum)]
    timing: Option<TimingArg>,

    /// minutes per section
    #[clap(long)]
    section_minutes: Option<u64>,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum TestTypeArg {
    Lr,
    Rc,
    Ar,
    Full,
}

impl TestTypeArg {
    fn as_test_type(&self) -> TestType {
        match self {
            TestTypeArg::Lr => TestType::Lr,
            TestTypeArg::Rc => TestType::Rc,
            TestTypeArg::Ar => TestType::Ar,
            TestTypeArg::Full => TestType::Full,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum TimingArg {
    Strict,
    Flexible,
}

impl TimingArg {
    fn as_timing_mode(&self) -> TimingMode {
        match self {
            TimingArg::Strict => TimingMode::Strict,
            TimingArg::Flexible => TimingMode::Flexible,
        }
    }
}

/// Start-screen selections, seeded from config and CLI flags.
#[derive(Debug, Clone)]
pub struct MenuState {
    pub test_type: TestType,
    pub timing: TimingMode,
}

impl MenuState {
    fn cycle_test_type(&mut self) {
        self.test_type = match self.test_type {
            TestType::Lr => TestType::Rc,
            TestType::Rc => TestType::Ar,
            TestType::Ar => TestType::Full,
            TestType::Full => TestType::Lr,
        };
    }

    fn toggle_timing(&mut self) {
        self.timing = match self.timing {
            TimingMode::Strict => TimingMode::Flexible,
            TimingMode::Flexible => TimingMode::Strict,
        };
    }
}

/// Presentation-only state: where the option cursor sits and whether the
/// passage pane is collapsed. Lives outside the session so the state machine
/// stays headless.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub option_cursor: usize,
    pub context_hidden: bool,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub menu: MenuState,
    pub view: ViewState,
    pub section_secs: i64,
}

impl App {
    pub fn new(cli: &Cli, defaults: Config) -> Self {
        let minutes = cli.section_minutes.unwrap_or(defaults.section_minutes);
        Self {
            session: Session::new(),
            menu: MenuState {
                test_type: cli
                    .test_type
                    .map(|t| t.as_test_type())
                    .unwrap_or(defaults.test_type),
                timing: cli
                    .timing
                    .map(|m| m.as_timing_mode())
                    .unwrap_or(defaults.timing),
            },
            view: ViewState::default(),
            section_secs: (minutes * 60) as i64,
        }
    }

    /// Load a fresh set of sections for the menu selections and enter Running.
    pub fn start_test(&mut self) -> Result<(), BankError> {
        let sections = bank::load_questions(self.menu.test_type)?;
        self.session
            .start(sections, self.menu.timing, self.section_secs);
        self.view = ViewState::default();
        Ok(())
    }

    fn current_config(&self) -> Config {
        Config {
            test_type: self.menu.test_type,
            timing: self.menu.timing,
            section_minutes: (self.section_secs / 60) as u64,
        }
    }

    fn option_count(&self) -> usize {
        self.session
            .current_question()
            .map(|q| q.options.len())
            .unwrap_or(0)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut app = App::new(&cli, store.load());
    if cli.test_type.is_some() {
        app.start_test()?;
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Exit,
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &dyn ConfigStore,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            AppEvent::Tick => app.session.on_tick(TICK_RATE_MS),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if handle_key(app, key, store)? == KeyOutcome::Exit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_key(
    app: &mut App,
    key: KeyEvent,
    store: &dyn ConfigStore,
) -> Result<KeyOutcome, BankError> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(KeyOutcome::Exit);
    }

    // A pending confirmation captures the keyboard until resolved.
    if app.session.gate().is_open() {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => {
                app.session.confirm();
                app.view.option_cursor = 0;
            }
            KeyCode::Esc | KeyCode::Char('n') => {
                app.session.dismiss();
                app.view.option_cursor = 0;
            }
            _ => {}
        }
        return Ok(KeyOutcome::Continue);
    }

    match app.session.mode() {
        Mode::Menu => match key.code {
            KeyCode::Esc => return Ok(KeyOutcome::Exit),
            KeyCode::Tab => app.menu.cycle_test_type(),
            KeyCode::Char('t') => app.menu.toggle_timing(),
            KeyCode::Enter => {
                let _ = store.save(&app.current_config());
                app.start_test()?;
            }
            _ => {}
        },
        Mode::Running => match key.code {
            KeyCode::Up => app.view.option_cursor = app.view.option_cursor.saturating_sub(1),
            KeyCode::Down => {
                let max = app.option_count().saturating_sub(1);
                app.view.option_cursor = (app.view.option_cursor + 1).min(max);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                app.session.select_answer(app.view.option_cursor)
            }
            KeyCode::Char('x') => app.session.toggle_eliminated(app.view.option_cursor),
            KeyCode::Char('f') => app.session.toggle_flag(),
            KeyCode::Left => {
                app.session.prev_question();
                app.view.option_cursor = 0;
            }
            KeyCode::Right => {
                app.session.next_question();
                app.view.option_cursor = 0;
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let number = c.to_digit(10).unwrap() as usize;
                if number > 0 {
                    app.session.jump_to_question(number - 1);
                    app.view.option_cursor = 0;
                }
            }
            KeyCode::Char('p') => app.session.toggle_pause(),
            KeyCode::Char('h') => app.session.toggle_timer_hidden(),
            KeyCode::Char('c') => app.view.context_hidden = !app.view.context_hidden,
            KeyCode::Char('e') => app.session.request_end_section(),
            KeyCode::Char('v') => app.session.request_end_test(),
            KeyCode::Esc => app.session.request_quit(),
            _ => {}
        },
        Mode::Paused => match key.code {
            KeyCode::Char('p') => app.session.toggle_pause(),
            KeyCode::Char('h') => app.session.toggle_timer_hidden(),
            KeyCode::Char('v') => app.session.request_end_test(),
            KeyCode::Esc => app.session.request_quit(),
            _ => {}
        },
        Mode::Review => match key.code {
            KeyCode::Left => app.session.prev_question(),
            KeyCode::Right => app.session.next_question(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let number = c.to_digit(10).unwrap() as usize;
                if number > 0 {
                    app.session.jump_to_question(number - 1);
                }
            }
            KeyCode::Char('v') => app.session.toggle_full_review(),
            KeyCode::Esc => app.session.request_quit(),
            _ => {}
        },
        Mode::FullReview => match key.code {
            KeyCode::Char('v') | KeyCode::Char('b') | KeyCode::Backspace => {
                app.session.toggle_full_review()
            }
            KeyCode::Esc => app.session.request_quit(),
            _ => {}
        },
    }

    Ok(KeyOutcome::Continue)
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
