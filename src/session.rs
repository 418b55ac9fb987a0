use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::answers::AnswerSheet;
use crate::bank::{Question, Section};
use crate::confirm::{ConfirmationGate, PendingAction};
use crate::timer::{SectionTimer, SECTION_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Running,
    Paused,
    Review,
    FullReview,
}

/// Chosen once at session start, immutable thereafter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display, Default,
)]
pub enum TimingMode {
    #[default]
    Strict,
    Flexible,
}

/// One practice-test session: the loaded sections, the cursor into them, the
/// current mode, and every piece of per-session mutable state.
///
/// All mutation goes through named operations; invalid mode/operation
/// combinations and out-of-range indices are silent no-ops rather than
/// errors. Irreversible transitions route through the confirmation gate and
/// take effect in `confirm`/`dismiss`, which interpret the gate's pending
/// action.
#[derive(Debug)]
pub struct Session {
    sections: Vec<Section>,
    section_idx: usize,
    question_idx: usize,
    mode: Mode,
    timing: TimingMode,
    sheet: AnswerSheet,
    timer: SectionTimer,
    gate: ConfirmationGate,
    started_at: Option<DateTime<Local>>,
    finished_at: Option<DateTime<Local>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            section_idx: 0,
            question_idx: 0,
            mode: Mode::Menu,
            timing: TimingMode::default(),
            sheet: AnswerSheet::default(),
            timer: SectionTimer::default(),
            gate: ConfirmationGate::default(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Menu -> Running. Takes freshly loaded sections, allocates the answer
    /// sheet, and starts the first section's clock. No-op if the source
    /// produced nothing to run.
    pub fn start(&mut self, sections: Vec<Section>, timing: TimingMode, section_secs: i64) {
        if self.mode != Mode::Menu || sections.is_empty() {
            return;
        }
        self.sheet = AnswerSheet::new(&sections);
        self.sections = sections;
        self.section_idx = 0;
        self.question_idx = 0;
        self.timing = timing;
        self.timer = SectionTimer::new(section_secs);
        self.gate = ConfirmationGate::default();
        self.started_at = Some(Local::now());
        self.finished_at = None;
        self.mode = Mode::Running;
    }

    // --- accessors ---

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn timing(&self) -> TimingMode {
        self.timing
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_idx(&self) -> usize {
        self.section_idx
    }

    pub fn question_idx(&self) -> usize {
        self.question_idx
    }

    pub fn sheet(&self) -> &AnswerSheet {
        &self.sheet
    }

    pub fn timer(&self) -> &SectionTimer {
        &self.timer
    }

    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Local>> {
        self.finished_at
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.sections.get(self.section_idx)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_section()?.questions.get(self.question_idx)
    }

    pub fn on_last_section(&self) -> bool {
        self.section_idx + 1 >= self.sections.len()
    }

    // --- timer ---

    /// Advance the section clock. Ticks are only processed while Running;
    /// Paused suspends the countdown without resetting it. A pending prompt
    /// does not stop the clock.
    pub fn on_tick(&mut self, elapsed_ms: u64) {
        if self.mode != Mode::Running {
            return;
        }
        if self.timer.tick(elapsed_ms) {
            self.open_time_up_prompt();
        }
    }

    fn open_time_up_prompt(&mut self) {
        match self.timing {
            TimingMode::Strict => self.gate.open(
                "Time is Up!",
                "Strict timing: you must move on to the next section now.",
                PendingAction::AdvanceSection,
                true,
            ),
            TimingMode::Flexible => self.gate.open(
                "Time is Up!",
                "Time has run out. Confirm to move on, or dismiss to keep working in overtime.",
                PendingAction::AdvanceSection,
                false,
            ),
        }
    }

    pub fn toggle_timer_hidden(&mut self) {
        if matches!(self.mode, Mode::Running | Mode::Paused) {
            self.timer.toggle_hidden();
        }
    }

    // --- pause ---

    pub fn toggle_pause(&mut self) {
        self.mode = match self.mode {
            Mode::Running => Mode::Paused,
            Mode::Paused => Mode::Running,
            other => other,
        };
    }

    // --- navigation ---

    /// Next question. At the end of a non-final section while Running this
    /// opens the advance confirmation; in Review it crosses section
    /// boundaries freely.
    pub fn next_question(&mut self) {
        let Some(section) = self.current_section() else {
            return;
        };
        let at_section_end = self.question_idx + 1 >= section.len();
        match self.mode {
            Mode::Running => {
                if !at_section_end {
                    self.question_idx += 1;
                } else if !self.on_last_section() {
                    self.gate.open(
                        "Move On To Next Section?",
                        "Once you move on you will not be able to return, and the timer will reset.",
                        PendingAction::AdvanceSection,
                        false,
                    );
                }
            }
            Mode::Review => {
                if !at_section_end {
                    self.question_idx += 1;
                } else if !self.on_last_section() {
                    self.section_idx += 1;
                    self.question_idx = 0;
                }
            }
            _ => {}
        }
    }

    pub fn prev_question(&mut self) {
        match self.mode {
            Mode::Running => {
                self.question_idx = self.question_idx.saturating_sub(1);
            }
            Mode::Review => {
                if self.question_idx > 0 {
                    self.question_idx -= 1;
                } else if self.section_idx > 0 {
                    self.section_idx -= 1;
                    self.question_idx = self.sections[self.section_idx].len().saturating_sub(1);
                }
            }
            _ => {}
        }
    }

    pub fn jump_to_question(&mut self, idx: usize) {
        if !matches!(self.mode, Mode::Running | Mode::Review) {
            return;
        }
        if self.current_section().is_some_and(|s| idx < s.len()) {
            self.question_idx = idx;
        }
    }

    // --- answer operations (Running only) ---

    pub fn select_answer(&mut self, option: usize) {
        if self.mode != Mode::Running {
            return;
        }
        if self.current_question().is_some_and(|q| option < q.options.len()) {
            self.sheet.select(self.section_idx, self.question_idx, option);
        }
    }

    pub fn toggle_eliminated(&mut self, option: usize) {
        if self.mode != Mode::Running {
            return;
        }
        if self.current_question().is_some_and(|q| option < q.options.len()) {
            self.sheet
                .toggle_eliminated(self.section_idx, self.question_idx, option);
        }
    }

    pub fn toggle_flag(&mut self) {
        if self.mode != Mode::Running {
            return;
        }
        if self.current_question().is_some() {
            self.sheet.toggle_flag(self.section_idx, self.question_idx);
        }
    }

    // --- gated requests ---

    pub fn request_end_section(&mut self) {
        if self.mode != Mode::Running {
            return;
        }
        self.gate.open(
            "End Section Early?",
            "Finish this section now? You will not be able to return to it.",
            PendingAction::AdvanceSection,
            false,
        );
    }

    pub fn request_end_test(&mut self) {
        if !matches!(self.mode, Mode::Running | Mode::Paused) {
            return;
        }
        self.gate.open(
            "Finish Test?",
            "Stop the timer and review your answers?",
            PendingAction::EndTest,
            false,
        );
    }

    pub fn request_quit(&mut self) {
        if self.mode == Mode::Menu {
            return;
        }
        self.gate.open(
            "Quit Test?",
            "Quit now? Your progress will be lost.",
            PendingAction::Quit,
            false,
        );
    }

    // --- gate resolution ---

    /// Affirmative path: close the gate and apply its pending action.
    pub fn confirm(&mut self) {
        if let Some(prompt) = self.gate.take() {
            self.apply(prompt.action);
        }
    }

    /// Dismiss path: closes the gate. Forced prompts have no cancellation
    /// semantics, so dismissing one applies the action all the same.
    pub fn dismiss(&mut self) {
        if let Some(prompt) = self.gate.take() {
            if prompt.forced {
                self.apply(prompt.action);
            }
        }
    }

    fn apply(&mut self, action: PendingAction) {
        match action {
            PendingAction::AdvanceSection => self.advance_section(),
            PendingAction::EndTest => self.enter_review(),
            PendingAction::Quit => self.reset_to_menu(),
        }
    }

    fn advance_section(&mut self) {
        if !matches!(self.mode, Mode::Running | Mode::Paused) {
            return;
        }
        if self.on_last_section() {
            self.enter_review();
        } else {
            self.section_idx += 1;
            self.question_idx = 0;
            self.timer.reset();
        }
    }

    fn enter_review(&mut self) {
        self.mode = Mode::Review;
        self.section_idx = 0;
        self.question_idx = 0;
        self.finished_at = Some(Local::now());
    }

    fn reset_to_menu(&mut self) {
        self.sections = Vec::new();
        self.sheet = AnswerSheet::default();
        self.section_idx = 0;
        self.question_idx = 0;
        self.timer = SectionTimer::new(SECTION_SECS);
        self.mode = Mode::Menu;
    }

    // --- review ---

    pub fn toggle_full_review(&mut self) {
        self.mode = match self.mode {
            Mode::Review => Mode::FullReview,
            Mode::FullReview => Mode::Review,
            other => other,
        };
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
