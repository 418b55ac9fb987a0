use std::collections::HashSet;

use crate::bank::Section;

/// Mutable per-question record for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerState {
    pub selected: Option<usize>,
    pub eliminated: HashSet<usize>,
    pub flagged: bool,
}

impl AnswerState {
    pub fn is_eliminated(&self, option: usize) -> bool {
        self.eliminated.contains(&option)
    }
}

/// All answer records for a session, one slot per question in every section.
/// Fully allocated up front and never resized; discarded with the session.
///
/// The sheet holds raw mutations only. Mode gating (no-ops outside Running)
/// belongs to the session state machine that owns it.
#[derive(Debug, Clone, Default)]
pub struct AnswerSheet {
    records: Vec<Vec<AnswerState>>,
}

impl AnswerSheet {
    pub fn new(sections: &[Section]) -> Self {
        Self {
            records: sections
                .iter()
                .map(|s| vec![AnswerState::default(); s.len()])
                .collect(),
        }
    }

    pub fn get(&self, section: usize, question: usize) -> Option<&AnswerState> {
        self.records.get(section)?.get(question)
    }

    fn get_mut(&mut self, section: usize, question: usize) -> Option<&mut AnswerState> {
        self.records.get_mut(section)?.get_mut(question)
    }

    pub fn section(&self, section: usize) -> &[AnswerState] {
        self.records.get(section).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Toggle-select: picking the already-selected option clears the
    /// selection. Attempts to select an eliminated option are rejected here;
    /// elimination state is untouched either way.
    pub fn select(&mut self, section: usize, question: usize, option: usize) {
        let Some(state) = self.get_mut(section, question) else {
            return;
        };
        if state.is_eliminated(option) {
            return;
        }
        if state.selected == Some(option) {
            state.selected = None;
        } else {
            state.selected = Some(option);
        }
    }

    /// Flip the eliminated mark. Deliberately unguarded against the option
    /// being the current selection; the guard lives on the selection side.
    pub fn toggle_eliminated(&mut self, section: usize, question: usize, option: usize) {
        let Some(state) = self.get_mut(section, question) else {
            return;
        };
        if !state.eliminated.remove(&option) {
            state.eliminated.insert(option);
        }
    }

    pub fn toggle_flag(&mut self, section: usize, question: usize) {
        if let Some(state) = self.get_mut(section, question) {
            state.flagged = !state.flagged;
        }
    }

    pub fn answered_in_section(&self, section: usize) -> usize {
        self.section(section)
            .iter()
            .filter(|s| s.selected.is_some())
            .count()
    }

    /// 1-based numbers of flagged questions in a section.
    pub fn flagged_in_section(&self, section: usize) -> Vec<usize> {
        self.section(section)
            .iter()
            .enumerate()
            .filter(|(_, s)| s.flagged)
            .map(|(i, _)| i + 1)
            .collect()
    }
}
