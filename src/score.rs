use crate::answers::{AnswerSheet, AnswerState};
use crate::bank::{Section, SectionKind};

/// How one question went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    Skipped,
}

pub fn verdict(correct: usize, state: &AnswerState) -> Verdict {
    match state.selected {
        None => Verdict::Skipped,
        Some(sel) if sel == correct => Verdict::Correct,
        Some(_) => Verdict::Incorrect,
    }
}

/// Count of questions whose selection matches the answer key. An unanswered
/// question never counts.
pub fn section_score(section: &Section, sheet: &AnswerSheet, section_idx: usize) -> usize {
    section
        .questions
        .iter()
        .zip(sheet.section(section_idx))
        .filter(|(q, state)| state.selected == Some(q.correct))
        .count()
}

pub fn section_percent(section: &Section, sheet: &AnswerSheet, section_idx: usize) -> u32 {
    if section.is_empty() {
        return 0;
    }
    let score = section_score(section, sheet, section_idx);
    ((100.0 * score as f64) / section.len() as f64).round() as u32
}

/// One question's line in the full-review dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    /// 1-based question number within the section.
    pub number: usize,
    pub selected: Option<usize>,
    pub correct: usize,
    pub verdict: Verdict,
}

#[derive(Debug, Clone)]
pub struct SectionSummary {
    pub kind: SectionKind,
    pub score: usize,
    pub total: usize,
    pub percent: u32,
    pub rows: Vec<ReviewRow>,
}

/// Derive the aggregate review for every section. Pure derivation over the
/// loaded sections and the answer sheet; computed on demand, never stored.
pub fn full_report(sections: &[Section], sheet: &AnswerSheet) -> Vec<SectionSummary> {
    sections
        .iter()
        .enumerate()
        .map(|(s_idx, section)| {
            let rows = section
                .questions
                .iter()
                .zip(sheet.section(s_idx))
                .enumerate()
                .map(|(q_idx, (q, state))| ReviewRow {
                    number: q_idx + 1,
                    selected: state.selected,
                    correct: q.correct,
                    verdict: verdict(q.correct, state),
                })
                .collect();
            SectionSummary {
                kind: section.kind,
                score: section_score(section, sheet, s_idx),
                total: section.len(),
                percent: section_percent(section, sheet, s_idx),
                rows,
            }
        })
        .collect()
}

/// Display letter for an option index: 0 -> A, 1 -> B, ...
pub fn option_letter(idx: usize) -> char {
    (b'A' + (idx as u8 % 26)) as char
}
