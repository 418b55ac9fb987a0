use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::BankError;

static BANK_DIR: Dir = include_dir!("src/bank/data");

/// What the learner asked to practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum TestType {
    #[strum(serialize = "LR")]
    Lr,
    #[strum(serialize = "RC")]
    Rc,
    #[strum(serialize = "AR")]
    Ar,
    #[strum(serialize = "FULL")]
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum SectionKind {
    #[strum(serialize = "Logical Reasoning")]
    LogicalReasoning,
    #[strum(serialize = "Reading Comprehension")]
    ReadingComprehension,
    #[strum(serialize = "Analytical Reasoning")]
    AnalyticalReasoning,
}

/// A single multiple-choice item. Immutable once loaded. `correct` is never
/// shown to the learner before review.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub context: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub id: String,
}

impl Question {
    /// Context paragraphs, split on blank lines as authored.
    pub fn context_blocks(&self) -> impl Iterator<Item = &str> {
        self.context.split("\n\n").filter(|b| !b.is_empty())
    }
}

/// An ordered group of questions sharing one timed interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub questions: Vec<Question>,
}

impl Section {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

// Wire format of the embedded data files, as produced by the upstream
// question-extraction pipeline.

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawItem {
    pub context: String,
    pub question: String,
    pub answers: Vec<String>,
    pub label: usize,
    pub id_string: String,
}

impl RawItem {
    pub(crate) fn into_question(self) -> Question {
        Question {
            context: self.context,
            prompt: self.question,
            options: self.answers,
            correct: self.label,
            id: self.id_string,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPassage {
    pub context_id: String,
    pub context: String,
    pub questions: Vec<RawPassageQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPassageQuestion {
    pub question: String,
    pub answers: Vec<String>,
    pub label: usize,
    pub id_string: String,
}

fn read_bank<T: DeserializeOwned>(name: &'static str) -> Result<Vec<T>, BankError> {
    let file = BANK_DIR
        .get_file(format!("{name}.json"))
        .unwrap_or_else(|| panic!("embedded bank `{name}` missing"));
    let text = file
        .contents_utf8()
        .unwrap_or_else(|| panic!("embedded bank `{name}` is not UTF-8"));
    let items: Vec<T> =
        serde_json::from_str(text).map_err(|source| BankError::MalformedData { name, source })?;
    if items.is_empty() {
        return Err(BankError::EmptyBank(name));
    }
    Ok(items)
}

pub(crate) fn lr_items() -> Result<Vec<RawItem>, BankError> {
    read_bank("lr")
}

pub(crate) fn ar_items() -> Result<Vec<RawItem>, BankError> {
    read_bank("ar")
}

pub(crate) fn rc_passages() -> Result<Vec<RawPassage>, BankError> {
    read_bank("rc")
}
