//! Question bank: embedded practice items, sampled into timed sections.

mod core;
mod sampler;

pub use self::core::{Question, Section, SectionKind, TestType};
pub use self::sampler::{load_questions, load_questions_with_rng};
