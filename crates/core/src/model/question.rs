use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("duplicate question id: {0}")]
    DuplicateId(QuestionId),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A German/Spanish vocabulary pair attached to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabPair {
    #[serde(rename = "de")]
    pub term: String,
    #[serde(rename = "es")]
    pub translation: String,
}

/// A single multiple-choice item from the externally supplied bank.
///
/// The bank is read-only input; the core never mutates questions. Wire field
/// names follow the bank JSON (`explanation_es`, `question_es`, `de`/`es`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub exam: String,
    pub section: String,
    pub teil: u8,
    pub number: u32,
    #[serde(default)]
    pub context: String,
    pub question: String,
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct: String,
    #[serde(rename = "explanation_es", default)]
    pub explanation: String,
    #[serde(rename = "question_es", default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub vocabulary: Vec<VocabPair>,
}

impl Question {
    /// Section grouping key used for per-section statistics, e.g.
    /// `Leseverstehen T2`.
    #[must_use]
    pub fn section_key(&self) -> String {
        format!("{} T{}", self.section, self.teil)
    }

    /// Normalizes the stored correct answer to a single uppercase letter.
    ///
    /// Returns `'?'` when the bank entry is empty.
    #[must_use]
    pub fn correct_letter(&self) -> char {
        normalize_answer(&self.correct)
    }

    /// Extracts the answer key from an option label.
    ///
    /// Labels usually start with their letter (`"b) Morgen"` → `B`); options
    /// without a leading letter fall back to their position (`A`, `B`, ...).
    #[must_use]
    pub fn option_key(label: &str, index: usize) -> char {
        label
            .chars()
            .next()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or_else(|| positional_key(index))
    }

    /// Returns true when the chosen answer key matches the correct letter.
    #[must_use]
    pub fn is_correct(&self, choice: char) -> bool {
        choice.to_ascii_uppercase() == self.correct_letter()
    }
}

fn normalize_answer(answer: &str) -> char {
    answer
        .trim()
        .chars()
        .next()
        .map_or('?', |c| c.to_ascii_uppercase())
}

fn positional_key(index: usize) -> char {
    // 26 letters, wraps for pathological option counts.
    char::from(b'A' + (index % 26) as u8)
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// The full set of questions, supplied once at startup.
///
/// Iteration preserves supply order; lookups go through the id index.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
    by_id: HashMap<QuestionId, usize>,
}

impl QuestionBank {
    /// Builds a bank from the supplied questions.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::DuplicateId` if two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        let mut by_id = HashMap::with_capacity(questions.len());
        for (idx, q) in questions.iter().enumerate() {
            if by_id.insert(q.id.clone(), idx).is_some() {
                return Err(QuestionError::DuplicateId(q.id.clone()));
            }
        }
        Ok(Self { questions, by_id })
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.by_id.get(id).map(|&idx| &self.questions[idx])
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn first(&self) -> Option<&Question> {
        self.questions.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_question(id: &str) -> Question {
        Question {
            id: QuestionId::new(id),
            exam: "Test 1".to_owned(),
            section: "Leseverstehen".to_owned(),
            teil: 2,
            number: 6,
            context: String::new(),
            question: "Was passt?".to_owned(),
            instruction: String::new(),
            options: vec!["a) eins".to_owned(), "b) zwei".to_owned()],
            correct: "b".to_owned(),
            explanation: "Porque sí.".to_owned(),
            translation: None,
            vocabulary: Vec::new(),
        }
    }

    #[test]
    fn section_key_combines_section_and_teil() {
        assert_eq!(sample_question("q1").section_key(), "Leseverstehen T2");
    }

    #[test]
    fn correct_letter_normalizes_case_and_whitespace() {
        let mut q = sample_question("q1");
        q.correct = " b) zwei".to_owned();
        assert_eq!(q.correct_letter(), 'B');
        q.correct = String::new();
        assert_eq!(q.correct_letter(), '?');
    }

    #[test]
    fn option_key_prefers_leading_letter() {
        assert_eq!(Question::option_key("b) zwei", 0), 'B');
        assert_eq!(Question::option_key("X", 4), 'X');
    }

    #[test]
    fn option_key_falls_back_to_position() {
        assert_eq!(Question::option_key("1. option", 0), 'A');
        assert_eq!(Question::option_key("", 2), 'C');
    }

    #[test]
    fn is_correct_ignores_case() {
        let q = sample_question("q1");
        assert!(q.is_correct('b'));
        assert!(q.is_correct('B'));
        assert!(!q.is_correct('A'));
    }

    #[test]
    fn bank_rejects_duplicate_ids() {
        let err = QuestionBank::new(vec![sample_question("q1"), sample_question("q1")])
            .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateId(QuestionId::new("q1")));
    }

    #[test]
    fn bank_lookup_by_id() {
        let bank =
            QuestionBank::new(vec![sample_question("q1"), sample_question("q2")]).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(
            bank.get(&QuestionId::new("q2")).map(|q| q.id.as_str()),
            Some("q2")
        );
        assert!(bank.get(&QuestionId::new("missing")).is_none());
    }

    #[test]
    fn question_deserializes_from_bank_json() {
        let json = r#"{
            "id": "test1-lv2-6",
            "exam": "Test 1",
            "section": "Leseverstehen",
            "teil": 2,
            "number": 6,
            "question": "Was passt?",
            "options": ["a) eins", "b) zwei"],
            "correct": "b",
            "explanation_es": "Porque sí.",
            "vocabulary": [{"de": "zwei", "es": "dos"}]
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, QuestionId::new("test1-lv2-6"));
        assert_eq!(q.explanation, "Porque sí.");
        assert_eq!(q.vocabulary[0].term, "zwei");
        assert_eq!(q.vocabulary[0].translation, "dos");
        assert!(q.translation.is_none());
        assert!(q.instruction.is_empty());
    }
}
