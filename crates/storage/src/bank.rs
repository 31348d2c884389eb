use trainer_core::model::{Question, QuestionBank};

use crate::repository::StorageError;

/// Parse the question bank JSON supplied at startup.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON or duplicate
/// question ids.
pub fn parse_question_bank(json: &str) -> Result<QuestionBank, StorageError> {
    let questions: Vec<Question> =
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
    QuestionBank::new(questions).map_err(|e| StorageError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK_JSON: &str = r#"[
        {
            "id": "test1-lv1-1",
            "exam": "Test 1",
            "section": "Leseverstehen",
            "teil": 1,
            "number": 1,
            "question": "Was passt?",
            "options": ["a) eins", "b) zwei"],
            "correct": "a",
            "explanation_es": "La primera."
        },
        {
            "id": "test1-sb2-4",
            "exam": "Test 1",
            "section": "Sprachbausteine",
            "teil": 2,
            "number": 4,
            "question": "Lücke 4",
            "options": ["a) dem", "b) den", "c) der"],
            "correct": "c",
            "explanation_es": "Dativo femenino."
        }
    ]"#;

    #[test]
    fn parses_a_small_bank() {
        let bank = parse_question_bank(BANK_JSON).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.first().unwrap().section_key(), "Leseverstehen T1");
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = parse_question_bank("[{]").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let duplicated = format!(
            "[{q},{q}]",
            q = r#"{"id":"q1","exam":"T","section":"S","teil":1,"number":1,"question":"?","correct":"a"}"#
        );
        let err = parse_question_bank(&duplicated).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
