//! Clarification questions
//!
//! Before building a list the oracle may ask a handful of short questions whose
//! answers materially change what to pack. Answers are folded back into the
//! trip description; nothing else about the pipeline changes.

use serde::{Deserialize, Serialize};

/// Header line introducing the folded-in answers
pub const DETAILS_HEADER: &str = "פרטים נוספים:";

/// Rendering of a yes answer
pub const YES: &str = "כן";

/// Rendering of a no answer
pub const NO: &str = "לא";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    YesNo,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationQuestion {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    YesNo(bool),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarificationAnswer {
    pub question_id: String,
    pub answer: Answer,
}

/// Fold answers into the description
///
/// Questions are listed in question order; unanswered ones are skipped. With no
/// answers at all the description is returned unchanged.
pub fn enhance_description(
    description: &str,
    questions: &[ClarificationQuestion],
    answers: &[ClarificationAnswer],
) -> String {
    let lines: Vec<String> = questions
        .iter()
        .filter_map(|q| {
            let answer = answers.iter().find(|a| a.question_id == q.id)?;
            let rendered = match &answer.answer {
                Answer::YesNo(true) => YES.to_string(),
                Answer::YesNo(false) => NO.to_string(),
                Answer::Text(text) => text.trim().to_string(),
            };
            Some(format!("- {} {}", q.question, rendered))
        })
        .collect();

    if lines.is_empty() {
        return description.to_string();
    }

    format!("{}\n\n{}\n{}", description, DETAILS_HEADER, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, text: &str) -> ClarificationQuestion {
        ClarificationQuestion {
            id: id.to_string(),
            question: text.to_string(),
            kind: QuestionKind::YesNo,
        }
    }

    #[test]
    fn test_enhance_description_yes_no() {
        let questions = vec![question("q1", "נוסעים ברכב?"), question("q2", "יש ילדים?")];
        let answers = vec![
            ClarificationAnswer {
                question_id: "q2".to_string(),
                answer: Answer::YesNo(false),
            },
            ClarificationAnswer {
                question_id: "q1".to_string(),
                answer: Answer::YesNo(true),
            },
        ];

        let enhanced = enhance_description("טיול לנגב", &questions, &answers);
        assert_eq!(
            enhanced,
            "טיול לנגב\n\nפרטים נוספים:\n- נוסעים ברכב? כן\n- יש ילדים? לא"
        );
    }

    #[test]
    fn test_enhance_description_skips_unanswered() {
        let questions = vec![question("q1", "Driving?"), question("q2", "Kids?")];
        let answers = vec![ClarificationAnswer {
            question_id: "q2".to_string(),
            answer: Answer::Text("  two toddlers ".to_string()),
        }];

        let enhanced = enhance_description("Beach week", &questions, &answers);
        assert!(enhanced.ends_with("- Kids? two toddlers"));
        assert!(!enhanced.contains("Driving?"));
    }

    #[test]
    fn test_enhance_description_no_answers_unchanged() {
        let questions = vec![question("q1", "Driving?")];
        assert_eq!(enhance_description("Beach week", &questions, &[]), "Beach week");
    }

    #[test]
    fn test_question_wire_format() {
        let q: ClarificationQuestion =
            serde_json::from_str(r#"{"id": "q1", "question": "Driving?", "type": "yes_no"}"#).unwrap();
        assert_eq!(q.kind, QuestionKind::YesNo);

        let a: ClarificationAnswer = serde_json::from_str(r#"{"questionId": "q1", "answer": true}"#).unwrap();
        assert_eq!(a.answer, Answer::YesNo(true));
    }
}
