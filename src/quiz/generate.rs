//! Prompt construction and parsing of model-written quizzes.
//!
//! Talking to a model is left to the caller. A reply that cannot be parsed
//! falls back to the built-in bank so the learner always gets a quiz.

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use super::bank::{mock_questions, options};
use super::question::{Difficulty, Question, QuestionBody, QuizKind};
use super::session::QuizError;

pub fn build_prompt(content: &str, kind: QuizKind, difficulty: Difficulty) -> String {
    let instructions = match kind {
        QuizKind::Mcq => "Generate 5 multiple choice questions with 4 options each. For each question provide: question text, options (A, B, C, D), correct answer, and a brief explanation.",
        QuizKind::Tf => "Generate 5 true/false questions. For each question provide: question text, whether it's true or false, and a brief explanation.",
        QuizKind::Fitb => "Generate 5 fill-in-the-blank questions. For each question provide: question text with blank indicated by [...], the correct answer for the blank, and a brief explanation.",
    };

    format!(
        "Generate a {level} difficulty {name} quiz based on the following content:\n\n{content}\n\n{instructions}\nThe difficulty level should be {level}. Format the response in JSON.",
        level = difficulty.as_str(),
        name = kind.full_name(),
        content = content,
        instructions = instructions,
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: Option<Value>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Parses a model reply (a JSON array, optionally inside a code fence).
pub fn parse_generated(text: &str, kind: QuizKind) -> Result<Vec<Question>, QuizError> {
    let raw: Vec<RawQuestion> =
        serde_json::from_str(strip_code_fence(text)).map_err(|e| QuizError::Malformed(e.to_string()))?;
    if raw.is_empty() {
        return Err(QuizError::NoQuestions);
    }

    raw.into_iter()
        .enumerate()
        .map(|(i, q)| convert(i as u32 + 1, q, kind))
        .collect()
}

/// Parsed questions, or the bank's set when the reply is unusable.
pub fn questions_from_reply(text: &str, kind: QuizKind, difficulty: Difficulty) -> Vec<Question> {
    match parse_generated(text, kind) {
        Ok(questions) => questions,
        Err(e) => {
            warn!("Falling back to built-in {} questions: {}", kind.full_name(), e);
            mock_questions(kind, difficulty)
        }
    }
}

fn convert(id: u32, raw: RawQuestion, kind: QuizKind) -> Result<Question, QuizError> {
    let malformed = |what: &str| QuizError::Malformed(format!("question {}: {}", id, what));

    let body = match kind {
        QuizKind::Mcq => {
            if raw.options.len() != 4 {
                return Err(malformed("expected 4 options"));
            }
            let correct = match raw.correct_answer {
                Some(Value::String(s)) if ["A", "B", "C", "D"].contains(&s.trim()) => s.trim().to_string(),
                _ => return Err(malformed("correct answer must be A, B, C or D")),
            };
            let texts: Vec<&str> = raw.options.iter().map(String::as_str).collect();
            QuestionBody::MultipleChoice {
                options: options(&texts),
                correct_answer: correct,
            }
        }
        QuizKind::Tf => {
            let correct = match raw.correct_answer {
                Some(Value::Bool(b)) => b,
                Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
                _ => return Err(malformed("missing true/false answer")),
            };
            QuestionBody::TrueFalse { correct_answer: correct }
        }
        QuizKind::Fitb => {
            let answer = raw
                .answer
                .or_else(|| match raw.correct_answer {
                    Some(Value::String(s)) => Some(s),
                    _ => None,
                })
                .filter(|a| !a.trim().is_empty())
                .ok_or_else(|| malformed("missing answer"))?;
            QuestionBody::FillInTheBlank { correct_answer: answer }
        }
    };

    Ok(Question {
        id,
        question: raw.question,
        body,
        explanation: raw
            .explanation
            .unwrap_or_else(|| "No explanation provided".to_string()),
        hint: raw.hint.unwrap_or_else(|| default_hint(kind).to_string()),
    })
}

fn default_hint(kind: QuizKind) -> &'static str {
    match kind {
        QuizKind::Mcq => "Think carefully about the subject material.",
        QuizKind::Tf => "Consider whether this statement aligns with the facts.",
        QuizKind::Fitb => "Try to recall the key term from your notes.",
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an info string such as `json` on the opening fence.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().trim_end_matches("```").trim()
}
