use actix_web::{web, HttpResponse};
use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::quiz::bank::mock_questions;
use crate::quiz::generate::{build_prompt, questions_from_reply};
use crate::quiz::{Answer, Difficulty, Question, QuizError, QuizKind, QuizSession};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    quiz_type: QuizKind,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    content: String,
    /// Raw model output, when the client already queried a model.
    #[serde(default)]
    reply: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    questions: Vec<Question>,
    #[serde(default)]
    answers: Vec<Option<Answer>>,
    #[serde(default)]
    confidence: Vec<Option<u8>>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quiz")
            .route("/generate", web::post().to(generate_quiz))
            .route("/score", web::post().to(score_quiz)),
    );
}

async fn generate_quiz(body: web::Json<GenerateRequest>) -> HttpResponse {
    let request = body.into_inner();
    info!(
        "Generating {} quiz ({})",
        request.quiz_type.full_name(),
        request.difficulty.as_str()
    );

    let questions = match request.reply.as_deref() {
        Some(reply) => questions_from_reply(reply, request.quiz_type, request.difficulty),
        None => mock_questions(request.quiz_type, request.difficulty),
    };

    HttpResponse::Ok().json(json!({
        "prompt": build_prompt(&request.content, request.quiz_type, request.difficulty),
        "questions": questions,
    }))
}

/// Replays an attempt through a [`QuizSession`] and returns its results.
/// Answers run in order; trailing unanswered questions score as wrong, but an
/// answer after an unanswered one is rejected.
async fn score_quiz(body: web::Json<ScoreRequest>) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    if let Some(gap) = request.answers.iter().position(Option::is_none) {
        if request.answers[gap..].iter().any(Option::is_some) {
            return Err(ApiError::validation(format!("Question {} is not answered", gap + 1)));
        }
    }
    let mut session = QuizSession::new(request.questions).map_err(quiz_error)?;

    let total = session.questions().len();
    for index in 0..total {
        let Some(answer) = request.answers.get(index).cloned().flatten() else {
            break;
        };
        session.answer(answer).map_err(quiz_error)?;
        if let Some(level) = request.confidence.get(index).copied().flatten() {
            session.rate(level).map_err(quiz_error)?;
        }
        session.advance();
    }

    Ok(HttpResponse::Ok().json(session.results()))
}

fn quiz_error(e: QuizError) -> ApiError {
    ApiError::validation(e.to_string())
}
