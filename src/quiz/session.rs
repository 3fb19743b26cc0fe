//! Quiz sequencing: one answer and an optional confidence rating per
//! question, strictly forward unless the learner steps back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::question::{Answer, Question};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("a quiz needs at least one question")]
    NoQuestions,

    #[error("confidence must be between 1 and 5, got {0}")]
    InvalidConfidence(u8),

    #[error("the current question has not been answered")]
    NotAnswered,

    #[error("no quiz in progress")]
    NotInProgress,

    #[error("could not read generated questions: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum QuizState {
    /// No questions loaded.
    Empty,
    Unanswered(usize),
    Answered(usize),
    Finished,
}

/// Self-assessed confidence, 1 (guess) to 5 (certain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Confidence(u8);

impl Confidence {
    pub fn new(level: u8) -> Result<Self, QuizError> {
        if (1..=5).contains(&level) {
            Ok(Self(level))
        } else {
            Err(QuizError::InvalidConfidence(level))
        }
    }

    pub fn level(&self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionReview {
    pub question_id: u32,
    pub answer: Option<Answer>,
    pub correct: bool,
    pub confidence: Option<Confidence>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizResults {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub review: Vec<QuestionReview>,
}

#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    answers: Vec<Option<Answer>>,
    confidence: Vec<Option<Confidence>>,
    finished: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        let mut session = Self::default();
        session.load(questions)?;
        Ok(session)
    }

    /// Replaces any previous quiz and starts at the first question.
    pub fn load(&mut self, questions: Vec<Question>) -> Result<(), QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        self.answers = vec![None; questions.len()];
        self.confidence = vec![None; questions.len()];
        self.questions = questions;
        self.current = 0;
        self.finished = false;
        Ok(())
    }

    pub fn state(&self) -> QuizState {
        if self.questions.is_empty() {
            QuizState::Empty
        } else if self.finished {
            QuizState::Finished
        } else if self.answers[self.current].is_some() {
            QuizState::Answered(self.current)
        } else {
            QuizState::Unanswered(self.current)
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state() {
            QuizState::Unanswered(i) | QuizState::Answered(i) => self.questions.get(i),
            QuizState::Empty | QuizState::Finished => None,
        }
    }

    pub fn answer_for(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index).and_then(Option::as_ref)
    }

    pub fn confidence_for(&self, index: usize) -> Option<Confidence> {
        self.confidence.get(index).copied().flatten()
    }

    /// Records (or overwrites) the answer to the current question.
    pub fn answer(&mut self, answer: Answer) -> Result<QuizState, QuizError> {
        let index = self.in_progress()?;
        self.answers[index] = Some(answer);
        Ok(self.state())
    }

    pub fn rate(&mut self, level: u8) -> Result<(), QuizError> {
        let index = self.in_progress()?;
        if self.answers[index].is_none() {
            return Err(QuizError::NotAnswered);
        }
        self.confidence[index] = Some(Confidence::new(level)?);
        Ok(())
    }

    /// Moves past an answered question. Does nothing on an unanswered one.
    pub fn advance(&mut self) -> QuizState {
        if let QuizState::Answered(index) = self.state() {
            if index + 1 == self.questions.len() {
                self.finished = true;
            } else {
                self.current = index + 1;
            }
        }
        self.state()
    }

    /// Steps back one question, keeping its answer.
    pub fn back(&mut self) -> QuizState {
        if self.in_progress().is_ok() && self.current > 0 {
            self.current -= 1;
        }
        self.state()
    }

    /// Same questions, fresh attempt.
    pub fn restart(&mut self) {
        if self.questions.is_empty() {
            return;
        }
        self.answers.iter_mut().for_each(|a| *a = None);
        self.confidence.iter_mut().for_each(|c| *c = None);
        self.current = 0;
        self.finished = false;
    }

    /// Drops the question list entirely.
    pub fn new_quiz(&mut self) {
        *self = Self::default();
    }

    pub fn score(&self) -> usize {
        self.questions
            .iter()
            .zip(&self.answers)
            .filter(|(question, answer)| answer.as_ref().is_some_and(|a| question.is_correct(a)))
            .count()
    }

    pub fn results(&self) -> QuizResults {
        let review: Vec<QuestionReview> = self
            .questions
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let answer = self.answers[i].clone();
                QuestionReview {
                    question_id: question.id,
                    correct: answer.as_ref().is_some_and(|a| question.is_correct(a)),
                    answer,
                    confidence: self.confidence[i],
                    explanation: question.explanation.clone(),
                }
            })
            .collect();

        let score = review.iter().filter(|r| r.correct).count();
        let total = self.questions.len();
        let percentage = if total == 0 {
            0.0
        } else {
            score as f64 / total as f64 * 100.0
        };

        QuizResults {
            score,
            total,
            percentage,
            review,
        }
    }

    fn in_progress(&self) -> Result<usize, QuizError> {
        match self.state() {
            QuizState::Unanswered(i) | QuizState::Answered(i) => Ok(i),
            QuizState::Empty | QuizState::Finished => Err(QuizError::NotInProgress),
        }
    }
}
