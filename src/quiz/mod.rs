//! Self-quiz flow: question model, built-in bank, model-reply parsing and
//! the answer/score state machine.

pub mod bank;
pub mod generate;
pub mod question;
pub mod session;

pub use question::{Answer, ChoiceOption, Difficulty, Question, QuestionBody, QuizKind};
pub use session::{Confidence, QuizError, QuizResults, QuizSession, QuizState};
