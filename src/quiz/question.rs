use serde::{Deserialize, Serialize};

/// Quiz format, using the short names the web client sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizKind {
    #[default]
    Mcq,
    Tf,
    Fitb,
}

impl QuizKind {
    pub fn full_name(&self) -> &'static str {
        match self {
            QuizKind::Mcq => "Multiple Choice",
            QuizKind::Tf => "True/False",
            QuizKind::Fitb => "Fill in the Blank",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Moderate,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionBody {
    MultipleChoice {
        options: Vec<ChoiceOption>,
        correct_answer: String,
    },
    TrueFalse {
        correct_answer: bool,
    },
    FillInTheBlank {
        correct_answer: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub question: String,
    #[serde(flatten)]
    pub body: QuestionBody,
    pub explanation: String,
    pub hint: String,
}

/// A learner's response. The variant must fit the question's body to score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// Option id of a multiple-choice question.
    Choice(String),
    Boolean(bool),
    Text(String),
}

impl Question {
    /// Choice and boolean answers match exactly; fill-in-the-blank text
    /// matches ignoring case.
    pub fn is_correct(&self, answer: &Answer) -> bool {
        match (&self.body, answer) {
            (QuestionBody::MultipleChoice { correct_answer, .. }, Answer::Choice(choice)) => {
                choice == correct_answer
            }
            (QuestionBody::TrueFalse { correct_answer }, Answer::Boolean(value)) => value == correct_answer,
            (QuestionBody::FillInTheBlank { correct_answer }, Answer::Text(text)) => {
                text.to_lowercase() == correct_answer.to_lowercase()
            }
            _ => false,
        }
    }

    pub fn kind(&self) -> QuizKind {
        match self.body {
            QuestionBody::MultipleChoice { .. } => QuizKind::Mcq,
            QuestionBody::TrueFalse { .. } => QuizKind::Tf,
            QuestionBody::FillInTheBlank { .. } => QuizKind::Fitb,
        }
    }
}
