//! Built-in question sets, served when no generated quiz is available.

use super::question::{ChoiceOption, Difficulty, Question, QuestionBody, QuizKind};

/// A five-question database-fundamentals quiz of the given kind. The bank
/// holds one set per kind; `difficulty` does not change it yet.
pub fn mock_questions(kind: QuizKind, _difficulty: Difficulty) -> Vec<Question> {
    match kind {
        QuizKind::Mcq => multiple_choice(),
        QuizKind::Tf => true_false(),
        QuizKind::Fitb => fill_in_the_blank(),
    }
}

/// Option ids in display order.
pub const OPTION_IDS: [&str; 4] = ["A", "B", "C", "D"];

pub(crate) fn options(texts: &[&str]) -> Vec<ChoiceOption> {
    OPTION_IDS
        .iter()
        .zip(texts)
        .map(|(id, text)| ChoiceOption {
            id: (*id).to_string(),
            text: (*text).to_string(),
        })
        .collect()
}

fn question(id: u32, text: &str, body: QuestionBody, explanation: &str, hint: &str) -> Question {
    Question {
        id,
        question: text.to_string(),
        body,
        explanation: explanation.to_string(),
        hint: hint.to_string(),
    }
}

fn choice(texts: &[&str], correct: &str) -> QuestionBody {
    QuestionBody::MultipleChoice {
        options: options(texts),
        correct_answer: correct.to_string(),
    }
}

fn multiple_choice() -> Vec<Question> {
    vec![
        question(
            1,
            "What does ACID stand for in database transactions?",
            choice(
                &[
                    "Atomicity, Consistency, Isolation, Durability",
                    "Automicity, Corruption, Isolation, Durability",
                    "Atomicity, Concurrency, Indexing, Duplication",
                    "Accuracy, Consistency, Integration, Data",
                ],
                "A",
            ),
            "ACID stands for Atomicity, Consistency, Isolation, and Durability, the properties that make transactions reliable.",
            "Think about the properties that guarantee reliable processing of transactions.",
        ),
        question(
            2,
            "Which normal form eliminates transitive dependencies?",
            choice(
                &[
                    "First Normal Form (1NF)",
                    "Second Normal Form (2NF)",
                    "Third Normal Form (3NF)",
                    "Boyce-Codd Normal Form (BCNF)",
                ],
                "C",
            ),
            "Third Normal Form removes transitive dependencies, where a non-key attribute depends on another non-key attribute.",
            "It's not 1NF or 2NF, and it comes before BCNF.",
        ),
        question(
            3,
            "What type of SQL statement is used to retrieve data from a database?",
            choice(&["UPDATE", "INSERT", "DELETE", "SELECT"], "D"),
            "SELECT retrieves data and is one of the most common SQL commands.",
            "This statement lets you specify exactly which data you want back.",
        ),
        question(
            4,
            "Which of the following is NOT a type of database key?",
            choice(&["Primary Key", "Foreign Key", "Unique Key", "Reference Key"], "D"),
            "Reference Key is not a standard key type. Common keys include primary, foreign, unique and composite keys.",
            "Three of these are standard key types.",
        ),
        question(
            5,
            "Which JOIN type returns rows that have matching values in both tables?",
            choice(&["LEFT JOIN", "RIGHT JOIN", "FULL JOIN", "INNER JOIN"], "D"),
            "INNER JOIN returns only the rows with a match in both tables.",
            "The most common join, returning only matching records.",
        ),
    ]
}

fn true_false() -> Vec<Question> {
    let tf = |correct_answer| QuestionBody::TrueFalse { correct_answer };
    vec![
        question(
            1,
            "A foreign key can reference any column in another table, even if it's not a primary key.",
            tf(false),
            "False. A foreign key must reference a primary key or a unique key in the referenced table.",
            "Think about the constraints on what a foreign key can reference.",
        ),
        question(
            2,
            "SQL stands for Structured Query Language.",
            tf(true),
            "True. SQL is the standard language of relational database systems.",
            "This is the full form of the most common query language.",
        ),
        question(
            3,
            "NoSQL databases strictly follow the ACID properties.",
            tf(false),
            "False. Many NoSQL stores trade ACID guarantees for scalability and follow the BASE model instead.",
            "Consider the design priorities of NoSQL compared with relational databases.",
        ),
        question(
            4,
            "An index improves the speed of data retrieval operations on a database.",
            tf(true),
            "True. Indexes locate rows without scanning the whole table, like the index of a book.",
            "Think about how this feature affects query performance.",
        ),
        question(
            5,
            "In a relational database, a table can have multiple primary keys.",
            tf(false),
            "False. A table has one primary key, though it may span several columns.",
            "Consider the uniqueness requirements of primary keys.",
        ),
    ]
}

fn fill_in_the_blank() -> Vec<Question> {
    let blank = |answer: &str| QuestionBody::FillInTheBlank {
        correct_answer: answer.to_string(),
    };
    vec![
        question(
            1,
            "The [...] clause in SQL is used to filter records based on specified conditions.",
            blank("WHERE"),
            "WHERE filters records and keeps only those that satisfy a condition.",
            "This keyword follows SELECT and FROM in a basic query.",
        ),
        question(
            2,
            "The process of organizing data to minimize redundancy is called database [...].",
            blank("normalization"),
            "Normalization structures a relational database to reduce redundancy and improve integrity.",
            "The process of organizing data according to normal forms.",
        ),
        question(
            3,
            "A [...] is a special type of stored procedure that executes automatically when specified events occur in the database.",
            blank("trigger"),
            "A trigger runs automatically when a specified event occurs on the server.",
            "This feature responds automatically to changes in the data.",
        ),
        question(
            4,
            "In database terminology, [...] refers to the property that ensures all transactions are properly completed or completely rolled back.",
            blank("atomicity"),
            "Atomicity makes each transaction all or nothing.",
            "This is the 'A' in ACID.",
        ),
        question(
            5,
            "The SQL command [...] is used to modify existing records in a table.",
            blank("UPDATE"),
            "UPDATE modifies field values of existing rows.",
            "This command changes values in rows that already exist.",
        ),
    ]
}
