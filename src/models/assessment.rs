// src/models/assessment.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Represents the 'assessments' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,

    pub title: String,

    pub description: String,

    /// Assessment category (e.g., "verbal", "numerical").
    pub category: String,

    /// Time limit in minutes.
    pub duration_minutes: i32,

    pub total_questions: i32,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Represents the 'questions' table in the database.
/// Immutable after creation; owned by an Assessment.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    pub assessment_id: i64,

    pub question_text: String,

    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,

    /// Index of the correct option: 1, 2, 3 or 4.
    pub correct_option: i32,

    /// Ordinal position within the assessment.
    pub position: i32,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for sending a question to a test taker (excludes the correct option).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub question_text: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    pub position: i32,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question_text: q.question_text,
            option1: q.option1,
            option2: q.option2,
            option3: q.option3,
            option4: q.option4,
            position: q.position,
        }
    }
}

/// DTO for returning an assessment together with its (answer-free) questions.
#[derive(Debug, Serialize)]
pub struct AssessmentDetail {
    pub assessment: Assessment,
    pub questions: Vec<PublicQuestion>,
}
