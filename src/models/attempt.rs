// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use std::collections::HashMap;
use validator::Validate;

/// Represents the 'attempts' table in the database.
/// One row per scored submission; immutable after creation (a retake
/// creates a new row).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Attempt {
    pub id: i64,
    pub user_id: String,
    pub assessment_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert payload for an attempt; the answer records travel with it so the
/// store can land both in one transaction.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub user_id: String,
    pub assessment_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting a test attempt.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitTestRequest {
    pub assessment_id: i64,

    /// User's answers map.
    /// Key: Question ID
    /// Value: selected option index (1-4)
    /// Unanswered questions are simply absent.
    #[validate(custom(function = validate_option_indices))]
    pub answers: HashMap<i64, i32>,
}

fn validate_option_indices(answers: &HashMap<i64, i32>) -> Result<(), validator::ValidationError> {
    for selected in answers.values() {
        if !(1..=4).contains(selected) {
            return Err(validator::ValidationError::new("option_out_of_range"));
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct SubmitTestResponse {
    pub attempt_id: i64,
    pub score: i32,
}

/// One answered question of an attempt, joined with its question row for the
/// results view. Ordered by question position.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnswerDetail {
    pub question_id: i64,
    pub question_text: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    pub correct_option: i32,
    pub position: i32,
    pub selected_option: i32,
    pub is_correct: bool,
}

/// Aggregated results page payload for a single attempt.
#[derive(Debug, Serialize)]
pub struct AttemptResults {
    pub attempt: Attempt,
    pub assessment_title: String,
    pub assessment_description: String,
    pub percentage: i32,
    pub grade: &'static str,
    pub answers: Vec<AnswerDetail>,
}
