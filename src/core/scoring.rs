// src/core/scoring.rs

use std::collections::HashMap;

use crate::{
    error::AppError,
    models::{
        assessment::Question,
        attempt::{AttemptResults, NewAttempt, SubmitTestRequest, SubmitTestResponse},
    },
    store::AssessmentStore,
};

/// One answered question with its derived correctness flag.
/// Never mutated after creation; persisted alongside the attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAnswer {
    pub question_id: i64,
    pub selected_option: i32,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub score: i32,
    pub answers: Vec<ScoredAnswer>,
}

/// Scores a submitted answer map against an assessment's question set.
///
/// * Answered questions are compared for exact equality against the stored
///   correct option; no partial credit.
/// * Unanswered questions are skipped entirely: no record, no score effect.
/// * Answer entries referencing question ids outside the set are ignored.
///
/// Pure and total over its inputs.
pub fn score_submission(questions: &[Question], answers: &HashMap<i64, i32>) -> ScoreOutcome {
    let mut score = 0;
    let mut records = Vec::new();

    for question in questions {
        let Some(&selected) = answers.get(&question.id) else {
            continue;
        };

        let is_correct = selected == question.correct_option;
        if is_correct {
            score += 1;
        }

        records.push(ScoredAnswer {
            question_id: question.id,
            selected_option: selected,
            is_correct,
        });
    }

    ScoreOutcome {
        score,
        answers: records,
    }
}

/// Rounded percentage for display. A zero total yields 0 rather than
/// attempting the division.
pub fn percentage(score: i32, total: i32) -> i32 {
    if total == 0 {
        return 0;
    }
    ((score as f64 / total as f64) * 100.0).round() as i32
}

/// Letter grade for a percentage. Boundaries are inclusive.
pub fn grade(percent: i32) -> &'static str {
    if percent >= 90 {
        "A+"
    } else if percent >= 80 {
        "A"
    } else if percent >= 70 {
        "B"
    } else if percent >= 60 {
        "C"
    } else {
        "D"
    }
}

/// Scores a submission and records the attempt.
///
/// The attempt and its answer records land together: the store persists them
/// as one unit. There is no concurrent-writer contention here, one attempt
/// belongs to one submission.
pub async fn submit_test(
    store: &dyn AssessmentStore,
    user_id: &str,
    req: &SubmitTestRequest,
) -> Result<SubmitTestResponse, AppError> {
    let questions = store.questions_for_assessment(req.assessment_id).await?;

    let outcome = score_submission(&questions, &req.answers);

    let now = chrono::Utc::now();
    let attempt_id = store
        .create_attempt(
            NewAttempt {
                user_id: user_id.to_string(),
                assessment_id: req.assessment_id,
                score: outcome.score,
                total_questions: questions.len() as i32,
                started_at: now,
                completed_at: now,
            },
            &outcome.answers,
        )
        .await?;

    Ok(SubmitTestResponse {
        attempt_id,
        score: outcome.score,
    })
}

/// Loads an attempt's results for the viewer who owns it.
/// Attempts belonging to another user are reported as not found.
pub async fn attempt_results(
    store: &dyn AssessmentStore,
    user_id: &str,
    attempt_id: i64,
) -> Result<AttemptResults, AppError> {
    let attempt = store
        .attempt(attempt_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))?;

    if attempt.user_id != user_id {
        return Err(AppError::NotFound("Attempt not found".to_string()));
    }

    let assessment = store
        .assessment(attempt.assessment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assessment not found".to_string()))?;

    let answers = store.answers_for_attempt(attempt_id).await?;

    let percent = percentage(attempt.score, attempt.total_questions);

    Ok(AttemptResults {
        percentage: percent,
        grade: grade(percent),
        assessment_title: assessment.title,
        assessment_description: assessment.description,
        attempt,
        answers,
    })
}
