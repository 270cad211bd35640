// src/store/mod.rs
//
// The persistence collaborator. Handlers and core services only ever see
// these traits; the concrete Postgres implementation lives in `postgres`.
// Injecting the store keeps the scoring and aggregation paths testable
// without a live database.

pub mod postgres;

use async_trait::async_trait;

use crate::{
    core::scoring::ScoredAnswer,
    error::AppError,
    models::{
        assessment::{Assessment, Question},
        attempt::{AnswerDetail, Attempt, NewAttempt},
        comment::{Comment, CommentWithAuthor},
        post::{PostCount, PostWithAuthor},
        profile::{Profile, ProfileChanges},
    },
};

pub use postgres::{PgAssessmentStore, PgSocialStore};

/// Row access for the assessment platform.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn list_assessments(&self) -> Result<Vec<Assessment>, AppError>;

    async fn assessment(&self, id: i64) -> Result<Option<Assessment>, AppError>;

    /// All questions of one assessment, ordered by position.
    async fn questions_for_assessment(&self, assessment_id: i64)
    -> Result<Vec<Question>, AppError>;

    /// Persists the attempt and its answer records as one unit and returns
    /// the new attempt id. Partial application is not allowed.
    async fn create_attempt(
        &self,
        attempt: NewAttempt,
        answers: &[ScoredAnswer],
    ) -> Result<i64, AppError>;

    async fn attempt(&self, id: i64) -> Result<Option<Attempt>, AppError>;

    /// The user's attempts, newest first.
    async fn attempts_for_user(&self, user_id: &str) -> Result<Vec<Attempt>, AppError>;

    /// Answer records joined with their questions, ordered by question
    /// position.
    async fn answers_for_attempt(&self, attempt_id: i64) -> Result<Vec<AnswerDetail>, AppError>;
}

/// Row access for the photo feed.
#[async_trait]
pub trait SocialStore: Send + Sync {
    /// The newest posts first, joined with their author profiles.
    async fn recent_posts(&self, limit: i64) -> Result<Vec<PostWithAuthor>, AppError>;

    /// One author's posts, newest first.
    async fn posts_by_user(&self, user_id: &str) -> Result<Vec<PostWithAuthor>, AppError>;

    /// Grouped like counts; posts with zero likes produce no row.
    async fn like_counts(&self, post_ids: &[i64]) -> Result<Vec<PostCount>, AppError>;

    /// Grouped comment counts; posts with zero comments produce no row.
    async fn comment_counts(&self, post_ids: &[i64]) -> Result<Vec<PostCount>, AppError>;

    /// The subset of `post_ids` the viewer has liked.
    async fn viewer_like_ids(
        &self,
        viewer_id: &str,
        post_ids: &[i64],
    ) -> Result<Vec<i64>, AppError>;

    /// All comments on the given posts, newest first, with author profiles.
    async fn comments_for_posts(
        &self,
        post_ids: &[i64],
    ) -> Result<Vec<CommentWithAuthor>, AppError>;

    async fn viewer_has_liked(&self, post_id: i64, user_id: &str) -> Result<bool, AppError>;

    /// Idempotent insert: a duplicate (post, user) pair is a no-op, never an
    /// error, so a concurrent double-toggle cannot fail.
    async fn insert_like(&self, post_id: i64, user_id: &str) -> Result<(), AppError>;

    async fn delete_like(&self, post_id: i64, user_id: &str) -> Result<(), AppError>;

    /// A fresh count, queried after the mutation.
    async fn count_likes(&self, post_id: i64) -> Result<i64, AppError>;

    async fn insert_comment(
        &self,
        post_id: i64,
        user_id: &str,
        content: &str,
    ) -> Result<Comment, AppError>;

    async fn profile_by_user(&self, user_id: &str) -> Result<Option<Profile>, AppError>;

    async fn profile_by_username(&self, username: &str) -> Result<Option<Profile>, AppError>;

    /// Whether a different user already holds this username.
    async fn username_taken_by_other(
        &self,
        username: &str,
        user_id: &str,
    ) -> Result<bool, AppError>;

    async fn insert_profile(
        &self,
        user_id: &str,
        username: &str,
        display_name: &str,
    ) -> Result<Profile, AppError>;

    /// Applies the changes and returns the updated row, or None when no
    /// profile exists for the user.
    async fn update_profile(
        &self,
        user_id: &str,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, AppError>;
}
