// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    core::scoring::ScoredAnswer,
    error::AppError,
    models::{
        assessment::{Assessment, Question},
        attempt::{AnswerDetail, Attempt, NewAttempt},
        comment::{Comment, CommentWithAuthor},
        post::{Post, PostCount, PostWithAuthor},
        profile::{Profile, ProfileChanges},
    },
};

use super::{AssessmentStore, SocialStore};

const PROFILE_COLUMNS: &str =
    "id, user_id, username, display_name, bio, avatar_url, created_at, updated_at";

#[derive(Clone)]
pub struct PgAssessmentStore {
    pool: PgPool,
}

impl PgAssessmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssessmentStore for PgAssessmentStore {
    async fn list_assessments(&self) -> Result<Vec<Assessment>, AppError> {
        let assessments = sqlx::query_as::<_, Assessment>(
            r#"
            SELECT id, title, description, category, duration_minutes, total_questions, created_at
            FROM assessments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(assessments)
    }

    async fn assessment(&self, id: i64) -> Result<Option<Assessment>, AppError> {
        let assessment = sqlx::query_as::<_, Assessment>(
            r#"
            SELECT id, title, description, category, duration_minutes, total_questions, created_at
            FROM assessments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assessment)
    }

    async fn questions_for_assessment(
        &self,
        assessment_id: i64,
    ) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, assessment_id, question_text, option1, option2, option3, option4,
                   correct_option, position, created_at
            FROM questions
            WHERE assessment_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(assessment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn create_attempt(
        &self,
        attempt: NewAttempt,
        answers: &[ScoredAnswer],
    ) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let attempt_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO attempts (user_id, assessment_id, score, total_questions, started_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&attempt.user_id)
        .bind(attempt.assessment_id)
        .bind(attempt.score)
        .bind(attempt.total_questions)
        .bind(attempt.started_at)
        .bind(attempt.completed_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert attempt: {:?}", e);
            AppError::Persistence(e.to_string())
        })?;

        if !answers.is_empty() {
            let mut query_builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO attempt_answers (attempt_id, question_id, selected_option, is_correct) ",
            );
            query_builder.push_values(answers, |mut b, answer| {
                b.push_bind(attempt_id)
                    .push_bind(answer.question_id)
                    .push_bind(answer.selected_option)
                    .push_bind(answer.is_correct);
            });
            query_builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        Ok(attempt_id)
    }

    async fn attempt(&self, id: i64) -> Result<Option<Attempt>, AppError> {
        let attempt = sqlx::query_as::<_, Attempt>(
            r#"
            SELECT id, user_id, assessment_id, score, total_questions,
                   started_at, completed_at, created_at
            FROM attempts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attempt)
    }

    async fn attempts_for_user(&self, user_id: &str) -> Result<Vec<Attempt>, AppError> {
        let attempts = sqlx::query_as::<_, Attempt>(
            r#"
            SELECT id, user_id, assessment_id, score, total_questions,
                   started_at, completed_at, created_at
            FROM attempts
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }

    async fn answers_for_attempt(&self, attempt_id: i64) -> Result<Vec<AnswerDetail>, AppError> {
        let answers = sqlx::query_as::<_, AnswerDetail>(
            r#"
            SELECT q.id AS question_id, q.question_text,
                   q.option1, q.option2, q.option3, q.option4,
                   q.correct_option, q.position,
                   a.selected_option, a.is_correct
            FROM attempt_answers a
            JOIN questions q ON a.question_id = q.id
            WHERE a.attempt_id = $1
            ORDER BY q.position ASC
            "#,
        )
        .bind(attempt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }
}

#[derive(Clone)]
pub struct PgSocialStore {
    pool: PgPool,
}

impl PgSocialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flattened LEFT JOIN row of a post and its (possibly absent) author.
#[derive(sqlx::FromRow)]
struct PostAuthorRow {
    id: i64,
    user_id: String,
    image_url: String,
    caption: Option<String>,
    visibility: String,
    created_at: chrono::DateTime<chrono::Utc>,
    author_id: Option<i64>,
    author_user_id: Option<String>,
    author_username: Option<String>,
    author_display_name: Option<String>,
    author_bio: Option<String>,
    author_avatar_url: Option<String>,
    author_created_at: Option<chrono::DateTime<chrono::Utc>>,
    author_updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<PostAuthorRow> for PostWithAuthor {
    fn from(row: PostAuthorRow) -> Self {
        let author = match (
            row.author_id,
            row.author_user_id,
            row.author_username,
            row.author_created_at,
            row.author_updated_at,
        ) {
            (Some(id), Some(user_id), Some(username), Some(created_at), Some(updated_at)) => {
                Some(Profile {
                    id,
                    user_id,
                    username,
                    display_name: row.author_display_name,
                    bio: row.author_bio,
                    avatar_url: row.author_avatar_url,
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        PostWithAuthor {
            post: Post {
                id: row.id,
                user_id: row.user_id,
                image_url: row.image_url,
                caption: row.caption,
                visibility: row.visibility,
                created_at: row.created_at,
            },
            author,
        }
    }
}

/// Flattened LEFT JOIN row of a comment and its (possibly absent) author.
#[derive(sqlx::FromRow)]
struct CommentAuthorRow {
    id: i64,
    post_id: i64,
    content: String,
    created_at: chrono::DateTime<chrono::Utc>,
    author_id: Option<i64>,
    author_user_id: Option<String>,
    author_username: Option<String>,
    author_display_name: Option<String>,
    author_bio: Option<String>,
    author_avatar_url: Option<String>,
    author_created_at: Option<chrono::DateTime<chrono::Utc>>,
    author_updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<CommentAuthorRow> for CommentWithAuthor {
    fn from(row: CommentAuthorRow) -> Self {
        let author = match (
            row.author_id,
            row.author_user_id,
            row.author_username,
            row.author_created_at,
            row.author_updated_at,
        ) {
            (Some(id), Some(user_id), Some(username), Some(created_at), Some(updated_at)) => {
                Some(Profile {
                    id,
                    user_id,
                    username,
                    display_name: row.author_display_name,
                    bio: row.author_bio,
                    avatar_url: row.author_avatar_url,
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        CommentWithAuthor {
            id: row.id,
            post_id: row.post_id,
            content: row.content,
            created_at: row.created_at,
            author,
        }
    }
}

const POST_AUTHOR_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.image_url, p.caption, p.visibility, p.created_at,
           pr.id AS author_id, pr.user_id AS author_user_id, pr.username AS author_username,
           pr.display_name AS author_display_name, pr.bio AS author_bio,
           pr.avatar_url AS author_avatar_url,
           pr.created_at AS author_created_at, pr.updated_at AS author_updated_at
    FROM posts p
    LEFT JOIN profiles pr ON p.user_id = pr.user_id
"#;

#[async_trait]
impl SocialStore for PgSocialStore {
    async fn recent_posts(&self, limit: i64) -> Result<Vec<PostWithAuthor>, AppError> {
        let rows = sqlx::query_as::<_, PostAuthorRow>(&format!(
            "{} ORDER BY p.created_at DESC LIMIT $1",
            POST_AUTHOR_SELECT
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }

    async fn posts_by_user(&self, user_id: &str) -> Result<Vec<PostWithAuthor>, AppError> {
        let rows = sqlx::query_as::<_, PostAuthorRow>(&format!(
            "{} WHERE p.user_id = $1 ORDER BY p.created_at DESC",
            POST_AUTHOR_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }

    async fn like_counts(&self, post_ids: &[i64]) -> Result<Vec<PostCount>, AppError> {
        grouped_counts(&self.pool, "post_likes", post_ids).await
    }

    async fn comment_counts(&self, post_ids: &[i64]) -> Result<Vec<PostCount>, AppError> {
        grouped_counts(&self.pool, "post_comments", post_ids).await
    }

    async fn viewer_like_ids(
        &self,
        viewer_id: &str,
        post_ids: &[i64],
    ) -> Result<Vec<i64>, AppError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder = QueryBuilder::<Postgres>::new(
            "SELECT post_id FROM post_likes WHERE user_id = ",
        );
        query_builder.push_bind(viewer_id);
        query_builder.push(" AND post_id IN (");
        let mut separated = query_builder.separated(",");
        for id in post_ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let ids = query_builder
            .build_query_scalar::<i64>()
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    async fn comments_for_posts(
        &self,
        post_ids: &[i64],
    ) -> Result<Vec<CommentWithAuthor>, AppError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT c.id, c.post_id, c.content, c.created_at,
                   pr.id AS author_id, pr.user_id AS author_user_id,
                   pr.username AS author_username, pr.display_name AS author_display_name,
                   pr.bio AS author_bio, pr.avatar_url AS author_avatar_url,
                   pr.created_at AS author_created_at, pr.updated_at AS author_updated_at
            FROM post_comments c
            LEFT JOIN profiles pr ON c.user_id = pr.user_id
            WHERE c.post_id IN (
            "#,
        );
        let mut separated = query_builder.separated(",");
        for id in post_ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(") ORDER BY c.created_at DESC");

        let rows = query_builder
            .build_query_as::<CommentAuthorRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CommentWithAuthor::from).collect())
    }

    async fn viewer_has_liked(&self, post_id: i64, user_id: &str) -> Result<bool, AppError> {
        let existing = sqlx::query("SELECT 1 FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(existing.is_some())
    }

    async fn insert_like(&self, post_id: i64, user_id: &str) -> Result<(), AppError> {
        // ON CONFLICT DO NOTHING keeps a concurrent duplicate insert a no-op.
        sqlx::query(
            "INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_like(&self, post_id: i64, user_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count_likes(&self, post_id: i64) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
                .bind(post_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn insert_comment(
        &self,
        post_id: i64,
        user_id: &str,
        content: &str,
    ) -> Result<Comment, AppError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO post_comments (post_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, content, created_at
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert comment: {:?}", e);
            AppError::Persistence(e.to_string())
        })?;

        Ok(comment)
    }

    async fn profile_by_user(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {} FROM profiles WHERE user_id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn profile_by_username(&self, username: &str) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {} FROM profiles WHERE username = $1",
            PROFILE_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn username_taken_by_other(
        &self,
        username: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        let existing =
            sqlx::query("SELECT 1 FROM profiles WHERE username = $1 AND user_id <> $2")
                .bind(username)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(existing.is_some())
    }

    async fn insert_profile(
        &self,
        user_id: &str,
        username: &str,
        display_name: &str,
    ) -> Result<Profile, AppError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (user_id, username, display_name)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(username)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET username = $1, display_name = $2, bio = $3, updated_at = NOW()
            WHERE user_id = $4
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(&changes.username)
        .bind(&changes.display_name)
        .bind(&changes.bio)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}

/// Grouped COUNT(*) over a (post_id, user_id) relation, restricted to the
/// given post ids. Uses QueryBuilder for the dynamic IN clause.
async fn grouped_counts(
    pool: &PgPool,
    table: &str,
    post_ids: &[i64],
) -> Result<Vec<PostCount>, AppError> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query_builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT post_id, COUNT(*) AS count FROM {} WHERE post_id IN (",
        table
    ));
    let mut separated = query_builder.separated(",");
    for id in post_ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(") GROUP BY post_id");

    let counts = query_builder
        .build_query_as::<PostCount>()
        .fetch_all(pool)
        .await?;

    Ok(counts)
}
