// tests/common/mod.rs
//
// Shared test harness: an in-memory store implementing the same traits as
// the Postgres stores, plus a spawn_app helper in the spirit of the
// integration setup used across the other test files.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use prismhub::{
    config::Config,
    core::scoring::ScoredAnswer,
    error::AppError,
    models::{
        assessment::{Assessment, Question},
        attempt::{AnswerDetail, Attempt, NewAttempt},
        comment::{Comment, CommentWithAuthor},
        post::{Post, PostCount, PostWithAuthor},
        profile::{Profile, ProfileChanges},
    },
    routes,
    state::AppState,
    store::{AssessmentStore, SocialStore},
    utils::jwt::sign_jwt,
};

pub const TEST_JWT_SECRET: &str = "test_secret_for_integration_tests";

#[derive(Default)]
struct Inner {
    next_id: i64,
    assessments: Vec<Assessment>,
    questions: Vec<Question>,
    attempts: Vec<Attempt>,
    attempt_answers: Vec<(i64, ScoredAnswer)>,
    profiles: Vec<Profile>,
    posts: Vec<Post>,
    likes: HashSet<(i64, String)>,
    comments: Vec<Comment>,
}

impl Inner {
    fn alloc_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn author_of(&self, user_id: &str) -> Option<Profile> {
        self.profiles.iter().find(|p| p.user_id == user_id).cloned()
    }
}

/// In-memory store. Ordering contracts mirror the Postgres implementation:
/// newest first means descending insertion id here.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Seeds an assessment whose questions have the given correct options.
    /// Returns the assessment id and the question ids in position order.
    pub fn seed_assessment(&self, title: &str, correct_options: &[i32]) -> (i64, Vec<i64>) {
        let mut inner = self.inner.lock().unwrap();
        let assessment_id = inner.alloc_id();
        inner.assessments.push(Assessment {
            id: assessment_id,
            title: title.to_string(),
            description: format!("{} description", title),
            category: "verbal".to_string(),
            duration_minutes: 30,
            total_questions: correct_options.len() as i32,
            created_at: chrono::Utc::now(),
        });

        let mut question_ids = Vec::new();
        for (i, &correct_option) in correct_options.iter().enumerate() {
            let id = inner.alloc_id();
            inner.questions.push(Question {
                id,
                assessment_id,
                question_text: format!("Question {}", i + 1),
                option1: "Option 1".to_string(),
                option2: "Option 2".to_string(),
                option3: "Option 3".to_string(),
                option4: "Option 4".to_string(),
                correct_option,
                position: (i + 1) as i32,
                created_at: chrono::Utc::now(),
            });
            question_ids.push(id);
        }

        (assessment_id, question_ids)
    }

    pub fn seed_profile(&self, user_id: &str, username: &str) -> Profile {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.alloc_id();
        let profile = Profile {
            id,
            user_id: user_id.to_string(),
            username: username.to_string(),
            display_name: Some(username.to_string()),
            bio: None,
            avatar_url: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        inner.profiles.push(profile.clone());
        profile
    }

    pub fn seed_post(&self, user_id: &str) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.alloc_id();
        inner.posts.push(Post {
            id,
            user_id: user_id.to_string(),
            image_url: format!("https://img.example/{}.jpg", id),
            caption: None,
            visibility: "public".to_string(),
            created_at: chrono::Utc::now(),
        });
        id
    }

    pub fn stored_comment_count(&self, post_id: i64) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.comments.iter().filter(|c| c.post_id == post_id).count()
    }
}

#[async_trait]
impl AssessmentStore for MemoryStore {
    async fn list_assessments(&self) -> Result<Vec<Assessment>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut assessments = inner.assessments.clone();
        assessments.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(assessments)
    }

    async fn assessment(&self, id: i64) -> Result<Option<Assessment>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.assessments.iter().find(|a| a.id == id).cloned())
    }

    async fn questions_for_assessment(
        &self,
        assessment_id: i64,
    ) -> Result<Vec<Question>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut questions: Vec<Question> = inner
            .questions
            .iter()
            .filter(|q| q.assessment_id == assessment_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.position);
        Ok(questions)
    }

    async fn create_attempt(
        &self,
        attempt: NewAttempt,
        answers: &[ScoredAnswer],
    ) -> Result<i64, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.alloc_id();
        inner.attempts.push(Attempt {
            id,
            user_id: attempt.user_id,
            assessment_id: attempt.assessment_id,
            score: attempt.score,
            total_questions: attempt.total_questions,
            started_at: attempt.started_at,
            completed_at: attempt.completed_at,
            created_at: chrono::Utc::now(),
        });
        for answer in answers {
            inner.attempt_answers.push((id, answer.clone()));
        }
        Ok(id)
    }

    async fn attempt(&self, id: i64) -> Result<Option<Attempt>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.attempts.iter().find(|a| a.id == id).cloned())
    }

    async fn attempts_for_user(&self, user_id: &str) -> Result<Vec<Attempt>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut attempts: Vec<Attempt> = inner
            .attempts
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        attempts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(attempts)
    }

    async fn answers_for_attempt(&self, attempt_id: i64) -> Result<Vec<AnswerDetail>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut details: Vec<AnswerDetail> = inner
            .attempt_answers
            .iter()
            .filter(|(aid, _)| *aid == attempt_id)
            .filter_map(|(_, answer)| {
                inner
                    .questions
                    .iter()
                    .find(|q| q.id == answer.question_id)
                    .map(|q| AnswerDetail {
                        question_id: q.id,
                        question_text: q.question_text.clone(),
                        option1: q.option1.clone(),
                        option2: q.option2.clone(),
                        option3: q.option3.clone(),
                        option4: q.option4.clone(),
                        correct_option: q.correct_option,
                        position: q.position,
                        selected_option: answer.selected_option,
                        is_correct: answer.is_correct,
                    })
            })
            .collect();
        details.sort_by_key(|d| d.position);
        Ok(details)
    }
}

#[async_trait]
impl SocialStore for MemoryStore {
    async fn recent_posts(&self, limit: i64) -> Result<Vec<PostWithAuthor>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut posts = inner.posts.clone();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(posts
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|post| PostWithAuthor {
                author: inner.author_of(&post.user_id),
                post,
            })
            .collect())
    }

    async fn posts_by_user(&self, user_id: &str) -> Result<Vec<PostWithAuthor>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut posts: Vec<Post> = inner
            .posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(posts
            .into_iter()
            .map(|post| PostWithAuthor {
                author: inner.author_of(&post.user_id),
                post,
            })
            .collect())
    }

    async fn like_counts(&self, post_ids: &[i64]) -> Result<Vec<PostCount>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(post_ids
            .iter()
            .map(|&post_id| PostCount {
                post_id,
                count: inner.likes.iter().filter(|(p, _)| *p == post_id).count() as i64,
            })
            // A grouped COUNT(*) emits no row for zero.
            .filter(|row| row.count > 0)
            .collect())
    }

    async fn comment_counts(&self, post_ids: &[i64]) -> Result<Vec<PostCount>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(post_ids
            .iter()
            .map(|&post_id| PostCount {
                post_id,
                count: inner.comments.iter().filter(|c| c.post_id == post_id).count() as i64,
            })
            .filter(|row| row.count > 0)
            .collect())
    }

    async fn viewer_like_ids(
        &self,
        viewer_id: &str,
        post_ids: &[i64],
    ) -> Result<Vec<i64>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(post_ids
            .iter()
            .copied()
            .filter(|&post_id| inner.likes.contains(&(post_id, viewer_id.to_string())))
            .collect())
    }

    async fn comments_for_posts(
        &self,
        post_ids: &[i64],
    ) -> Result<Vec<CommentWithAuthor>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut comments: Vec<Comment> = inner
            .comments
            .iter()
            .filter(|c| post_ids.contains(&c.post_id))
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(comments
            .into_iter()
            .map(|c| CommentWithAuthor {
                author: inner.author_of(&c.user_id),
                id: c.id,
                post_id: c.post_id,
                content: c.content,
                created_at: c.created_at,
            })
            .collect())
    }

    async fn viewer_has_liked(&self, post_id: i64, user_id: &str) -> Result<bool, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.likes.contains(&(post_id, user_id.to_string())))
    }

    async fn insert_like(&self, post_id: i64, user_id: &str) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        // HashSet insert is naturally a no-op on duplicates.
        inner.likes.insert((post_id, user_id.to_string()));
        Ok(())
    }

    async fn delete_like(&self, post_id: i64, user_id: &str) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.likes.remove(&(post_id, user_id.to_string()));
        Ok(())
    }

    async fn count_likes(&self, post_id: i64) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.likes.iter().filter(|(p, _)| *p == post_id).count() as i64)
    }

    async fn insert_comment(
        &self,
        post_id: i64,
        user_id: &str,
        content: &str,
    ) -> Result<Comment, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.alloc_id();
        let comment = Comment {
            id,
            post_id,
            user_id: user_id.to_string(),
            content: content.to_string(),
            created_at: chrono::Utc::now(),
        };
        inner.comments.push(comment.clone());
        Ok(comment)
    }

    async fn profile_by_user(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn profile_by_username(&self, username: &str) -> Result<Option<Profile>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.profiles.iter().find(|p| p.username == username).cloned())
    }

    async fn username_taken_by_other(
        &self,
        username: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .profiles
            .iter()
            .any(|p| p.username == username && p.user_id != user_id))
    }

    async fn insert_profile(
        &self,
        user_id: &str,
        username: &str,
        display_name: &str,
    ) -> Result<Profile, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.alloc_id();
        let profile = Profile {
            id,
            user_id: user_id.to_string(),
            username: username.to_string(),
            display_name: Some(display_name.to_string()),
            bio: None,
            avatar_url: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        inner.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(profile) = inner.profiles.iter_mut().find(|p| p.user_id == user_id) else {
            return Ok(None);
        };
        profile.username = changes.username;
        profile.display_name = changes.display_name;
        profile.bio = changes.bio;
        profile.updated_at = chrono::Utc::now();
        Ok(Some(profile.clone()))
    }
}

/// Spawns the app on a random port with the given store injected for both
/// store handles. Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app(store: Arc<MemoryStore>) -> String {
    let config = Config {
        database_url: "postgres://unused-in-tests".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
    };

    let state = AppState {
        assessments: store.clone(),
        social: store,
        config,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// A fresh opaque user id, the shape the external auth service hands out.
pub fn test_user_id() -> String {
    format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8])
}

/// An Authorization header value for the given user.
pub fn bearer(user_id: &str) -> String {
    let token = sign_jwt(user_id, Some("Test User"), TEST_JWT_SECRET, 600)
        .expect("Failed to sign test token");
    format!("Bearer {}", token)
}
