// src/models/profile.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents the 'profiles' table in the database.
/// Keyed by the opaque user id issued by the external auth service.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub user_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for updating the caller's profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(
        min = 3,
        max = 30,
        message = "Username must be between 3 and 30 characters"
    ))]
    pub username: String,

    #[validate(length(max = 60))]
    pub display_name: Option<String>,

    #[validate(length(max = 160))]
    pub bio: Option<String>,
}

/// Normalized field set applied by the store on update.
#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileStats {
    pub posts: i64,
    pub likes: i64,
}

/// Aggregated profile page payload: the profile, its posts as feed entries
/// and viewer-relative state.
#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub profile: Profile,
    pub posts: Vec<crate::models::post::FeedEntry>,
    pub stats: ProfileStats,
    pub viewer_owns_profile: bool,
}
