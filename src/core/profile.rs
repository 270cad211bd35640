// src/core/profile.rs

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    error::AppError,
    models::profile::{Profile, ProfileChanges, ProfilePage, ProfileStats, UpdateProfileRequest},
    store::SocialStore,
};

use super::feed;

const USERNAME_FALLBACK: &str = "user";
const MAX_USERNAME_ATTEMPTS: u32 = 10;

fn invalid_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("[^a-z0-9_]+").expect("static pattern"))
}

fn repeated_underscores() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("_{2,}").expect("static pattern"))
}

/// Normalizes a requested username: lowercase, strip anything outside
/// `[a-z0-9_]`, collapse underscore runs, trim edge underscores. An input
/// with nothing left falls back to "user".
pub fn slugify_username(input: &str) -> String {
    let lowered = input.to_lowercase();
    let stripped = invalid_chars().replace_all(&lowered, "");
    let collapsed = repeated_underscores().replace_all(&stripped, "_");
    let trimmed = collapsed.trim_matches('_');

    if trimmed.is_empty() {
        USERNAME_FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Updates the caller's profile. The username is slugged first; a username
/// held by a different user is a conflict. Empty display name or bio become
/// NULL.
pub async fn update_profile(
    store: &dyn SocialStore,
    user_id: &str,
    req: UpdateProfileRequest,
) -> Result<Profile, AppError> {
    let username = slugify_username(&req.username);

    if store.username_taken_by_other(&username, user_id).await? {
        return Err(AppError::Conflict("Username is already taken".to_string()));
    }

    let changes = ProfileChanges {
        username,
        display_name: normalize(req.display_name),
        bio: normalize(req.bio),
    };

    store
        .update_profile(user_id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

fn normalize(field: Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Returns the user's profile, creating one on first touch. The username is
/// seeded from the display name or the email local part, suffixed 1..N on
/// collision, with a timestamp fallback after that.
pub async fn ensure_profile(
    store: &dyn SocialStore,
    user_id: &str,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<Profile, AppError> {
    if let Some(existing) = store.profile_by_user(user_id).await? {
        return Ok(existing);
    }

    let seed_from_name = name.map(str::trim).filter(|s| !s.is_empty());
    let seed_from_email = email
        .and_then(|e| e.split('@').next())
        .filter(|s| !s.is_empty());

    let seed = seed_from_name.or(seed_from_email).unwrap_or(USERNAME_FALLBACK);
    let base = slugify_username(seed);

    let mut candidate = base.clone();
    let mut attempt = 0;
    while attempt < MAX_USERNAME_ATTEMPTS {
        if store.profile_by_username(&candidate).await?.is_none() {
            return store.insert_profile(user_id, &candidate, seed).await;
        }
        attempt += 1;
        candidate = format!("{}{}", base, attempt);
    }

    let fallback = format!("{}{:x}", base, chrono::Utc::now().timestamp_millis());
    store.insert_profile(user_id, &fallback, seed).await
}

/// Profile page data: the profile, its posts as feed entries, post/like
/// totals and whether the viewer owns the page.
pub async fn profile_page(
    store: &dyn SocialStore,
    username: &str,
    viewer_id: &str,
) -> Result<ProfilePage, AppError> {
    let profile = store
        .profile_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    let posts = feed::posts_for_user(store, &profile.user_id, viewer_id).await?;

    let likes = posts.iter().map(|entry| entry.like_count).sum();
    let stats = ProfileStats {
        posts: posts.len() as i64,
        likes,
    };
    let viewer_owns_profile = profile.user_id == viewer_id;

    Ok(ProfilePage {
        profile,
        posts,
        stats,
        viewer_owns_profile,
    })
}
