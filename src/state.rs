use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::store::{AssessmentStore, SocialStore};

pub type DynAssessmentStore = Arc<dyn AssessmentStore>;
pub type DynSocialStore = Arc<dyn SocialStore>;

/// Shared application state: the injected store handles plus configuration.
/// Handlers extract the store they need via `FromRef`; swapping the Postgres
/// stores for in-memory ones is how the integration tests run without a
/// database.
#[derive(Clone)]
pub struct AppState {
    pub assessments: DynAssessmentStore,
    pub social: DynSocialStore,
    pub config: Config,
}

impl FromRef<AppState> for DynAssessmentStore {
    fn from_ref(state: &AppState) -> Self {
        state.assessments.clone()
    }
}

impl FromRef<AppState> for DynSocialStore {
    fn from_ref(state: &AppState) -> Self {
        state.social.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
