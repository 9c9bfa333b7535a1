use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::engine::QuizEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QuizEngine>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<QuizEngine> {
    fn from_ref(state: &AppState) -> Self {
        state.engine.clone()
    }
}
