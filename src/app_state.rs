use std::sync::Arc;

use crate::{config::Config, model::repository::db::DbPool};

pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
}

pub type SharedState = Arc<AppState>;
