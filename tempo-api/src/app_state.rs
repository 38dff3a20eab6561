use std::sync::Arc;

use sqlx::PgPool;

use crate::repositories::{
    DashboardRepository, DashboardRepositoryImpl, TimeEntryRepository, TimeEntryRepositoryImpl,
    UserRepository, UserRepositoryImpl,
};

/// Cloneable handle shared across requests. The pool is handed in at
/// startup; repositories are the only holders of it.
#[derive(Clone)]
pub struct AppState {
    pub time_entries: Arc<dyn TimeEntryRepository>,
    pub dashboard: Arc<dyn DashboardRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(db_pool: PgPool) -> Self {
        Self {
            time_entries: Arc::new(TimeEntryRepositoryImpl::new(db_pool.clone())),
            dashboard: Arc::new(DashboardRepositoryImpl::new(db_pool.clone())),
            users: Arc::new(UserRepositoryImpl::new(db_pool)),
        }
    }
}
