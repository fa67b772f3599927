use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::AuthKeys;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: AuthKeys,
}

impl FromRef<AppState> for AuthKeys {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
