use tracing::{error, warn};

use crate::db;
use crate::db::application_queries::{JOB_FKEY, USERNAME_FKEY};
use crate::db::executor::QueryExecutor;
use crate::errors::AppError;

fn map_apply_error(e: sqlx::Error, username: &str, job_id: i32) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            warn!("{} already applied to job {}", username, job_id);
            return AppError::Duplicate(format!("Already applied: {} to job {}", username, job_id));
        }
        if db_err.is_foreign_key_violation() {
            match db_err.constraint() {
                Some(JOB_FKEY) => return AppError::NotFound(format!("No job: {}", job_id)),
                Some(USERNAME_FKEY) => {
                    return AppError::NotFound(format!("No username: {}", username))
                }
                _ => {}
            }
        }
    }
    error!("Application write failed: {:?}", e);
    AppError::Db(e)
}

/// File `username`'s application to job `job_id`.
///
/// A single INSERT; a missing job or user surfaces through the foreign keys.
pub async fn apply<E>(exec: &E, username: &str, job_id: i32) -> Result<i32, AppError>
where
    E: QueryExecutor + ?Sized,
{
    if username.trim().is_empty() {
        return Err(AppError::Validation("Username cannot be empty".into()));
    }

    db::application_queries::insert(exec, username, job_id)
        .await
        .map_err(|e| map_apply_error(e, username, job_id))
}
