use crate::db::executor::QueryExecutor;
use crate::db::sql::BuiltQuery;

/// Foreign key from `applications.job_id` to `jobs.id`.
pub const JOB_FKEY: &str = "applications_job_id_fkey";

/// Foreign key from `applications.username` to `users.username`.
pub const USERNAME_FKEY: &str = "applications_username_fkey";

pub fn insert_query(username: &str, job_id: i32) -> BuiltQuery {
    BuiltQuery::new(
        "INSERT INTO applications (job_id, username)
         VALUES ($1, $2)
         RETURNING job_id",
        vec![job_id.into(), username.into()],
    )
}

/// Record an application and return the job id it was filed against.
pub async fn insert<E>(exec: &E, username: &str, job_id: i32) -> Result<i32, sqlx::Error>
where
    E: QueryExecutor + ?Sized,
{
    exec.fetch_ids(&insert_query(username, job_id))
        .await?
        .into_iter()
        .next()
        .ok_or(sqlx::Error::RowNotFound)
}
