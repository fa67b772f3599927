use bigdecimal::BigDecimal;
use tracing::{error, warn};

use crate::db;
use crate::db::executor::QueryExecutor;
use crate::errors::AppError;
use crate::models::{CreateJob, Job, JobFilter, UpdateJob};

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("Job title cannot be empty".into()));
    }
    Ok(())
}

fn validate_salary(salary: Option<i32>) -> Result<(), AppError> {
    if matches!(salary, Some(s) if s < 0) {
        return Err(AppError::Validation("Salary must be >= 0".into()));
    }
    Ok(())
}

fn validate_equity(equity: Option<&BigDecimal>) -> Result<(), AppError> {
    if let Some(equity) = equity {
        if *equity < BigDecimal::from(0) || *equity > BigDecimal::from(1) {
            return Err(AppError::Validation("Equity must be between 0 and 1".into()));
        }
    }
    Ok(())
}

/// Translate constraint violations raised by an INSERT or UPDATE on `jobs`.
fn map_write_error(e: sqlx::Error, title: Option<&str>, company_handle: Option<&str>) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let title = title.unwrap_or_default();
            warn!("Rejected duplicate job title {:?}", title);
            return AppError::Duplicate(format!("Duplicate job: {}", title));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::Validation(format!(
                "No company: {}",
                company_handle.unwrap_or_default()
            ));
        }
        if db_err.is_check_violation() {
            return AppError::Validation(db_err.message().to_string());
        }
    }
    error!("Job write failed: {:?}", e);
    AppError::Db(e)
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("No job with the id: {}", id))
}

/// Insert a job. Title uniqueness is enforced by the `jobs_title_key` constraint.
pub async fn create<E>(exec: &E, input: CreateJob) -> Result<Job, AppError>
where
    E: QueryExecutor + ?Sized,
{
    validate_title(&input.title)?;
    validate_salary(input.salary)?;
    validate_equity(input.equity.as_ref())?;

    db::job_queries::insert(exec, &input)
        .await
        .map_err(|e| map_write_error(e, Some(input.title.as_str()), Some(input.company_handle.as_str())))
}

/// List jobs matching `filter`. No match is an empty list, not an error.
pub async fn find_all<E>(exec: &E, filter: &JobFilter) -> Result<Vec<Job>, AppError>
where
    E: QueryExecutor + ?Sized,
{
    let jobs = db::job_queries::find_all(exec, filter).await?;
    Ok(jobs)
}

pub async fn get<E>(exec: &E, id: i32) -> Result<Job, AppError>
where
    E: QueryExecutor + ?Sized,
{
    db::job_queries::fetch_one(exec, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Apply the supplied fields only; everything else keeps its stored value.
pub async fn update<E>(exec: &E, id: i32, input: UpdateJob) -> Result<Job, AppError>
where
    E: QueryExecutor + ?Sized,
{
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    validate_salary(input.salary)?;
    validate_equity(input.equity.as_ref())?;

    let title = input.title.clone();
    let partial = db::job_queries::partial_update(input)?;

    db::job_queries::update(exec, id, partial)
        .await
        .map_err(|e| map_write_error(e, title.as_deref(), None))?
        .ok_or_else(|| not_found(id))
}

pub async fn remove<E>(exec: &E, id: i32) -> Result<(), AppError>
where
    E: QueryExecutor + ?Sized,
{
    match db::job_queries::delete(exec, id).await {
        Ok(0) => Err(not_found(id)),
        Ok(_) => Ok(()),
        Err(e) => Err(AppError::from(e)),
    }
}
