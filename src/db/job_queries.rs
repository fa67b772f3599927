use crate::db::executor::QueryExecutor;
use crate::db::sql::{sql_for_partial_update, BuiltQuery, FilterQuery, PartialUpdate, SqlBuildError, SqlParam};
use crate::models::{CreateJob, Job, JobFilter, UpdateJob};

/// External names accepted by [`update`].
pub const UPDATABLE_FIELDS: &[&str] = &["title", "salary", "equity"];

/// External names whose column differs.
pub const JS_TO_SQL: &[(&str, &str)] = &[("companyHandle", "company_handle")];

const FIND_ALL_BASE: &str = "SELECT jobs.id, jobs.title, jobs.salary, jobs.equity, jobs.company_handle
         FROM jobs
         JOIN companies ON jobs.company_handle = companies.handle";

pub fn insert_query(input: &CreateJob) -> BuiltQuery {
    let mut values: Vec<SqlParam> = vec![input.title.as_str().into()];
    // NULLs are spelled into the text so every bound value has a concrete type.
    let salary = match input.salary {
        Some(salary) => {
            values.push(SqlParam::Int(salary));
            format!("${}", values.len())
        }
        None => "NULL".to_string(),
    };
    let equity = match &input.equity {
        Some(equity) => {
            values.push(SqlParam::Decimal(equity.clone()));
            format!("${}", values.len())
        }
        None => "NULL".to_string(),
    };
    values.push(input.company_handle.as_str().into());
    let handle = format!("${}", values.len());

    BuiltQuery::new(
        format!(
            "INSERT INTO jobs (title, salary, equity, company_handle)
         VALUES ($1, {}, {}, {})
         RETURNING id, title, salary, equity, company_handle",
            salary, equity, handle
        ),
        values,
    )
}

pub fn find_all_query(filter: &JobFilter) -> BuiltQuery {
    let mut query = FilterQuery::new(FIND_ALL_BASE);

    if let Some(title) = filter.title.as_deref().filter(|t| !t.is_empty()) {
        query.push_bound("title ILIKE", format!("%{}%", title).into());
    }
    // `minSalary=0` is no bound, so NULL salaries stay listed.
    if let Some(min_salary) = filter.min_salary.filter(|&s| s != 0) {
        query.push_bound("salary >=", min_salary.into());
    }
    if filter.has_equity == Some(true) {
        query.push_literal("equity > 0");
    }

    query.finish(Some("title, id"))
}

pub fn fetch_one_query(id: i32) -> BuiltQuery {
    BuiltQuery::new(
        "SELECT j.id, j.title, j.salary, j.equity, c.handle AS company_handle
         FROM jobs AS j
         JOIN companies AS c ON j.company_handle = c.handle
         WHERE j.id = $1",
        vec![SqlParam::Int(id)],
    )
}

pub fn partial_update(input: UpdateJob) -> Result<PartialUpdate, SqlBuildError> {
    sql_for_partial_update(input.into_fields(), JS_TO_SQL, UPDATABLE_FIELDS)
}

pub fn update_query(id: i32, update: PartialUpdate) -> BuiltQuery {
    let id_idx = update.next_index();
    let mut values = update.values;
    values.push(SqlParam::Int(id));
    BuiltQuery::new(
        format!(
            "UPDATE jobs
         SET {}
         WHERE id = ${}
         RETURNING id, title, salary, equity, company_handle",
            update.set_cols, id_idx
        ),
        values,
    )
}

pub fn delete_query(id: i32) -> BuiltQuery {
    BuiltQuery::new(
        "DELETE FROM jobs WHERE id = $1 RETURNING id",
        vec![SqlParam::Int(id)],
    )
}

pub async fn insert<E>(exec: &E, input: &CreateJob) -> Result<Job, sqlx::Error>
where
    E: QueryExecutor + ?Sized,
{
    exec.fetch_jobs(&insert_query(input))
        .await?
        .into_iter()
        .next()
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn find_all<E>(exec: &E, filter: &JobFilter) -> Result<Vec<Job>, sqlx::Error>
where
    E: QueryExecutor + ?Sized,
{
    exec.fetch_jobs(&find_all_query(filter)).await
}

pub async fn fetch_one<E>(exec: &E, id: i32) -> Result<Option<Job>, sqlx::Error>
where
    E: QueryExecutor + ?Sized,
{
    Ok(exec.fetch_jobs(&fetch_one_query(id)).await?.into_iter().next())
}

pub async fn update<E>(exec: &E, id: i32, update: PartialUpdate) -> Result<Option<Job>, sqlx::Error>
where
    E: QueryExecutor + ?Sized,
{
    Ok(exec.fetch_jobs(&update_query(id, update)).await?.into_iter().next())
}

pub async fn delete<E>(exec: &E, id: i32) -> Result<u64, sqlx::Error>
where
    E: QueryExecutor + ?Sized,
{
    let ids = exec.fetch_ids(&delete_query(id)).await?;
    Ok(ids.len() as u64)
}
