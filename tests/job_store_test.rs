//! Job lifecycle against a real Postgres.
//!
//! Each test gets a fresh database with the embedded migrations applied.
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use sqlx::PgPool;

use jobboard_backend::errors::AppError;
use jobboard_backend::models::{CreateJob, Job, JobFilter, UpdateJob};
use jobboard_backend::services::{application_service, job_service};

async fn seed(pool: &PgPool) {
    sqlx::query(
        "INSERT INTO companies (handle, name, num_employees, description, logo_url)
         VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
                ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
                ('c3', 'C3', 3, 'Desc3', 'http://c3.img')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO jobs (title, salary, equity, company_handle)
         VALUES ('j1', 100000, 0.01, 'c1'),
                ('j2', 200000, 0.2, 'c2'),
                ('J3', 300000, 0.3, 'c3'),
                ('j4', 400000, 0, 'c3'),
                ('j5', NULL, 0.5, 'c1'),
                ('other', 500000, 0.5, 'c2')",
    )
    .execute(pool)
    .await
    .unwrap();
}

fn decimal(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

/// Titles in byte order, so assertions do not depend on the server collation.
fn titles(jobs: &[Job]) -> Vec<&str> {
    let mut titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
    titles.sort_unstable();
    titles
}

fn new_job(title: &str) -> CreateJob {
    CreateJob {
        title: title.into(),
        salary: Some(5),
        equity: Some(decimal("0.5")),
        company_handle: "c1".into(),
    }
}

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_then_get(pool: PgPool) {
    seed(&pool).await;

    let job = job_service::create(&pool, new_job("new")).await.unwrap();
    assert_eq!(job.title, "new");
    assert_eq!(job.salary, Some(5));
    assert_eq!(job.equity, Some(decimal("0.5")));
    assert_eq!(job.company_handle, "c1");

    let fetched = job_service::get(&pool, job.id).await.unwrap();
    assert_eq!(fetched, job);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_duplicate_title(pool: PgPool) {
    seed(&pool).await;

    job_service::create(&pool, new_job("new")).await.unwrap();
    let err = job_service::create(&pool, new_job("new")).await.unwrap_err();
    assert!(matches!(err, AppError::Duplicate(ref msg) if msg == "Duplicate job: new"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_unknown_company(pool: PgPool) {
    seed(&pool).await;

    let mut input = new_job("orphan");
    input.company_handle = "nope".into();
    let err = job_service::create(&pool, input).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg == "No company: nope"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_creates_persist_once(pool: PgPool) {
    seed(&pool).await;

    let (a, b) = tokio::join!(
        job_service::create(&pool, new_job("race")),
        job_service::create(&pool, new_job("race")),
    );
    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(AppError::Duplicate(_)))));

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE title = 'race'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

// ---------------------------------------------------------------------------
// find_all
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_find_all_no_filter(pool: PgPool) {
    seed(&pool).await;

    let jobs = job_service::find_all(&pool, &JobFilter::default()).await.unwrap();
    assert_eq!(titles(&jobs), vec!["J3", "j1", "j2", "j4", "j5", "other"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_find_all_combined_filters(pool: PgPool) {
    seed(&pool).await;

    let filter = JobFilter {
        title: Some("j".into()),
        min_salary: Some(150000),
        has_equity: Some(true),
    };
    let jobs = job_service::find_all(&pool, &filter).await.unwrap();
    assert_eq!(titles(&jobs), vec!["J3", "j2"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_find_all_single_filters(pool: PgPool) {
    seed(&pool).await;

    let by_salary = JobFilter {
        min_salary: Some(400000),
        ..Default::default()
    };
    let jobs = job_service::find_all(&pool, &by_salary).await.unwrap();
    assert_eq!(titles(&jobs), vec!["j4", "other"]);

    let by_equity = JobFilter {
        has_equity: Some(true),
        ..Default::default()
    };
    let jobs = job_service::find_all(&pool, &by_equity).await.unwrap();
    assert_eq!(titles(&jobs), vec!["J3", "j1", "j2", "j5", "other"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_find_all_zero_min_salary_keeps_null_salaries(pool: PgPool) {
    seed(&pool).await;

    let filter = JobFilter {
        min_salary: Some(0),
        ..Default::default()
    };
    let jobs = job_service::find_all(&pool, &filter).await.unwrap();
    assert_eq!(titles(&jobs), vec!["J3", "j1", "j2", "j4", "j5", "other"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_find_all_no_match_is_empty(pool: PgPool) {
    seed(&pool).await;

    let filter = JobFilter {
        title: Some("nope".into()),
        ..Default::default()
    };
    let jobs = job_service::find_all(&pool, &filter).await.unwrap();
    assert!(jobs.is_empty());
}

// ---------------------------------------------------------------------------
// get / update / remove
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_get_missing(pool: PgPool) {
    seed(&pool).await;

    let err = job_service::get(&pool, 0).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_update_changes_only_supplied_fields(pool: PgPool) {
    seed(&pool).await;
    let before = job_service::create(&pool, new_job("before")).await.unwrap();

    let input = UpdateJob {
        title: Some("X".into()),
        ..Default::default()
    };
    let after = job_service::update(&pool, before.id, input).await.unwrap();

    assert_eq!(after.id, before.id);
    assert_eq!(after.title, "X");
    assert_eq!(after.salary, before.salary);
    assert_eq!(after.equity, before.equity);
    assert_eq!(after.company_handle, before.company_handle);
    assert_eq!(job_service::get(&pool, before.id).await.unwrap(), after);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_update_missing(pool: PgPool) {
    seed(&pool).await;

    let input = UpdateJob {
        salary: Some(1),
        ..Default::default()
    };
    let err = job_service::update(&pool, 0, input).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_update_into_existing_title(pool: PgPool) {
    seed(&pool).await;
    let job = job_service::create(&pool, new_job("mine")).await.unwrap();

    let input = UpdateJob {
        title: Some("j1".into()),
        ..Default::default()
    };
    let err = job_service::update(&pool, job.id, input).await.unwrap_err();
    assert!(matches!(err, AppError::Duplicate(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_remove_twice(pool: PgPool) {
    seed(&pool).await;
    let job = job_service::create(&pool, new_job("doomed")).await.unwrap();

    job_service::remove(&pool, job.id).await.unwrap();
    assert!(matches!(
        job_service::remove(&pool, job.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        job_service::get(&pool, job.id).await,
        Err(AppError::NotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// applications
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str) {
    sqlx::query(
        "INSERT INTO users (username, first_name, last_name, email)
         VALUES ($1, 'U', 'L', 'u@email.com')",
    )
    .bind(username)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_apply_lifecycle(pool: PgPool) {
    seed(&pool).await;
    seed_user(&pool, "u1").await;
    let job = job_service::create(&pool, new_job("open")).await.unwrap();

    let applied = application_service::apply(&pool, "u1", job.id).await.unwrap();
    assert_eq!(applied, job.id);

    let again = application_service::apply(&pool, "u1", job.id).await.unwrap_err();
    assert!(matches!(again, AppError::Duplicate(_)));

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM applications WHERE username = 'u1'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_apply_missing_job_or_user(pool: PgPool) {
    seed(&pool).await;
    seed_user(&pool, "u1").await;
    let job = job_service::create(&pool, new_job("open")).await.unwrap();

    let err = application_service::apply(&pool, "u1", 0).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == "No job: 0"));

    let err = application_service::apply(&pool, "ghost", job.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == "No username: ghost"));
}
