//! In-memory stand-ins for the store, shared by service unit tests.

use std::borrow::Cow;
use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::error::{DatabaseError, ErrorKind};

use crate::db::executor::QueryExecutor;
use crate::db::sql::BuiltQuery;
use crate::models::Job;

/// Constraint failures Postgres can raise on a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Unique,
    ForeignKey,
    Check,
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct FakeDbError {
    violation: Violation,
    message: String,
    constraint: Option<&'static str>,
}

impl FakeDbError {
    pub fn new(violation: Violation) -> Self {
        Self {
            violation,
            message: format!("{:?} violation", violation),
            constraint: None,
        }
    }

    pub fn on(mut self, constraint: &'static str) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn into_sqlx(self) -> sqlx::Error {
        sqlx::Error::Database(Box::new(self))
    }
}

impl DatabaseError for FakeDbError {
    fn message(&self) -> &str {
        &self.message
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        let code = match self.violation {
            Violation::Unique => "23505",
            Violation::ForeignKey => "23503",
            Violation::Check => "23514",
        };
        Some(Cow::Borrowed(code))
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn constraint(&self) -> Option<&str> {
        self.constraint
    }

    fn kind(&self) -> ErrorKind {
        match self.violation {
            Violation::Unique => ErrorKind::UniqueViolation,
            Violation::ForeignKey => ErrorKind::ForeignKeyViolation,
            Violation::Check => ErrorKind::CheckViolation,
        }
    }
}

/// Returns canned rows (or a canned failure) and remembers every query it was handed.
#[derive(Default)]
pub struct RecordingExecutor {
    jobs: Vec<Job>,
    ids: Vec<i32>,
    failure: Option<(Violation, Option<&'static str>)>,
    seen: Mutex<Vec<BuiltQuery>>,
}

impl RecordingExecutor {
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        Self {
            jobs,
            ..Default::default()
        }
    }

    pub fn with_ids(ids: Vec<i32>) -> Self {
        Self {
            ids,
            ..Default::default()
        }
    }

    /// Every statement fails with `violation`, optionally naming the constraint.
    pub fn failing(violation: Violation, constraint: Option<&'static str>) -> Self {
        Self {
            failure: Some((violation, constraint)),
            ..Default::default()
        }
    }

    pub fn seen(&self) -> Vec<BuiltQuery> {
        self.seen.lock().unwrap().clone()
    }

    fn record(&self, query: &BuiltQuery) -> Result<(), sqlx::Error> {
        self.seen.lock().unwrap().push(query.clone());
        match self.failure {
            Some((violation, Some(constraint))) => Err(FakeDbError::new(violation).on(constraint).into_sqlx()),
            Some((violation, None)) => Err(FakeDbError::new(violation).into_sqlx()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    async fn fetch_jobs(&self, query: &BuiltQuery) -> Result<Vec<Job>, sqlx::Error> {
        self.record(query)?;
        Ok(self.jobs.clone())
    }

    async fn fetch_ids(&self, query: &BuiltQuery) -> Result<Vec<i32>, sqlx::Error> {
        self.record(query)?;
        Ok(self.ids.clone())
    }
}
