use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::sql::SqlParam;

// ==============================================================================
// Job Models
// ==============================================================================

// A posting offered by a company; `company_handle` references `companies.handle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
}

/// Sparse update. Absent and `null` fields are both left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateJob {
    pub title: Option<String>,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
}

impl UpdateJob {
    /// Supplied fields as `(external name, value)` pairs in declaration order.
    pub fn into_fields(self) -> Vec<(&'static str, SqlParam)> {
        let mut fields = Vec::new();
        if let Some(title) = self.title {
            fields.push(("title", title.into()));
        }
        if let Some(salary) = self.salary {
            fields.push(("salary", salary.into()));
        }
        if let Some(equity) = self.equity {
            fields.push(("equity", equity.into()));
        }
        fields
    }
}

/// Query-string filters for listing jobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
}
