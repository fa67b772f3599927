//! Parameterized SQL fragments shared by the query modules.
//!
//! Nothing here talks to the database. Builders return SQL text plus the
//! positional values for `$1..$n`, in the order the placeholders appear.

use bigdecimal::BigDecimal;
use thiserror::Error;

/// A single positional parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i32),
    Decimal(BigDecimal),
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

impl From<BigDecimal> for SqlParam {
    fn from(value: BigDecimal) -> Self {
        SqlParam::Decimal(value)
    }
}

/// SQL text with its positional values.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub values: Vec<SqlParam>,
}

impl BuiltQuery {
    pub fn new(sql: impl Into<String>, values: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            values,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqlBuildError {
    #[error("No data")]
    EmptyPayload,

    #[error("Field not updatable: {0}")]
    UnknownField(String),

    #[error("Field supplied more than once: {0}")]
    DuplicateField(String),
}

/// Output of [`sql_for_partial_update`].
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    /// `"col_a"=$1, "col_b"=$2`
    pub set_cols: String,
    pub values: Vec<SqlParam>,
}

impl PartialUpdate {
    /// Index the caller should use for the first parameter after the SET values.
    pub fn next_index(&self) -> usize {
        self.values.len() + 1
    }
}

/// Build the SET clause of a partial UPDATE.
///
/// `data` is kept in the order given; placeholder `$k` belongs to the k-th
/// pair. `js_to_sql` renames external field names whose column differs, every
/// other allowed name is used as the column. Names outside `allowed` are
/// rejected before any SQL is produced.
pub fn sql_for_partial_update(
    data: Vec<(&str, SqlParam)>,
    js_to_sql: &[(&str, &str)],
    allowed: &[&str],
) -> Result<PartialUpdate, SqlBuildError> {
    if data.is_empty() {
        return Err(SqlBuildError::EmptyPayload);
    }

    let mut cols = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());
    let mut seen: Vec<&str> = Vec::with_capacity(data.len());

    for (idx, (name, value)) in data.into_iter().enumerate() {
        if !allowed.contains(&name) {
            return Err(SqlBuildError::UnknownField(name.to_string()));
        }
        if seen.contains(&name) {
            return Err(SqlBuildError::DuplicateField(name.to_string()));
        }
        seen.push(name);

        let column = js_to_sql
            .iter()
            .find(|(external, _)| *external == name)
            .map(|(_, column)| *column)
            .unwrap_or(name);

        cols.push(format!("\"{}\"=${}", column, idx + 1));
        values.push(value);
    }

    Ok(PartialUpdate {
        set_cols: cols.join(", "),
        values,
    })
}

/// Appends predicates to a base SELECT one at a time.
///
/// The first predicate is introduced with `WHERE`, later ones with `AND`.
/// Placeholders are numbered in the order predicates are pushed.
#[derive(Debug)]
pub struct FilterQuery {
    sql: String,
    values: Vec<SqlParam>,
    has_predicate: bool,
}

impl FilterQuery {
    pub fn new(base: &str) -> Self {
        Self {
            sql: base.to_string(),
            values: Vec::new(),
            has_predicate: false,
        }
    }

    fn connective(&mut self) -> &'static str {
        if self.has_predicate {
            " AND"
        } else {
            self.has_predicate = true;
            " WHERE"
        }
    }

    /// Push `<lhs> $<i>` and bind `value` to it, e.g. `push_bound("salary >=", 5.into())`.
    pub fn push_bound(&mut self, lhs: &str, value: SqlParam) -> &mut Self {
        let connective = self.connective();
        let idx = self.values.len() + 1;
        self.sql.push_str(&format!("{} {} ${}", connective, lhs, idx));
        self.values.push(value);
        self
    }

    /// Push a predicate that needs no parameter.
    pub fn push_literal(&mut self, predicate: &str) -> &mut Self {
        let connective = self.connective();
        self.sql.push_str(&format!("{} {}", connective, predicate));
        self
    }

    pub fn finish(self, order_by: Option<&str>) -> BuiltQuery {
        let mut sql = self.sql;
        if let Some(order_by) = order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        BuiltQuery::new(sql, self.values)
    }
}
