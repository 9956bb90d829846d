use crate::stmt::Value;

use indexmap::IndexMap;

/// One fetched row, keyed by column name in select-list order.
pub type Row = IndexMap<String, Value>;

/// The result of executing a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Rows of a fetchable statement.
    Rows(Vec<Row>),

    /// Number of rows affected by a mutation.
    Count(u64),
}

impl Response {
    pub fn count(count: u64) -> Response {
        Response::Count(count)
    }

    pub fn rows(rows: Vec<Row>) -> Response {
        Response::Rows(rows)
    }

    pub fn is_rows(&self) -> bool {
        matches!(self, Response::Rows(_))
    }

    /// The fetched rows; empty for mutations.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Response::Rows(rows) => rows,
            Response::Count(_) => vec![],
        }
    }

    /// Affected rows for mutations, number of rows otherwise.
    pub fn affected(&self) -> u64 {
        match self {
            Response::Rows(rows) => rows.len() as u64,
            Response::Count(count) => *count,
        }
    }

    /// The first column of the first row.
    pub fn scalar(&self) -> Option<&Value> {
        match self {
            Response::Rows(rows) => rows.first()?.values().next(),
            Response::Count(_) => None,
        }
    }
}
