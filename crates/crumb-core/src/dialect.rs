mod mysql;
pub use mysql::Mysql;

mod oracle;
pub use oracle::Oracle;

mod postgresql;
pub use postgresql::Postgresql;

mod sqlite;
pub use sqlite::Sqlite;

mod sqlsrv;
pub use sqlsrv::{LegacySqlServer, SqlServer};

use crate::{Error, Result};

use std::fmt::Debug;

pub static SQLITE: Sqlite = Sqlite;
pub static MYSQL: Mysql = Mysql;
pub static POSTGRESQL: Postgresql = Postgresql;
pub static SQLSRV: SqlServer = SqlServer;
pub static LEGACY_SQLSRV: LegacySqlServer = LegacySqlServer;
pub static ORACLE: Oracle = Oracle;

/// Differences between SQL engines that matter when generating statements.
///
/// One implementation exists per supported engine. The dialect is picked once,
/// from the driver identifier, when a connection is created.
pub trait Dialect: Debug + Send + Sync + 'static {
    /// Canonical driver identifier (`sqlite`, `mysql`, `pgsql`, ...).
    fn name(&self) -> &'static str;

    /// Quotes an identifier. Dotted names are quoted per part and `*` is left
    /// as is.
    fn quote_identifier(&self, ident: &str) -> String {
        quote_parts(ident, '`', '`')
    }

    /// Translates LIMIT/OFFSET into this engine's paging syntax. Returns
    /// `None` when there is nothing to page.
    fn paging(&self, paging: &Paging<'_>) -> Option<PagingClause>;

    /// A `RETURNING` clause reading back `columns` after an INSERT, for
    /// engines that support it.
    fn returning(&self, _columns: &[&str]) -> Option<String> {
        None
    }

    /// The statement toggling explicit writes into identity columns, for
    /// engines that require it.
    fn identity_insert(&self, _table: &str, _enable: bool) -> Option<String> {
        None
    }

    /// Positional placeholder for the 1-based parameter `index`.
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}

/// Paging request handed to [`Dialect::paging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Paging<'a> {
    pub limit: Option<u64>,
    pub offset: Option<u64>,

    /// The ORDER BY expression of the query, if any.
    pub order: Option<&'a str>,

    /// Primary key columns, used as the default order by engines that need
    /// one.
    pub primary_keys: &'a [&'a str],
}

/// How a dialect pages a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagingClause {
    /// Appended to the end of the statement, after any ORDER BY.
    Inline(String),

    /// The query must be wrapped in a `ROW_NUMBER() OVER (ORDER BY order)`
    /// subquery and filtered on the row number.
    RowNumber { order: String },
}

impl Paging<'_> {
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.unwrap_or(0) == 0
    }

    /// Offset, treating zero as absent.
    pub fn skip(&self) -> Option<u64> {
        self.offset.filter(|offset| *offset > 0)
    }

    /// The requested order, or the primary key list quoted by `dialect`, or
    /// `(SELECT NULL)` when the table has no key.
    pub fn order_or_keys(&self, dialect: &dyn Dialect) -> String {
        match self.order {
            Some(order) if !order.trim().is_empty() => order.to_string(),
            _ if self.primary_keys.is_empty() => "(SELECT NULL)".to_string(),
            _ => self
                .primary_keys
                .iter()
                .map(|key| dialect.quote_identifier(key))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Selects the dialect for a driver identifier.
pub fn for_driver(name: &str) -> Result<&'static dyn Dialect> {
    let dialect: &'static dyn Dialect = match name.to_ascii_lowercase().as_str() {
        "sqlite" | "sqlite2" | "sqlite3" => &SQLITE,
        "mysql" | "mariadb" => &MYSQL,
        "pgsql" | "postgres" | "postgresql" => &POSTGRESQL,
        "sqlsrv" => &SQLSRV,
        "mssql" | "dblib" | "sybase" | "odbc" => &LEGACY_SQLSRV,
        "oci" | "oracle" => &ORACLE,
        other => {
            return Err(Error::unsupported_feature(format!(
                "no SQL dialect for driver `{other}`"
            )))
        }
    };
    Ok(dialect)
}

/// Quotes each dot-separated part of `ident` with `open`/`close`, doubling
/// any embedded closing quote. Parts that are `*` or already quoted are left
/// alone.
pub fn quote_parts(ident: &str, open: char, close: char) -> String {
    ident
        .split('.')
        .map(|part| {
            let part = part.trim();
            if part == "*" || (part.starts_with(open) && part.ends_with(close) && part.len() > 1) {
                part.to_string()
            } else {
                let escaped = part.replace(close, &format!("{close}{close}"));
                format!("{open}{escaped}{close}")
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// `LIMIT n [OFFSET m]`, with `no_limit` standing in for the limit when only
/// an offset is given. `None` for `no_limit` emits a bare `OFFSET m`.
pub(crate) fn limit_offset(paging: &Paging<'_>, no_limit: Option<&str>) -> Option<PagingClause> {
    let clause = match (paging.limit, paging.skip()) {
        (None, None) => return None,
        (Some(limit), None) => format!("LIMIT {limit}"),
        (Some(limit), Some(offset)) => format!("LIMIT {limit} OFFSET {offset}"),
        (None, Some(offset)) => match no_limit {
            Some(all) => format!("LIMIT {all} OFFSET {offset}"),
            None => format!("OFFSET {offset}"),
        },
    };
    Some(PagingClause::Inline(clause))
}
