mod value;
pub(crate) use value::Value;

use crumb_core::{
    driver::{Driver, Response, Row},
    schema::Column,
    stmt::{self, ArgKey, Args},
    Error, Result,
};
use rusqlite::{types::ValueRef, Connection as RusqliteConnection};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver from a `sqlite:` connection URL.
    /// `sqlite::memory:` opens an in-memory database.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn connect(&self) -> Result<Box<dyn crumb_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Ok(Self { connection })
    }

    fn batch(&mut self, sql: &str) -> Result<()> {
        self.connection
            .execute_batch(sql)
            .map_err(Error::driver_operation_failed)
    }
}

impl crumb_core::driver::Connection for Connection {
    fn exec(&mut self, sql: &str, args: &Args) -> Result<Response> {
        let mut stmt = self
            .connection
            .prepare(sql)
            .map_err(Error::driver_operation_failed)?;

        for (key, param) in args.iter() {
            let index = match key {
                ArgKey::Index(index) => index,
                ArgKey::Name(name) => {
                    match stmt
                        .parameter_index(name)
                        .map_err(Error::driver_operation_failed)?
                    {
                        Some(index) => index,
                        // Arguments the statement does not reference are ignored
                        None => continue,
                    }
                }
            };

            stmt.raw_bind_parameter(index, Value::from(param.bound_value()))
                .map_err(Error::driver_operation_failed)?;
        }

        if stmt.column_count() == 0 {
            let count = stmt.raw_execute().map_err(Error::driver_operation_failed)?;
            return Ok(Response::count(count as u64));
        }

        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt.raw_query();
        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::driver_operation_failed)? {
            let mut record = Row::with_capacity(names.len());

            for (index, name) in names.iter().enumerate() {
                let value = row.get_ref(index).map_err(Error::driver_operation_failed)?;
                record.insert(name.clone(), Value::from_sql(value).into_inner());
            }

            ret.push(record);
        }

        Ok(Response::rows(ret))
    }

    fn columns(&mut self, table: &str) -> Result<Vec<Column>> {
        let sql = format!("PRAGMA table_info({})", quote(table));
        let mut pragma = self
            .connection
            .prepare(&sql)
            .map_err(Error::driver_operation_failed)?;

        let rows = pragma
            .query_map([], |row| {
                let name: String = row.get("name")?;
                let declared: String = row.get("type")?;
                let not_null: bool = row.get("notnull")?;
                let default = match row.get_ref("dflt_value")? {
                    ValueRef::Text(text) => parse_default(&String::from_utf8_lossy(text)),
                    _ => stmt::Value::Null,
                };
                let primary_key: i64 = row.get("pk")?;

                let mut column = Column::new(name, declared).default_value(default);
                if not_null {
                    column = column.not_null();
                }
                if primary_key > 0 {
                    column = column.primary_key();
                }
                Ok(column)
            })
            .map_err(Error::driver_operation_failed)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::driver_operation_failed)
    }

    fn last_insert_id(&mut self) -> Result<stmt::Value> {
        Ok(stmt::Value::I64(self.connection.last_insert_rowid()))
    }

    fn begin(&mut self) -> Result<()> {
        self.batch("BEGIN")
    }

    fn commit(&mut self) -> Result<()> {
        self.batch("COMMIT")
    }

    fn rollback(&mut self) -> Result<()> {
        self.batch("ROLLBACK")
    }
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Parses the `dflt_value` column of `PRAGMA table_info`. Only literals are
/// kept; expressions such as `CURRENT_TIMESTAMP` default to null.
fn parse_default(text: &str) -> stmt::Value {
    let text = text.trim();

    if let Some(inner) = text
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return stmt::Value::String(inner.replace("''", "'"));
    }

    if let Ok(value) = text.parse::<i64>() {
        return stmt::Value::I64(value);
    }

    if let Ok(value) = text.parse::<f64>() {
        return stmt::Value::F64(value);
    }

    stmt::Value::Null
}
