mod response;
pub use response::{Response, Row};

use crate::{
    schema::Column,
    stmt::{Args, Value},
    Result,
};

use std::{borrow::Cow, fmt::Debug};

/// A database driver: knows how to open connections to one database.
pub trait Driver: Debug + Send + Sync + 'static {
    /// The URL this driver connects to.
    fn url(&self) -> Cow<'_, str>;

    /// Driver identifier used to pick the SQL dialect (`sqlite`, `pgsql`, ...).
    fn name(&self) -> &'static str;

    /// Opens a new connection.
    fn connect(&self) -> Result<Box<dyn Connection>>;
}

/// A native database handle.
///
/// Calls block until the database answers. Implementations do not manage
/// transactions on errors; the caller decides whether to roll back.
pub trait Connection: Debug + Send + 'static {
    /// Executes one statement.
    ///
    /// Statements yielding columns return [`Response::Rows`], anything else
    /// returns the affected row count.
    fn exec(&mut self, sql: &str, args: &Args) -> Result<Response>;

    /// Introspects the columns of `table`, in table order.
    fn columns(&mut self, table: &str) -> Result<Vec<Column>>;

    /// The id generated by the most recent insert on this connection.
    fn last_insert_id(&mut self) -> Result<Value>;

    fn begin(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;
}
