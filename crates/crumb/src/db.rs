mod builder;
mod connect;

pub use builder::Builder;
pub use connect::Connect;

use crate::cache::{self, Cache, Cached};

use crumb_core::{
    dialect::Dialect,
    driver::{self, Driver, Response, Row},
    stmt::{self, Args, ParamType, Value},
    Error, Result, Schema,
};
use crumb_sql::params;

use parking_lot::Mutex;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// A database handle.
///
/// Clones share one lazily opened driver connection. Statements from
/// different clones are serialized on it.
#[derive(Clone)]
pub struct Connection {
    shared: Arc<Shared>,
}

struct Shared {
    driver: Box<dyn Driver>,
    dialect: &'static dyn Dialect,
    state: Mutex<State>,
    cache: Option<Arc<dyn Cache>>,
    schema_ttl: Duration,
}

#[derive(Default)]
struct State {
    conn: Option<Box<dyn driver::Connection>>,
    in_transaction: bool,
}

impl Connection {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Connects with default options, selecting the driver from the URL
    /// scheme.
    pub fn connect(url: &str) -> Result<Connection> {
        Builder::default().connect(url)
    }

    /// The driver identifier, e.g. `sqlite` or `pgsql`.
    pub fn driver_name(&self) -> &'static str {
        self.shared.dialect.name()
    }

    pub fn dialect(&self) -> &'static dyn Dialect {
        self.shared.dialect
    }

    pub fn quote_identifier(&self, ident: &str) -> String {
        self.shared.dialect.quote_identifier(ident)
    }

    /// Coerces a raw value the way it would be bound as `param_type`.
    pub fn value(&self, param_type: ParamType, raw: impl Into<Value>) -> Value {
        param_type.coerce(raw.into())
    }

    /// Executes one statement.
    ///
    /// Rows of fetchable statements are cached for `ttl` when a cache is
    /// configured and `ttl` is not zero. A driver error inside a transaction
    /// rolls it back before the error is returned.
    pub fn exec(&self, sql: &str, args: impl Into<Args>, ttl: Duration) -> Result<Response> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(Error::invalid_statement("empty SQL statement"));
        }

        let args = args.into().normalized();
        let literal = params::interpolate(sql, &args);

        let cache = self
            .shared
            .cache
            .as_ref()
            .filter(|_| !ttl.is_zero() && stmt::is_fetchable(sql));
        let url = self.shared.driver.url();
        let key = cache.map(|_| cache::key(&["rows", url.as_ref(), literal.as_str()]));

        if let (Some(cache), Some(key)) = (cache, &key) {
            if let Some(Cached::Rows(rows)) = cache.get(key) {
                tracing::trace!(sql = %literal, rows = rows.len(), "cache hit");
                return Ok(Response::rows(rows.as_ref().clone()));
            }
        }

        let started = Instant::now();
        let response = self.with_connection(|state| {
            let Some(conn) = state.conn.as_mut() else {
                return Err(Error::invalid_statement("no open connection"));
            };

            match conn.exec(sql, &args) {
                Ok(response) => Ok(response),
                Err(err) if state.in_transaction => {
                    tracing::warn!(error = %err, "statement failed; rolling back transaction");
                    state.in_transaction = false;
                    if let Err(rollback) = conn.rollback() {
                        return Err(rollback.context(err));
                    }
                    Err(err)
                }
                Err(err) => Err(err),
            }
        })?;

        tracing::debug!(
            driver = self.driver_name(),
            sql = %literal,
            affected = response.affected(),
            elapsed = ?started.elapsed(),
            "exec"
        );

        if let (Some(cache), Some(key), Response::Rows(rows)) = (cache, &key, &response) {
            cache.set(key, Cached::Rows(Arc::new(rows.clone())), ttl);
        }

        Ok(response)
    }

    /// Fetches the rows of a query.
    pub fn query(&self, sql: &str, args: impl Into<Args>) -> Result<Vec<Row>> {
        Ok(self.exec(sql, args, Duration::ZERO)?.into_rows())
    }

    /// The schema of `table`, restricted to `fields` unless empty.
    ///
    /// Introspection results are cached for `ttl`, or for the connection's
    /// default schema TTL when `ttl` is `None`.
    pub fn schema(&self, table: &str, fields: &[&str], ttl: Option<Duration>) -> Result<Arc<Schema>> {
        let ttl = ttl.unwrap_or(self.shared.schema_ttl);

        let cache = self.shared.cache.as_ref().filter(|_| !ttl.is_zero());
        let key = cache.map(|_| {
            let mut parts = vec!["schema", self.shared.driver.name(), table];
            parts.extend_from_slice(fields);
            cache::key(&parts)
        });

        if let (Some(cache), Some(key)) = (cache, &key) {
            if let Some(Cached::Schema(schema)) = cache.get(key) {
                tracing::trace!(table, "schema cache hit");
                return Ok(schema);
            }
        }

        let columns = self.with_connection(|state| match state.conn.as_mut() {
            Some(conn) => conn.columns(table),
            None => Err(Error::invalid_statement("no open connection")),
        })?;

        if columns.is_empty() {
            return Err(crumb_core::err!("table `{table}` has no columns or does not exist"));
        }

        let mut schema = Schema::new(table, columns);
        if !fields.is_empty() {
            schema = schema.filter(fields);
        }
        tracing::debug!(table, columns = schema.len(), "introspected schema");

        let schema = Arc::new(schema);
        if let (Some(cache), Some(key)) = (cache, &key) {
            cache.set(key, Cached::Schema(schema.clone()), ttl);
        }

        Ok(schema)
    }

    /// The key generated by the last insert.
    pub fn last_insert_id(&self) -> Result<Value> {
        self.with_connection(|state| match state.conn.as_mut() {
            Some(conn) => conn.last_insert_id(),
            None => Err(Error::invalid_statement("no open connection")),
        })
    }

    pub fn begin(&self) -> Result<()> {
        self.with_connection(|state| {
            if state.in_transaction {
                return Err(Error::invalid_statement("a transaction is already open"));
            }
            if let Some(conn) = state.conn.as_mut() {
                conn.begin()?;
            }
            state.in_transaction = true;
            Ok(())
        })
    }

    pub fn commit(&self) -> Result<()> {
        self.end_transaction(|conn| conn.commit())
    }

    pub fn rollback(&self) -> Result<()> {
        self.end_transaction(|conn| conn.rollback())
    }

    pub fn in_transaction(&self) -> bool {
        self.shared.state.lock().in_transaction
    }

    /// Runs `f` inside a transaction, committing when it returns `Ok` and
    /// rolling back otherwise.
    pub fn transaction<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        self.begin()?;

        match f(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(err) => {
                // The transaction may already be gone after a driver error
                if self.in_transaction() {
                    self.rollback()?;
                }
                Err(err)
            }
        }
    }

    fn end_transaction(
        &self,
        f: impl FnOnce(&mut dyn driver::Connection) -> Result<()>,
    ) -> Result<()> {
        self.with_connection(|state| {
            if !state.in_transaction {
                return Err(Error::invalid_statement("no transaction is open"));
            }
            state.in_transaction = false;
            match state.conn.as_mut() {
                Some(conn) => f(conn.as_mut()),
                None => Ok(()),
            }
        })
    }

    /// Locks the shared state, opening the driver connection first if needed.
    fn with_connection<T>(&self, f: impl FnOnce(&mut State) -> Result<T>) -> Result<T> {
        let mut state = self.shared.state.lock();

        if state.conn.is_none() {
            let conn = self.shared.driver.connect()?;
            tracing::info!(driver = self.driver_name(), url = %self.shared.driver.url(), "connected");
            state.conn = Some(conn);
        }

        f(&mut state)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("driver", &self.shared.driver)
            .field("dialect", &self.shared.dialect.name())
            .field("in_transaction", &self.in_transaction())
            .finish_non_exhaustive()
    }
}
