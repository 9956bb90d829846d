use super::{Connect, Connection, Shared, State};
use crate::cache::Cache;

use crumb_core::{dialect, driver::Driver, Result};

use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};

#[derive(Default)]
pub struct Builder {
    cache: Option<Arc<dyn Cache>>,

    /// Default TTL of introspected schemas. Zero disables schema caching.
    schema_ttl: Duration,

    /// Driver identifier used to pick the SQL dialect, when it differs from
    /// the driver's own name.
    dialect: Option<String>,
}

impl Builder {
    pub fn cache(&mut self, cache: impl Cache) -> &mut Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    pub fn schema_ttl(&mut self, ttl: Duration) -> &mut Self {
        self.schema_ttl = ttl;
        self
    }

    /// Overrides the dialect, e.g. `mssql` for a server without
    /// `OFFSET ... FETCH`.
    pub fn dialect(&mut self, name: impl Into<String>) -> &mut Self {
        self.dialect = Some(name.into());
        self
    }

    pub fn connect(&mut self, url: &str) -> Result<Connection> {
        self.build(Connect::new(url)?)
    }

    pub fn build(&mut self, driver: impl Driver) -> Result<Connection> {
        let dialect = dialect::for_driver(self.dialect.as_deref().unwrap_or(driver.name()))?;

        Ok(Connection {
            shared: Arc::new(Shared {
                driver: Box::new(driver),
                dialect,
                state: Mutex::new(State::default()),
                cache: self.cache.clone(),
                schema_ttl: self.schema_ttl,
            }),
        })
    }
}
