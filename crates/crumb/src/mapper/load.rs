use super::{Event, Mapper, Page};

use crumb_core::{stmt::Value, Error, Record, Result};
use crumb_sql::{Filter, QueryOptions};

use std::time::Duration;

impl Mapper {
    /// Replaces the loaded rows with the rows matching `filter` and moves
    /// the cursor to the first one.
    pub fn load(&mut self, filter: impl Into<Filter>, options: QueryOptions) -> Result<&mut Self> {
        self.load_ttl(filter, options, Duration::ZERO)
    }

    /// Like [`Mapper::load`], caching the fetched rows for `ttl`.
    pub fn load_ttl(
        &mut self,
        filter: impl Into<Filter>,
        options: QueryOptions,
        ttl: Duration,
    ) -> Result<&mut Self> {
        self.reset();

        if self.fire_before(Event::Load).is_break() {
            return Ok(self);
        }

        self.rows = self.select(&filter.into(), &options, ttl)?;
        self.cursor = 0;
        tracing::debug!(table = self.table(), rows = self.rows.len(), "loaded");

        self.fire_after(Event::Load);
        Ok(self)
    }

    /// Loads matching rows into a new mapper, leaving this one untouched.
    pub fn find(&self, filter: impl Into<Filter>, options: QueryOptions) -> Result<Mapper> {
        let mut found = self.sibling();
        found.load(filter, options)?;
        Ok(found)
    }

    /// Like [`Mapper::find`], stopping at the first matching row.
    pub fn find_one(&self, filter: impl Into<Filter>, options: QueryOptions) -> Result<Mapper> {
        self.find(filter, options.limit(1))
    }

    /// Loads the row with the given primary key values, in key column order.
    pub fn load_by_key(&mut self, keys: &[Value]) -> Result<&mut Self> {
        let columns: Vec<&str> = self
            .schema
            .primary_keys()
            .map(|column| column.name.as_str())
            .collect();

        if columns.is_empty() {
            return Err(Error::missing_primary_key(self.table()));
        }

        if keys.len() < columns.len() {
            return Err(Error::insufficient_primary_key(columns.len(), keys.len()));
        }

        let filter: Filter = columns.into_iter().zip(keys.iter().cloned()).collect();
        self.load(filter, QueryOptions::new())
    }

    /// Number of rows matching `filter`, ignoring ordering and paging.
    pub fn count(&self, filter: impl Into<Filter>, options: QueryOptions) -> Result<u64> {
        let statement = self.builder().count(&filter.into(), &options)?;
        let response = self
            .conn
            .exec(&statement.sql, statement.args, Duration::ZERO)?;

        Ok(response
            .scalar()
            .and_then(Value::as_i64)
            .map_or(0, |count| count.max(0) as u64))
    }

    /// Loads the `page`th page (1-based) of `per_page` rows.
    ///
    /// Pages past the last row are empty and run no SELECT; their bounds
    /// saturate instead of overflowing.
    pub fn paginate(
        &self,
        page: u64,
        per_page: u64,
        filter: impl Into<Filter>,
        options: QueryOptions,
    ) -> Result<Page> {
        let filter = filter.into();
        let page = page.max(1);
        let per_page = per_page.max(1);

        let total = self.count(filter.clone(), options.clone())?;
        let offset = (page - 1).saturating_mul(per_page);

        let subset = if offset < total {
            // Drivers take LIMIT as a signed 64-bit integer
            let limit = per_page.min(i64::MAX as u64);
            self.find(filter, options.limit(limit).offset(offset))?
        } else {
            self.sibling()
        };
        let count = subset.loaded() as u64;

        Ok(Page {
            subset,
            total,
            pages: total.div_ceil(per_page),
            page,
            start: offset.saturating_add(1),
            end: offset.saturating_add(count),
            count,
        })
    }

    /// Runs a SELECT of the schema and computed columns.
    pub(super) fn select(
        &self,
        filter: &Filter,
        options: &QueryOptions,
        ttl: Duration,
    ) -> Result<Vec<Record>> {
        let builder = self.builder();
        let statement = builder.select(&builder.columns(Some(&self.template)), filter, options)?;
        let rows = self
            .conn
            .exec(&statement.sql, statement.args, ttl)?
            .into_rows();

        Ok(rows
            .iter()
            .map(|row| Record::hydrate(&self.schema, &self.template, row))
            .collect())
    }
}
