use super::{Event, Mapper};

use crumb_core::{driver::Response, Record, Result};
use crumb_sql::{Filter, QueryOptions, Statement};

use std::time::Duration;

/// How [`Mapper::delete_where`] removes rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// One `DELETE ... WHERE` statement. Hooks do not run.
    #[default]
    Batch,

    /// Loads the matching rows and deletes them one at a time, running the
    /// delete hooks for each.
    PerRow,
}

impl Mapper {
    /// Inserts the current row and reloads it from the database.
    ///
    /// The row is read back by its generated key, taken from `RETURNING`
    /// where the dialect supports it and from the driver's last insert id
    /// otherwise. Tables without a generated key are re-queried by the
    /// written primary key. The submitted values become the loaded row only
    /// when the table has no primary key or the re-query finds nothing.
    ///
    /// Returns the number of inserted rows; `0` when nothing was written or
    /// a hook vetoed the insert.
    pub fn insert(&mut self) -> Result<u64> {
        if self.fire_before(Event::Insert).is_break() {
            return Ok(0);
        }

        let Some(insert) = self.builder().insert(self.current())? else {
            return Ok(0);
        };

        let response = self.run(&insert.statement)?;
        let affected = response.affected();

        let reloaded = match &insert.auto_increment {
            Some(key) => {
                let id = if insert.returning {
                    response.scalar().cloned().unwrap_or_default()
                } else {
                    self.conn.last_insert_id()?
                };
                self.reload(Filter::new().with(key.as_str(), id))?
            }
            None => self.reload_written()?,
        };

        let record = match reloaded {
            Some(record) => record,
            None => {
                let mut record = self.current().clone();
                record.commit();
                record
            }
        };

        self.rows = vec![record];
        self.cursor = 0;
        self.draft = self.template.clone();
        tracing::debug!(table = self.table(), fields = ?insert.fields, "inserted");

        self.fire_after(Event::Insert);
        Ok(affected)
    }

    /// Writes the changed fields of the row under the cursor and commits
    /// them. Returns `0` when dry, unchanged or vetoed.
    pub fn update(&mut self) -> Result<u64> {
        if self.dry() || self.fire_before(Event::Update).is_break() {
            return Ok(0);
        }

        let Some(statement) = self.builder().update(self.current())? else {
            return Ok(0);
        };

        let affected = self.run(&statement)?.affected();
        self.current_mut().commit();
        tracing::debug!(table = self.table(), affected, "updated");

        self.fire_after(Event::Update);
        Ok(affected)
    }

    /// Inserts while dry, updates otherwise.
    pub fn save(&mut self) -> Result<u64> {
        if self.dry() {
            self.insert()
        } else {
            self.update()
        }
    }

    /// Deletes the row under the cursor. The following row, if any, moves
    /// under the cursor; otherwise the mapper becomes dry.
    ///
    /// After hooks run while the deleted row is still under the cursor.
    pub fn delete(&mut self) -> Result<u64> {
        Ok(self.delete_current()?.unwrap_or(0))
    }

    /// Deletes every row matching `filter`.
    pub fn delete_where(&self, filter: impl Into<Filter>, mode: DeleteMode) -> Result<u64> {
        let filter = filter.into();

        match mode {
            DeleteMode::Batch => {
                let statement = self.builder().delete_where(&filter)?;
                let affected = self.run(&statement)?.affected();
                tracing::debug!(table = self.table(), affected, "deleted");
                Ok(affected)
            }
            DeleteMode::PerRow => {
                let mut found = self.find(filter, QueryOptions::new())?;
                let mut affected = 0;

                while found.valid() {
                    match found.delete_current()? {
                        Some(count) => affected += count,
                        // Vetoed rows stay loaded
                        None => {
                            found.next();
                        }
                    }
                }

                Ok(affected)
            }
        }
    }

    /// Returns `None` when no statement ran.
    fn delete_current(&mut self) -> Result<Option<u64>> {
        let Some(index) = self.position() else {
            return Ok(None);
        };

        if self.fire_before(Event::Delete).is_break() {
            return Ok(None);
        }

        let Some(statement) = self.builder().delete(&self.rows[index])? else {
            return Ok(None);
        };

        let affected = self.run(&statement)?.affected();
        tracing::debug!(table = self.table(), affected, "deleted");
        self.fire_after(Event::Delete);

        self.rows.remove(index);
        if self.dry() {
            self.draft = self.template.clone();
        }

        Ok(Some(affected))
    }

    /// Executes a write, bracketed by its identity insert toggles.
    fn run(&self, statement: &Statement) -> Result<Response> {
        let Some(identity) = &statement.identity_insert else {
            return self.conn.exec(&statement.sql, &statement.args, Duration::ZERO);
        };

        self.conn.exec(&identity.enable, (), Duration::ZERO)?;
        let response = self.conn.exec(&statement.sql, &statement.args, Duration::ZERO);
        let disabled = self.conn.exec(&identity.disable, (), Duration::ZERO);

        let response = response?;
        disabled?;
        Ok(response)
    }

    fn reload(&self, filter: Filter) -> Result<Option<Record>> {
        let rows = self.select(&filter, &QueryOptions::new().limit(1), Duration::ZERO)?;
        Ok(rows.into_iter().next())
    }

    /// Re-queries the current row by the primary key values it holds.
    fn reload_written(&self) -> Result<Option<Record>> {
        let mut filter = Filter::new();

        for column in self.schema.primary_keys() {
            match self.current().get(&column.name) {
                Some(value) if !value.is_null() => {
                    filter = filter.with(column.name.as_str(), value.clone());
                }
                _ => return Ok(None),
            }
        }

        if filter.is_empty() {
            return Ok(None);
        }

        self.reload(filter)
    }
}
