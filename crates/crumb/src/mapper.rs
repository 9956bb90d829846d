mod cursor;

mod dispatch;
pub use dispatch::{Dispatched, Method};

mod hooks;
pub use hooks::Event;
use hooks::Hooks;

mod load;

mod page;
pub use page::Page;

mod relation;

mod write;
pub use write::DeleteMode;

use crate::db::Connection;

use crumb_core::{
    driver::Row,
    record::Slot,
    stmt::Value,
    Error, Record, Result, Schema,
};
use crumb_sql::QueryBuilder;

use indexmap::IndexMap;
use std::{sync::Arc, time::Duration};

type MethodFn = Arc<dyn Fn(&Mapper) -> Result<Value> + Send + Sync>;

/// An active record over one table.
///
/// A mapper holds the rows of its last load with a cursor over them. While
/// the cursor points at a row, reads and writes go to that row; otherwise the
/// mapper is *dry* and they go to a draft row that [`Mapper::insert`] writes.
#[derive(Clone)]
pub struct Mapper {
    conn: Connection,
    schema: Arc<Schema>,

    /// Blank row holding column defaults and computed column definitions.
    template: Record,

    draft: Record,
    rows: Vec<Record>,

    /// Index into `rows`. The mapper is dry while it is out of range.
    cursor: isize,

    methods: IndexMap<String, MethodFn>,
    hooks: Hooks,
}

impl Mapper {
    pub fn new(conn: &Connection, table: &str) -> Result<Mapper> {
        Mapper::with_options(conn, table, &[], None)
    }

    /// A mapper over a subset of the table's columns. `ttl` overrides the
    /// connection's schema cache TTL.
    pub fn with_options(
        conn: &Connection,
        table: &str,
        fields: &[&str],
        ttl: Option<Duration>,
    ) -> Result<Mapper> {
        let schema = conn.schema(table, fields, ttl)?;
        let template = Record::from_schema(&schema);

        Ok(Mapper {
            conn: conn.clone(),
            schema,
            draft: template.clone(),
            template,
            rows: vec![],
            cursor: 0,
            methods: IndexMap::new(),
            hooks: Hooks::default(),
        })
    }

    pub fn table(&self) -> &str {
        &self.schema.table
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Schema field names in column order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.schema.names()
    }

    /// The row under the cursor, or the draft row when dry.
    pub fn current(&self) -> &Record {
        match self.position() {
            Some(index) => &self.rows[index],
            None => &self.draft,
        }
    }

    fn current_mut(&mut self) -> &mut Record {
        match self.position() {
            Some(index) => &mut self.rows[index],
            None => &mut self.draft,
        }
    }

    /// Index of the row under the cursor.
    pub fn position(&self) -> Option<usize> {
        usize::try_from(self.cursor)
            .ok()
            .filter(|index| *index < self.rows.len())
    }

    pub fn valid(&self) -> bool {
        self.position().is_some()
    }

    pub fn dry(&self) -> bool {
        !self.valid()
    }

    /// Number of rows held from the last load.
    pub fn loaded(&self) -> usize {
        self.rows.len()
    }

    pub fn changed(&self, field: &str) -> bool {
        self.current().is_changed(field)
    }

    pub fn dirty(&self) -> bool {
        self.current().is_dirty()
    }

    /// Whether `key` names a field, computed column or memoized prop.
    pub fn exists(&self, key: &str) -> bool {
        self.current().contains(key)
    }

    /// The current row as a plain map.
    pub fn cast(&self) -> Row {
        self.current().to_row()
    }

    /// Assigns every schema field present in `row`; other keys are ignored.
    pub fn copy_from(&mut self, row: &Row) -> &mut Self {
        let record = self.current_mut();
        for (name, value) in row {
            record.set_field(name, value.clone());
        }
        self
    }

    /// Resets a field to its column default, a computed column to null, and
    /// forgets a memoized prop.
    pub fn clear(&mut self, key: &str) -> &mut Self {
        let default = self.schema.column(key).map(|column| column.default.clone());
        let record = self.current_mut();

        match record.slot_mut(key) {
            Some(Slot::Field(field)) => {
                if let Some(default) = default {
                    field.set(default);
                }
            }
            Some(Slot::Computed { value, .. }) => *value = Value::Null,
            Some(Slot::Memoized(_)) => {
                record.remove(key);
            }
            None => {}
        }
        self
    }

    /// Reads a value.
    ///
    /// Fields, computed columns and memoized props are read directly. A name
    /// registered with [`Mapper::method`] is invoked on first access and its
    /// result memoized on the current row.
    pub fn get(&mut self, key: &str) -> Result<Value> {
        if let Some(value) = self.current().get(key) {
            return Ok(value.clone());
        }

        let Some(method) = self.methods.get(key).cloned() else {
            return Err(Error::undefined_field(self.table(), key));
        };

        let value = method(self)?;
        self.current_mut()
            .insert(key, Slot::Memoized(value.clone()));
        Ok(value)
    }

    /// Reads a value without invoking registered methods.
    pub fn peek(&self, key: &str) -> Option<&Value> {
        self.current().get(key)
    }

    /// Assigns a value.
    ///
    /// Schema fields are coerced to their column type and marked changed
    /// when the value differs from the committed one. Computed columns take
    /// the value as is. Any other key given a scalar value becomes a computed
    /// column whose SQL expression is the value, replacing a prop of that
    /// name; a list or null is kept as a prop.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();

        match self.current_mut().slot_mut(key) {
            Some(Slot::Field(field)) => field.set(value),
            Some(Slot::Computed { value: slot, .. }) => *slot = value,
            Some(Slot::Memoized(_)) | None if value.is_scalar() && !value.is_null() => {
                self.define(key, value.to_string());
            }
            Some(Slot::Memoized(slot)) => *slot = value,
            None => self.current_mut().insert(key, Slot::Memoized(value)),
        }
        self
    }

    /// Declares a computed column selected as `(expr) AS name` on the next
    /// load. Schema fields cannot be shadowed.
    pub fn define(&mut self, name: &str, expr: impl Into<String>) -> &mut Self {
        if self.schema.contains(name) {
            return self;
        }

        let slot = Slot::Computed {
            expr: Some(expr.into()),
            value: Value::Null,
        };

        self.template.insert(name, slot.clone());
        self.draft.insert(name, slot.clone());
        for row in &mut self.rows {
            row.insert(name, slot.clone());
        }
        self
    }

    /// Registers a prop computed on first access by `f`.
    pub fn method(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Mapper) -> Result<Value> + Send + Sync + 'static,
    ) -> &mut Self {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Drops the loaded rows and starts a fresh draft. Computed column
    /// definitions, methods and hooks are kept.
    pub fn reset(&mut self) -> &mut Self {
        self.rows.clear();
        self.cursor = 0;
        self.draft = self.template.clone();
        self
    }

    fn builder(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(&self.schema, self.conn.dialect())
    }

    /// An empty mapper over the same table sharing definitions and hooks.
    fn sibling(&self) -> Mapper {
        Mapper {
            conn: self.conn.clone(),
            schema: self.schema.clone(),
            template: self.template.clone(),
            draft: self.template.clone(),
            rows: vec![],
            cursor: 0,
            methods: self.methods.clone(),
            hooks: self.hooks.clone(),
        }
    }
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field("table", &self.table())
            .field("loaded", &self.loaded())
            .field("position", &self.position())
            .field("current", self.current())
            .finish_non_exhaustive()
    }
}
