use crate::{
    builder::Clause, options::Tail, placeholders::Placeholders, Filter, QueryBuilder, QueryOptions,
};

use crumb_core::{
    record::FieldValue,
    stmt::{NamedArgs, Value},
    Error, Record, Result,
};

/// A generated statement with its named arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: NamedArgs,

    /// Statements to run before and after this one when it writes identity
    /// columns explicitly.
    pub identity_insert: Option<IdentityInsert>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityInsert {
    pub enable: String,
    pub disable: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub statement: Statement,

    /// The auto-increment key when the database generates its value.
    pub auto_increment: Option<String>,

    /// Whether the statement reads the generated key back with `RETURNING`.
    pub returning: bool,

    /// Columns written by the statement.
    pub fields: Vec<String>,
}

impl QueryBuilder<'_> {
    /// The default select list: schema columns followed by the computed
    /// columns of `template`.
    pub fn columns(&self, template: Option<&Record>) -> String {
        let mut columns: Vec<String> = self.schema.names().map(|name| self.quote(name)).collect();

        if let Some(template) = template {
            for (alias, expr) in template.computed() {
                columns.push(format!("({expr}) AS {}", self.quote(alias)));
            }
        }

        if columns.is_empty() {
            "*".to_string()
        } else {
            columns.join(", ")
        }
    }

    pub fn select(&self, fields: &str, filter: &Filter, options: &QueryOptions) -> Result<Statement> {
        let table = self.quote(self.table());
        let tail = self.filter_options(filter, options)?;
        Ok(select_with_tail(fields, &table, tail))
    }

    /// SELECT from the table under `alias`, as needed when joined tables
    /// share column names. The default paging order is qualified with the
    /// alias.
    pub fn select_from(
        &self,
        fields: &str,
        alias: &str,
        filter: &Filter,
        options: &QueryOptions,
    ) -> Result<Statement> {
        let table = format!("{} AS {}", self.quote(self.table()), self.quote(alias));
        let tail = self.tail(filter, options, Some(alias))?;
        Ok(select_with_tail(fields, &table, tail))
    }

    /// `SELECT COUNT(*) AS rows_`, ignoring ORDER BY and paging. Grouped
    /// queries are counted through a subquery so each group counts once.
    pub fn count(&self, filter: &Filter, options: &QueryOptions) -> Result<Statement> {
        let options = options.unpaged();
        let tail = self.filter_options(filter, &options)?;
        let table = self.quote(self.table());

        let sql = if options.group.is_some() {
            let inner = with_tail(format!("SELECT 1 AS one_ FROM {table}"), &tail.clause.sql);
            format!("SELECT COUNT(*) AS rows_ FROM ({inner}) AS sub_")
        } else {
            with_tail(
                format!("SELECT COUNT(*) AS rows_ FROM {table}"),
                &tail.clause.sql,
            )
        };

        Ok(Statement {
            sql,
            args: tail.clause.args,
            identity_insert: None,
        })
    }

    /// INSERT of the changed schema fields of `record`.
    ///
    /// The auto-increment key is left out while it holds no value. Returns
    /// `None` when no field changed.
    pub fn insert(&self, record: &Record) -> Result<Option<InsertStatement>> {
        let auto_increment = self
            .schema
            .auto_increment_key()
            .map(|column| column.name.as_str());

        let written: Vec<(&str, &FieldValue)> = record
            .fields()
            .filter(|(name, field)| self.schema.contains(name) && field.changed)
            .filter(|(name, field)| !(Some(*name) == auto_increment && field.value.is_null()))
            .collect();

        if written.is_empty() {
            return Ok(None);
        }

        let mut placeholders = Placeholders::default();
        let mut args = NamedArgs::new();
        let mut columns = vec![];
        let mut values = vec![];

        for (name, field) in &written {
            let placeholder = placeholders.next(name);
            columns.push(self.quote(name));
            values.push(placeholder.clone());
            args.insert(placeholder, field.value.clone());
        }

        let table = self.quote(self.table());
        let mut sql = format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            values.join(", ")
        );

        let generated = auto_increment.filter(|key| written.iter().all(|(name, _)| name != key));
        let mut returning = false;
        if let Some(clause) = generated.and_then(|key| self.dialect.returning(&[key])) {
            sql.push(' ');
            sql.push_str(&clause);
            returning = true;
        }

        let fields: Vec<String> = written.iter().map(|(name, _)| name.to_string()).collect();

        Ok(Some(InsertStatement {
            statement: Statement {
                sql,
                args,
                identity_insert: self.identity_insert(&fields),
            },
            auto_increment: generated.map(str::to_string),
            returning,
            fields,
        }))
    }

    /// UPDATE of the changed schema fields of `record`, matched on the
    /// committed primary key values. Returns `None` when no field changed.
    pub fn update(&self, record: &Record) -> Result<Option<Statement>> {
        let written: Vec<(&str, &FieldValue)> = record
            .fields()
            .filter(|(name, field)| self.schema.contains(name) && field.changed)
            .collect();

        if written.is_empty() {
            return Ok(None);
        }

        let mut placeholders = Placeholders::default();
        let mut args = NamedArgs::new();
        let mut assignments = vec![];

        for (name, field) in &written {
            let placeholder = placeholders.next(name);
            assignments.push(format!("{} = {placeholder}", self.quote(name)));
            args.insert(placeholder, field.value.clone());
        }

        let lookup: Vec<&str> = args.keys().map(String::as_str).collect();
        let clause = self.key_filter(record, &lookup)?;
        args.extend(clause.args);

        let fields: Vec<String> = written.iter().map(|(name, _)| name.to_string()).collect();

        Ok(Some(Statement {
            sql: format!(
                "UPDATE {} SET {} WHERE {}",
                self.quote(self.table()),
                assignments.join(", "),
                clause.sql
            ),
            args,
            identity_insert: self.identity_insert(&fields),
        }))
    }

    /// DELETE of `record`, matched on its committed primary key values.
    /// Returns `None` for a record that was never stored.
    pub fn delete(&self, record: &Record) -> Result<Option<Statement>> {
        let clause = self.key_filter(record, &[])?;

        let stored = self
            .schema
            .primary_keys()
            .any(|column| record.field(&column.name).is_some_and(|field| !field.initial.is_null()));
        if !stored {
            return Ok(None);
        }

        Ok(Some(Statement {
            sql: format!("DELETE FROM {} WHERE {}", self.quote(self.table()), clause.sql),
            args: clause.args,
            identity_insert: None,
        }))
    }

    /// DELETE of every row matching `filter`.
    pub fn delete_where(&self, filter: &Filter) -> Result<Statement> {
        let clause = self.filter(filter, &[])?;
        let head = format!("DELETE FROM {}", self.quote(self.table()));

        let sql = if clause.sql.is_empty() {
            head
        } else {
            format!("{head} WHERE {}", clause.sql)
        };

        Ok(Statement {
            sql,
            args: clause.args,
            identity_insert: None,
        })
    }

    fn key_filter(&self, record: &Record, lookup: &[&str]) -> Result<Clause> {
        let mut filter = Filter::new();
        let mut keys = 0;

        for column in self.schema.primary_keys() {
            let initial = record
                .field(&column.name)
                .map(|field| field.initial.clone())
                .unwrap_or(Value::Null);
            filter = filter.with(format!("{} =", column.name), initial);
            keys += 1;
        }

        if keys == 0 {
            return Err(Error::missing_primary_key(self.table()));
        }

        self.filter(&filter, lookup)
    }

    fn identity_insert(&self, fields: &[String]) -> Option<IdentityInsert> {
        let writes_key = self
            .schema
            .primary_keys()
            .any(|column| fields.contains(&column.name));
        if !writes_key {
            return None;
        }

        let table = self.table();
        Some(IdentityInsert {
            enable: self.dialect.identity_insert(table, true)?,
            disable: self.dialect.identity_insert(table, false)?,
        })
    }
}

fn select_with_tail(fields: &str, table: &str, tail: Tail) -> Statement {
    let sql = match &tail.row_number {
        None => with_tail(format!("SELECT {fields} FROM {table}"), &tail.clause.sql),
        Some(row_number) => {
            let inner = with_tail(
                format!(
                    "SELECT {fields}, ROW_NUMBER() OVER (ORDER BY {}) AS rnum_ FROM {table}",
                    row_number.order
                ),
                &tail.clause.sql,
            );
            let mut sql = format!(
                "SELECT * FROM ({inner}) AS rows_ WHERE rnum_ > {}",
                row_number.offset
            );
            if let Some(limit) = row_number.limit {
                let last = row_number.offset.saturating_add(limit);
                sql.push_str(&format!(" AND rnum_ <= {last}"));
            }
            sql
        }
    };

    Statement {
        sql,
        args: tail.clause.args,
        identity_insert: None,
    }
}

fn with_tail(head: String, tail: &str) -> String {
    if tail.is_empty() {
        head
    } else {
        format!("{head} {tail}")
    }
}
