mod column;
pub use column::Column;

use indexmap::IndexMap;

/// Column metadata for one table, in introspection order.
///
/// A schema is built once per table by the driver and shared as an
/// `Arc<Schema>`. It is never mutated after construction; narrowing it to a
/// subset of fields produces a new schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Name of the table the columns were read from.
    pub table: String,

    /// Columns keyed by name, in the order the database reported them.
    pub columns: IndexMap<String, Column>,
}

impl Schema {
    pub fn new(table: impl Into<String>, columns: impl IntoIterator<Item = Column>) -> Schema {
        Schema {
            table: table.into(),
            columns: columns
                .into_iter()
                .map(|column| (column.name.clone(), column))
                .collect(),
        }
    }

    /// Returns a schema holding only the requested fields. The result keeps
    /// the introspection order, not the order of `fields`. Unknown names are
    /// ignored.
    pub fn filter<S: AsRef<str>>(&self, fields: &[S]) -> Schema {
        Schema {
            table: self.table.clone(),
            columns: self
                .columns
                .iter()
                .filter(|(name, _)| fields.iter().any(|f| f.as_ref() == name.as_str()))
                .map(|(name, column)| (name.clone(), column.clone()))
                .collect(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &Column> {
        self.columns.values().filter(|column| column.primary_key)
    }

    /// The single auto-increment key, if the table has one.
    ///
    /// This is a primary key that is the only primary key column, integer
    /// typed, non-nullable and without a default value: its value is
    /// assigned by the database on insert.
    pub fn auto_increment_key(&self) -> Option<&Column> {
        let mut pks = self.primary_keys();
        let pk = pks.next()?;

        if pks.next().is_some() {
            return None;
        }

        (pk.param_type == crate::stmt::ParamType::Int && !pk.nullable && pk.default.is_null())
            .then_some(pk)
    }
}
