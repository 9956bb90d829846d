use crate::stmt::{ParamType, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The name of the column in the database.
    pub name: String,

    /// Default value, already coerced to `param_type`. `Null` when the column
    /// has no default or its default is computed by the database.
    pub default: Value,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// True if the column is part of the table's primary key
    pub primary_key: bool,

    /// The type as declared in the database, e.g. `VARCHAR(255)`.
    pub declared_type: String,

    /// How values of this column are bound and coerced.
    pub param_type: ParamType,
}

impl Column {
    /// A nullable, non-key column without default. The parameter type is
    /// derived from `declared_type`.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Column {
        let declared_type = declared_type.into();
        Column {
            name: name.into(),
            default: Value::Null,
            nullable: true,
            primary_key: false,
            param_type: ParamType::from_declared(&declared_type),
            declared_type,
        }
    }

    /// Marks the column as (part of) the primary key. Key columns are never
    /// nullable.
    pub fn primary_key(mut self) -> Column {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Column {
        self.nullable = false;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Column {
        self.default = self.param_type.coerce(value.into());
        self
    }
}
