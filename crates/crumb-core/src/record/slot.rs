use crate::stmt::{ParamType, Value};

/// One named value of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Backed by a table column.
    Field(FieldValue),

    /// A pseudo-column. With an `expr` it is selected as `(expr) AS name`
    /// and its value comes from the result set; without one it is a plain
    /// in-memory value.
    Computed { expr: Option<String>, value: Value },

    /// A value computed once by a registered method, or an opaque
    /// non-scalar value.
    Memoized(Value),
}

impl Slot {
    pub fn value(&self) -> &Value {
        match self {
            Slot::Field(field) => &field.value,
            Slot::Computed { value, .. } => value,
            Slot::Memoized(value) => value,
        }
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Slot::Field(_))
    }
}

/// A schema-backed value with its committed state.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub value: Value,

    /// Value as last loaded from, or written to, the database.
    pub initial: Value,

    /// `value != initial`, evaluated when the value was assigned.
    pub changed: bool,

    pub param_type: ParamType,
}

impl FieldValue {
    /// A committed value.
    pub fn new(value: Value, param_type: ParamType) -> FieldValue {
        FieldValue {
            initial: value.clone(),
            value,
            changed: false,
            param_type,
        }
    }

    /// Coerces and assigns `value`.
    pub fn set(&mut self, value: Value) {
        self.value = self.param_type.coerce(value);
        self.changed = self.value != self.initial;
    }

    pub fn commit(&mut self) {
        self.initial = self.value.clone();
        self.changed = false;
    }

    /// Restores the committed value.
    pub fn revert(&mut self) {
        self.value = self.initial.clone();
        self.changed = false;
    }
}
