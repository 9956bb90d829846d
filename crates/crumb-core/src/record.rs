mod slot;
pub use slot::{FieldValue, Slot};

use crate::{
    driver::Row,
    schema::Schema,
    stmt::{ParamType, Value},
};

use indexmap::IndexMap;

/// The state of one row: schema-backed fields, computed columns and
/// memoized props, in a single ordered map.
///
/// Schema fields come first, in schema order, followed by computed and
/// memoized slots in definition order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    slots: IndexMap<String, Slot>,
}

impl Record {
    /// A draft record with every column set to its default value.
    pub fn from_schema(schema: &Schema) -> Record {
        let slots = schema
            .columns
            .values()
            .map(|column| {
                (
                    column.name.clone(),
                    Slot::Field(FieldValue::new(column.default.clone(), column.param_type)),
                )
            })
            .collect();

        Record { slots }
    }

    /// Builds a committed record from a fetched row. Schema fields are
    /// coerced to their parameter type; computed slots of `template` take the
    /// value of their alias in the row.
    pub fn hydrate(schema: &Schema, template: &Record, row: &Row) -> Record {
        let mut record = template.clone();

        for (name, slot) in record.slots.iter_mut() {
            match slot {
                Slot::Field(field) => {
                    let raw = row.get(name).cloned().unwrap_or_default();
                    let ty = schema
                        .column(name)
                        .map(|column| column.param_type)
                        .unwrap_or(field.param_type);
                    *field = FieldValue::new(ty.coerce(raw), ty);
                }
                Slot::Computed { expr, value } => {
                    *value = match expr {
                        Some(_) => row.get(name).cloned().unwrap_or_default(),
                        None => Value::Null,
                    };
                }
                Slot::Memoized(_) => {}
            }
        }

        // Props are never carried from the template into fetched rows
        record
            .slots
            .retain(|_, slot| !matches!(slot, Slot::Memoized(_)));
        record
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    pub fn slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        self.slots.get_mut(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, slot: Slot) {
        self.slots.insert(name.into(), slot);
    }

    pub fn remove(&mut self, name: &str) -> Option<Slot> {
        self.slots.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// The current value of any slot.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name).map(Slot::value)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        match self.slots.get(name)? {
            Slot::Field(field) => Some(field),
            _ => None,
        }
    }

    /// Schema-backed fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.slots.iter().filter_map(|(name, slot)| match slot {
            Slot::Field(field) => Some((name.as_str(), field)),
            _ => None,
        })
    }

    /// Computed columns that are materialized from a SQL expression.
    pub fn computed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots.iter().filter_map(|(name, slot)| match slot {
            Slot::Computed {
                expr: Some(expr), ..
            } => Some((name.as_str(), expr.as_str())),
            _ => None,
        })
    }

    /// Names of schema fields whose value differs from the committed one.
    pub fn changed(&self) -> impl Iterator<Item = &str> {
        self.fields()
            .filter(|(_, field)| field.changed)
            .map(|(name, _)| name)
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.field(name).is_some_and(|field| field.changed)
    }

    pub fn is_dirty(&self) -> bool {
        self.changed().next().is_some()
    }

    /// Assigns a schema field. Returns `false` when `name` is not a schema
    /// field.
    pub fn set_field(&mut self, name: &str, value: Value) -> bool {
        match self.slots.get_mut(name) {
            Some(Slot::Field(field)) => {
                field.set(value);
                true
            }
            _ => false,
        }
    }

    /// Marks every field as committed: `initial` takes the current value and
    /// `changed` is cleared.
    pub fn commit(&mut self) {
        for slot in self.slots.values_mut() {
            if let Slot::Field(field) = slot {
                field.commit();
            }
        }
    }

    /// Schema fields and computed values as a plain row.
    pub fn to_row(&self) -> Row {
        self.slots
            .iter()
            .filter(|(_, slot)| !matches!(slot, Slot::Memoized(_)))
            .map(|(name, slot)| (name.clone(), slot.value().clone()))
            .collect()
    }

    /// Returns the parameter type of a schema field.
    pub fn param_type(&self, name: &str) -> Option<ParamType> {
        self.field(name).map(|field| field.param_type)
    }
}
