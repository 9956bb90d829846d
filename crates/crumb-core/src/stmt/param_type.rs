use super::Value;

/// How a value is bound to a statement parameter.
///
/// Each column carries the parameter type derived from its declared SQL type.
/// Values assigned to a column are coerced to that type before they are
/// compared for dirty tracking or bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Null,
    Bool,
    Int,
    String,
    Lob,
    /// Floats are bound as doubles but compared and cached like any scalar.
    Float,
}

impl ParamType {
    /// Maps a declared column type (`VARCHAR(255)`, `INTEGER`, `bytea`, ...)
    /// to the parameter type used to bind and coerce its values.
    pub fn from_declared(declared: &str) -> ParamType {
        let ty = declared.to_ascii_lowercase();

        if ty.starts_with("bool") || ty == "bit" {
            ParamType::Bool
        } else if (ty.contains("int") && !ty.contains("point") && !ty.starts_with("interval"))
            || ty.contains("serial")
        {
            ParamType::Int
        } else if ["float", "double", "real", "decimal", "numeric", "money"]
            .iter()
            .any(|t| ty.contains(t))
        {
            ParamType::Float
        } else if ["blob", "bytea", "binary", "image"]
            .iter()
            .any(|t| ty.contains(t))
        {
            ParamType::Lob
        } else {
            ParamType::String
        }
    }

    /// Detects the binding type of a value when no explicit type was given.
    pub fn detect(value: &Value) -> ParamType {
        match value {
            Value::Null => ParamType::Null,
            Value::Bool(_) => ParamType::Bool,
            Value::I64(_) => ParamType::Int,
            Value::F64(_) => ParamType::Float,
            Value::Bytes(_) => ParamType::Lob,
            Value::String(_) | Value::List(_) => ParamType::String,
        }
    }

    /// Coerces a raw value into this parameter type.
    ///
    /// `Null` is preserved for every type; lists are returned untouched.
    pub fn coerce(self, value: Value) -> Value {
        if value.is_null() || !value.is_scalar() {
            return value;
        }

        match self {
            ParamType::Null => Value::Null,
            ParamType::Bool => Value::Bool(match value {
                Value::Bool(v) => v,
                Value::I64(v) => v != 0,
                Value::F64(v) => v != 0.0,
                Value::String(v) => !matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "" | "0" | "f" | "false" | "n" | "no" | "off"
                ),
                Value::Bytes(v) => !v.is_empty(),
                Value::Null | Value::List(_) => false,
            }),
            ParamType::Int => Value::I64(match value {
                Value::Bool(v) => i64::from(v),
                Value::I64(v) => v,
                Value::F64(v) => v as i64,
                Value::String(v) => parse_int(&v),
                Value::Bytes(v) => parse_int(&String::from_utf8_lossy(&v)),
                Value::Null | Value::List(_) => 0,
            }),
            ParamType::Float => Value::F64(match value {
                Value::Bool(v) => f64::from(u8::from(v)),
                Value::I64(v) => v as f64,
                Value::F64(v) => v,
                Value::String(v) => v.trim().parse().unwrap_or(0.0),
                Value::Bytes(v) => String::from_utf8_lossy(&v).trim().parse().unwrap_or(0.0),
                Value::Null | Value::List(_) => 0.0,
            }),
            ParamType::String => match value {
                Value::String(v) => Value::String(v),
                other => Value::String(other.to_string()),
            },
            ParamType::Lob => match value {
                Value::Bytes(v) => Value::Bytes(v),
                Value::String(v) => Value::Bytes(v.into_bytes()),
                other => Value::Bytes(other.to_string().into_bytes()),
            },
        }
    }
}

fn parse_int(s: &str) -> i64 {
    let s = s.trim();
    s.parse::<i64>()
        .or_else(|_| s.parse::<f64>().map(|v| v as i64))
        .unwrap_or(0)
}
