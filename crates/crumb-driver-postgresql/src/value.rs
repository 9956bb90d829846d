use crumb_core::stmt::Value as CoreValue;
use postgres::types::{private::BytesMut, to_sql_checked, Format, IsNull, ToSql, Type};
use std::io;

type BoxError = Box<dyn std::error::Error + Sync + Send>;

/// A bound parameter, encoded according to the type the server inferred
/// for its placeholder.
///
/// Parameters of types without a native mapping (`numeric`, `date`,
/// `timestamptz`, `uuid`, `json`, ...) are sent in text format and parsed by
/// the server.
#[derive(Debug)]
pub struct Value(pub(crate) CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

/// Types exchanged in binary form. Everything else travels as text.
pub(crate) fn is_native(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::BOOL
            | Type::INT2
            | Type::INT4
            | Type::INT8
            | Type::FLOAT4
            | Type::FLOAT8
            | Type::BYTEA
            | Type::TEXT
            | Type::VARCHAR
            | Type::BPCHAR
            | Type::NAME
            | Type::UNKNOWN
    )
}

impl Value {
    /// The text form sent for a non-native parameter type.
    fn text(&self) -> Option<String> {
        match &self.0 {
            CoreValue::Bool(value) => Some(value.to_string()),
            CoreValue::I64(value) => Some(value.to_string()),
            CoreValue::F64(value) if value.is_infinite() => Some(
                if value.is_sign_negative() { "-Infinity" } else { "Infinity" }.to_string(),
            ),
            CoreValue::F64(value) => Some(value.to_string()),
            CoreValue::String(value) => Some(value.clone()),
            CoreValue::Null | CoreValue::Bytes(_) | CoreValue::List(_) => None,
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError>
    where
        Self: Sized,
    {
        if self.0.is_null() {
            return Ok(IsNull::Yes);
        }

        if !is_native(ty) {
            let text = self.text().ok_or_else(|| mismatch(kind(&self.0), ty))?;
            out.extend_from_slice(text.as_bytes());
            return Ok(IsNull::No);
        }

        match &self.0 {
            CoreValue::Null => Ok(IsNull::Yes),
            CoreValue::Bool(value) => match *ty {
                Type::BOOL => value.to_sql(ty, out),
                _ => int_to_sql(i64::from(*value), ty, out),
            },
            CoreValue::I64(value) => int_to_sql(*value, ty, out),
            CoreValue::F64(value) => match *ty {
                Type::FLOAT4 => (*value as f32).to_sql(ty, out),
                Type::FLOAT8 => value.to_sql(ty, out),
                Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::UNKNOWN => {
                    value.to_string().to_sql(ty, out)
                }
                _ => int_to_sql(*value as i64, ty, out),
            },
            CoreValue::String(value) => match *ty {
                Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
                    value.to_sql(ty, out)
                }
                Type::BOOL => matches!(value.as_str(), "1" | "t" | "true").to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 => {
                    let parsed: i64 = value.trim().parse()?;
                    int_to_sql(parsed, ty, out)
                }
                Type::FLOAT4 | Type::FLOAT8 => {
                    let parsed: f64 = value.trim().parse()?;
                    Value(CoreValue::F64(parsed)).to_sql(ty, out)
                }
                Type::BYTEA => value.as_bytes().to_sql(ty, out),
                _ => Err(mismatch("string", ty)),
            },
            CoreValue::Bytes(value) => match *ty {
                Type::BYTEA => value.as_slice().to_sql(ty, out),
                _ => Err(mismatch("bytes", ty)),
            },
            CoreValue::List(_) => Err(mismatch("list", ty)),
        }
    }

    // Nulls bind to any type; mismatches are reported by `to_sql`
    fn accepts(_: &Type) -> bool {
        true
    }

    fn encode_format(&self, ty: &Type) -> Format {
        if !is_native(ty) && self.text().is_some() {
            Format::Text
        } else {
            Format::Binary
        }
    }

    to_sql_checked!();
}

fn int_to_sql(value: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(value)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(value)?.to_sql(ty, out),
        Type::INT8 => value.to_sql(ty, out),
        Type::FLOAT4 => (value as f32).to_sql(ty, out),
        Type::FLOAT8 => (value as f64).to_sql(ty, out),
        Type::BOOL => (value != 0).to_sql(ty, out),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::UNKNOWN => {
            value.to_string().to_sql(ty, out)
        }
        _ => Err(mismatch("integer", ty)),
    }
}

fn kind(value: &CoreValue) -> &'static str {
    match value {
        CoreValue::Null => "null",
        CoreValue::Bool(_) => "bool",
        CoreValue::I64(_) => "integer",
        CoreValue::F64(_) => "float",
        CoreValue::String(_) => "string",
        CoreValue::Bytes(_) => "bytes",
        CoreValue::List(_) => "list",
    }
}

fn mismatch(kind: &str, ty: &Type) -> BoxError {
    Box::new(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("cannot bind {kind} value to parameter of type `{ty}`"),
    ))
}
