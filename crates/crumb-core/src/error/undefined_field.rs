use super::Error;

/// Error when reading a key that is neither a column, a computed field, a
/// memoized prop nor a registered method.
#[derive(Debug)]
pub(super) struct UndefinedField {
    table: Box<str>,
    field: Box<str>,
}

impl std::error::Error for UndefinedField {}

impl core::fmt::Display for UndefinedField {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "undefined field: {}.{}", self.table, self.field)
    }
}

impl Error {
    pub fn undefined_field(table: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UndefinedField(UndefinedField {
            table: table.into().into(),
            field: field.into().into(),
        }))
    }

    pub fn is_undefined_field(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UndefinedField(_))
    }
}
