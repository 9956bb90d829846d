use super::Error;

/// Error when a row-addressed statement (UPDATE, DELETE) targets a table
/// without a primary key.
#[derive(Debug)]
pub(super) struct MissingPrimaryKey {
    table: Box<str>,
}

impl std::error::Error for MissingPrimaryKey {}

impl core::fmt::Display for MissingPrimaryKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "table `{}` has no primary key", self.table)
    }
}

impl Error {
    pub fn missing_primary_key(table: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingPrimaryKey(MissingPrimaryKey {
            table: table.into().into(),
        }))
    }

    pub fn is_missing_primary_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingPrimaryKey(_))
    }
}
