use super::Error;

/// Error when a key lookup supplies fewer values than the table has primary
/// key columns.
#[derive(Debug)]
pub(super) struct InsufficientPrimaryKey {
    expected: usize,
    actual: usize,
}

impl std::error::Error for InsufficientPrimaryKey {}

impl core::fmt::Display for InsufficientPrimaryKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "insufficient primary key: expected {} values, got {}",
            self.expected, self.actual
        )
    }
}

impl Error {
    pub fn insufficient_primary_key(expected: usize, actual: usize) -> Error {
        Error::from(super::ErrorKind::InsufficientPrimaryKey(
            InsufficientPrimaryKey { expected, actual },
        ))
    }

    pub fn is_insufficient_primary_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InsufficientPrimaryKey(_))
    }
}
