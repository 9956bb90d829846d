use super::Error;

/// Error when a filter key cannot be parsed into a column and operator.
#[derive(Debug)]
pub(super) struct InvalidFilter {
    key: Box<str>,
    reason: &'static str,
}

impl std::error::Error for InvalidFilter {}

impl core::fmt::Display for InvalidFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid filter `{}`: {}", self.key, self.reason)
    }
}

impl Error {
    pub fn invalid_filter(key: impl Into<String>, reason: &'static str) -> Error {
        Error::from(super::ErrorKind::InvalidFilter(InvalidFilter {
            key: key.into().into(),
            reason,
        }))
    }

    pub fn is_invalid_filter(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidFilter(_))
    }
}
