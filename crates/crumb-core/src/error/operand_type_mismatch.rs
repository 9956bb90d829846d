use super::Error;

/// Error when a filter operand has the wrong shape for its operator.
///
/// `IN` requires a list, `BETWEEN` requires a list of exactly two values.
#[derive(Debug)]
pub(super) struct OperandTypeMismatch {
    key: Box<str>,
}

impl std::error::Error for OperandTypeMismatch {}

impl core::fmt::Display for OperandTypeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "operand type mismatch: {}", self.key)
    }
}

impl Error {
    pub fn operand_type_mismatch(key: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::OperandTypeMismatch(OperandTypeMismatch {
            key: key.into().into(),
        }))
    }

    pub fn is_operand_type_mismatch(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::OperandTypeMismatch(_))
    }
}
