use super::Error;

#[derive(Debug)]
pub(super) struct UndefinedMethod {
    name: Box<str>,
}

impl std::error::Error for UndefinedMethod {}

impl core::fmt::Display for UndefinedMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "undefined method: {}", self.name)
    }
}

impl Error {
    pub fn undefined_method(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UndefinedMethod(UndefinedMethod {
            name: name.into().into(),
        }))
    }

    pub fn is_undefined_method(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UndefinedMethod(_))
    }
}
