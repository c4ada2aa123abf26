use super::Error;

/// Error when a model definition refers to a type name that was never
/// declared.
#[derive(Debug)]
pub(super) struct UnknownType {
    name: Box<str>,
}

impl std::error::Error for UnknownType {}

impl core::fmt::Display for UnknownType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown type `{}`", self.name)
    }
}

impl Error {
    /// Creates an unknown type error.
    pub fn unknown_type(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownType(UnknownType {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown type error.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::UnknownType(_))
    }
}
