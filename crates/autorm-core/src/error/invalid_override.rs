use super::Error;

/// Error when an explicit override cannot be honored.
///
/// This occurs when:
/// - A custom column type or id generator is not registered
/// - A custom column type does not accept the member's value type
/// - A filter is attached by a name nobody registered
/// - An override contradicts the inheritance layout of its type
#[derive(Debug)]
pub(super) struct InvalidOverride {
    message: Box<str>,
}

impl std::error::Error for InvalidOverride {}

impl core::fmt::Display for InvalidOverride {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid override: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid override error.
    pub fn invalid_override(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidOverride(InvalidOverride {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid override error.
    pub fn is_invalid_override(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::InvalidOverride(_))
    }
}
