use super::Error;

/// Error when an entity has no identifier member.
///
/// An identifier is either a member marked as the identifier or, when no
/// member is marked, a member named `Id`.
#[derive(Debug)]
pub(super) struct MissingIdentifier {
    entity: Box<str>,
}

impl std::error::Error for MissingIdentifier {}

impl core::fmt::Display for MissingIdentifier {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "missing identifier: entity `{}` has no identifier member", self.entity)
    }
}

impl Error {
    /// Creates a missing identifier error for the named entity.
    pub fn missing_identifier(entity: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingIdentifier(MissingIdentifier {
            entity: entity.into().into(),
        }))
    }

    /// Returns `true` if this error is a missing identifier error.
    pub fn is_missing_identifier(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::MissingIdentifier(_))
    }
}
