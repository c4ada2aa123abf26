use super::Error;

/// Error when a concurrency version member has a type other than a
/// timestamp, a 32-bit integer or a 64-bit integer.
#[derive(Debug)]
pub(super) struct UnsupportedVersionType {
    member: Box<str>,
    ty: Box<str>,
}

impl std::error::Error for UnsupportedVersionType {}

impl core::fmt::Display for UnsupportedVersionType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported version type: `{}` is of type {}; expected a timestamp, i32 or i64",
            self.member, self.ty
        )
    }
}

impl Error {
    /// Creates an unsupported version type error.
    pub fn unsupported_version_type(member: impl Into<String>, ty: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedVersionType(
            UnsupportedVersionType {
                member: member.into().into(),
                ty: ty.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an unsupported version type error.
    pub fn is_unsupported_version_type(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::UnsupportedVersionType(_))
    }
}
