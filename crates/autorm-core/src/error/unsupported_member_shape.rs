use super::Error;

/// Error when a member cannot be mapped because of its shape, e.g. a plain
/// field asked to be treated as a property.
#[derive(Debug)]
pub(super) struct UnsupportedMemberShape {
    member: Box<str>,
    reason: Box<str>,
}

impl std::error::Error for UnsupportedMemberShape {}

impl core::fmt::Display for UnsupportedMemberShape {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported member shape: `{}` {}",
            self.member, self.reason
        )
    }
}

impl Error {
    /// Creates an unsupported member shape error.
    pub fn unsupported_member_shape(
        member: impl Into<String>,
        reason: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::UnsupportedMemberShape(
            UnsupportedMemberShape {
                member: member.into().into(),
                reason: reason.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an unsupported member shape error.
    pub fn is_unsupported_member_shape(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::UnsupportedMemberShape(_))
    }
}
