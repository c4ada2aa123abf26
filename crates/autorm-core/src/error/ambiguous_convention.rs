use super::Error;

/// Error when a convention has more than one equally valid answer.
///
/// This occurs when:
/// - An entity has several associations of the same target type and no
///   explicit column to tell them apart
/// - A collection's element type has several members pointing back at the
///   owning entity
/// - A type declares more than one concurrency version member
///
/// The candidates are the member names that competed for the decision.
#[derive(Debug)]
pub(super) struct AmbiguousConvention {
    message: Box<str>,
    candidates: Box<[String]>,
}

impl std::error::Error for AmbiguousConvention {}

impl core::fmt::Display for AmbiguousConvention {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "ambiguous convention: {}", self.message)?;
        if !self.candidates.is_empty() {
            write!(f, " (candidates: {})", self.candidates.join(", "))?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates an ambiguous convention error listing the competing members.
    pub fn ambiguous_convention<I, S>(message: impl Into<String>, candidates: I) -> Error
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Error::from(super::ErrorKind::AmbiguousConvention(AmbiguousConvention {
            message: message.into().into(),
            candidates: candidates.into_iter().map(Into::into).collect(),
        }))
    }

    /// Returns `true` if this error is an ambiguous convention error.
    pub fn is_ambiguous_convention(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::AmbiguousConvention(_))
    }

    /// Returns the competing member names when this is an ambiguous
    /// convention error.
    pub fn candidates(&self) -> Option<&[String]> {
        match self.root().kind() {
            super::ErrorKind::AmbiguousConvention(err) => Some(&err.candidates),
            _ => None,
        }
    }
}
