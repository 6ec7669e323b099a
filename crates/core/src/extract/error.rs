use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The uploaded document has a type we can't read yet.
    UnsupportedFormat,
    /// The server answered with a status other than `200`.
    FetchFailure,
    /// The request never got an answer (DNS, refused connection, bad URL).
    Transport,
    /// The uploaded text is not valid UTF-8.
    Decode,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnsupportedFormat => {
                write!(f, "Unsupported document format")
            }
            ErrorKind::FetchFailure => write!(f, "Fetch failure"),
            ErrorKind::Transport => write!(f, "Transport failure"),
            ErrorKind::Decode => write!(f, "Decode failure"),
        }
    }
}

/// Describes why no document context could be extracted.
///
/// The [`Display`] output is meant to be shown to the user as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
}

impl Error {
    /// Creates a new error with the `UnsupportedFormat` kind.
    #[inline]
    pub fn unsupported_format() -> Self {
        Self {
            kind: ErrorKind::UnsupportedFormat,
            reason: None,
        }
    }

    /// Creates a new error with the `FetchFailure` kind.
    #[inline]
    pub fn fetch_failure() -> Self {
        Self {
            kind: ErrorKind::FetchFailure,
            reason: None,
        }
    }

    /// Creates a new error with the `Transport` kind.
    #[inline]
    pub fn transport() -> Self {
        Self {
            kind: ErrorKind::Transport,
            reason: None,
        }
    }

    /// Creates a new error with the `Decode` kind.
    #[inline]
    pub fn decode() -> Self {
        Self {
            kind: ErrorKind::Decode,
            reason: None,
        }
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(self, reason: S) -> Self {
        Self {
            kind: self.kind,
            reason: Some(reason.into()),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::UnsupportedFormat => write!(f, "{}", self.reason()),
            ErrorKind::FetchFailure => write!(
                f,
                "Failed to fetch content from URL ({}). Please check the URL.",
                self.reason()
            ),
            ErrorKind::Transport => {
                write!(f, "An error occurred: {}", self.reason())
            }
            ErrorKind::Decode => write!(
                f,
                "The uploaded file is not valid UTF-8 text ({}).",
                self.reason()
            ),
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        let err = Error::unsupported_format()
            .with_reason("PDF support is not implemented yet.");
        assert_eq!(err.to_string(), "PDF support is not implemented yet.");

        let err = Error::fetch_failure().with_reason("HTTP 404");
        assert_eq!(
            err.to_string(),
            "Failed to fetch content from URL (HTTP 404). Please check the URL."
        );

        let err = Error::transport();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.to_string(), "An error occurred: Transport failure");
    }
}
